//! 缓存预热服务
//!
//! 在提交批处理之前发送一次最小调用，把共享上下文写入服务端临时缓存。
//! 预热失败时整个运行中止。

use tracing::{debug, error, info};

use crate::clients::{BatchApi, BetaFeature};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ContentBlock, InputMessage, Message, MessageParams, Metadata, SharedContext};

pub struct CacheWarmer {
    model_name: String,
    user_id_prefix: String,
}

impl CacheWarmer {
    pub fn new(config: &Config) -> Self {
        Self {
            model_name: config.model_name.clone(),
            user_id_prefix: config.user_id_prefix.clone(),
        }
    }

    /// 预热请求：只有上下文一个块，输出 1 个 token
    pub fn warm_params(&self, context: &SharedContext) -> MessageParams {
        MessageParams {
            model: self.model_name.clone(),
            max_tokens: 1,
            temperature: 0.0,
            metadata: Metadata {
                user_id: format!("{}{}", self.user_id_prefix, context.digest()),
            },
            messages: vec![InputMessage::user(vec![ContentBlock::cached_text(
                context.text(),
            )])],
        }
    }

    /// 发送预热调用并等待其完成
    pub async fn warm(&self, api: &dyn BatchApi, context: &SharedContext) -> AppResult<Message> {
        info!("🔥 正在预热上下文缓存 (摘要 {})...", context.digest());

        let params = self.warm_params(context);
        let message = api
            .create_message(&params, &[BetaFeature::PromptCaching])
            .await
            .map_err(|e| {
                error!("❌ 缓存预热失败: {}", e);
                AppError::CacheWarm(e)
            })?;

        if let Ok(json) = serde_json::to_string_pretty(&message) {
            debug!("预热响应: {}", json);
        }
        info!(
            "✓ 缓存预热完成: message {} | 缓存写入 {} tokens | 缓存命中 {} tokens",
            message.id,
            message.usage.cache_creation_input_tokens.unwrap_or(0),
            message.usage.cache_read_input_tokens.unwrap_or(0)
        );

        Ok(message)
    }
}
