//! 子请求构建
//!
//! 纯转换：共享上下文 + 问题列表 → 子请求列表，顺序与输入一致

use crate::config::Config;
use crate::models::{ContentBlock, InputMessage, MessageParams, Metadata, Question, SharedContext, SubRequest};

/// 子请求构建器
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    model_name: String,
    max_tokens: u32,
    user_id_prefix: String,
}

impl RequestBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            model_name: config.model_name.clone(),
            max_tokens: config.max_tokens,
            user_id_prefix: config.user_id_prefix.clone(),
        }
    }

    /// 子请求标识：上下文摘要 + 问题摘要，无分隔符
    pub fn custom_id(context: &SharedContext, question: &Question) -> String {
        format!("{}{}", context.digest(), question.digest())
    }

    /// 为每个问题构建一个子请求
    ///
    /// 只有上下文块带临时缓存标记，问题块不带
    pub fn build(&self, context: &SharedContext, questions: &[Question]) -> Vec<SubRequest> {
        questions
            .iter()
            .map(|question| {
                let custom_id = Self::custom_id(context, question);
                SubRequest {
                    params: MessageParams {
                        model: self.model_name.clone(),
                        max_tokens: self.max_tokens,
                        temperature: 0.0,
                        metadata: Metadata {
                            user_id: format!("{}{}", self.user_id_prefix, custom_id),
                        },
                        messages: vec![InputMessage::user(vec![
                            ContentBlock::cached_text(context.text()),
                            ContentBlock::text(question.text()),
                        ])],
                    },
                    custom_id,
                }
            })
            .collect()
    }
}
