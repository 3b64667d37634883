//! 批处理提交服务
//!
//! 所有子请求作为一个批处理一次提交，失败不重试

use tracing::{debug, error, info};

use crate::clients::{BatchApi, BetaFeature};
use crate::error::{AppError, AppResult};
use crate::models::{BatchJob, SubRequest};

/// 提交批处理时声明的能力：临时缓存 + 批处理
pub const BATCH_FEATURES: [BetaFeature; 2] =
    [BetaFeature::PromptCaching, BetaFeature::MessageBatches];

pub struct BatchSubmitter;

impl BatchSubmitter {
    pub async fn submit(api: &dyn BatchApi, requests: &[SubRequest]) -> AppResult<BatchJob> {
        info!("📦 正在提交批处理: {} 个子请求", requests.len());

        let job = api
            .create_batch(requests, &BATCH_FEATURES)
            .await
            .map_err(|e| {
                error!("❌ 批处理提交失败: {}", e);
                AppError::BatchSubmit(e)
            })?;

        if let Ok(json) = serde_json::to_string_pretty(&job) {
            debug!("批处理创建结果: {}", json);
        }
        info!(
            "✓ 批处理已创建: {} (状态: {})",
            job.id, job.processing_status
        );

        Ok(job)
    }
}
