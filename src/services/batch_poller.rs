//! 批处理轮询服务
//!
//! 状态机：created → in_progress → ended
//!
//! - 每隔固定间隔重新获取一次任务，直到状态为 ended
//! - 获取失败只记录日志，不改变状态，下一次继续重试，不限次数
//! - ended 但没有结果地址视为批处理失败，不会读取结果流
//! - 取消只在两次请求之间生效

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clients::BatchApi;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::BatchJob;

/// 轮询结果
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// 最终状态的任务，保证带有结果地址
    pub job: BatchJob,
    /// 创建之后调用 retrieve 的次数
    pub polls: usize,
}

pub struct BatchPoller {
    interval: Duration,
    max_wait: Option<Duration>,
}

impl BatchPoller {
    pub fn new(config: &Config) -> Self {
        Self::with_interval(config.poll_interval, config.max_wait)
    }

    pub fn with_interval(interval: Duration, max_wait: Option<Duration>) -> Self {
        Self { interval, max_wait }
    }

    /// 等待批处理结束
    pub async fn wait_for_results(
        &self,
        api: &dyn BatchApi,
        created: BatchJob,
        cancel: &CancellationToken,
    ) -> AppResult<PollOutcome> {
        let batch_id = created.id.clone();
        let started = Instant::now();
        let mut job = created;
        let mut polls = 0usize;

        info!(
            "⏳ 开始轮询批处理 {} (间隔 {:?})",
            batch_id, self.interval
        );

        while !job.processing_status.is_terminal() {
            let pause = match self.remaining(started) {
                Some(remaining) if remaining.is_zero() => {
                    return Err(self.ceiling_exceeded(batch_id, &job, started));
                }
                Some(remaining) => self.interval.min(remaining),
                None => self.interval,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(
                        "⚠️ 轮询已取消: 批处理 {} (状态: {})",
                        batch_id, job.processing_status
                    );
                    return Err(AppError::Cancelled);
                }
                _ = sleep(pause) => {}
            }

            // 上限落在两次轮询之间时不再多发一次请求
            if self.remaining(started).is_some_and(|r| r.is_zero()) {
                return Err(self.ceiling_exceeded(batch_id, &job, started));
            }

            polls += 1;
            match api.retrieve_batch(&batch_id).await {
                Ok(latest) => {
                    job = latest;
                    info!(
                        "批处理 {} 状态: {} (第 {} 次轮询)",
                        batch_id, job.processing_status, polls
                    );
                    if let Some(counts) = job.request_counts {
                        debug!(
                            "处理中 {} | 成功 {} | 出错 {} | 取消 {} | 过期 {}",
                            counts.processing,
                            counts.succeeded,
                            counts.errored,
                            counts.canceled,
                            counts.expired
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        "⚠️ 获取批处理 {} 状态失败 (当前状态: {}, 瞬时: {}): {}",
                        batch_id,
                        job.processing_status,
                        e.is_transient(),
                        e
                    );
                }
            }
        }

        if !job.has_results() {
            error!("❌ 批处理 {} 已结束但没有结果地址", batch_id);
            if let Ok(json) = serde_json::to_string_pretty(&job) {
                error!("{}", json);
            }
            return Err(AppError::BatchFailed {
                batch_id,
                status: job.processing_status,
            });
        }

        if let Ok(json) = serde_json::to_string_pretty(&job) {
            debug!("批处理最终状态: {}", json);
        }
        info!("✓ 批处理 {} 已结束，共轮询 {} 次", batch_id, polls);

        Ok(PollOutcome { job, polls })
    }

    /// 距离最长等待时间还剩多少；未设置上限时为 None
    fn remaining(&self, started: Instant) -> Option<Duration> {
        self.max_wait
            .map(|max_wait| max_wait.saturating_sub(started.elapsed()))
    }

    fn ceiling_exceeded(&self, batch_id: String, job: &BatchJob, started: Instant) -> AppError {
        let waited = started.elapsed();
        error!(
            "❌ 批处理 {} 超过最长等待时间 {:?} (状态: {})",
            batch_id, waited, job.processing_status
        );
        AppError::WaitCeilingExceeded { batch_id, waited }
    }
}
