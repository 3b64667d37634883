//! 结果保存服务
//!
//! 逐条拉取结果流，每条结果完整序列化后写入 `<output_dir>/<custom_id>.json`。
//! 单条结果的失败（格式错误、非法 id、写入失败）只记录并计数，流继续；
//! 结果流本身的网络错误会中止运行。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clients::BatchApi;
use crate::error::{ApiError, AppError, AppResult, ConfigError, PersistError};
use crate::models::{ResultOutcome, ResultRecord};

/// 结果保存统计
#[derive(Debug, Clone, Default)]
pub struct SinkReport {
    /// 已保存的 custom_id，按到达顺序
    pub persisted: Vec<String>,
    /// 保存失败的条数
    pub failed: usize,
    pub outcomes: HashMap<ResultOutcome, usize>,
}

pub struct ResultSink {
    output_dir: PathBuf,
}

impl ResultSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 结果文件路径
    pub fn artifact_path(&self, custom_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", custom_id))
    }

    /// 确保输出目录存在
    pub async fn prepare(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ConfigError::OutputDir {
                path: self.output_dir.clone(),
                source,
            })
    }

    /// 保存单条结果，覆盖同名文件
    ///
    /// 先写临时文件再重命名，不会留下半条结果
    pub async fn persist(&self, record: &ResultRecord) -> Result<PathBuf, PersistError> {
        if !is_valid_custom_id(&record.custom_id) {
            return Err(PersistError::InvalidId {
                custom_id: record.custom_id.clone(),
            });
        }

        let json =
            serde_json::to_string_pretty(record).map_err(|source| PersistError::Serialize {
                custom_id: record.custom_id.clone(),
                source,
            })?;

        let path = self.artifact_path(&record.custom_id);
        let tmp_path = self
            .output_dir
            .join(format!(".{}.json.tmp", record.custom_id));

        fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|source| PersistError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        if let Err(source) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(PersistError::Write { path, source });
        }

        debug!("{}", json);
        Ok(path)
    }

    /// 读取结果流并逐条保存
    pub async fn drain(
        &self,
        api: &dyn BatchApi,
        batch_id: &str,
        cancel: &CancellationToken,
    ) -> AppResult<SinkReport> {
        self.prepare().await?;

        info!("📥 正在读取批处理 {} 的结果...", batch_id);
        let mut stream = api
            .stream_batch_results(batch_id)
            .await
            .map_err(|source| {
                error!("❌ 无法打开批处理 {} 的结果流: {}", batch_id, source);
                AppError::ResultStream {
                    batch_id: batch_id.to_string(),
                    source,
                }
            })?;

        let mut report = SinkReport::default();

        loop {
            if cancel.is_cancelled() {
                warn!(
                    "⚠️ 结果读取已取消: 批处理 {} (已保存 {} 条)",
                    batch_id,
                    report.persisted.len()
                );
                return Err(AppError::Cancelled);
            }

            let Some(item) = stream.next().await else {
                break;
            };

            match item {
                Ok(record) => {
                    let outcome = record.outcome();
                    match self.persist(&record).await {
                        Ok(path) => {
                            info!(
                                "✓ {} ({}) → {}",
                                record.custom_id,
                                outcome,
                                path.display()
                            );
                            *report.outcomes.entry(outcome).or_insert(0) += 1;
                            report.persisted.push(record.custom_id);
                        }
                        Err(e) => {
                            warn!("⚠️ 结果保存失败: {}", e);
                            report.failed += 1;
                        }
                    }
                }
                Err(e @ ApiError::Decode { .. }) => {
                    warn!("⚠️ 跳过无法解析的结果: {}", e);
                    report.failed += 1;
                }
                Err(source) => {
                    error!(
                        "❌ 批处理 {} 结果流中断 (已保存 {} 条): {}",
                        batch_id,
                        report.persisted.len(),
                        source
                    );
                    return Err(AppError::ResultStream {
                        batch_id: batch_id.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// 服务端约束：1-64 个字母、数字、`_` 或 `-`
fn is_valid_custom_id(custom_id: &str) -> bool {
    !custom_id.is_empty()
        && custom_id.len() <= 64
        && custom_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
