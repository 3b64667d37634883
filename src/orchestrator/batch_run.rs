//! 批处理运行 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次运行的完整生命周期。
//!
//! ## 流程
//!
//! 1. **加载输入**：读取共享上下文和问题列表
//! 2. **构建请求**：每个问题一个子请求
//! 3. **缓存预热**：一次最小调用，必须在提交之前完成
//! 4. **提交批处理**：所有子请求一次提交
//! 5. **轮询状态**：固定间隔，直到 ended
//! 6. **保存结果**：逐条拉取并落盘
//!
//! ## 设计特点
//!
//! - **严格顺序**：每一步等待上一步完成，没有并发
//! - **资源所有者**：唯一持有 API 客户端的模块，所有调用复用同一连接池
//! - **可取消**：取消令牌在轮询和结果读取的每一步之间检查

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::clients::{AnthropicClient, BatchApi};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{load_questions, load_shared_context, ResultOutcome};
use crate::services::{BatchPoller, BatchSubmitter, CacheWarmer, RequestBuilder, ResultSink};
use crate::utils::logging::{log_questions, log_startup, print_final_stats};

/// 一次运行的统计
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub batch_id: String,
    pub requests: usize,
    pub polls: usize,
    /// 已保存的 custom_id
    pub persisted: Vec<String>,
    pub failed: usize,
    pub outcomes: HashMap<ResultOutcome, usize>,
}

/// 应用主结构
pub struct App {
    config: Config,
    api: Arc<dyn BatchApi>,
    cancel: CancellationToken,
}

impl App {
    /// 初始化应用，创建真实的 API 客户端
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let client = AnthropicClient::new(&config)?;
        log_startup(&config);
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// 使用指定的 API 实现
    pub fn with_api(config: Config, api: Arc<dyn BatchApi>) -> Self {
        Self {
            config,
            api,
            cancel: CancellationToken::new(),
        }
    }

    /// 取消令牌，调用 `cancel()` 会在下一个检查点中止运行
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        let api = self.api.as_ref();

        let context = load_shared_context(&self.config.context_file).await?;
        let questions = load_questions(
            self.config.questions_file.as_deref(),
            &self.config.questions,
        )
        .await?;
        log_questions(&questions);

        let requests = RequestBuilder::new(&self.config).build(&context, &questions);

        // 先确认输出目录可用，再开始产生费用的调用
        let sink = ResultSink::new(&self.config.output_dir);
        sink.prepare().await?;

        self.ensure_active()?;
        CacheWarmer::new(&self.config).warm(api, &context).await?;

        self.ensure_active()?;
        let job = BatchSubmitter::submit(api, &requests).await?;

        let poll = BatchPoller::new(&self.config)
            .wait_for_results(api, job, &self.cancel)
            .await?;

        let report = sink.drain(api, &poll.job.id, &self.cancel).await?;

        let summary = RunSummary {
            batch_id: poll.job.id,
            requests: requests.len(),
            polls: poll.polls,
            persisted: report.persisted,
            failed: report.failed,
            outcomes: report.outcomes,
        };
        print_final_stats(&summary, &self.config);

        if summary.failed > 0 {
            return Err(AppError::RecordsFailed {
                batch_id: summary.batch_id,
                failed: summary.failed,
            });
        }

        info!("🎉 运行完成");
        Ok(summary)
    }

    fn ensure_active(&self) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }
}
