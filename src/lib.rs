//! # Context Batch
//!
//! 针对同一份大型文档批量提问的 Rust 应用程序：
//! 先预热服务端临时缓存，再把所有问题作为一个批处理提交，轮询直到结束，最后逐条保存答案。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 连接池，只暴露远程调用能力
//! - `BatchApi` - 远程批处理服务接口
//! - `AnthropicClient` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 每个服务只负责一个步骤
//! - `digest` / `RequestBuilder` - 纯计算：标识与子请求
//! - `CacheWarmer` / `BatchSubmitter` - 一次性调用
//! - `BatchPoller` - 状态轮询
//! - `ResultSink` - 结果落盘
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_run` - 一次运行的完整流程和统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{AnthropicClient, BatchApi, BetaFeature};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ConfigError};
pub use models::{BatchJob, ProcessingStatus, Question, ResultRecord, SharedContext, SubRequest};
pub use orchestrator::{App, RunSummary};
