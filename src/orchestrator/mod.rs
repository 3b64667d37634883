//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次批处理运行的调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_run (App：加载输入、串联各步骤、汇总统计)
//!     ↓
//! services (能力层：digest / request_builder / cache_warmer /
//!           batch_submitter / batch_poller / result_sink)
//!     ↓
//! clients (基础设施：BatchApi / AnthropicClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **严格顺序**：预热完成之后才提交批处理
//! 2. **资源隔离**：只有编排层持有 API 客户端
//! 3. **向下依赖**：编排层 → services → clients
//! 4. **无业务逻辑**：只做调度和统计

pub mod batch_run;

// 重新导出主要类型
pub use batch_run::{App, RunSummary};
