//! 远程批处理服务的接口
//!
//! 工作流只依赖这个 trait，测试中用内存实现替换真实客户端

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::ApiError;
use crate::models::{BatchJob, Message, MessageParams, ResultRecord, SubRequest};

/// 需要在请求中声明的服务端能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetaFeature {
    PromptCaching,
    MessageBatches,
}

impl BetaFeature {
    pub fn as_str(self) -> &'static str {
        match self {
            BetaFeature::PromptCaching => "prompt-caching-2024-07-31",
            BetaFeature::MessageBatches => "message-batches-2024-09-24",
        }
    }

    /// `anthropic-beta` 头的值
    pub fn header_value(features: &[BetaFeature]) -> String {
        features
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 结果流：按需逐条拉取
pub type ResultStream = BoxStream<'static, Result<ResultRecord, ApiError>>;

#[async_trait]
pub trait BatchApi: Send + Sync {
    /// 单条消息调用
    async fn create_message(
        &self,
        params: &MessageParams,
        features: &[BetaFeature],
    ) -> Result<Message, ApiError>;

    /// 创建批处理任务
    async fn create_batch(
        &self,
        requests: &[SubRequest],
        features: &[BetaFeature],
    ) -> Result<BatchJob, ApiError>;

    /// 重新获取任务状态
    async fn retrieve_batch(&self, batch_id: &str) -> Result<BatchJob, ApiError>;

    /// 打开结果流，每次调用都重新从服务端读取
    async fn stream_batch_results(&self, batch_id: &str) -> Result<ResultStream, ApiError>;
}
