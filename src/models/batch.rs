//! 远程服务返回的结构
//!
//! 未显式建模的字段通过 `extra` 原样保留，日志和持久化都不会丢字段。

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 批处理任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Created,
    InProgress,
    Canceling,
    Ended,
    #[serde(other)]
    Unknown,
}

impl ProcessingStatus {
    /// 终止状态之后不会再发生状态转换
    pub fn is_terminal(self) -> bool {
        self == ProcessingStatus::Ended
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessingStatus::Created => "created",
            ProcessingStatus::InProgress => "in_progress",
            ProcessingStatus::Canceling => "canceling",
            ProcessingStatus::Ended => "ended",
            ProcessingStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// 批处理任务
///
/// 只能通过重新获取来更新，本地从不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub results_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_counts: Option<RequestCounts>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchJob {
    /// 已结束且结果可读取
    pub fn has_results(&self) -> bool {
        self.processing_status.is_terminal()
            && self.results_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCounts {
    #[serde(default)]
    pub processing: u64,
    #[serde(default)]
    pub succeeded: u64,
    #[serde(default)]
    pub errored: u64,
    #[serde(default)]
    pub canceled: u64,
    #[serde(default)]
    pub expired: u64,
}

/// 单条批处理结果，通过 custom_id 与子请求对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub custom_id: String,
    pub result: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 结果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultOutcome {
    Succeeded,
    Errored,
    Canceled,
    Expired,
    Unknown,
}

impl fmt::Display for ResultOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultOutcome::Succeeded => "succeeded",
            ResultOutcome::Errored => "errored",
            ResultOutcome::Canceled => "canceled",
            ResultOutcome::Expired => "expired",
            ResultOutcome::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl ResultRecord {
    pub fn outcome(&self) -> ResultOutcome {
        match self.result.get("type").and_then(Value::as_str) {
            Some("succeeded") => ResultOutcome::Succeeded,
            Some("errored") => ResultOutcome::Errored,
            Some("canceled") => ResultOutcome::Canceled,
            Some("expired") => ResultOutcome::Expired,
            _ => ResultOutcome::Unknown,
        }
    }

    /// 成功结果中所有文本块拼接后的回答
    pub fn answer_text(&self) -> Option<String> {
        let blocks = self.result.get("message")?.get("content")?.as_array()?;
        let text: Vec<&str> = blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join(""))
        }
    }
}

/// 单条消息调用（缓存预热）的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
}
