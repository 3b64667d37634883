//! 运行输入：共享上下文和问题

use crate::services::digest::content_digest;

/// 共享上下文
///
/// 每次运行只读取一次，摘要在构造时计算
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedContext {
    text: String,
    digest: String,
}

impl SharedContext {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let digest = content_digest(&text);
        Self { text, digest }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// 单个问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> String {
        content_digest(&self.0)
    }
}

impl From<&str> for Question {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Question {
    fn from(text: String) -> Self {
        Self(text)
    }
}
