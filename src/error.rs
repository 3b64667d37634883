//! 错误类型
//!
//! 按照失败的处理方式划分：
//! - `ConfigError`：启动前的配置/输入问题，立即失败
//! - `ApiError`：与远程批处理服务交互时的错误，由调用方决定是否致命
//! - `AppError`：一次运行的最终失败原因，映射到进程退出码

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::models::ProcessingStatus;

/// 远程 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络层失败（连接、超时、读取响应体）
    #[error("请求 {endpoint} 失败: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非 2xx 状态
    #[error("{endpoint} 返回错误状态 {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 响应内容无法解析
    #[error("无法解析 {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 是否属于可以等待后重试的瞬时错误
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport { .. } => true,
            ApiError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..600).contains(status)
            }
            ApiError::Decode { .. } => false,
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("上下文文件不存在: {}", path.display())]
    ContextNotFound { path: PathBuf },

    #[error("无法读取文件 {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("文件 {} 不是合法的 UTF-8 文本", path.display())]
    InvalidEncoding { path: PathBuf },

    #[error("无法解析问题文件 {}: {source}", path.display())]
    QuestionsParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("问题列表为空")]
    NoQuestions,

    #[error("问题重复，会产生相同的 custom_id: {question}")]
    DuplicateQuestion { question: String },

    #[error("缺少环境变量 {var_name}")]
    MissingEnvVar { var_name: String },

    #[error("无法创建 HTTP 客户端: {0}")]
    HttpClient(String),

    #[error("无法创建输出目录 {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 单条结果保存失败，只影响这一条
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("custom_id 不能作为文件名: {custom_id:?}")]
    InvalidId { custom_id: String },

    #[error("结果 {custom_id} 序列化失败: {source}")]
    Serialize {
        custom_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("写入 {} 失败: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 一次批处理运行的失败原因
#[derive(Debug, Error)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 缓存预热调用失败，批处理不会提交
    #[error("缓存预热失败: {0}")]
    CacheWarm(#[source] ApiError),

    #[error("批处理提交失败: {0}")]
    BatchSubmit(#[source] ApiError),

    /// 批处理已结束但没有结果地址
    #[error("批处理 {batch_id} 失败 (状态: {status})")]
    BatchFailed {
        batch_id: String,
        status: ProcessingStatus,
    },

    #[error("批处理 {batch_id} 等待超时 (已等待 {waited:?})")]
    WaitCeilingExceeded { batch_id: String, waited: Duration },

    #[error("读取批处理 {batch_id} 结果流失败: {source}")]
    ResultStream {
        batch_id: String,
        #[source]
        source: ApiError,
    },

    #[error("批处理 {batch_id} 有 {failed} 条结果保存失败")]
    RecordsFailed { batch_id: String, failed: usize },

    #[error("运行已取消")]
    Cancelled,
}

impl AppError {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::CacheWarm(_) | AppError::BatchSubmit(_) => 3,
            AppError::BatchFailed { .. } | AppError::WaitCeilingExceeded { .. } => 4,
            AppError::ResultStream { .. } | AppError::RecordsFailed { .. } => 5,
            AppError::Cancelled => 130,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
