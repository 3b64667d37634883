use std::path::PathBuf;
use std::time::Duration;

/// 默认问题列表
pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "What companies are mentioned in this blog post?",
    "What are the key takeaways from this blog post?",
    "List all the people mentioned in this blog post.",
];

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- API 配置 ---
    /// API 密钥（为空时在创建客户端时报错）
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    /// 每个子请求的最大输出 token 数
    pub max_tokens: u32,
    /// 单次 HTTP 请求超时
    pub request_timeout: Duration,
    // --- 输入输出 ---
    /// 共享上下文文件
    pub context_file: PathBuf,
    /// 可选的问题文件（TOML，`questions = [...]`）
    pub questions_file: Option<PathBuf>,
    /// 未提供问题文件时使用的问题
    pub questions: Vec<String>,
    /// 结果输出目录
    pub output_dir: PathBuf,
    // --- 轮询 ---
    pub poll_interval: Duration,
    /// 最长等待时间，None 表示无限等待
    pub max_wait: Option<Duration>,
    /// metadata.user_id 前缀
    pub user_id_prefix: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://api.anthropic.com".to_string(),
            model_name: "claude-3-5-sonnet-20240620".to_string(),
            max_tokens: 8192,
            request_timeout: Duration::from_secs(3600),
            context_file: PathBuf::from("long_prompt.md"),
            questions_file: None,
            questions: DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            output_dir: PathBuf::from("output"),
            poll_interval: Duration::from_secs(10),
            max_wait: None,
            user_id_prefix: "ai.moda-dev-".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，未设置或无法解析的值使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let secs = |key: &str| lookup(key).and_then(|v| v.parse::<u64>().ok()).map(Duration::from_secs);
        Self {
            api_key: lookup("ANTHROPIC_API_KEY").unwrap_or(default.api_key),
            api_base_url: lookup("ANTHROPIC_API_BASE").unwrap_or(default.api_base_url),
            model_name: lookup("MODEL_NAME").unwrap_or(default.model_name),
            max_tokens: lookup("MAX_TOKENS").and_then(|v| v.parse().ok()).unwrap_or(default.max_tokens),
            request_timeout: secs("REQUEST_TIMEOUT_SECS").unwrap_or(default.request_timeout),
            context_file: lookup("CONTEXT_FILE").map(PathBuf::from).unwrap_or(default.context_file),
            questions_file: lookup("QUESTIONS_FILE").map(PathBuf::from),
            questions: default.questions,
            output_dir: lookup("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            poll_interval: secs("POLL_INTERVAL_SECS").unwrap_or(default.poll_interval),
            max_wait: secs("MAX_WAIT_SECS"),
            user_id_prefix: lookup("USER_ID_PREFIX").unwrap_or(default.user_id_prefix),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
