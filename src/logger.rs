//! 全局日志初始化
//!
//! 只在进程启动时调用一次，业务模块只使用 `tracing` 宏，不接触订阅者

use tracing_subscriber::EnvFilter;

/// 初始化日志输出
///
/// `RUST_LOG` 优先；未设置时使用 `info`，`verbose` 为真时使用 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
