use context_batch::{logger, App, Config};
use std::process::ExitCode;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let app = match App::initialize(config).await {
        Ok(app) => app,
        Err(e) => return fail(&e),
    };

    let cancel = app.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⚠️ 收到中断信号，将在下一个检查点停止");
            cancel.cancel();
        }
    });

    match app.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &context_batch::AppError) -> ExitCode {
    error!("❌ {}", e);
    ExitCode::from(e.exit_code() as u8)
}
