/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::Question;
use crate::orchestrator::RunSummary;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 共享上下文批处理模式");
    info!("🤖 模型: {}", config.model_name);
    info!("📄 上下文文件: {}", config.context_file.display());
    info!("📁 输出目录: {}", config.output_dir.display());
    info!("⏱️ 轮询间隔: {:?}", config.poll_interval);
    info!("{}", "=".repeat(60));
}

/// 记录问题列表
pub fn log_questions(questions: &[Question]) {
    info!("✓ 共 {} 个问题", questions.len());
    for (idx, question) in questions.iter().enumerate() {
        info!("  {}. {}", idx + 1, preview(question.text(), 80));
    }
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批处理 {} 完成统计", summary.batch_id);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📨 子请求: {}", summary.requests);
    info!("🔁 轮询次数: {}", summary.polls);
    info!("✅ 已保存: {}/{}", summary.persisted.len(), summary.requests);
    info!("❌ 保存失败: {}", summary.failed);
    let mut outcomes: Vec<_> = summary.outcomes.iter().collect();
    outcomes.sort_by_key(|(outcome, _)| outcome.to_string());
    for (outcome, count) in outcomes {
        info!("   {}: {}", outcome, count);
    }
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", config.output_dir.display());
}

/// 问题的单行预览：空白折叠为一个空格，超过 `max_chars` 个字符时截断并加省略号
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}
