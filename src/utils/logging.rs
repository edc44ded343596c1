use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化与输出格式化的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志（RUST_LOG 可覆盖默认级别）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n批改运行日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
/// - `comparison_mode`: 是否为接口对比模式
pub fn log_startup(max_concurrent: usize, comparison_mode: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量题目批改模式");
    info!("📊 最大并发数: {}", max_concurrent);
    if comparison_mode {
        info!("📋 运行模式: 接口对比（逐题串行）");
    }
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
///
/// # 参数
/// - `total`: 题目总数
/// - `max_concurrent`: 最大并发数
pub fn log_questions_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 道待批改的题目", total);
    info!("📋 将以最多 {} 个并发请求进行批改\n", max_concurrent);
}

/// 打印最终统计信息
///
/// # 参数
/// - `passed`: 通过数量
/// - `failed`: 未通过数量
/// - `errored`: 出错数量
/// - `total`: 总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    passed: usize,
    failed: usize,
    errored: usize,
    total: usize,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部批改完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 通过: {}/{}", passed, total);
    info!("❌ 未通过: {}", failed);
    info!("⚠️ 出错: {}", errored);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
