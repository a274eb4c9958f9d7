use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 默认 INFO 级别，可通过 `RUST_LOG` 环境变量覆盖；
/// `verbose` 为 true 时默认放宽到 DEBUG。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化时保留第一次的订阅器（测试里会多次调用）
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n批量页面处理日志 - {}\n{}\n\n",
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
/// - `max_parallel_ocr`: OCR 阶段最大并发数
pub fn log_startup(max_parallel_ocr: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量页面处理模式");
    info!("📊 OCR 最大并发数: {}", max_parallel_ocr);
    info!("{}", "=".repeat(60));
}

/// 记录页面加载信息
///
/// # 参数
/// - `total`: 待处理页面总数
/// - `max_parallel_ocr`: OCR 阶段最大并发数
pub fn log_pages_loaded(total: usize, max_parallel_ocr: usize) {
    info!("✓ 找到 {} 个待处理的页面", total);
    info!("📋 OCR 阶段最多同时处理 {} 页", max_parallel_ocr);
    info!("💡 翻译阶段按页码顺序逐页进行\n");
}

/// 记录阶段开始信息
///
/// # 参数
/// - `stage_name`: 阶段名称
/// - `total`: 本阶段页面总数
pub fn log_stage_start(stage_name: &str, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始 {} 阶段", stage_name);
    info!("📄 本阶段页面: 共 {} 个", total);
    info!("{}", "=".repeat(60));
}

/// 记录阶段完成信息
///
/// # 参数
/// - `stage_name`: 阶段名称
/// - `success`: 成功数量
/// - `total`: 本阶段总数
pub fn log_stage_complete(stage_name: &str, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ {} 阶段完成: 成功 {}/{}", stage_name, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
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
