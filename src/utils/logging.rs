//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::orchestrator::SubmissionReport;
use crate::services::SessionOutcome;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。
/// 重复调用不会报错（测试中可能多次初始化）
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("leetcode_submit=debug,info")
        } else {
            EnvFilter::new("info,chromiumoxide=warn")
        }
    });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 LeetCode 自动提交");
    info!("🌐 站点: {}", config.site_url);
    info!("🔑 登录状态文件: {}", config.auth_state_path.display());
    match config.browser_debug_port {
        Some(port) => info!("🔌 连接已打开的浏览器 (端口 {})", port),
        None => info!(
            "🖥️ 浏览器模式: {}",
            if config.headless { "无头" } else { "可见" }
        ),
    }
    if config.credentials.is_some() {
        info!("👤 已配置账号密码");
    }
    info!("{}", "=".repeat(60));
}

/// 打印最终报告
///
/// # 参数
/// - `report`: 一次提交的报告
pub fn print_final_report(report: &SubmissionReport) {
    let stages = &report.stages;

    info!("\n{}", "=".repeat(60));
    info!("📊 提交完成: {}", report.slug);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("会话: {}", report.session);
    info!(
        "写入代码: {}",
        stages.injected_with.unwrap_or("失败，需手动粘贴")
    );
    info!(
        "选择语言: {}",
        if stages.language_selected { "是" } else { "否" }
    );
    info!("点击提交: {}", stages.submitted_with.unwrap_or("失败"));
    info!("判题结果: {}", stages.verdict);
    if report.auth_persisted {
        info!("登录状态已刷新");
    } else {
        warn!("⚠️ 登录状态未能刷新");
    }
    if let SessionOutcome::CredentialLogin { persisted: false }
    | SessionOutcome::ManualLogin { persisted: false } = report.session
    {
        warn!("⚠️ 登录后未能立即保存登录状态");
    }
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
