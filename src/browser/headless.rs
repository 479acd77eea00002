use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::BrowserHandle;
use crate::config::Config;

/// 启动浏览器
///
/// 默认无头模式；`config.headless = false` 时打开可见窗口，方便人工接管
pub async fn launch_browser(config: &Config) -> Result<BrowserHandle> {
    info!(
        "🚀 启动浏览器 ({})...",
        if config.headless { "无头模式" } else { "可见模式" }
    );

    let mut builder = BrowserConfig::builder();
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(executable) = &config.chrome_executable {
        debug!("使用浏览器: {}", executable.display());
        builder = builder.chrome_executable(executable);
    }

    let browser_config = builder
        .args(vec![
            "--disable-gpu",           // 无头模式下避免 GPU 进程崩溃
            "--no-sandbox",            // 容器 / root 环境下必须
            "--disable-dev-shm-usage", // 防止共享内存不足
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            anyhow::anyhow!("配置浏览器失败: {}", e)
        })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        anyhow::anyhow!("启动浏览器失败: {}", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(BrowserHandle::new(browser, handle, true))
}
