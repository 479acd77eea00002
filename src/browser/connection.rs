use anyhow::Result;
use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::BrowserHandle;

/// 连接到已经打开的浏览器（需以 `--remote-debugging-port` 启动）
///
/// 适合想在自己的浏览器窗口里看着提交过程的场景，关闭时不会结束该浏览器
pub async fn connect_to_browser(port: u16) -> Result<BrowserHandle> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

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

    Ok(BrowserHandle::new(browser, handle, false))
}
