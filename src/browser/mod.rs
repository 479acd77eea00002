pub mod connection;
pub mod factory;
pub mod headless;

pub use connection::connect_to_browser;
pub use factory::ChromiumContextFactory;
pub use headless::launch_browser;

use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::DriverError;

/// 浏览器句柄：浏览器本身 + 后台事件处理任务
///
/// `launched` 为 false 表示连接的是用户已打开的浏览器，关闭时不结束进程
pub struct BrowserHandle {
    browser: Browser,
    handler: JoinHandle<()>,
    launched: bool,
}

impl BrowserHandle {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, launched: bool) -> Self {
        Self {
            browser,
            handler,
            launched,
        }
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// 关闭浏览器（仅限自己启动的）并停止事件处理任务
    pub async fn shutdown(&mut self) -> Result<(), DriverError> {
        if self.launched {
            self.browser.close().await?;
            if let Err(e) = self.browser.wait().await {
                debug!("等待浏览器进程退出失败: {}", e);
            }
            debug!("浏览器已关闭");
        }
        self.handler.abort();
        Ok(())
    }
}

impl Drop for BrowserHandle {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
