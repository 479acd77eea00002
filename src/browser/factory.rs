use async_trait::async_trait;
use tracing::{debug, warn};

use crate::browser::{connect_to_browser, launch_browser};
use crate::config::Config;
use crate::error::DriverError;
use crate::infrastructure::{ContextFactory, JsExecutor, PageDriver};
use crate::models::AuthState;

/// 基于 chromiumoxide 的浏览上下文工厂
///
/// 每个上下文对应一个浏览器实例和一个标签页
pub struct ChromiumContextFactory {
    config: Config,
}

impl ChromiumContextFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ContextFactory for ChromiumContextFactory {
    async fn open(&self, state: Option<&AuthState>) -> Result<Box<dyn PageDriver>, DriverError> {
        let handle = match self.config.browser_debug_port {
            Some(port) => connect_to_browser(port).await,
            None => launch_browser(&self.config).await,
        }
        .map_err(|e| DriverError::Browser(e.to_string()))?;

        let page = handle.browser().new_page("about:blank").await?;
        let mut executor = JsExecutor::new(page, handle);

        if let Some(state) = state {
            if let Err(e) = executor
                .restore(state, self.config.timeouts.navigation())
                .await
            {
                warn!("恢复登录状态失败: {}", e);
                if let Err(close_err) = executor.close().await {
                    debug!("释放浏览上下文失败: {}", close_err);
                }
                return Err(e);
            }
        }

        Ok(Box::new(executor))
    }
}
