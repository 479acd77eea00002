//! 人工登录并保存登录状态
//!
//! 打开登录页，等操作者在浏览器中完成登录后把会话写入 auth 文件

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AuthError, SubmitError};
use crate::infrastructure::ContextFactory;
use crate::services::{navigate_soft, AuthStateStore, ManualOperator};

/// 执行人工登录，返回登录状态是否保存成功
pub async fn save_auth_interactively(
    config: &Config,
    factory: &dyn ContextFactory,
    operator: &dyn ManualOperator,
) -> Result<bool, SubmitError> {
    let store = AuthStateStore::new(config.auth_state_path.clone());
    info!(
        "[INFO] 将打开浏览器登录 LeetCode，并把登录状态保存到: {}",
        store.path().display()
    );

    let mut page = factory
        .open(None)
        .await
        .map_err(SubmitError::BrowserUnavailable)?;

    let login_url = config.login_url();
    navigate_soft(page.as_ref(), &login_url, config).await;

    let result = if operator.confirm_manual_login(&login_url).await {
        Ok(store.persist(page.as_ref()).await)
    } else {
        Err(AuthError::ManualLoginAborted {
            auth_path: store.path().to_path_buf(),
        }
        .into())
    };

    if let Err(e) = page.close().await {
        warn!("关闭浏览器失败: {}", e);
    }

    result
}
