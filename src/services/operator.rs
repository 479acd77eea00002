//! 人工操作者 - 业务能力层
//!
//! 可见模式下没有登录状态也没有账号密码时，把控制权交给操作者在浏览器里手动登录

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 人工介入接口
#[async_trait]
pub trait ManualOperator: Send + Sync {
    /// 请操作者在已打开的登录页完成登录，返回是否确认完成
    async fn confirm_manual_login(&self, login_url: &str) -> bool;
}

/// 通过终端回车确认的操作者
pub struct StdinOperator;

#[async_trait]
impl ManualOperator for StdinOperator {
    async fn confirm_manual_login(&self, login_url: &str) -> bool {
        info!("[ACTION] 请在打开的浏览器窗口中完成登录: {}", login_url);
        info!("[ACTION] 登录完成并能看到个人主页后，在此按回车继续...");

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(0) => {
                warn!("标准输入已关闭，无法等待人工登录");
                false
            }
            Ok(_) => true,
            Err(e) => {
                warn!("读取标准输入失败: {}", e);
                false
            }
        }
    }
}
