//! 提交按钮 - 业务能力层

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SubmitFailure;
use crate::infrastructure::{Locator, PageDriver};

/// 提交按钮定位链：data-cy 按钮 → 角色按钮 → 文字按钮
fn submit_chain() -> Vec<(&'static str, Locator)> {
    vec![
        ("data-cy", Locator::css("button[data-cy='submit-code-btn']")),
        ("role", Locator::role("button", "Submit")),
        ("text", Locator::css_with_text("button", "Submit")),
    ]
}

/// 提交按钮服务
pub struct SubmitTrigger<'a> {
    config: &'a Config,
}

impl<'a> SubmitTrigger<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// 点击提交，返回成功的定位方式
    pub async fn trigger(&self, page: &dyn PageDriver) -> Result<&'static str, SubmitFailure> {
        let mut attempted = Vec::new();

        for (name, locator) in submit_chain() {
            attempted.push(name);
            match page.click(&locator, self.config.timeouts.click()).await {
                Ok(()) => {
                    info!("[INFO] ✓ 已点击提交按钮 ({})，等待结果...", locator);
                    return Ok(name);
                }
                Err(e) => debug!("点击 {} 失败: {}", locator, e),
            }
        }

        warn!("[WARN] ⚠️ 无法自动点击提交按钮，请在打开的页面中手动提交");
        Err(SubmitFailure { attempted })
    }
}
