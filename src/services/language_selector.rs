//! 语言选择 - 业务能力层
//!
//! 尽力而为：找不到下拉框或选项都静默忽略，沿用页面当前语言

use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::{Locator, PageDriver};
use crate::models::Language;

const LANG_BUTTON_SELECTOR: &str = "button[data-cy='lang-select']";
const LISTBOX_SELECTOR: &str = "div[role='listbox']";

/// 语言选择服务
pub struct LanguageSelector<'a> {
    config: &'a Config,
}

impl<'a> LanguageSelector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// 选择语言，返回是否点中了某个选项
    pub async fn select(&self, page: &dyn PageDriver, language: Language) -> bool {
        let (primary, fallback) = language.labels();
        let wait = self.config.timeouts.option_click();

        let selected = if has_any(page, LANG_BUTTON_SELECTOR).await {
            if let Err(e) = page
                .click(&Locator::css(LANG_BUTTON_SELECTOR), self.config.timeouts.click())
                .await
            {
                debug!("打开语言下拉框失败: {}", e);
                return false;
            }
            page.click(&Locator::role("option", primary), wait).await.is_ok()
                || page.click(&Locator::role("option", fallback), wait).await.is_ok()
        } else if has_any(page, LISTBOX_SELECTOR).await {
            page.click(&Locator::text(primary), wait).await.is_ok()
        } else {
            debug!("页面上没有语言下拉框");
            false
        };

        if selected {
            info!("[INFO] 已选择语言: {}", language);
        } else {
            debug!("未能选择语言 {}，沿用页面当前语言", language);
        }
        selected
    }
}

async fn has_any(page: &dyn PageDriver, selector: &str) -> bool {
    matches!(page.count(&Locator::css(selector)).await, Ok(n) if n > 0)
}
