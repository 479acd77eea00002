//! 判题结果检测 - 业务能力层

use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::{Locator, PageDriver};
use crate::models::Verdict;
use crate::utils::truncate_text;

/// 检测状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Waiting,
    Resolved(Verdict),
}

/// 判题结果检测服务
///
/// 先等待"Accepted"出现；超时后对整页文字扫描一次，按优先级匹配
pub struct VerdictDetector<'a> {
    config: &'a Config,
}

impl<'a> VerdictDetector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub async fn detect(&self, page: &dyn PageDriver) -> Verdict {
        let mut state = DetectorState::Waiting;
        let verdict = loop {
            match state {
                DetectorState::Waiting => state = self.step(page).await,
                DetectorState::Resolved(verdict) => break verdict,
            }
        };

        if verdict.is_detected() {
            info!("✅ 提交结果: {}", verdict);
        } else {
            info!("ℹ️ 已尝试提交，但没有识别到明确的结果，请在浏览器中查看");
        }
        verdict
    }

    async fn step(&self, page: &dyn PageDriver) -> DetectorState {
        let timeouts = &self.config.timeouts;
        let accepted = Locator::text(Verdict::Accepted.marker().unwrap_or("Accepted"));

        match page.wait_for(&accepted, timeouts.verdict_wait()).await {
            Ok(()) => DetectorState::Resolved(Verdict::Accepted),
            Err(e) => {
                debug!("等待 Accepted: {}", e);
                let verdict = match page.inner_text(&Locator::css("body"), timeouts.body_text()).await {
                    Ok(text) => {
                        debug!("页面文字: {}", truncate_text(&text, 200));
                        Verdict::classify_text(&text)
                    }
                    Err(e) => {
                        debug!("读取页面文字失败: {}", e);
                        Verdict::Unknown
                    }
                };
                DetectorState::Resolved(verdict)
            }
        }
    }
}
