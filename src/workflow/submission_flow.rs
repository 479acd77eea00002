//! 提交流程 - 流程层
//!
//! 核心职责：定义"一次提交"在已登录页面上的完整流程
//!
//! 流程顺序：
//! 1. 打开题目页 → 等待编辑器
//! 2. 写入代码（失败只警告）
//! 3. 选择语言（失败静默）
//! 4. 点击提交（失败只警告）
//! 5. 检测判题结果（总会执行，可能为 Unknown）

use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::{Locator, PageDriver};
use crate::models::{SubmissionRequest, Verdict};
use crate::services::{
    navigate_soft, EditorInjector, LanguageSelector, SubmitTrigger, VerdictDetector,
};

const EDITOR_SELECTOR: &str = ".monaco-editor";

/// 页面阶段的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// 成功写入代码的策略
    pub injected_with: Option<&'static str>,
    /// 是否选中了语言
    pub language_selected: bool,
    /// 成功点击提交的方式
    pub submitted_with: Option<&'static str>,
    /// 判题结果
    pub verdict: Verdict,
}

/// 提交流程
///
/// - 编排题目页上的各个阶段
/// - 不持有任何资源（page）
/// - 只依赖业务能力（services）
pub struct SubmissionFlow<'a> {
    config: &'a Config,
    injector: EditorInjector,
}

impl<'a> SubmissionFlow<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_injector(config, EditorInjector::new())
    }

    pub fn with_injector(config: &'a Config, injector: EditorInjector) -> Self {
        Self { config, injector }
    }

    pub async fn run(&self, page: &dyn PageDriver, request: &SubmissionRequest) -> StageReport {
        let problem_url = request.problem_url(&self.config.site_url);
        info!("{} 📄 打开题目页: {}", request, problem_url);
        navigate_soft(page, &problem_url, self.config).await;

        // 编辑器可能不是 Monaco 或者懒加载，超时继续
        if let Err(e) = page
            .wait_for(&Locator::css(EDITOR_SELECTOR), self.config.timeouts.editor_wait())
            .await
        {
            debug!("等待编辑器: {}", e);
        }

        // ========== 写入代码 ==========
        let injected_with = self.injector.inject(page, &request.code).await.ok();

        // ========== 选择语言 ==========
        let language_selected = LanguageSelector::new(self.config)
            .select(page, request.language)
            .await;

        // ========== 提交 ==========
        let submitted_with = SubmitTrigger::new(self.config).trigger(page).await.ok();

        // ========== 判题结果 ==========
        // 没点中提交按钮也要检测，操作者可能已经手动点击
        let verdict = VerdictDetector::new(self.config).detect(page).await;

        StageReport {
            injected_with,
            language_selected,
            submitted_with,
            verdict,
        }
    }
}
