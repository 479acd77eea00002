//! 提交编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **资源管理**：打开浏览上下文，并保证在任何退出路径上关闭
//! 2. **会话建立**：复用 / 登录 / 人工登录，只有认证错误会中断流程
//! 3. **流程调度**：委托 `SubmissionFlow` 完成题目页上的各阶段
//! 4. **状态刷新**：结束时覆盖写入登录状态

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, AuthError, SubmitError};
use crate::infrastructure::{ContextFactory, PageDriver};
use crate::models::{SubmissionRequest, Verdict};
use crate::services::{
    navigate_soft, AuthStateStore, ManualOperator, OpenedContext, SessionEstablisher,
    SessionOutcome,
};
use crate::workflow::{StageReport, SubmissionFlow};

/// 一次提交的最终报告
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    pub slug: String,
    pub session: SessionOutcome,
    pub stages: StageReport,
    /// 结束时是否成功刷新了登录状态
    pub auth_persisted: bool,
}

impl SubmissionReport {
    pub fn verdict(&self) -> Verdict {
        self.stages.verdict
    }
}

/// 提交编排器
pub struct SubmissionOrchestrator {
    config: Config,
    factory: Box<dyn ContextFactory>,
    operator: Option<Box<dyn ManualOperator>>,
}

impl SubmissionOrchestrator {
    pub fn new(config: Config, factory: Box<dyn ContextFactory>) -> Self {
        Self {
            config,
            factory,
            operator: None,
        }
    }

    /// 允许在缺少登录状态时交给操作者手动登录
    pub fn with_operator(mut self, operator: Box<dyn ManualOperator>) -> Self {
        self.operator = Some(operator);
        self
    }

    /// 执行一次完整提交
    pub async fn submit(&self, request: &SubmissionRequest) -> AppResult<SubmissionReport> {
        let store = AuthStateStore::new(self.config.auth_state_path.clone());
        let establisher = SessionEstablisher::new(&self.config, &store);

        let OpenedContext {
            mut page,
            state_applied,
        } = establisher
            .open_context(self.factory.as_ref())
            .await
            .map_err(|e| {
                error!("❌ 无法打开浏览器: {}", e);
                SubmitError::BrowserUnavailable(e)
            })?;

        let result = self
            .run_in_context(page.as_ref(), state_applied, &establisher, &store, request)
            .await;

        match page.close().await {
            Ok(()) => debug!("浏览上下文已关闭"),
            Err(e) => warn!("关闭浏览上下文失败: {}", e),
        }

        result
    }

    async fn run_in_context(
        &self,
        page: &dyn PageDriver,
        state_applied: bool,
        establisher: &SessionEstablisher<'_>,
        store: &AuthStateStore,
        request: &SubmissionRequest,
    ) -> AppResult<SubmissionReport> {
        let problem_url = request.problem_url(&self.config.site_url);

        let session = match establisher
            .ensure_authenticated(page, state_applied, &problem_url)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => match self.operator.as_deref() {
                Some(operator) => {
                    warn!("[AUTH] {}", err);
                    self.manual_login(page, operator, store).await?
                }
                None => {
                    error!("[AUTH] {}", err);
                    return Err(err.into());
                }
            },
        };
        info!("[AUTH] 会话: {}", session);

        let stages = SubmissionFlow::new(&self.config).run(page, request).await;

        // 无论结果如何都刷新登录状态
        let auth_persisted = store.persist(page).await;

        Ok(SubmissionReport {
            slug: request.slug.clone(),
            session,
            stages,
            auth_persisted,
        })
    }

    async fn manual_login(
        &self,
        page: &dyn PageDriver,
        operator: &dyn ManualOperator,
        store: &AuthStateStore,
    ) -> Result<SessionOutcome, AuthError> {
        let login_url = self.config.login_url();
        navigate_soft(page, &login_url, &self.config).await;

        if !operator.confirm_manual_login(&login_url).await {
            return Err(AuthError::ManualLoginAborted {
                auth_path: store.path().to_path_buf(),
            });
        }

        let persisted = store.persist(page).await;
        Ok(SessionOutcome::ManualLogin { persisted })
    }
}
