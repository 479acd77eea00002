//! 会话建立 - 业务能力层
//!
//! 复用已保存的登录状态，必要时用账号密码登录；
//! 除"既没有登录状态也没有账号密码"外，每一步失败都只记录日志

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AuthError, DriverError};
use crate::infrastructure::{ContextFactory, Locator, PageDriver};
use crate::models::Credentials;
use crate::services::AuthStateStore;

/// 头像（已登录标志）
const AVATAR_SELECTOR: &str = "img[data-cy='profile-avatar']";
/// "Sign in" 入口（未登录标志）
const SIGN_IN_TEXT: &str = "Sign in";

const IDENTIFIER_SELECTORS: [&str; 2] = [r#"input[name="login"]"#, r#"input[type="email"]"#];
const SECRET_SELECTORS: [&str; 2] = [r#"input[name="password"]"#, r#"input[type="password"]"#];
const LOGIN_SUBMIT_SELECTOR: &str = r#"button[type="submit"]"#;
const LOGIN_BUTTON_NAME: &str = "Sign In";

/// 登录后额外等待页面稳定的时间
const LOGIN_SETTLE_PAUSE: Duration = Duration::from_secs(1);

/// 登录状态探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginProbe {
    LoggedIn,
    LoggedOut,
    /// 没有头像且 "Sign in" 探针出错，无法判断（流程上按未登录处理）
    Indeterminate,
}

impl LoginProbe {
    /// 头像不存在时，由 "Sign in" 探针的结果得出判断
    ///
    /// - "Sign in" 不存在 → 已登录，存在 → 未登录
    /// - 探针出错 → 无法判断
    pub fn from_sign_in(sign_in: Result<usize, DriverError>) -> Self {
        match sign_in {
            Ok(0) => LoginProbe::LoggedIn,
            Ok(_) => LoginProbe::LoggedOut,
            Err(_) => LoginProbe::Indeterminate,
        }
    }

    pub fn is_logged_in(self) -> bool {
        self == LoginProbe::LoggedIn
    }
}

impl fmt::Display for LoginProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginProbe::LoggedIn => write!(f, "已登录"),
            LoginProbe::LoggedOut => write!(f, "未登录"),
            LoginProbe::Indeterminate => write!(f, "无法判断"),
        }
    }
}

/// 会话建立结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 探测到已登录
    Authenticated,
    /// 使用了已保存的登录状态，但页面上没有探测到登录标志
    Unconfirmed(LoginProbe),
    /// 用账号密码登录（是否已立即保存登录状态）
    CredentialLogin { persisted: bool },
    /// 操作者在浏览器里手动登录
    ManualLogin { persisted: bool },
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Authenticated => write!(f, "已登录"),
            SessionOutcome::Unconfirmed(probe) => write!(f, "复用登录状态 (探测: {})", probe),
            SessionOutcome::CredentialLogin { .. } => write!(f, "账号密码登录"),
            SessionOutcome::ManualLogin { .. } => write!(f, "人工登录"),
        }
    }
}

/// 打开的浏览上下文
pub struct OpenedContext {
    pub page: Box<dyn PageDriver>,
    /// 是否成功恢复了已保存的登录状态
    pub state_applied: bool,
}

/// 会话建立服务
pub struct SessionEstablisher<'a> {
    config: &'a Config,
    store: &'a AuthStateStore,
}

impl<'a> SessionEstablisher<'a> {
    pub fn new(config: &'a Config, store: &'a AuthStateStore) -> Self {
        Self { config, store }
    }

    /// 打开浏览上下文：优先用已保存的登录状态，失败则退回匿名上下文
    ///
    /// 只有匿名上下文也打不开（浏览器不可用）时才返回错误
    pub async fn open_context(
        &self,
        factory: &dyn ContextFactory,
    ) -> Result<OpenedContext, DriverError> {
        if let Some(state) = self.store.load().await {
            match factory.open(Some(&state)).await {
                Ok(page) => {
                    info!("[INFO] 已从 {} 加载登录状态", self.store.path().display());
                    return Ok(OpenedContext {
                        page,
                        state_applied: true,
                    });
                }
                Err(e) => warn!("⚠️ 无法用已保存的登录状态创建上下文，改用匿名上下文: {}", e),
            }
        }

        let page = factory.open(None).await?;
        Ok(OpenedContext {
            page,
            state_applied: false,
        })
    }

    /// 确保已登录
    ///
    /// `state_applied` 为 true 时绝不走账号密码登录
    pub async fn ensure_authenticated(
        &self,
        page: &dyn PageDriver,
        state_applied: bool,
        problem_url: &str,
    ) -> Result<SessionOutcome, AuthError> {
        navigate_soft(page, &self.config.root_url(), self.config).await;

        let probe = detect_login(page).await;
        match probe {
            LoginProbe::LoggedIn => {
                info!("[AUTH] ✓ 已登录");
                return Ok(SessionOutcome::Authenticated);
            }
            LoginProbe::LoggedOut => debug!("登录探测: 未登录"),
            LoginProbe::Indeterminate => warn!("[AUTH] ⚠️ 登录探测失败，无法判断是否已登录"),
        }

        if state_applied {
            // 页面可能只是没有暴露探测的元素，不再重复登录
            info!("[AUTH] 使用已保存的登录状态继续 (探测结果: {})", probe);
            return Ok(SessionOutcome::Unconfirmed(probe));
        }

        let Some(credentials) = self.config.credentials.as_ref() else {
            warn!("[AUTH] 没有已保存的登录状态，且未设置 LEETCODE_EMAIL/LEETCODE_PASSWORD");
            return Err(AuthError::MissingCredentials {
                auth_path: self.store.path().to_path_buf(),
                problem_url: problem_url.to_string(),
            });
        };

        self.login_with_credentials(page, credentials).await;
        let persisted = self.store.persist(page).await;
        Ok(SessionOutcome::CredentialLogin { persisted })
    }

    /// 账号密码登录，每一步都不致命
    async fn login_with_credentials(&self, page: &dyn PageDriver, credentials: &Credentials) {
        info!("[AUTH] 尝试使用账号密码登录...");
        let timeouts = &self.config.timeouts;

        navigate_soft(page, &self.config.login_url(), self.config).await;

        if !fill_first(page, &IDENTIFIER_SELECTORS, &credentials.identifier).await {
            warn!("[AUTH] ⚠️ 未找到账号输入框");
        }
        if !fill_first(page, &SECRET_SELECTORS, &credentials.secret).await {
            warn!("[AUTH] ⚠️ 未找到密码输入框");
        }

        let clicked = match page
            .click(&Locator::css(LOGIN_SUBMIT_SELECTOR), timeouts.click())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                debug!("点击 {} 失败: {}", LOGIN_SUBMIT_SELECTOR, e);
                page.click(&Locator::role("button", LOGIN_BUTTON_NAME), timeouts.click())
                    .await
                    .is_ok()
            }
        };
        if !clicked {
            warn!("[AUTH] ⚠️ 未能点击登录按钮");
        }

        if let Err(e) = page.wait_for_network_idle(timeouts.login_settle()).await {
            debug!("登录后等待网络空闲: {}", e);
        }
        tokio::time::sleep(LOGIN_SETTLE_PAUSE).await;
    }
}

/// 两探针登录检测：头像存在即已登录，否则才探测 "Sign in"
pub async fn detect_login(page: &dyn PageDriver) -> LoginProbe {
    match page.count(&Locator::css(AVATAR_SELECTOR)).await {
        Ok(n) if n > 0 => LoginProbe::LoggedIn,
        _ => LoginProbe::from_sign_in(page.count(&Locator::text(SIGN_IN_TEXT)).await),
    }
}

/// 导航 + 等待网络空闲，超时只记录日志
pub async fn navigate_soft(page: &dyn PageDriver, url: &str, config: &Config) {
    if let Err(e) = page.goto(url, config.timeouts.navigation()).await {
        if e.is_timeout() {
            warn!("⚠️ 导航超时，继续执行: {}", url);
        } else {
            warn!("⚠️ 导航到 {} 失败，继续执行: {}", url, e);
        }
    }
    if let Err(e) = page
        .wait_for_network_idle(config.timeouts.network_idle())
        .await
    {
        debug!("等待网络空闲: {}", e);
    }
}

/// 依次尝试多个选择器填写，返回是否有一个成功
async fn fill_first(page: &dyn PageDriver, selectors: &[&str], value: &str) -> bool {
    for selector in selectors {
        match page.fill(&Locator::css(*selector), value).await {
            Ok(()) => return true,
            Err(e) => debug!("填写 {} 失败: {}", selector, e),
        }
    }
    false
}
