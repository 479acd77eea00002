//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，用 chromiumoxide 实现 `PageDriver`

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::browser::BrowserHandle;
use crate::error::DriverError;
use crate::infrastructure::{Locator, PageDriver};
use crate::models::{AuthState, OriginStorage, StorageEntry, StoredCookie};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// 资源数量保持不变多久视为网络空闲
const NETWORK_QUIET: Duration = Duration::from_millis(500);

const IDLE_PROBE_JS: &str = r#"(() => ({
    ready: document.readyState === 'complete',
    resources: performance.getEntriesByType('resource').length,
}))()"#;

const LOCAL_STORAGE_JS: &str = r#"(() => ({
    origin: location.origin,
    entries: Object.keys(localStorage).map(k => ({ name: k, value: localStorage.getItem(k) })),
}))()"#;

#[derive(Debug, Deserialize)]
struct IdleProbe {
    ready: bool,
    resources: u64,
}

#[derive(Debug, Deserialize)]
struct LocalStorageDump {
    origin: String,
    entries: Vec<StorageEntry>,
}

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源（以及它所在的浏览器句柄）
/// - 暴露 eval() 能力和 `PageDriver` 的全部操作
/// - 不认识题目 / 提交流程
pub struct JsExecutor {
    page: Page,
    browser: Option<BrowserHandle>,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page, browser: BrowserHandle) -> Self {
        Self {
            page,
            browser: Some(browser),
        }
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: &str) -> Result<T, DriverError> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 把会话快照恢复到当前页面
    ///
    /// 只有写入 cookie 失败时返回错误；localStorage 逐个 origin 尽力恢复
    pub async fn restore(&self, state: &AuthState, nav_timeout: Duration) -> Result<(), DriverError> {
        if !state.cookies.is_empty() {
            let params = state
                .cookies
                .iter()
                .map(to_cookie_param)
                .collect::<Result<Vec<_>, _>>()?;
            self.page.set_cookies(params).await?;
            debug!("已恢复 {} 个 cookie", state.cookies.len());
        }

        restore_local_storage(self, &state.origins, nav_timeout).await;
        Ok(())
    }

    async fn poll_until_present(&self, locator: &Locator, wait: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + wait;
        loop {
            if let Ok(n) = self.count(locator).await {
                if n > 0 {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::timeout(locator.to_string(), wait.as_millis() as u64));
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageDriver for JsExecutor {
    async fn goto(&self, url: &str, wait: Duration) -> Result<(), DriverError> {
        match timeout(wait, self.page.goto(url)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(DriverError::timeout(format!("导航到 {}", url), wait.as_millis() as u64)),
        }
    }

    async fn wait_for_network_idle(&self, wait: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + wait;
        let mut last_count = None;
        let mut quiet_since = Instant::now();

        loop {
            let now = Instant::now();
            match self.eval_as::<IdleProbe>(IDLE_PROBE_JS).await {
                Ok(probe) if probe.ready && last_count == Some(probe.resources) => {
                    if now.duration_since(quiet_since) >= NETWORK_QUIET {
                        return Ok(());
                    }
                }
                Ok(probe) => {
                    last_count = Some(probe.resources);
                    quiet_since = now;
                }
                // 导航过程中执行上下文会被销毁，继续等
                Err(_) => {
                    last_count = None;
                    quiet_since = now;
                }
            }

            if now >= deadline {
                return Err(DriverError::timeout("网络空闲", wait.as_millis() as u64));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize, DriverError> {
        self.eval_as::<usize>(&locator.count_script()).await
    }

    async fn wait_for(&self, locator: &Locator, wait: Duration) -> Result<(), DriverError> {
        self.poll_until_present(locator, wait).await
    }

    async fn click(&self, locator: &Locator, wait: Duration) -> Result<(), DriverError> {
        self.poll_until_present(locator, wait).await?;

        // CSS 选择器走真实鼠标事件，其他定位方式只能在页面里 click()
        if let Locator::Css(css) = locator {
            if let Ok(element) = self.page.find_element(css.as_str()).await {
                element.click().await?;
                return Ok(());
            }
        }

        match self.eval(&locator.click_script()).await? {
            JsonValue::Bool(true) => Ok(()),
            _ => Err(DriverError::NotFound(locator.to_string())),
        }
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<(), DriverError> {
        match self.eval(&locator.fill_script(value)).await? {
            JsonValue::Bool(true) => Ok(()),
            _ => Err(DriverError::NotFound(locator.to_string())),
        }
    }

    async fn eval(&self, script: &str) -> Result<JsonValue, DriverError> {
        let result = self.page.evaluate(script.to_string()).await?;
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    async fn inner_text(&self, locator: &Locator, wait: Duration) -> Result<String, DriverError> {
        self.poll_until_present(locator, wait).await?;
        match self.eval(&locator.inner_text_script()).await? {
            JsonValue::String(text) => Ok(text),
            _ => Err(DriverError::NotFound(locator.to_string())),
        }
    }

    async fn snapshot(&self) -> Result<AuthState, DriverError> {
        let cookies = self
            .page
            .get_cookies()
            .await?
            .into_iter()
            .map(|cookie| serde_json::to_value(cookie).and_then(serde_json::from_value))
            .collect::<Result<Vec<StoredCookie>, _>>()?;

        let mut state = AuthState {
            cookies,
            origins: Vec::new(),
        };

        match self.eval_as::<LocalStorageDump>(LOCAL_STORAGE_JS).await {
            // about:blank 等页面的 origin 是 "null"
            Ok(dump) if dump.origin != "null" => state.upsert_origin(OriginStorage {
                origin: dump.origin,
                local_storage: dump.entries,
            }),
            Ok(_) => {}
            Err(e) => warn!("读取 localStorage 失败，只保存 cookie: {}", e),
        }

        Ok(state)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if let Err(e) = self.page.clone().close().await {
            debug!("关闭页面失败: {}", e);
        }
        if let Some(mut browser) = self.browser.take() {
            browser.shutdown().await?;
        }
        Ok(())
    }
}

/// 逐个 origin 恢复 localStorage，返回成功恢复的 origin 数量
///
/// 需要先打开对应 origin；打不开或写入失败的 origin 只记录日志并跳过
pub async fn restore_local_storage(
    page: &dyn PageDriver,
    origins: &[OriginStorage],
    nav_timeout: Duration,
) -> usize {
    let mut restored = 0;

    for origin in origins.iter().filter(|o| !o.local_storage.is_empty()) {
        if let Err(e) = page.goto(&origin.origin, nav_timeout).await {
            warn!("⚠️ 无法打开 {}，跳过其 localStorage: {}", origin.origin, e);
            continue;
        }

        let result = match local_storage_script(&origin.local_storage) {
            Ok(script) => page.eval(&script).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => {
                restored += 1;
                debug!(
                    "已恢复 {} 的 {} 个 localStorage 项",
                    origin.origin,
                    origin.local_storage.len()
                );
            }
            Err(e) => warn!("⚠️ 恢复 {} 的 localStorage 失败: {}", origin.origin, e),
        }
    }

    restored
}

fn local_storage_script(entries: &[StorageEntry]) -> Result<String, DriverError> {
    Ok(format!(
        r#"(() => {{
            const entries = {};
            for (const e of entries) localStorage.setItem(e.name, e.value);
            return entries.length;
        }})()"#,
        serde_json::to_string(entries)?
    ))
}

/// 会话 cookie 不带过期时间写回，否则浏览器会立即把它当作过期
fn to_cookie_param(cookie: &StoredCookie) -> Result<CookieParam, DriverError> {
    let mut raw = json!({
        "name": cookie.name,
        "value": cookie.value,
        "domain": cookie.domain,
        "path": cookie.path,
        "secure": cookie.secure,
        "httpOnly": cookie.http_only,
    });
    if !cookie.is_session() {
        raw["expires"] = json!(cookie.expires);
    }
    if let Some(same_site) = &cookie.same_site {
        raw["sameSite"] = json!(same_site);
    }
    Ok(serde_json::from_value(raw)?)
}
