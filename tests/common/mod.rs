//! 集成测试公共工具：脚本化的假页面 / 假浏览上下文工厂
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use leetcode_submit::error::DriverError;
use leetcode_submit::infrastructure::{ContextFactory, Locator, PageDriver};
use leetcode_submit::models::{AuthState, StoredCookie};
use leetcode_submit::Config;

/// 假页面上记录的一次操作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Goto(String),
    Click(Locator),
    Fill(Locator, String),
    Eval(String),
    Close,
}

/// 页面脚本：描述页面上"存在什么"
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    pub monaco: bool,
    pub textarea: bool,
    pub codemirror: bool,
    /// 存在的元素（`count` 返回同一定位器出现的次数）
    pub elements: Vec<Locator>,
    /// `body` 的可见文字
    pub body_text: String,
    /// 浏览器里"当前"的会话，`snapshot` 返回它
    pub live_state: AuthState,
    /// 所有 `count` 都返回错误
    pub probes_fail: bool,
    /// 打不开的地址，`goto` 超时
    pub unreachable: Vec<String>,
}

impl PageScript {
    pub fn with(mut self, locator: Locator) -> Self {
        self.elements.push(locator);
        self
    }

    /// 已登录、Monaco 编辑器、data-cy 提交按钮、Accepted 结果
    pub fn happy_leetcode() -> Self {
        PageScript {
            monaco: true,
            body_text: "Accepted Runtime: 0 ms".into(),
            live_state: state_with_cookie("LEETCODE_SESSION", "fresh"),
            ..Default::default()
        }
        .with(Locator::css("img[data-cy='profile-avatar']"))
        .with(Locator::css(".monaco-editor"))
        .with(Locator::css("button[data-cy='lang-select']"))
        .with(Locator::role("option", "Python3"))
        .with(Locator::css("button[data-cy='submit-code-btn']"))
        .with(Locator::text("Accepted"))
    }
}

/// 可以在页面被移交给编排器之后继续查看的操作记录
pub type Journal = Arc<Mutex<Vec<Action>>>;

pub struct FakePage {
    script: PageScript,
    journal: Journal,
    /// Monaco 当前内容
    monaco_value: Mutex<String>,
    /// `count` 探测过的定位器
    counted: Mutex<Vec<Locator>>,
}

impl FakePage {
    pub fn new(script: PageScript) -> Self {
        Self::with_journal(script, Journal::default())
    }

    pub fn with_journal(script: PageScript, journal: Journal) -> Self {
        Self {
            script,
            journal,
            monaco_value: Mutex::new(String::new()),
            counted: Mutex::new(Vec::new()),
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    pub fn counted(&self) -> Vec<Locator> {
        self.counted.lock().unwrap().clone()
    }

    fn record(&self, action: Action) {
        self.journal.lock().unwrap().push(action);
    }

    fn present(&self, locator: &Locator) -> usize {
        self.script.elements.iter().filter(|l| *l == locator).count()
    }

    fn timeout(locator: &Locator, wait: Duration) -> DriverError {
        DriverError::timeout(locator.to_string(), wait.as_millis() as u64)
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        self.record(Action::Goto(url.to_string()));
        if self.script.unreachable.iter().any(|u| u == url) {
            return Err(DriverError::timeout(
                format!("导航到 {}", url),
                timeout.as_millis() as u64,
            ));
        }
        Ok(())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, DriverError> {
        self.counted.lock().unwrap().push(locator.clone());
        if self.script.probes_fail {
            return Err(DriverError::Script("页面已崩溃".into()));
        }
        Ok(self.present(locator))
    }

    async fn wait_for(&self, locator: &Locator, wait: Duration) -> Result<(), DriverError> {
        if self.present(locator) > 0 {
            Ok(())
        } else {
            Err(Self::timeout(locator, wait))
        }
    }

    async fn click(&self, locator: &Locator, wait: Duration) -> Result<(), DriverError> {
        if self.present(locator) == 0 {
            return Err(Self::timeout(locator, wait));
        }
        self.record(Action::Click(locator.clone()));
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<(), DriverError> {
        if self.present(locator) == 0 {
            return Err(DriverError::NotFound(locator.to_string()));
        }
        self.record(Action::Fill(locator.clone(), value.to_string()));
        Ok(())
    }

    async fn eval(&self, script: &str) -> Result<JsonValue, DriverError> {
        self.record(Action::Eval(script.to_string()));

        if script.contains("getValue()") {
            let len = if self.script.monaco {
                self.monaco_value.lock().unwrap().len()
            } else {
                0
            };
            return Ok(JsonValue::from(len));
        }
        if script.contains("monaco.editor") && script.contains("setValue(code)") {
            if self.script.monaco {
                *self.monaco_value.lock().unwrap() = embedded_argument(script);
                return Ok(JsonValue::Bool(true));
            }
            return Ok(JsonValue::Bool(false));
        }
        if script.contains("querySelector('textarea')") {
            return Ok(JsonValue::Bool(self.script.textarea));
        }
        if script.contains("querySelector('.CodeMirror')") {
            return Ok(JsonValue::Bool(self.script.codemirror));
        }
        Ok(JsonValue::Null)
    }

    async fn inner_text(&self, locator: &Locator, wait: Duration) -> Result<String, DriverError> {
        if *locator == Locator::css("body") {
            return Ok(self.script.body_text.clone());
        }
        Err(Self::timeout(locator, wait))
    }

    async fn snapshot(&self) -> Result<AuthState, DriverError> {
        Ok(self.script.live_state.clone())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.record(Action::Close);
        Ok(())
    }
}

/// 从 `(...)({literal})` 形式的脚本末尾取出 JSON 字符串参数
fn embedded_argument(script: &str) -> String {
    script
        .rfind(")(")
        .map(|i| &script[i + 2..script.len() - 1])
        .and_then(|literal| serde_json::from_str::<String>(literal).ok())
        .unwrap_or_default()
}

/// 假的浏览上下文工厂
pub struct FakeFactory {
    pub script: PageScript,
    pub journal: Journal,
    /// 每次 open 是否携带了登录状态
    pub opens: Arc<Mutex<Vec<bool>>>,
    /// 携带登录状态打开时失败
    pub fail_with_state: bool,
    /// 浏览器完全不可用
    pub unavailable: bool,
}

impl FakeFactory {
    pub fn new(script: PageScript) -> Self {
        Self {
            script,
            journal: Journal::default(),
            opens: Arc::default(),
            fail_with_state: false,
            unavailable: false,
        }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.journal.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextFactory for FakeFactory {
    async fn open(&self, state: Option<&AuthState>) -> Result<Box<dyn PageDriver>, DriverError> {
        self.opens.lock().unwrap().push(state.is_some());
        if self.unavailable {
            return Err(DriverError::Browser("找不到浏览器可执行文件".into()));
        }
        if state.is_some() && self.fail_with_state {
            return Err(DriverError::Browser("无法恢复登录状态".into()));
        }
        Ok(Box::new(FakePage::with_journal(
            self.script.clone(),
            self.journal.clone(),
        )))
    }
}

/// 共享同一份操作记录的工厂句柄，便于在工厂移交给编排器后查看
pub fn shared_journal(factory: &FakeFactory) -> (Journal, Arc<Mutex<Vec<bool>>>) {
    (factory.journal.clone(), factory.opens.clone())
}

pub fn gotos(actions: &[Action]) -> Vec<String> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Goto(url) => Some(url.clone()),
            _ => None,
        })
        .collect()
}

pub fn is_mutation(action: &Action) -> bool {
    matches!(action, Action::Click(_) | Action::Fill(..))
}

pub fn state_with_cookie(name: &str, value: &str) -> AuthState {
    AuthState {
        cookies: vec![StoredCookie {
            name: name.into(),
            value: value.into(),
            domain: ".leetcode.com".into(),
            path: "/".into(),
            expires: -1.0,
            http_only: true,
            secure: true,
            same_site: None,
        }],
        origins: vec![],
    }
}

/// 测试配置：登录状态文件放在临时目录，不读进程环境变量
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.auth_state_path = dir.join("leetcode_auth.json");
    config.problems_dir = dir.join("problems");
    config.credentials = None;
    config
}
