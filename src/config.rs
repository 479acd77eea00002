use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{Credentials, Language};

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "leetcode_submit.toml";

/// 程序配置
///
/// 启动时构造一次，显式传给每个组件；组件内部不再读环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 站点根地址
    pub site_url: String,
    /// 登录状态文件路径
    pub auth_state_path: PathBuf,
    /// 题目目录（默认解答文件为 `<problems_dir>/<slug>/solution.py`）
    pub problems_dir: PathBuf,
    /// 默认提交语言
    pub default_language: Language,
    /// 是否使用无头浏览器
    pub headless: bool,
    /// 浏览器可执行文件（不填则自动查找）
    pub chrome_executable: Option<PathBuf>,
    /// 浏览器调试端口，设置后连接已打开的浏览器而不是新启动一个
    pub browser_debug_port: Option<u16>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 各阶段等待时间
    pub timeouts: Timeouts,
    /// 账号密码，只来自环境变量
    #[serde(skip)]
    pub credentials: Option<Credentials>,
}

/// 各阶段超时（毫秒）
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub navigation_ms: u64,
    pub network_idle_ms: u64,
    pub login_settle_ms: u64,
    pub editor_wait_ms: u64,
    pub click_ms: u64,
    pub option_click_ms: u64,
    pub verdict_wait_ms: u64,
    pub body_text_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 15_000,
            network_idle_ms: 10_000,
            login_settle_ms: 15_000,
            editor_wait_ms: 7_000,
            click_ms: 5_000,
            option_click_ms: 2_000,
            verdict_wait_ms: 20_000,
            body_text_ms: 2_000,
        }
    }
}

impl Timeouts {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn login_settle(&self) -> Duration {
        Duration::from_millis(self.login_settle_ms)
    }

    pub fn editor_wait(&self) -> Duration {
        Duration::from_millis(self.editor_wait_ms)
    }

    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click_ms)
    }

    pub fn option_click(&self) -> Duration {
        Duration::from_millis(self.option_click_ms)
    }

    pub fn verdict_wait(&self) -> Duration {
        Duration::from_millis(self.verdict_wait_ms)
    }

    pub fn body_text(&self) -> Duration {
        Duration::from_millis(self.body_text_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: "https://leetcode.com".to_string(),
            auth_state_path: PathBuf::from("leetcode_auth.json"),
            problems_dir: PathBuf::from("problems"),
            default_language: Language::Python3,
            headless: true,
            chrome_executable: None,
            browser_debug_port: None,
            verbose_logging: false,
            timeouts: Timeouts::default(),
            credentials: None,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    ///
    /// `path` 为空时读取 `LEETCODE_SUBMIT_CONFIG` 或工作目录下的默认文件，文件不存在不算错误
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("LEETCODE_SUBMIT_CONFIG").ok().map(PathBuf::from));

        let base = match explicit {
            Some(path) => Self::from_toml_file(&path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_toml_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        base.with_env(|name| std::env::var(name).ok())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置
    ///
    /// 通过 `lookup` 取值，测试时不需要修改进程环境
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LEETCODE_SITE_URL") {
            self.site_url = v;
        }
        if let Some(v) = lookup("LEETCODE_AUTH_STATE") {
            self.auth_state_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("PROBLEMS_DIR") {
            self.problems_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("LEETCODE_LANGUAGE") {
            self.default_language = v.parse()?;
        }
        if let Some(v) = lookup("HEADLESS") {
            self.headless = parse_env("HEADLESS", &v, "bool")?;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = Some(parse_env("BROWSER_DEBUG_PORT", &v, "u16")?);
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }

        self.credentials =
            Credentials::from_parts(lookup("LEETCODE_EMAIL"), lookup("LEETCODE_PASSWORD"));

        Ok(self)
    }

    /// 登录页地址
    pub fn login_url(&self) -> String {
        format!("{}/accounts/login/", self.site_url.trim_end_matches('/'))
    }

    /// 站点首页地址
    pub fn root_url(&self) -> String {
        format!("{}/", self.site_url.trim_end_matches('/'))
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
