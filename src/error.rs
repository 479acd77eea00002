use std::path::PathBuf;

use thiserror::Error;

/// 浏览器 / 页面操作错误
///
/// 所有 `PageDriver` 操作都返回这个错误，由各个阶段自行吞掉并转换成结果值
#[derive(Debug, Error)]
pub enum DriverError {
    /// 等待超时（导航、网络空闲、元素出现）
    #[error("等待 {what} 超时 ({timeout_ms}ms)")]
    Timeout { what: String, timeout_ms: u64 },
    /// 页面上没有匹配的元素
    #[error("未找到元素: {0}")]
    NotFound(String),
    /// 页面脚本执行失败或返回了无法解析的结果
    #[error("执行脚本失败: {0}")]
    Script(String),
    /// 浏览器进程 / CDP 连接错误
    #[error("浏览器错误: {0}")]
    Browser(String),
}

impl DriverError {
    pub fn timeout(what: impl Into<String>, timeout_ms: u64) -> Self {
        DriverError::Timeout {
            what: what.into(),
            timeout_ms,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}

impl From<chromiumoxide::error::CdpError> for DriverError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        DriverError::Browser(err.to_string())
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        DriverError::Script(err.to_string())
    }
}

/// 认证错误：没有可用的会话，也没有账号密码
///
/// 这是唯一允许中断整个提交流程的错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "没有已保存的登录状态，且未设置 LEETCODE_EMAIL / LEETCODE_PASSWORD。\
         请手动打开 {problem_url} 登录，然后运行 `leetcode_submit login` 把登录状态保存到 {}",
        auth_path.display()
    )]
    MissingCredentials {
        auth_path: PathBuf,
        problem_url: String,
    },
    /// 人工登录被操作者取消
    #[error("人工登录未完成，登录状态未保存到 {}", auth_path.display())]
    ManualLoginAborted { auth_path: PathBuf },
}

/// 登录状态文件读写错误
#[derive(Debug, Error)]
pub enum AuthStoreError {
    #[error("无法抓取浏览器会话: {0}")]
    Capture(#[from] DriverError),
    #[error("序列化登录状态失败: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("写入登录状态文件失败 ({}): {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 所有编辑器注入策略都失败
#[derive(Debug, Error)]
#[error("无法写入编辑器内容 (已尝试: {})", attempted.join(", "))]
pub struct InjectionFailure {
    pub attempted: Vec<&'static str>,
}

/// 所有提交按钮都点击失败
#[derive(Debug, Error)]
#[error("无法自动点击提交按钮 (已尝试: {})", attempted.join(", "))]
pub struct SubmitFailure {
    pub attempted: Vec<&'static str>,
}

/// 编排层错误
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// 浏览器无法启动 / 连接，只能人工提交
    #[error("浏览器不可用: {0}")]
    BrowserUnavailable(#[source] DriverError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({}): {source}", path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("不支持的语言: {0}")]
    UnknownLanguage(String),
    #[error("非法的题目标识: '{0}'")]
    InvalidSlug(String),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, SubmitError>;
