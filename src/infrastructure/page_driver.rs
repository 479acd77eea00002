//! 页面能力抽象
//!
//! 上层（services / workflow / orchestrator）只依赖这两个 trait，
//! 不直接接触 chromiumoxide，单元测试可以用脚本化的假页面替换

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::DriverError;
use crate::infrastructure::Locator;
use crate::models::AuthState;

/// 一个浏览上下文中的页面
///
/// 所有等待类操作都带显式超时，超时返回 `DriverError::Timeout`
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定地址
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// 等待网络空闲
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), DriverError>;

    /// 统计匹配元素数量（不等待）
    async fn count(&self, locator: &Locator) -> Result<usize, DriverError>;

    /// 等待元素出现
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), DriverError>;

    /// 等待元素出现并点击
    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), DriverError>;

    /// 填写输入框
    async fn fill(&self, locator: &Locator, value: &str) -> Result<(), DriverError>;

    /// 在页面中执行 JS 表达式并返回 JSON 结果（`undefined` 视为 `null`）
    async fn eval(&self, script: &str) -> Result<JsonValue, DriverError>;

    /// 读取元素可见文字
    async fn inner_text(&self, locator: &Locator, timeout: Duration)
        -> Result<String, DriverError>;

    /// 抓取当前会话快照（cookie + 当前 origin 的 localStorage）
    async fn snapshot(&self) -> Result<AuthState, DriverError>;

    /// 关闭页面及其所在的浏览上下文
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// 浏览上下文工厂
#[async_trait]
pub trait ContextFactory: Send + Sync {
    /// 打开新的浏览上下文；给出 `state` 时先恢复会话
    ///
    /// 恢复失败必须返回错误并自行释放已经创建的资源
    async fn open(&self, state: Option<&AuthState>) -> Result<Box<dyn PageDriver>, DriverError>;
}
