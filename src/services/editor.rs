//! 编辑器注入 - 业务能力层
//!
//! 页面上的编辑器实现不固定，按优先级依次尝试多种写入方式，第一个成功即停止

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::error::InjectionFailure;
use crate::infrastructure::{js_string, PageDriver};

/// 单个策略的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyResult {
    Success,
    Failed(String),
}

impl StrategyResult {
    pub fn is_success(&self) -> bool {
        matches!(self, StrategyResult::Success)
    }
}

/// 编辑器写入策略
///
/// 实现方不得 panic，页面错误一律转换成 `StrategyResult::Failed`
#[async_trait]
pub trait EditorStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, page: &dyn PageDriver, code: &str) -> StrategyResult;
}

/// Monaco：直接设置第一个 model 的值，并读回校验
pub struct MonacoModelStrategy;

#[async_trait]
impl EditorStrategy for MonacoModelStrategy {
    fn name(&self) -> &'static str {
        "monaco"
    }

    async fn apply(&self, page: &dyn PageDriver, code: &str) -> StrategyResult {
        let set_script = format!(
            r#"((code) => {{
                try {{
                    if (window.monaco && window.monaco.editor && window.monaco.editor.getModels) {{
                        const models = window.monaco.editor.getModels();
                        if (models && models.length > 0) {{
                            models[0].setValue(code);
                            return true;
                        }}
                    }}
                }} catch (e) {{}}
                return false;
            }})({})"#,
            js_string(code)
        );
        if let Err(e) = page.eval(&set_script).await {
            return StrategyResult::Failed(e.to_string());
        }

        let read_back = r#"(() => {
            try {
                if (window.monaco && window.monaco.editor && window.monaco.editor.getModels) {
                    const v = window.monaco.editor.getModels()[0].getValue();
                    return v ? v.length : 0;
                }
            } catch (e) {}
            return 0;
        })()"#;
        match page.eval(read_back).await {
            Ok(JsonValue::Number(n)) if n.as_u64().unwrap_or(0) > 0 => StrategyResult::Success,
            Ok(_) => StrategyResult::Failed("Monaco 读回内容为空".to_string()),
            Err(e) => StrategyResult::Failed(e.to_string()),
        }
    }
}

/// 普通 textarea：聚焦、赋值并触发 input 事件
pub struct TextareaStrategy;

#[async_trait]
impl EditorStrategy for TextareaStrategy {
    fn name(&self) -> &'static str {
        "textarea"
    }

    async fn apply(&self, page: &dyn PageDriver, code: &str) -> StrategyResult {
        let script = format!(
            r#"((code) => {{
                const ta = document.querySelector('textarea');
                if (ta) {{
                    ta.focus();
                    ta.value = code;
                    ta.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    return true;
                }}
                return false;
            }})({})"#,
            js_string(code)
        );
        bool_result(page.eval(&script).await, "页面上没有 textarea")
    }
}

/// 旧版 CodeMirror 编辑器
pub struct CodeMirrorStrategy;

#[async_trait]
impl EditorStrategy for CodeMirrorStrategy {
    fn name(&self) -> &'static str {
        "codemirror"
    }

    async fn apply(&self, page: &dyn PageDriver, code: &str) -> StrategyResult {
        let script = format!(
            r#"((code) => {{
                const cmEl = document.querySelector('.CodeMirror');
                if (cmEl && cmEl.CodeMirror && typeof cmEl.CodeMirror.setValue === 'function') {{
                    cmEl.CodeMirror.setValue(code);
                    return true;
                }}
                return false;
            }})({})"#,
            js_string(code)
        );
        bool_result(page.eval(&script).await, "页面上没有 CodeMirror 编辑器")
    }
}

fn bool_result(
    result: Result<JsonValue, crate::error::DriverError>,
    missing: &str,
) -> StrategyResult {
    match result {
        Ok(JsonValue::Bool(true)) => StrategyResult::Success,
        Ok(_) => StrategyResult::Failed(missing.to_string()),
        Err(e) => StrategyResult::Failed(e.to_string()),
    }
}

/// 编辑器注入服务
pub struct EditorInjector {
    strategies: Vec<Box<dyn EditorStrategy>>,
}

impl EditorInjector {
    /// 默认策略链：Monaco → textarea → CodeMirror
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(MonacoModelStrategy),
            Box::new(TextareaStrategy),
            Box::new(CodeMirrorStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn EditorStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// 写入代码，返回成功的策略名
    pub async fn inject(
        &self,
        page: &dyn PageDriver,
        code: &str,
    ) -> Result<&'static str, InjectionFailure> {
        let mut attempted = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            attempted.push(strategy.name());
            match strategy.apply(page, code).await {
                StrategyResult::Success => {
                    info!("[INFO] ✓ 代码已写入编辑器 (策略: {})", strategy.name());
                    return Ok(strategy.name());
                }
                StrategyResult::Failed(reason) => {
                    debug!("编辑器策略 {} 失败: {}", strategy.name(), reason);
                }
            }
        }

        warn!("[WARN] ⚠️ 无法可靠地写入编辑器内容，可能需要在打开的页面中手动粘贴");
        Err(InjectionFailure { attempted })
    }
}

impl Default for EditorInjector {
    fn default() -> Self {
        Self::new()
    }
}
