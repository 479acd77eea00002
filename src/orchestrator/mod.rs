//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次提交的资源管理和阶段调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `submission_orchestrator` - 提交编排器
//! - 打开浏览上下文（优先复用登录状态）
//! - 建立会话，认证错误是唯一的中断条件
//! - 委托 `workflow::SubmissionFlow` 执行页面阶段
//! - 结束时刷新登录状态，并在所有路径上关闭浏览上下文
//!
//! ### `manual_login` - 人工登录
//! - 打开登录页，等操作者确认后保存登录状态
//!
//! ## 层次关系
//!
//! ```text
//! submission_orchestrator (处理 SubmissionRequest)
//!     ↓
//! workflow::SubmissionFlow (题目页上的阶段)
//!     ↓
//! services (能力层：session / editor / language / submit / verdict / auth_store)
//!     ↓
//! infrastructure (基础设施：PageDriver / JsExecutor)
//! ```

pub mod manual_login;
pub mod submission_orchestrator;

// 重新导出主要类型
pub use manual_login::save_auth_interactively;
pub use submission_orchestrator::{SubmissionOrchestrator, SubmissionReport};
