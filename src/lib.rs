//! # LeetCode Submit
//!
//! 通过真实浏览器把本地解答提交到 LeetCode 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` / `ContextFactory` - 上层唯一依赖的页面抽象
//! - `JsExecutor` - 唯一的 page owner，基于 chromiumoxide 实现 `PageDriver`
//! - `browser/` - 启动或连接浏览器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只做一件事
//! - `AuthStateStore` - 读写登录状态文件
//! - `SessionEstablisher` - 复用登录状态 / 账号密码登录
//! - `EditorInjector` - 按策略链写入代码
//! - `LanguageSelector` / `SubmitTrigger` / `VerdictDetector`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义题目页上的完整流程
//! - `SubmissionFlow` - 打开题目 → 写入 → 选语言 → 提交 → 判题结果
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/submission_orchestrator` - 管理浏览上下文、会话和登录状态刷新
//! - `orchestrator/manual_login` - 人工登录并保存登录状态
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::ChromiumContextFactory;
pub use config::Config;
pub use error::{AppResult, AuthError, SubmitError};
pub use infrastructure::{ContextFactory, JsExecutor, PageDriver};
pub use models::{AuthState, Language, SubmissionRequest, Verdict};
pub use orchestrator::{save_auth_interactively, SubmissionOrchestrator, SubmissionReport};
pub use workflow::{StageReport, SubmissionFlow};
