pub mod js_executor;
pub mod locator;
pub mod page_driver;

pub use js_executor::{restore_local_storage, JsExecutor};
pub use locator::{js_string, Locator};
pub use page_driver::{ContextFactory, PageDriver};
