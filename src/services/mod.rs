pub mod auth_store;
pub mod editor;
pub mod language_selector;
pub mod operator;
pub mod session;
pub mod submit_trigger;
pub mod verdict_detector;

pub use auth_store::AuthStateStore;
pub use editor::{
    CodeMirrorStrategy, EditorInjector, EditorStrategy, MonacoModelStrategy, StrategyResult,
    TextareaStrategy,
};
pub use language_selector::LanguageSelector;
pub use operator::{ManualOperator, StdinOperator};
pub use session::{
    detect_login, navigate_soft, LoginProbe, OpenedContext, SessionEstablisher, SessionOutcome,
};
pub use submit_trigger::SubmitTrigger;
pub use verdict_detector::{DetectorState, VerdictDetector};
