pub mod auth_state;
pub mod language;
pub mod loaders;
pub mod submission;
pub mod verdict;

pub use auth_state::{AuthState, Credentials, OriginStorage, StorageEntry, StoredCookie};
pub use language::Language;
pub use loaders::{default_solution_path, load_solution};
pub use submission::{problem_url, SubmissionRequest};
pub use verdict::Verdict;
