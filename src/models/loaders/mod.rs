pub mod solution_loader;

pub use solution_loader::{default_solution_path, load_solution};
