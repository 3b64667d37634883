pub mod context_loader;
pub mod toml_loader;

pub use context_loader::load_shared_context;
pub use toml_loader::{load_questions, load_questions_file};
