pub mod config;
pub mod files;
pub mod git;
pub mod llm;
pub mod parser;
pub mod prompts;
pub mod tokens;

pub use config::*;
pub use git::*;
pub use llm::*;
pub use parser::*;
pub use tokens::*;
