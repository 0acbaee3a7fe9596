pub mod config;
pub mod file_status;
pub mod language;

pub use config::*;
pub use file_status::*;
pub use language::*;
