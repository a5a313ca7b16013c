mod catalog;
mod chat;
mod content;
mod embedding;
mod project;
mod prompt_log;
mod search;

pub use catalog::*;
pub use chat::*;
pub use content::*;
pub use embedding::*;
pub use project::*;
pub use prompt_log::*;
pub use search::*;
