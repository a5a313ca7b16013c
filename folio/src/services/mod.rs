mod catalog;
pub mod composer;
mod prompt_log;
pub mod retrieval;

pub use catalog::CatalogService;
pub use composer::ResponseComposer;
pub use prompt_log::PromptLogger;
pub use retrieval::{ContentRetriever, ProjectRetriever};
