mod api;
pub mod prompts;
mod provider;

pub use api::{LlmApiClient, LlmProxyClient};
pub use provider::{LlmBackend, LlmProvider, COMPLETION_FAILURE_MESSAGE};
