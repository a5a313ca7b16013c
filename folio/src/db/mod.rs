pub mod backends;
pub mod traits;

pub use backends::memory::MemoryBackend;
pub use backends::rest::RestBackend;
pub use traits::*;

use std::sync::Arc;

use crate::config::BackendConfig;
use crate::error::Result;

/// Build the configured backend: REST when `BACKEND_URL` is set, otherwise
/// the in-process store.
pub fn connect(config: &BackendConfig) -> Result<Arc<dyn DatabaseBackend>> {
    match &config.url {
        Some(url) => {
            tracing::info!(url = %url, "Using REST backend");
            Ok(Arc::new(RestBackend::new(config)?))
        }
        None => {
            tracing::warn!("BACKEND_URL is not set; using the in-memory store");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}
