use std::sync::Arc;

use tracing::{debug, warn};

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{SessionContext, UserPromptLog};

const MAX_LIST_LIMIT: u32 = 500;

/// Append-only record of what visitors asked. Never read by retrieval.
#[derive(Clone)]
pub struct PromptLogger {
    db: Arc<dyn DatabaseBackend>,
}

impl PromptLogger {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// Store one prompt and the reply it got. Failures are logged and
    /// swallowed.
    pub async fn record(&self, session: &SessionContext, prompt: &str, response: Option<&str>) {
        let log = UserPromptLog::new(
            session,
            prompt.to_string(),
            response.map(str::to_string),
        );

        match self.db.append_prompt_log(&log).await {
            Ok(()) => debug!(session_id = %session.session_id, "Prompt logged"),
            Err(e) => warn!(
                session_id = %session.session_id,
                error = %e,
                "Failed to log prompt"
            ),
        }
    }

    /// Most recent first.
    pub async fn list(&self, limit: u32) -> Result<Vec<UserPromptLog>> {
        self.db
            .list_prompt_logs(limit.clamp(1, MAX_LIST_LIMIT))
            .await
    }
}
