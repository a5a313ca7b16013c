use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one chat widget instance. Carries no user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: Uuid,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
        }
    }

    /// Reuse a client-supplied id, or start a new session when it is absent
    /// or not a UUID.
    pub fn from_client(raw: Option<&str>) -> Self {
        raw.and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(|session_id| Self { session_id })
            .unwrap_or_default()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only record of a visitor prompt and the reply it received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPromptLog {
    pub id: String,
    pub content: String,
    pub response: Option<String>,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl UserPromptLog {
    pub fn new(session: &SessionContext, content: String, response: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            response,
            session_id: session.session_id,
            created_at: Utc::now(),
        }
    }
}
