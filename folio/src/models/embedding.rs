use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which entity an embedding record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingKind {
    Content,
    Project,
}

impl EmbeddingKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Content => "content_embeddings",
            Self::Project => "project_embeddings",
        }
    }

    pub fn owner_column(&self) -> &'static str {
        match self {
            Self::Content => "content_id",
            Self::Project => "project_id",
        }
    }
}

impl std::fmt::Display for EmbeddingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// Derived embedding of a content entry or project. At most one per owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingRecord {
    pub owner_id: String,
    /// The exact text that was embedded.
    pub content: String,
    /// Vector serialized as a JSON array string.
    pub embedding: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn serialize_vector(vector: &[f32]) -> String {
    let parts: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

pub fn parse_vector(raw: &str) -> Option<Vec<f32>> {
    serde_json::from_str(raw).ok()
}

/// Cosine similarity; zero when either vector is empty, zero-length or the
/// dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_text_parses_back() {
        let raw = serialize_vector(&[0.25, -1.0, 3.5]);
        assert_eq!(raw, "[0.25,-1,3.5]");
        assert_eq!(parse_vector(&raw), Some(vec![0.25, -1.0, 3.5]));
    }

    #[test]
    fn malformed_vector_text_is_none() {
        assert!(parse_vector("not a vector").is_none());
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_mismatched_dimensions_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
