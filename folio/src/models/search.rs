use serde::{Deserialize, Serialize};

/// Row returned by the content similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentMatch {
    pub content_id: String,
    pub similarity: f32,
}

/// Row returned by the project similarity search. `content` is the text that
/// was embedded for the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectMatch {
    pub project_id: String,
    pub similarity: f32,
    #[serde(default)]
    pub content: String,
}

/// Outcome of a semantic project lookup.
///
/// When the search itself fails the retriever still returns every visible
/// project with `similarity = 0.0` and `fallback = true`. Such a set must
/// never be presented as relevant to the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMatches {
    pub matches: Vec<ProjectMatch>,
    pub fallback: bool,
}

impl ProjectMatches {
    pub fn found(matches: Vec<ProjectMatch>) -> Self {
        Self {
            matches,
            fallback: false,
        }
    }

    pub fn fallback(project_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            matches: project_ids
                .into_iter()
                .map(|project_id| ProjectMatch {
                    project_id,
                    similarity: 0.0,
                    content: String::new(),
                })
                .collect(),
            fallback: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn average_similarity(&self) -> f32 {
        if self.matches.is_empty() {
            return 0.0;
        }
        let total: f32 = self.matches.iter().map(|m| m.similarity).sum();
        total / self.matches.len() as f32
    }

    /// Real matches whose average similarity is strictly above `min_avg`.
    pub fn is_relevant(&self, min_avg: f32) -> bool {
        !self.fallback && !self.matches.is_empty() && self.average_similarity() > min_avg
    }

    pub fn project_ids(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.project_id.clone()).collect()
    }

    /// Non-empty stored texts, in match order.
    pub fn grounding_texts(&self) -> Vec<&str> {
        self.matches
            .iter()
            .map(|m| m.content.trim())
            .filter(|c| !c.is_empty())
            .collect()
    }
}
