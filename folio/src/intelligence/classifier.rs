//! Cheap lexical predicates that tag a visitor message before any retrieval.
//!
//! Every predicate lowercases its input and is free of side effects.

use std::sync::LazyLock;

use regex::Regex;

use super::keywords::is_experience_phrasing;

static SHOW_PROJECTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"show (me )?(recent )?(work|projects?|portfolio|all)")
        .expect("show projects regex is valid")
});

const WORK_TERMS: &[&str] = &["project", "work", "portfolio"];

const AI_TERMS: &[&str] = &["ai", "artificial intelligence"];

const EXPERIENCE_TERMS: &[&str] = &[
    "experience",
    "worked on",
    "have any",
    "do you have",
    "have you done",
    "work with",
    "work in",
];

const HAVE_YOU_TERMS: &[&str] = &["have you", "do you have"];

fn contains_any(message: &str, terms: &[&str]) -> bool {
    let lower = message.to_lowercase();
    terms.iter().any(|term| lower.contains(term))
}

/// Explicit request for the gallery ("show me recent work", "portfolio", ...).
pub fn is_show_projects_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    SHOW_PROJECTS_RE.is_match(&lower)
        || lower.contains("portfolio")
        || lower.contains("work example")
}

pub fn is_work_related_query(message: &str) -> bool {
    contains_any(message, WORK_TERMS)
}

/// Plain substring match, so any word containing "ai" counts
/// ("rails", "email", "maintain").
pub fn is_ai_query(message: &str) -> bool {
    contains_any(message, AI_TERMS)
}

pub fn is_experience_query(message: &str) -> bool {
    contains_any(message, EXPERIENCE_TERMS)
}

pub fn is_ai_experience_query(message: &str) -> bool {
    (is_experience_query(message) || is_work_related_query(message)) && is_ai_query(message)
}

/// "have you ..." or "do you have ..." phrasing.
pub fn is_have_you_phrasing(message: &str) -> bool {
    contains_any(message, HAVE_YOU_TERMS)
}

/// All predicates evaluated once for a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFlags {
    pub show_projects: bool,
    pub work_related: bool,
    pub ai: bool,
    pub experience: bool,
    /// "have you worked", "experience in", ...
    pub experience_phrasing: bool,
    pub ai_experience: bool,
    pub have_you: bool,
}

impl QueryFlags {
    pub fn classify(message: &str) -> Self {
        let work_related = is_work_related_query(message);
        let ai = is_ai_query(message);
        let experience = is_experience_query(message);

        Self {
            show_projects: is_show_projects_query(message),
            work_related,
            ai,
            experience,
            experience_phrasing: is_experience_phrasing(message),
            ai_experience: (experience || work_related) && ai,
            have_you: is_have_you_phrasing(message),
        }
    }
}
