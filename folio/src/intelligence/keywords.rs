//! Last-resort lexical signal: which domain terms a message mentions.

use std::collections::BTreeSet;

/// Industry and domain terms matched as lowercase substrings.
///
/// AI terms are left out: AI questions are answered by the AI galleries.
pub const KEYWORD_VOCABULARY: &[&str] = &[
    "healthcare",
    "health",
    "medical",
    "wellness",
    "fitness",
    "finance",
    "fintech",
    "banking",
    "insurance",
    "education",
    "edtech",
    "ecommerce",
    "e-commerce",
    "retail",
    "shopping",
    "mobile",
    "app",
    "application",
    "android",
    "website",
    "web",
    "ui",
    "ux",
    "design",
    "branding",
    "dashboard",
    "analytics",
    "data",
    "visualization",
    "machine learning",
    "chatbot",
    "saas",
    "platform",
    "startup",
    "enterprise",
    "b2b",
    "gaming",
    "social",
    "community",
    "travel",
    "hospitality",
    "real estate",
    "automotive",
    "logistics",
    "media",
    "marketing",
    "nonprofit",
    "government",
    "sustainability",
    "energy",
    "music",
];

/// Phrasings that signal the visitor is asking about past work.
const EXPERIENCE_PHRASINGS: &[&str] = &[
    "have you worked",
    "worked on",
    "experience with",
    "experience in",
    "have you done",
    "do you have",
];

/// Vocabulary terms present in `message`. Empty means no lexical signal.
pub fn extract_keywords(message: &str) -> BTreeSet<String> {
    let lower = message.to_lowercase();
    KEYWORD_VOCABULARY
        .iter()
        .filter(|term| lower.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

/// Intent signal only. Extraction always scans the full vocabulary.
pub fn is_experience_phrasing(message: &str) -> bool {
    let lower = message.to_lowercase();
    EXPERIENCE_PHRASINGS
        .iter()
        .any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthcare_apps_question() {
        let keywords = extract_keywords("Do you have experience with healthcare apps?");

        assert!(keywords.contains("healthcare"));
        assert!(keywords.contains("app") || keywords.contains("application"));
        assert!(is_experience_phrasing("Do you have experience with healthcare apps?"));
    }

    #[test]
    fn extraction_is_case_insensitive() {
        let keywords = extract_keywords("MOBILE Dashboard for Analytics");
        assert!(keywords.contains("mobile"));
        assert!(keywords.contains("dashboard"));
        assert!(keywords.contains("analytics"));
    }

    #[test]
    fn no_vocabulary_term_yields_empty_set() {
        assert!(extract_keywords("what's the weather today").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let message = "Have you worked on fintech or e-commerce platforms?";
        assert_eq!(extract_keywords(message), extract_keywords(message));
    }

    #[test]
    fn ai_terms_are_not_keywords() {
        assert!(extract_keywords("tell me about your ai experience").is_empty());
        assert!(extract_keywords("any artificial intelligence work?").is_empty());
    }

    #[test]
    fn experience_phrasing_does_not_narrow_vocabulary() {
        let plain = extract_keywords("fintech platform");
        let phrased = extract_keywords("have you worked on a fintech platform");
        assert_eq!(plain, phrased);
    }
}
