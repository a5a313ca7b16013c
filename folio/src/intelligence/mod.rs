pub mod classifier;
pub mod keywords;

pub use classifier::QueryFlags;
pub use keywords::{extract_keywords, is_experience_phrasing, KEYWORD_VOCABULARY};
