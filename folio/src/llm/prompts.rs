//! Prompt templates for the chat widget.

use crate::models::{ChatTurn, ContentEntry};

/// Join entries as `[type] title: content` lines, keeping retrieval order.
pub fn content_context(entries: &[ContentEntry]) -> String {
    entries
        .iter()
        .map(ContentEntry::context_line)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// System prompt for answers grounded in the owner's curated content.
///
/// # Example
/// ```
/// use folio::llm::prompts::content_system_prompt;
///
/// let prompt = content_system_prompt("[skill] Rust: daily driver");
/// assert!(prompt.contains("daily driver"));
/// ```
pub fn content_system_prompt(context: &str) -> String {
    format!(
        r#"You are the assistant on a personal portfolio website and you speak on behalf of the site owner, in the first person.
Answer the visitor's question using only the information below. If the information does not cover the question, say so briefly instead of guessing.
Keep answers short and conversational, two to four sentences.

Information about me:
{context}"#
    )
}

/// System prompt for answers grounded in the stored text of matched projects.
pub fn projects_system_prompt(project_texts: &[&str]) -> String {
    let context = project_texts.join("\n\n---\n\n");
    format!(
        r#"You are the assistant on a personal portfolio website and you speak on behalf of the site owner, in the first person.
The visitor asked about work I have done. The projects below matched their question and will be shown to them as a gallery right after your answer.
In two or three sentences, explain how these projects relate to the question. Do not list every field and do not invent details.

Matched projects:
{context}"#
    )
}

/// System prompt plus the visitor's message as the single user turn.
pub fn grounded_messages(system_prompt: String, message: &str) -> Vec<ChatTurn> {
    vec![ChatTurn::system(system_prompt), ChatTurn::user(message)]
}
