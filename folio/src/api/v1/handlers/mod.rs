pub mod admin;
pub mod chat;
pub mod content;
pub(crate) mod health;
pub mod projects;
pub mod prompts;
pub mod tags;

pub use health::health_check;
