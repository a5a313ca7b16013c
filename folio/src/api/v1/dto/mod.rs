//! v1 API Data Transfer Objects.
//!
//! These types define the wire format for the v1 REST API. They are kept
//! separate from the internal domain models in `src/models/` and handle
//! serialization, deserialization, and domain-model conversion.

pub mod admin;
pub mod chat;
pub mod common;
pub mod content;
pub mod projects;

// Re-export all public types for convenient access via `dto::*`.
pub use admin::*;
pub use chat::*;
pub use common::*;
pub use content::*;
pub use projects::*;
