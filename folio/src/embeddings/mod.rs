mod api;
mod cache;
mod provider;

#[cfg(test)]
mod tests;

pub use cache::EmbeddingCache;
pub use provider::EmbeddingProvider;
