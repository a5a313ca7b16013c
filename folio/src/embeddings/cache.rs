use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Thread-safe LRU cache of query text to embedding.
///
/// A capacity of zero disables caching.
#[derive(Clone)]
pub struct EmbeddingCache {
    cache: Option<Arc<Mutex<LruCache<String, Vec<f32>>>>>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: NonZeroUsize::new(capacity).map(|cap| Arc::new(Mutex::new(LruCache::new(cap)))),
        }
    }

    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let cache = self.cache.as_ref()?;
        let mut cache = cache.lock().ok()?;
        cache.get(&normalize_key(text)).cloned()
    }

    pub fn put(&self, text: &str, embedding: Vec<f32>) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(normalize_key(text), embedding);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cache
            .as_ref()
            .and_then(|c| c.lock().ok().map(|c| c.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cache_hit_after_put() {
        let cache = EmbeddingCache::new(4);
        cache.put("Show me your work", vec![0.1, 0.2]);

        assert_eq!(cache.get("show me your work  "), Some(vec![0.1, 0.2]));
    }

    #[test]
    fn test_cache_capacity_enforcement() {
        let cache = EmbeddingCache::new(2);
        cache.put("one", vec![1.0]);
        cache.put("two", vec![2.0]);
        cache.put("three", vec![3.0]);

        assert_eq!(cache.get("one"), None);
        assert_eq!(cache.get("three"), Some(vec![3.0]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = EmbeddingCache::new(0);
        cache.put("one", vec![1.0]);
        assert!(cache.get("one").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = EmbeddingCache::new(64);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for j in 0..8 {
                        cache.put(&format!("q{i}-{j}"), vec![i as f32, j as f32]);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 32);
    }
}
