//! Central registry of named caches.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{CacheConfig, TypedCache};

/// Registry holding every named cache in the process, so repositories
/// and the staff-role backend can share one eviction budget and be
/// inspected together.
///
/// ```ignore
/// let registry = CacheRegistry::new();
/// let roles: TypedCache<u64, HashSet<u64>> =
///     registry.get_or_create("guild_staff_roles", CacheConfig::default().no_ttl());
/// ```
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cache registered under `name`, creating it with `config`
    /// on first use.
    ///
    /// # Panics
    /// Panics if `name` is already registered with different key/value
    /// types. Cache names are per-concern constants, so a collision is a
    /// wiring bug, not a runtime condition.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        {
            let caches = self.caches.read().unwrap();
            if let Some(existing) = caches.get(name) {
                return existing
                    .downcast_ref::<TypedCache<K, V>>()
                    .unwrap_or_else(|| {
                        panic!("cache '{name}' is registered with different types")
                    })
                    .clone();
            }
        }

        let mut caches = self.caches.write().unwrap();
        // Lost the race to another creator? Reuse theirs.
        if let Some(existing) = caches.get(name) {
            return existing
                .downcast_ref::<TypedCache<K, V>>()
                .unwrap_or_else(|| panic!("cache '{name}' is registered with different types"))
                .clone();
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);
        caches.insert(name.to_string(), Box::new(cache.clone()));
        cache
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read().unwrap();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}
