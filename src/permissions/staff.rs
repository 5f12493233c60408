//! Guild-keyed cache of aggregated staff role IDs.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::cache::RoleCache;
use crate::database::models::Category;
use crate::error::CoreError;
use crate::platform::{GuildId, RoleId};

/// Source of a guild's category records. Implemented by the Mongo
/// repository and by in-memory doubles in tests.
#[allow(async_fn_in_trait)]
pub trait CategorySource: Send + Sync {
    async fn categories_for(&self, guild_id: GuildId) -> Result<Vec<Category>, CoreError>;
}

/// Cache of the deduplicated union of staff role IDs across all of a
/// guild's categories.
///
/// Recomputation is idempotent and overwrites the entry wholesale, so
/// concurrent recomputations need no coordination: last write wins and
/// equals any other. There is no age-based expiry; staleness is bounded
/// by writers calling [`refresh`](Self::refresh) in the same logical
/// operation that mutates a category's staff roles.
pub struct StaffRoleCache<S> {
    source: S,
    backend: Arc<dyn RoleCache>,
}

impl<S: Clone> Clone for StaffRoleCache<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<S: CategorySource> StaffRoleCache<S> {
    pub fn new(source: S, backend: Arc<dyn RoleCache>) -> Self {
        Self { source, backend }
    }

    /// Get the guild's aggregated staff role set.
    ///
    /// A hit returns the stored set without touching the source; a miss
    /// recomputes. Fails only if the source fails.
    pub async fn get(&self, guild_id: GuildId) -> Result<HashSet<RoleId>, CoreError> {
        if let Some(roles) = self.backend.get(guild_id) {
            debug!("Staff role cache hit for guild {}", guild_id);
            return Ok(roles);
        }

        debug!("Staff role cache miss for guild {}", guild_id);
        self.recompute(guild_id).await
    }

    /// Recompute the aggregate from the source and store it wholesale.
    pub async fn recompute(&self, guild_id: GuildId) -> Result<HashSet<RoleId>, CoreError> {
        let categories = self.source.categories_for(guild_id).await?;

        let roles: HashSet<RoleId> = categories
            .iter()
            .flat_map(|category| category.staff_role_ids.iter().copied())
            .collect();

        debug!(
            "Recomputed staff roles for guild {}: {} roles across {} categories",
            guild_id,
            roles.len(),
            categories.len()
        );

        self.backend.set(guild_id, roles.clone());
        Ok(roles)
    }

    /// Drop the guild's entry; the next read recomputes.
    pub fn invalidate(&self, guild_id: GuildId) {
        self.backend.invalidate(guild_id);
        debug!("Invalidated staff role cache for guild {}", guild_id);
    }

    /// Eagerly invalidate and recompute. Writers that changed a
    /// category's staff roles call this before returning.
    pub async fn refresh(&self, guild_id: GuildId) -> Result<HashSet<RoleId>, CoreError> {
        self.backend.invalidate(guild_id);
        self.recompute(guild_id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::cache::MemoryRoleCache;

    /// In-memory category source counting fetches and optionally failing.
    #[derive(Clone, Default)]
    pub(crate) struct MemCategories {
        categories: Arc<Mutex<Vec<Category>>>,
        pub fetches: Arc<AtomicUsize>,
        pub failing: Arc<AtomicBool>,
    }

    impl MemCategories {
        pub fn with_staff_roles(guild_id: GuildId, role_sets: &[&[RoleId]]) -> Self {
            let source = Self::default();
            for (index, roles) in role_sets.iter().enumerate() {
                let mut category = Category::new(guild_id, format!("category-{index}"));
                category.staff_role_ids = roles.to_vec();
                source.push(category);
            }
            source
        }

        pub fn push(&self, category: Category) {
            self.categories.lock().unwrap().push(category);
        }
    }

    impl CategorySource for MemCategories {
        async fn categories_for(&self, guild_id: GuildId) -> Result<Vec<Category>, CoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CoreError::fetch(std::io::Error::other(
                    "config store unreachable",
                )));
            }
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .categories
                .lock()
                .unwrap()
                .iter()
                .filter(|category| category.guild_id == guild_id)
                .cloned()
                .collect())
        }
    }

    pub(crate) fn cache_over(source: MemCategories) -> StaffRoleCache<MemCategories> {
        StaffRoleCache::new(source, Arc::new(MemoryRoleCache::new()))
    }

    #[tokio::test]
    async fn aggregates_the_union_across_categories() {
        let source = MemCategories::with_staff_roles(1, &[&[10], &[20, 30], &[20]]);
        let cache = cache_over(source);

        let roles = cache.get(1).await.expect("aggregate");
        assert_eq!(roles, HashSet::from([10, 20, 30]));
    }

    #[tokio::test]
    async fn hit_does_not_contact_the_source() {
        let source = MemCategories::with_staff_roles(1, &[&[10]]);
        let fetches = Arc::clone(&source.fetches);
        let cache = cache_over(source);

        cache.get(1).await.expect("miss populates");
        cache.get(1).await.expect("hit");
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let source = MemCategories::with_staff_roles(1, &[&[10], &[20, 30]]);
        let cache = cache_over(source);

        let first = cache.recompute(1).await.expect("first");
        let second = cache.recompute(1).await.expect("second");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalidate_makes_the_next_read_fresh() {
        let source = MemCategories::with_staff_roles(1, &[&[10]]);
        let cache = cache_over(source.clone());

        assert_eq!(cache.get(1).await.expect("initial"), HashSet::from([10]));

        let mut extra = Category::new(1, "appeals");
        extra.staff_role_ids = vec![40];
        source.push(extra);

        // Without invalidation the stale aggregate is served.
        assert_eq!(cache.get(1).await.expect("stale"), HashSet::from([10]));

        cache.invalidate(1);
        assert_eq!(
            cache.get(1).await.expect("fresh"),
            HashSet::from([10, 40])
        );
    }

    #[tokio::test]
    async fn guilds_do_not_share_entries() {
        let source = MemCategories::with_staff_roles(1, &[&[10]]);
        let mut other = Category::new(2, "other-guild");
        other.staff_role_ids = vec![99];
        source.push(other);
        let cache = cache_over(source);

        assert_eq!(cache.get(1).await.expect("guild 1"), HashSet::from([10]));
        assert_eq!(cache.get(2).await.expect("guild 2"), HashSet::from([99]));
    }

    #[tokio::test]
    async fn source_failure_propagates_from_get() {
        let source = MemCategories::with_staff_roles(1, &[&[10]]);
        source.failing.store(true, Ordering::SeqCst);
        let cache = cache_over(source);

        assert!(cache.get(1).await.is_err());
    }
}
