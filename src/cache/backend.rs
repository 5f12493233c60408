//! Pluggable backend for the staff-role cache.
//!
//! The staff-role aggregation only needs get/set/invalidate keyed by
//! guild, so the backend is a trait: the default is the process-local
//! Moka cache, tests use the plain map, and a distributed cache can be
//! slotted in without touching the aggregation logic.

use std::collections::HashSet;

use dashmap::DashMap;

use super::{CacheConfig, CacheRegistry, TypedCache};
use crate::platform::{GuildId, RoleId};

/// Guild-keyed store of aggregated staff role sets.
///
/// Entries are always written wholesale; implementations never merge.
pub trait RoleCache: Send + Sync {
    fn get(&self, guild_id: GuildId) -> Option<HashSet<RoleId>>;
    fn set(&self, guild_id: GuildId, roles: HashSet<RoleId>);
    fn invalidate(&self, guild_id: GuildId);
}

/// Default backend: a Moka cache without age-based expiry. Freshness is
/// the responsibility of writers, which invalidate explicitly.
pub struct MokaRoleCache {
    inner: TypedCache<GuildId, HashSet<RoleId>>,
}

impl MokaRoleCache {
    pub fn new(registry: &CacheRegistry) -> Self {
        Self {
            inner: registry
                .get_or_create("guild_staff_roles", CacheConfig::with_capacity(10_000).no_ttl()),
        }
    }
}

impl RoleCache for MokaRoleCache {
    fn get(&self, guild_id: GuildId) -> Option<HashSet<RoleId>> {
        self.inner.get(&guild_id)
    }

    fn set(&self, guild_id: GuildId, roles: HashSet<RoleId>) {
        self.inner.insert(guild_id, roles);
    }

    fn invalidate(&self, guild_id: GuildId) {
        self.inner.invalidate(&guild_id);
    }
}

/// Unbounded in-memory backend. Suitable for tests and small
/// single-process deployments.
#[derive(Default)]
pub struct MemoryRoleCache {
    inner: DashMap<GuildId, HashSet<RoleId>>,
}

impl MemoryRoleCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleCache for MemoryRoleCache {
    fn get(&self, guild_id: GuildId) -> Option<HashSet<RoleId>> {
        self.inner.get(&guild_id).map(|entry| entry.clone())
    }

    fn set(&self, guild_id: GuildId, roles: HashSet<RoleId>) {
        self.inner.insert(guild_id, roles);
    }

    fn invalidate(&self, guild_id: GuildId) {
        self.inner.remove(&guild_id);
    }
}
