//! Caching layer.
//!
//! A registry of named Moka caches shared across repositories, plus the
//! pluggable guild-keyed backend the staff-role aggregation runs on.
//!
//! - `CacheRegistry` - central registry holding all named caches
//! - `TypedCache` - clone-friendly wrapper over a Moka sync cache
//! - `RoleCache` - get/set/invalidate backend trait for staff role sets

mod backend;
mod config;
mod registry;
mod typed;

pub use backend::{MemoryRoleCache, MokaRoleCache, RoleCache};
pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
