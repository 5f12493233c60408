//! Warden - guild access-control and locale-resolution core.
//!
//! Given a member of a guild, this crate answers two orthogonal
//! questions: what privilege tier they hold (gating administrative
//! actions) and what language they should be addressed in (routing
//! support-ticket content). Both depend on cached guild-scoped
//! configuration that is expensive to recompute from raw membership
//! data on every call.
//!
//! ## Architecture
//!
//! - `config` - environment configuration for embedding binaries
//! - `error` - typed error taxonomy
//! - `platform` - member shape and the membership-provider boundary
//! - `cache` - Moka-backed caches and the pluggable role-cache backend
//! - `database` - MongoDB config store (models and repositories)
//! - `permissions` - staff-role aggregation and privilege tiers
//! - `i18n` - locale resolution, mismatch detection, message catalogues
//! - `service` - the `Warden` facade command handlers talk to
//!
//! ## Quick start
//!
//! ```ignore
//! let config = RuntimeConfig::from_env();
//! let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
//! let cache = CacheRegistry::new();
//! let warden = Warden::mongo(&db, &cache, config.operator_ids.clone());
//!
//! if warden.resolve_privilege(Some(&member)).await? >= PrivilegeTier::GuildStaff {
//!     // permit the action
//! }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod i18n;
pub mod permissions;
pub mod platform;
pub mod service;

pub use cache::{CacheConfig, CacheRegistry, MemoryRoleCache, MokaRoleCache, RoleCache};
pub use config::RuntimeConfig;
pub use database::Database;
pub use database::models::{Category, GuildSettings};
pub use error::CoreError;
pub use i18n::{Locale, MismatchResult, detect_mismatch, resolve_locale};
pub use permissions::{CategorySource, PrivilegeResolver, PrivilegeTier, StaffRoleCache};
pub use platform::{GuildId, Member, MemberProvider, Permissions, RoleId, UserId};
pub use service::{CategoryStore, SettingsStore, Warden};
