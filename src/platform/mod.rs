//! Platform-facing types.
//!
//! Snowflake aliases, the permission bitset, and the `Member` shape the
//! resolvers operate on. The platform itself (gateway, REST client) is
//! not part of this crate; it is reached only through [`MemberProvider`],
//! which callers implement over their connection of choice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Guild (server) snowflake.
pub type GuildId = u64;
/// User snowflake.
pub type UserId = u64;
/// Role snowflake.
pub type RoleId = u64;

/// Guild-level permission bitset as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions(pub u64);

impl Permissions {
    /// The "Manage Guild" bit. Holding it marks a member as a guild admin.
    pub const MANAGE_GUILD: Permissions = Permissions(1 << 5);

    /// Check whether all bits of `other` are set.
    pub fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A guild member as supplied per call. Never persisted by this crate.
///
/// `permissions` and `guild_owner_id` model data the platform is expected
/// to have already resolved onto the member. When either is `None` at the
/// point a privilege decision needs it, the resolver reports
/// [`CoreError::MemberDataMissing`] rather than assuming a value.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: UserId,
    pub guild_id: GuildId,
    /// Role IDs currently held in the guild.
    pub role_ids: HashSet<RoleId>,
    /// Platform-supplied permission set, if resident.
    pub permissions: Option<Permissions>,
    /// Owner of the member's guild, if resident.
    pub guild_owner_id: Option<UserId>,
}

impl Member {
    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// Source of member records, backed by the platform's membership API.
///
/// Fetches may fail transiently (network, gateway load); implementations
/// report those as [`CoreError::Fetch`]. A member who simply is not in
/// the guild is `Ok(None)`, not an error.
#[allow(async_fn_in_trait)]
pub trait MemberProvider: Send + Sync {
    async fn fetch_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, CoreError>;
}
