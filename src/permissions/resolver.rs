//! Privilege tier resolution.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use super::staff::{CategorySource, StaffRoleCache};
use crate::error::CoreError;
use crate::platform::{GuildId, Member, MemberProvider, Permissions, UserId};

/// Discrete privilege tier. Order matters: a member satisfying several
/// conditions holds the highest matching tier.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeTier {
    /// Not a member, or resolution impossible.
    None = -1,
    GuildMember = 0,
    GuildStaff = 1,
    GuildAdmin = 2,
    GuildOwner = 3,
    /// Cross-guild super-user.
    Operator = 4,
}

impl PrivilegeTier {
    /// Numeric level, matching the wire representation used by callers.
    pub fn level(self) -> i8 {
        self as i8
    }
}

/// Resolves a member's privilege tier.
///
/// The operator set is injected at construction and immutable for the
/// resolver's lifetime; there is no ambient global super-user list.
pub struct PrivilegeResolver<S> {
    operators: Arc<HashSet<UserId>>,
    staff_roles: StaffRoleCache<S>,
}

impl<S: Clone> Clone for PrivilegeResolver<S> {
    fn clone(&self) -> Self {
        Self {
            operators: Arc::clone(&self.operators),
            staff_roles: self.staff_roles.clone(),
        }
    }
}

impl<S: CategorySource> PrivilegeResolver<S> {
    pub fn new(
        operators: impl IntoIterator<Item = UserId>,
        staff_roles: StaffRoleCache<S>,
    ) -> Self {
        Self {
            operators: Arc::new(operators.into_iter().collect()),
            staff_roles,
        }
    }

    pub fn is_operator(&self, user_id: UserId) -> bool {
        self.operators.contains(&user_id)
    }

    /// Resolve the privilege tier for a member. First match wins:
    /// operator, guild owner, manage-guild permission, staff role,
    /// plain member. `None` resolves to [`PrivilegeTier::None`].
    ///
    /// The staff-role lookup fails closed: a failing config store
    /// demotes to [`PrivilegeTier::GuildMember`] rather than erroring,
    /// because privilege checks gate destructive actions and
    /// under-privileging is the safe direction. Ownership and permission
    /// data, by contrast, is expected to be resident on the member;
    /// its absence is an explicit [`CoreError::MemberDataMissing`].
    pub async fn resolve(&self, member: Option<&Member>) -> Result<PrivilegeTier, CoreError> {
        let Some(member) = member else {
            return Ok(PrivilegeTier::None);
        };

        if self.is_operator(member.user_id) {
            return Ok(PrivilegeTier::Operator);
        }

        let owner_id = member.guild_owner_id.ok_or(CoreError::MemberDataMissing {
            guild: member.guild_id,
            user: member.user_id,
            field: "guild owner",
        })?;
        if member.user_id == owner_id {
            return Ok(PrivilegeTier::GuildOwner);
        }

        let permissions = member.permissions.ok_or(CoreError::MemberDataMissing {
            guild: member.guild_id,
            user: member.user_id,
            field: "permission",
        })?;
        if permissions.contains(Permissions::MANAGE_GUILD) {
            return Ok(PrivilegeTier::GuildAdmin);
        }

        match self.staff_roles.get(member.guild_id).await {
            Ok(staff_roles) => {
                if member.role_ids.iter().any(|role| staff_roles.contains(role)) {
                    Ok(PrivilegeTier::GuildStaff)
                } else {
                    Ok(PrivilegeTier::GuildMember)
                }
            }
            Err(err) => {
                // Fail closed: whatever went wrong, the member is not
                // granted staff. Log the kind so operators can tell a
                // store outage from a data problem.
                warn!(
                    "Staff role lookup failed for guild {}, treating user {} as non-staff: {}",
                    member.guild_id, member.user_id, err
                );
                Ok(PrivilegeTier::GuildMember)
            }
        }
    }

    /// Is this user staff (or better) in the guild?
    ///
    /// Convenience for callers that have only IDs in hand. Fetches the
    /// member from the platform; every failure along the way (member
    /// missing, transient fetch error, store error) answers `false`.
    pub async fn is_staff_user<P: MemberProvider>(
        &self,
        platform: &P,
        guild_id: GuildId,
        user_id: UserId,
    ) -> bool {
        if self.is_operator(user_id) {
            return true;
        }

        let member = match platform.fetch_member(guild_id, user_id).await {
            Ok(Some(member)) => member,
            Ok(None) => {
                debug!("User {} is not a member of guild {}", user_id, guild_id);
                return false;
            }
            Err(err) => {
                warn!(
                    "Member fetch failed for user {} in guild {}, denying staff: {}",
                    user_id, guild_id, err
                );
                return false;
            }
        };

        if member
            .permissions
            .is_some_and(|permissions| permissions.contains(Permissions::MANAGE_GUILD))
        {
            return true;
        }

        match self.staff_roles.get(guild_id).await {
            Ok(staff_roles) => member.role_ids.iter().any(|role| staff_roles.contains(role)),
            Err(err) => {
                warn!(
                    "Staff role lookup failed for guild {}, denying staff for user {}: {}",
                    guild_id, user_id, err
                );
                false
            }
        }
    }
}
