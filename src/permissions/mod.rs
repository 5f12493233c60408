//! Access control: staff-role aggregation and privilege tiers.
//!
//! ## Usage
//!
//! ```ignore
//! let staff_roles = StaffRoleCache::new(category_repo.clone(), backend);
//! let resolver = PrivilegeResolver::new(config.operator_ids.clone(), staff_roles);
//!
//! match resolver.resolve(Some(&member)).await? {
//!     tier if tier >= PrivilegeTier::GuildStaff => { /* permit */ }
//!     _ => { /* deny */ }
//! }
//! ```

mod resolver;
mod staff;

pub use resolver::{PrivilegeResolver, PrivilegeTier};
pub use staff::{CategorySource, StaffRoleCache};
