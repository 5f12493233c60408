//! Support-ticket category document.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::i18n::Locale;
use crate::platform::{GuildId, RoleId};

/// A grouping of support channels with its own staff roles and locale.
///
/// The union of all categories' `staff_role_ids` in a guild is the
/// authoritative staff set; the cached aggregate is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Guild snowflake
    pub guild_id: GuildId,

    /// Display name
    pub name: String,

    /// Roles that confer staff privilege within this category
    #[serde(default)]
    pub staff_role_ids: Vec<RoleId>,

    /// Locale override; `None` means the category is served in en-GB
    #[serde(default)]
    pub locale: Option<Locale>,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub updated_at: i64,
}

impl Category {
    /// Create a new category with no staff roles and no locale override.
    pub fn new(guild_id: GuildId, name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            guild_id,
            name: name.into(),
            staff_role_ids: Vec::new(),
            locale: None,
            created_at: now,
            updated_at: now,
        }
    }
}
