//! Guild settings document.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::i18n::Locale;
use crate::platform::{GuildId, RoleId};

/// Per-guild configuration for language routing.
///
/// Every optional field carries a serde default, so a partial or legacy
/// document always deserializes to something usable; a missing
/// `default_locale` is en-GB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSettings {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Guild snowflake
    pub guild_id: GuildId,

    /// Role marking English-speaking members
    #[serde(default)]
    pub english_role_id: Option<RoleId>,

    /// Role marking Spanish-speaking members
    #[serde(default)]
    pub spanish_role_id: Option<RoleId>,

    /// Locale used when a member's roles imply nothing
    #[serde(default)]
    pub default_locale: Locale,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub updated_at: i64,
}

impl GuildSettings {
    /// Create new settings with defaults.
    pub fn new(guild_id: GuildId) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            guild_id,
            english_role_id: None,
            spanish_role_id: None,
            default_locale: Locale::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
