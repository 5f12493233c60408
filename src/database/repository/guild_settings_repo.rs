//! Guild settings repository.
//!
//! Cache-aside reads over the `guild_settings` collection, write-through
//! on mutation so readers never observe a stale language-role mapping
//! for longer than the write itself.

use chrono::Utc;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::options::ReturnDocument;
use tracing::debug;

use super::Database;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::GuildSettings;
use crate::error::CoreError;
use crate::i18n::Locale;
use crate::platform::{GuildId, RoleId};

/// Repository for guild settings.
#[derive(Clone)]
pub struct GuildSettingsRepo {
    collection: Collection<GuildSettings>,
    cache: Option<TypedCache<GuildId, GuildSettings>>,
}

impl GuildSettingsRepo {
    /// Create a new repository instance with caching.
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("guild_settings"),
            cache: Some(cache.get_or_create("guild_settings", CacheConfig::guild_config())),
        }
    }

    /// Repository without a read cache (maintenance tooling).
    pub fn new_no_cache(db: &Database) -> Self {
        Self {
            collection: db.collection("guild_settings"),
            cache: None,
        }
    }

    /// Get settings for a guild. `Ok(None)` when no document exists.
    pub async fn get(&self, guild_id: GuildId) -> Result<Option<GuildSettings>, CoreError> {
        if let Some(cache) = &self.cache
            && let Some(settings) = cache.get(&guild_id)
        {
            debug!("Settings cache hit for guild {}", guild_id);
            return Ok(Some(settings));
        }

        let settings = self
            .collection
            .find_one(doc! { "guild_id": guild_id as i64 })
            .await?;

        if let Some(settings) = &settings
            && let Some(cache) = &self.cache
        {
            cache.insert(guild_id, settings.clone());
        }

        Ok(settings)
    }

    /// Get settings, creating a default document if none exists.
    pub async fn get_or_create(&self, guild_id: GuildId) -> Result<GuildSettings, CoreError> {
        if let Some(settings) = self.get(guild_id).await? {
            return Ok(settings);
        }

        let settings = GuildSettings::new(guild_id);
        self.collection.insert_one(&settings).await?;
        debug!("Created default settings for guild {}", guild_id);

        if let Some(cache) = &self.cache {
            cache.insert(guild_id, settings.clone());
        }

        Ok(settings)
    }

    /// Update the language role IDs. Fields passed as `None` are left
    /// unchanged. Returns the updated document.
    pub async fn set_language_roles(
        &self,
        guild_id: GuildId,
        english_role_id: Option<RoleId>,
        spanish_role_id: Option<RoleId>,
    ) -> Result<GuildSettings, CoreError> {
        // Ensure the document exists before a partial $set.
        self.get_or_create(guild_id).await?;

        let mut set: Document = doc! { "updated_at": Utc::now().timestamp() };
        if let Some(role) = english_role_id {
            set.insert("english_role_id", role as i64);
        }
        if let Some(role) = spanish_role_id {
            set.insert("spanish_role_id", role as i64);
        }

        self.apply_update(guild_id, doc! { "$set": set }).await
    }

    /// Update the fallback locale for members whose roles imply nothing.
    pub async fn set_default_locale(
        &self,
        guild_id: GuildId,
        locale: Locale,
    ) -> Result<GuildSettings, CoreError> {
        self.get_or_create(guild_id).await?;

        let update = doc! { "$set": {
            "default_locale": locale.code(),
            "updated_at": Utc::now().timestamp(),
        } };

        self.apply_update(guild_id, update).await
    }

    async fn apply_update(
        &self,
        guild_id: GuildId,
        update: Document,
    ) -> Result<GuildSettings, CoreError> {
        let settings = self
            .collection
            .find_one_and_update(doc! { "guild_id": guild_id as i64 }, update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(CoreError::GuildSettingsNotFound(guild_id))?;

        if let Some(cache) = &self.cache {
            cache.insert(guild_id, settings.clone());
        }

        Ok(settings)
    }
}
