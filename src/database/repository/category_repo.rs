//! Category repository.
//!
//! Reads are uncached: category lists feed the staff-role aggregation,
//! which keeps its own derived cache, and per-ticket reads are rare.
//! Writers return the touched document so callers can refresh that
//! guild's staff-role aggregate in the same logical operation.

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::options::{FindOptions, ReturnDocument};
use tracing::debug;

use super::Database;
use crate::database::models::Category;
use crate::error::CoreError;
use crate::i18n::Locale;
use crate::platform::{GuildId, RoleId};

/// Repository for support-ticket categories.
#[derive(Clone)]
pub struct CategoryRepo {
    collection: Collection<Category>,
}

impl CategoryRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("categories"),
        }
    }

    /// Get a category by document ID.
    pub async fn get(&self, id: ObjectId) -> Result<Option<Category>, CoreError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// List all categories belonging to a guild, sorted by name.
    pub async fn list(&self, guild_id: GuildId) -> Result<Vec<Category>, CoreError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();

        let mut cursor = self
            .collection
            .find(doc! { "guild_id": guild_id as i64 })
            .with_options(options)
            .await?;

        let mut categories = Vec::new();
        while let Some(category) = cursor.try_next().await? {
            categories.push(category);
        }

        Ok(categories)
    }

    /// Insert a new category and return its document ID.
    pub async fn create(&self, category: &Category) -> Result<ObjectId, CoreError> {
        let result = self.collection.insert_one(category).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .expect("inserted _id is an ObjectId");
        debug!("Created category {} in guild {}", id, category.guild_id);
        Ok(id)
    }

    /// Set a category's locale override. Returns the updated document.
    pub async fn set_locale(&self, id: ObjectId, locale: Locale) -> Result<Category, CoreError> {
        let update = doc! { "$set": {
            "locale": locale.code(),
            "updated_at": Utc::now().timestamp(),
        } };
        self.apply_update(id, update).await
    }

    /// Replace a category's staff role list wholesale. Returns the
    /// updated document; the caller owns refreshing the guild's
    /// staff-role aggregate.
    pub async fn set_staff_roles(
        &self,
        id: ObjectId,
        staff_role_ids: &[RoleId],
    ) -> Result<Category, CoreError> {
        let roles: Vec<i64> = staff_role_ids.iter().map(|role| *role as i64).collect();
        let update = doc! { "$set": {
            "staff_role_ids": roles,
            "updated_at": Utc::now().timestamp(),
        } };
        self.apply_update(id, update).await
    }

    /// Delete a category, returning the removed document.
    pub async fn delete(&self, id: ObjectId) -> Result<Category, CoreError> {
        let category = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?
            .ok_or(CoreError::CategoryNotFound(id))?;
        debug!("Deleted category {} in guild {}", id, category.guild_id);
        Ok(category)
    }

    async fn apply_update(&self, id: ObjectId, update: Document) -> Result<Category, CoreError> {
        self.collection
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(CoreError::CategoryNotFound(id))
    }
}
