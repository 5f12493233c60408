//! Error taxonomy for the access-control core.
//!
//! Absences are typed, store failures carry their mongo source, and
//! platform fetch failures are boxed so any membership provider can
//! report through the same variant. Malformed settings never surface
//! here: the document models resolve them with serde defaults.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::platform::{GuildId, UserId};

/// Errors produced by the core resolvers, caches, and repositories.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No settings document stored for the guild.
    #[error("no settings stored for guild {0}")]
    GuildSettingsNotFound(GuildId),

    /// Category does not exist (or was deleted concurrently).
    #[error("category {0} not found")]
    CategoryNotFound(ObjectId),

    /// Data expected to be resident on the member object was absent.
    ///
    /// The privilege resolver refuses to guess when ownership or
    /// permission data is missing; it names the field instead.
    #[error("member {user} in guild {guild} is missing resident {field} data")]
    MemberDataMissing {
        guild: GuildId,
        user: UserId,
        field: &'static str,
    },

    /// The config store (MongoDB) failed.
    #[error("config store request failed: {0}")]
    Store(#[from] mongodb::error::Error),

    /// Transient failure fetching member data from the platform.
    #[error("platform member fetch failed: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    /// Wrap a platform-side error as a transient fetch failure.
    pub fn fetch(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Fetch(err.into())
    }
}
