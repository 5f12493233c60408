//! Config store: MongoDB wrapper, document models, repositories.

pub mod models;
mod mongo;
mod repository;

pub use mongo::Database;
pub use repository::{CategoryRepo, GuildSettingsRepo};
