//! Repository layer over the config store.

mod category_repo;
mod guild_settings_repo;

pub use category_repo::CategoryRepo;
pub use guild_settings_repo::GuildSettingsRepo;

use super::Database;
