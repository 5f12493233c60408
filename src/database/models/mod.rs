//! Document models.

mod category;
mod guild_settings;

pub use category::Category;
pub use guild_settings::GuildSettings;
