//! Runtime configuration, loaded from environment variables.

use std::env;

use crate::i18n::Locale;
use crate::platform::UserId;

/// Process-level configuration for an embedding binary.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Operator (cross-guild super-user) IDs, comma-separated in
    /// `OPERATOR_IDS`. Injected into the privilege resolver at
    /// construction; never read from ambient state afterwards.
    pub operator_ids: Vec<UserId>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    /// Fallback locale for guilds without one configured.
    pub default_locale: Locale,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set, or if
    /// `DEFAULT_LOCALE` names an unsupported locale.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let operator_ids = env::var("OPERATOR_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|id| id.trim().parse::<UserId>().ok())
            .collect();

        let default_locale = match env::var("DEFAULT_LOCALE") {
            Ok(code) => Locale::from_code(code.trim())
                .unwrap_or_else(|| panic!("DEFAULT_LOCALE '{code}' is not a supported locale")),
            Err(_) => Locale::default(),
        };

        Self {
            operator_ids,
            mongodb_uri: env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "warden".to_string()),
            default_locale,
        }
    }
}
