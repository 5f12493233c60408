//! Internationalization: locale resolution and message catalogues.
//!
//! Catalogues are embedded with `include_str!` so lookups never touch
//! the filesystem at runtime. Keys use dot notation ("ticket.opened");
//! missing entries fall back to en-GB, then to the key itself.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

mod locale;

pub use locale::{Locale, MismatchResult, detect_mismatch, resolve_locale};

static CATALOGUES: OnceLock<HashMap<Locale, Value>> = OnceLock::new();

fn load_catalogues() -> HashMap<Locale, Value> {
    let mut map = HashMap::new();

    if let Ok(value) = serde_json::from_str(include_str!("en-GB.json")) {
        map.insert(Locale::EnGb, value);
    }
    if let Ok(value) = serde_json::from_str(include_str!("es-ES.json")) {
        map.insert(Locale::EsEs, value);
    }

    map
}

/// Look up a catalogue string for a locale.
///
/// Falls back to en-GB when the locale has no entry for the key, and to
/// the key itself when no catalogue has it.
pub fn text(locale: Locale, key: &str) -> String {
    let store = CATALOGUES.get_or_init(load_catalogues);

    if let Some(catalogue) = store.get(&locale)
        && let Some(message) = resolve_key(catalogue, key)
    {
        return message;
    }

    if locale != Locale::EnGb
        && let Some(catalogue) = store.get(&Locale::EnGb)
        && let Some(message) = resolve_key(catalogue, key)
    {
        return message;
    }

    key.to_string()
}

fn resolve_key(catalogue: &Value, key: &str) -> Option<String> {
    let mut current = catalogue;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(str::to_string)
}
