//! Locale type and the two role-based language resolvers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::models::{Category, GuildSettings};
use crate::platform::Member;

/// Supported locales. Closed set; adding a language means adding a
/// variant and a catalogue, and slotting it into the fixed priority
/// order in [`resolve_locale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "es-ES")]
    EsEs,
}

impl Locale {
    /// Wire/storage code for this locale.
    pub fn code(self) -> &'static str {
        match self {
            Locale::EnGb => "en-GB",
            Locale::EsEs => "es-ES",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en-GB" => Some(Locale::EnGb),
            "es-ES" => Some(Locale::EsEs),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of comparing a member's implied language against a category's
/// configured one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchResult {
    pub category_locale: Locale,
    /// The member's single unambiguous language, if they have one.
    pub user_locale: Option<Locale>,
    pub is_mismatch: bool,
}

/// Resolve the locale a member should be addressed in.
///
/// English role wins over Spanish unconditionally; this is fixed policy,
/// not configuration. Members holding neither configured role fall back
/// to the guild's default locale.
pub fn resolve_locale(member: &Member, settings: &GuildSettings) -> Locale {
    if let Some(role) = settings.english_role_id
        && member.has_role(role)
    {
        return Locale::EnGb;
    }

    if let Some(role) = settings.spanish_role_id
        && member.has_role(role)
    {
        return Locale::EsEs;
    }

    settings.default_locale
}

/// Compare a member's implied language against a category's locale.
///
/// Unlike [`resolve_locale`], holding both language roles is treated as
/// no signal at all: without a single unambiguous user language a
/// mismatch is never flagged. Holding neither role is likewise no
/// signal. The asymmetry with the resolver's English-priority tie-break
/// is deliberate.
pub fn detect_mismatch(
    member: &Member,
    category: &Category,
    settings: &GuildSettings,
) -> MismatchResult {
    let category_locale = category.locale.unwrap_or_default();

    let has_english = settings
        .english_role_id
        .is_some_and(|role| member.has_role(role));
    let has_spanish = settings
        .spanish_role_id
        .is_some_and(|role| member.has_role(role));

    let user_locale = match (has_english, has_spanish) {
        (true, false) => Some(Locale::EnGb),
        (false, true) => Some(Locale::EsEs),
        _ => None,
    };

    MismatchResult {
        category_locale,
        user_locale,
        is_mismatch: user_locale.is_some_and(|locale| locale != category_locale),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn member_with_roles(roles: &[u64]) -> Member {
        Member {
            user_id: 1,
            guild_id: 10,
            role_ids: roles.iter().copied().collect::<HashSet<_>>(),
            permissions: None,
            guild_owner_id: None,
        }
    }

    fn settings(english: Option<u64>, spanish: Option<u64>) -> GuildSettings {
        let mut settings = GuildSettings::new(10);
        settings.english_role_id = english;
        settings.spanish_role_id = spanish;
        settings
    }

    #[test]
    fn english_wins_when_both_roles_held() {
        let member = member_with_roles(&[100, 200]);
        let settings = settings(Some(100), Some(200));
        assert_eq!(resolve_locale(&member, &settings), Locale::EnGb);
    }

    #[test]
    fn spanish_role_resolves_spanish() {
        let member = member_with_roles(&[200]);
        let settings = settings(Some(100), Some(200));
        assert_eq!(resolve_locale(&member, &settings), Locale::EsEs);
    }

    #[test]
    fn falls_back_to_default_locale() {
        let member = member_with_roles(&[]);
        let mut settings = settings(None, Some(200));
        settings.default_locale = Locale::EsEs;
        assert_eq!(resolve_locale(&member, &settings), Locale::EsEs);
    }

    #[test]
    fn unset_default_is_english() {
        // A settings document without a default_locale field deserializes
        // to en-GB; an unconfigured english role with no spanish role held
        // must land there too.
        let member = member_with_roles(&[]);
        let settings = settings(None, Some(200));
        assert_eq!(resolve_locale(&member, &settings), Locale::EnGb);
    }

    #[test]
    fn both_roles_is_no_signal_for_mismatch() {
        let member = member_with_roles(&[100, 200]);
        let settings = settings(Some(100), Some(200));
        let mut category = Category::new(10, "support");
        category.locale = Some(Locale::EsEs);

        let result = detect_mismatch(&member, &category, &settings);
        assert_eq!(result.user_locale, None);
        assert!(!result.is_mismatch);
    }

    #[test]
    fn spanish_member_in_english_category_mismatches() {
        let member = member_with_roles(&[200]);
        let settings = settings(Some(100), Some(200));
        let mut category = Category::new(10, "support");
        category.locale = Some(Locale::EnGb);

        let result = detect_mismatch(&member, &category, &settings);
        assert_eq!(result.user_locale, Some(Locale::EsEs));
        assert!(result.is_mismatch);
    }

    #[test]
    fn neither_role_never_mismatches() {
        let member = member_with_roles(&[]);
        let settings = settings(Some(100), Some(200));
        let mut category = Category::new(10, "soporte");
        category.locale = Some(Locale::EsEs);

        let result = detect_mismatch(&member, &category, &settings);
        assert_eq!(result.user_locale, None);
        assert!(!result.is_mismatch);
    }

    #[test]
    fn category_without_locale_defaults_to_english() {
        let member = member_with_roles(&[100]);
        let settings = settings(Some(100), Some(200));
        let category = Category::new(10, "support");

        let result = detect_mismatch(&member, &category, &settings);
        assert_eq!(result.category_locale, Locale::EnGb);
        assert_eq!(result.user_locale, Some(Locale::EnGb));
        assert!(!result.is_mismatch);
    }
}
