//! Locale tags supported by the bot
//!
//! The supported set is fixed at compile time. Locale updates are validated
//! against it before touching the store; everything else is the localization
//! collaborator's problem.

/// Default locale assigned to newly created accounts
pub const DEFAULT_LOCALE: &str = "en";

/// Locale tags the bot ships translations for
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ru", "es", "zh"];

/// Normalize a locale tag: trimmed, lowercase
pub fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Whether a (normalized) locale tag is supported
pub fn is_supported(tag: &str) -> bool {
    SUPPORTED_LOCALES.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" EN "), "en");
        assert_eq!(normalize("Ru"), "ru");
    }

    #[test]
    fn test_default_is_supported() {
        assert!(is_supported(DEFAULT_LOCALE));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(!is_supported("xx"));
        assert!(!is_supported(""));
    }
}
