//! Model references and identifier validation
//!
//! A reference is `model` or `model@selector`, where the selector is an
//! alias name or a literal version identifier. A bare `model` means
//! `model@latest`; `latest` has no special engine behavior, so the bare
//! form resolves only once someone has actually pointed `latest` at a
//! version.

use super::error::{RegistryError, Result};

/// Default selector used when a reference names only the model.
pub const DEFAULT_SELECTOR: &str = "latest";

/// Parsed model reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    /// Model name
    pub model: String,
    /// Alias name or literal version identifier
    pub selector: String,
}

impl ModelRef {
    /// Parse a `model` or `model@selector` reference.
    pub fn parse(reference: &str) -> Result<Self> {
        let (model, selector) = match reference.split_once('@') {
            Some((m, s)) => (m.trim(), s.trim()),
            None => (reference.trim(), DEFAULT_SELECTOR),
        };
        if model.is_empty() || selector.is_empty() {
            return Err(RegistryError::validation(
                "ref",
                format!("invalid reference {reference:?}, expected <model> or <model>@<alias_or_version>"),
            ));
        }
        validate_identifier("model", model)?;
        validate_identifier("selector", selector)?;
        Ok(Self { model: model.to_string(), selector: selector.to_string() })
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.model, self.selector)
    }
}

/// Validate a path-safe identifier (task, model, version, or alias name).
///
/// Allowed: ASCII alphanumerics, `-`, `_`, `.`; no leading dot (reserved
/// for staging areas and lock files), no path separators, max 128 chars.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RegistryError::validation(field, "must not be empty"));
    }
    if value.len() > 128 {
        return Err(RegistryError::validation(field, "must be at most 128 characters"));
    }
    if value.starts_with('.') {
        return Err(RegistryError::validation(
            field,
            format!("{value:?} must not start with '.'"),
        ));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(RegistryError::validation(
            field,
            format!("{value:?} contains disallowed character {bad:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_selector() {
        let r = ModelRef::parse("pbmc@production").expect("parse");
        assert_eq!(r.model, "pbmc");
        assert_eq!(r.selector, "production");
    }

    #[test]
    fn test_parse_with_version_selector() {
        let r = ModelRef::parse("pbmc@2026-02-13_001").expect("parse");
        assert_eq!(r.selector, "2026-02-13_001");
    }

    #[test]
    fn test_bare_model_defaults_to_latest() {
        let r = ModelRef::parse("pbmc").expect("parse");
        assert_eq!(r.model, "pbmc");
        assert_eq!(r.selector, DEFAULT_SELECTOR);
    }

    #[test]
    fn test_parse_rejects_empty_halves() {
        assert!(ModelRef::parse("").is_err());
        assert!(ModelRef::parse("@v1").is_err());
        assert!(ModelRef::parse("pbmc@").is_err());
    }

    #[test]
    fn test_validate_identifier_rejects_path_tricks() {
        assert!(validate_identifier("model", "../escape").is_err());
        assert!(validate_identifier("model", "a/b").is_err());
        assert!(validate_identifier("model", ".hidden").is_err());
        assert!(validate_identifier("model", "").is_err());
        assert!(validate_identifier("model", "ok-name_1.2").is_ok());
    }

    #[test]
    fn test_display_roundtrip() {
        let r = ModelRef::parse("pbmc@staging").expect("parse");
        assert_eq!(r.to_string(), "pbmc@staging");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_valid_refs_roundtrip(
            model in "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,20}",
            selector in "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,20}",
        ) {
            let parsed = ModelRef::parse(&format!("{model}@{selector}")).expect("valid ref");
            prop_assert_eq!(parsed.model, model);
            prop_assert_eq!(parsed.selector, selector);
        }

        #[test]
        fn prop_parse_never_panics(input in ".{0,64}") {
            let _ = ModelRef::parse(&input);
        }
    }
}
