//! Document id normalization and validation
//!
//! Admin-supplied slugs become document ids, and for games the id also names
//! a file under the store root. `normalize_slug` turns free text into a
//! URL-safe token; `validate_id` is the last check before an id reaches disk.

use crate::error::{Error, Result};

/// Longest id accepted by the store
pub const MAX_ID_LENGTH: usize = 200;

/// Normalize an admin-supplied slug into a document id
///
/// Lower-cases and trims, collapses every run of characters outside
/// `[a-z0-9_]` (dashes included) into a single `-`, and strips leading and
/// trailing dashes and underscores.
///
/// ```
/// use schooldesk_core::normalize_slug;
///
/// assert_eq!(normalize_slug("  Space Invaders! ").unwrap(), "space-invaders");
/// assert!(normalize_slug(" !! ").is_err());
/// ```
pub fn normalize_slug(raw: &str) -> Result<String> {
    let lowered = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '-' || c == '_');
    if trimmed.is_empty() {
        return Err(Error::invalid_id(raw, "slug has no URL-safe characters"));
    }
    let id = trimmed.to_string();
    validate_id(&id)?;
    Ok(id)
}

/// Check that an id is safe to use as a map key and a file name
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::invalid_id(id, "must not be empty"));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(Error::invalid_id(id, "exceeds maximum length"));
    }
    if id.contains('/') || id.contains('\\') || id.contains('\0') {
        return Err(Error::invalid_id(id, "must not contain path separators"));
    }
    if id == "." || id == ".." {
        return Err(Error::invalid_id(id, "must not be a relative path component"));
    }
    if id.starts_with('_') {
        // `_local_index`, `_generic` and `_hidden` are reserved file stems
        return Err(Error::invalid_id(id, "must not start with an underscore"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize_slug("  Pong ").unwrap(), "pong");
        assert_eq!(normalize_slug("My Game!").unwrap(), "my-game");
    }

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize_slug("a  &&  b").unwrap(), "a-b");
        assert_eq!(normalize_slug("--a--").unwrap(), "a");
        assert_eq!(normalize_slug("a - b").unwrap(), "a-b");
        assert_eq!(normalize_slug("_private").unwrap(), "private");
    }

    #[test]
    fn test_normalize_keeps_underscores_inside() {
        assert_eq!(normalize_slug("snake_case").unwrap(), "snake_case");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize_slug("").is_err());
        assert!(normalize_slug("   ").is_err());
        assert!(normalize_slug("???").is_err());
    }

    #[test]
    fn test_validate_rejects_path_tricks() {
        assert!(validate_id("../secret").is_err());
        assert!(validate_id("a/b").is_err());
        assert!(validate_id("a\\b").is_err());
        assert!(validate_id("..").is_err());
        assert!(validate_id("_hidden").is_err());
        assert!(validate_id("").is_err());
    }

    #[test]
    fn test_validate_accepts_plain_ids() {
        assert!(validate_id("pong").is_ok());
        assert!(validate_id("1700000000000").is_ok());
        assert!(validate_id("snake-2").is_ok());
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in ".{0,40}") {
            if let Ok(once) = normalize_slug(&raw) {
                prop_assert_eq!(normalize_slug(&once).unwrap(), once);
            }
        }

        #[test]
        fn normalized_ids_are_valid(raw in "[A-Za-z0-9 !?_-]{1,40}") {
            if let Ok(id) = normalize_slug(&raw) {
                prop_assert!(validate_id(&id).is_ok());
                prop_assert!(!id.starts_with('-') && !id.ends_with('-'));
                prop_assert_eq!(id.to_lowercase(), id.clone());
            }
        }
    }
}
