//! Decoding of individual hook-argument reply lines (§4.C).
//!
//! Prompting order and I/O live in [`crate::session`]; this module is the
//! pure decode step so it can be unit tested without a pipe.

use crate::error::HookError;
use std::path::{Path, PathBuf};

/// An empty backend-path line means "no extra search path".
pub fn decode_backend_path(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// A `*_directory` argument: empty means "unspecified"; otherwise resolved
/// relative to the daemon's current working directory (the tree root).
pub fn decode_directory(raw: &str, tree_root: &Path) -> Option<PathBuf> {
    if raw.is_empty() {
        None
    } else {
        Some(tree_root.join(raw))
    }
}

/// `config_settings`: empty means `None`; otherwise the literal JSON
/// object. Malformed JSON is the one argument-decode failure in the
/// taxonomy.
pub fn decode_config_settings(raw: &str) -> Result<Option<serde_json::Value>, HookError> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw).map(Some).map_err(|_| HookError::malformed_hook_argument("config_settings", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_backend_path_is_absent() {
        assert_eq!(decode_backend_path(""), None);
        assert_eq!(decode_backend_path("src"), Some("src".to_string()));
    }

    #[test]
    fn directory_resolved_relative_to_tree_root() {
        let tree = PathBuf::from("/tree");
        assert_eq!(decode_directory("", &tree), None);
        assert_eq!(decode_directory("foo", &tree), Some(PathBuf::from("/tree/foo")));
    }

    #[test]
    fn absolute_directory_is_not_re_rooted() {
        let tree = PathBuf::from("/tree");
        assert_eq!(decode_directory("/abs/foo", &tree), Some(PathBuf::from("/abs/foo")));
    }

    #[test]
    fn empty_config_settings_is_none() {
        assert_eq!(decode_config_settings("").unwrap(), None);
    }

    #[test]
    fn valid_json_object_parses() {
        let value = decode_config_settings("{\"run\": 1}").unwrap().unwrap();
        assert_eq!(value, serde_json::json!({"run": 1}));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = decode_config_settings("not_valid_json").unwrap_err();
        assert_eq!(
            err.message,
            "Malformed content for argument 'config_settings': 'not_valid_json'"
        );
    }
}
