//! The fixed, client-visible error taxonomy (§4.G) and the daemon-fatal
//! `Error` type used internally.
//!
//! Every [`HookError`] is non-fatal: it is reported as `ERROR <Kind> <msg>`
//! plus a `TRACEBACK` line and control returns to the session loop. The
//! [`Error`] type below is reserved for the small set of genuinely
//! unrecoverable failures (startup, control-pipe I/O, worker loss).

use crate::hook::{HookKind, ALL_HOOKS_DIAGNOSTIC_ORDER};
use std::io;
use thiserror::Error as ThisError;

/// Daemon-fatal failures. None of these are reachable through the protocol
/// except as a process exit — there is no fatal error kind visible to the
/// client.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Could not find a Python interpreter: {0}")]
    PythonNotFound(#[source] which::Error),
    #[error("The hook worker exited unexpectedly")]
    WorkerDied,
    #[error("The hook worker sent a malformed response: {0}")]
    WorkerProtocol(String),
}

/// The closed taxonomy of non-fatal hook/request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownAction,
    InvalidHookName,
    MalformedHookArgument,
    MissingBackendModule,
    BackendImportError,
    MissingBackendAttribute,
    UnsupportedHook,
    HookRuntimeError,
}

impl ErrorKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::UnknownAction => "UnknownAction",
            Self::InvalidHookName => "InvalidHookName",
            Self::MalformedHookArgument => "MalformedHookArgument",
            Self::MissingBackendModule => "MissingBackendModule",
            Self::BackendImportError => "BackendImportError",
            Self::MissingBackendAttribute => "MissingBackendAttribute",
            Self::UnsupportedHook => "UnsupportedHook",
            Self::HookRuntimeError => "HookRuntimeError",
        }
    }
}

/// A fully-formed, non-fatal protocol error: the kind, the one-line
/// message, and an optional traceback (absent for errors that never
/// touched Python, e.g. a malformed `config_settings` argument).
#[derive(Debug, Clone)]
pub struct HookError {
    pub kind: ErrorKind,
    pub message: String,
    pub traceback: Option<String>,
}

impl HookError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            traceback: None,
        }
    }

    pub fn unknown_action(action: &str) -> Self {
        Self::new(ErrorKind::UnknownAction, format!("Unknown action '{action}'"))
    }

    pub fn invalid_hook_name(name: &str) -> Self {
        let expected = ALL_HOOKS_DIAGNOSTIC_ORDER
            .iter()
            .map(|h| format!("'{}'", h.wire_name()))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            ErrorKind::InvalidHookName,
            format!("The name '{name}' is not valid hook. Expected one of: {expected}"),
        )
    }

    pub fn malformed_hook_argument(arg: &str, raw: &str) -> Self {
        Self::new(
            ErrorKind::MalformedHookArgument,
            format!("Malformed content for argument '{arg}': '{raw}'"),
        )
    }

    pub fn missing_backend_module(module: &str) -> Self {
        Self::new(
            ErrorKind::MissingBackendModule,
            format!("Failed to import the backend '{module}'"),
        )
    }

    pub fn backend_import_error(message: &str) -> Self {
        Self::new(
            ErrorKind::BackendImportError,
            format!("Backend threw an exception during import: {message}"),
        )
    }

    pub fn missing_backend_attribute(full_spec: &str, module: &str) -> Self {
        Self::new(
            ErrorKind::MissingBackendAttribute,
            format!("Failed to find attribute '{full_spec}' in the backend module '{module}'"),
        )
    }

    pub fn unsupported_hook(hook: HookKind, supported: &[String]) -> Self {
        let message = if supported.is_empty() {
            format!(
                "The hook '{}' is not supported by the backend. The backend does not support any known hooks.",
                hook.wire_name()
            )
        } else {
            let list = supported
                .iter()
                .map(|s| format!("'{s}'"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "The hook '{}' is not supported by the backend. The backend supports: {list}",
                hook.wire_name()
            )
        };
        Self::new(ErrorKind::UnsupportedHook, message)
    }

    pub fn hook_runtime_error(message: &str) -> Self {
        Self::new(ErrorKind::HookRuntimeError, message)
    }

    pub fn with_traceback(mut self, traceback: Option<String>) -> Self {
        self.traceback = traceback;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hook_name_lists_every_hook_in_grouped_order() {
        let err = HookError::invalid_hook_name("hook_does_not_exist");
        assert_eq!(
            err.message,
            "The name 'hook_does_not_exist' is not valid hook. Expected one of: \
             'build_wheel', 'prepare_metadata_for_build_wheel', 'get_requires_for_build_wheel', \
             'build_editable', 'prepare_metadata_for_build_editable', 'get_requires_for_build_editable', \
             'build_sdist', 'get_requires_for_build_sdist'"
        );
    }

    #[test]
    fn malformed_hook_argument_message() {
        let err = HookError::malformed_hook_argument("config_settings", "not_valid_json");
        assert_eq!(
            err.message,
            "Malformed content for argument 'config_settings': 'not_valid_json'"
        );
    }

    #[test]
    fn missing_backend_module_message() {
        let err = HookError::missing_backend_module("backend_does_not_exist");
        assert_eq!(err.message, "Failed to import the backend 'backend_does_not_exist'");
    }

    #[test]
    fn unsupported_hook_empty_backend() {
        let err = HookError::unsupported_hook(HookKind::BuildWheel, &[]);
        assert_eq!(
            err.message,
            "The hook 'build_wheel' is not supported by the backend. The backend does not support any known hooks."
        );
    }

    #[test]
    fn unsupported_hook_partial_backend() {
        let err = HookError::unsupported_hook(HookKind::BuildSdist, &["build_wheel".to_string()]);
        assert_eq!(
            err.message,
            "The hook 'build_sdist' is not supported by the backend. The backend supports: 'build_wheel'"
        );
    }

    #[test]
    fn missing_backend_attribute_preserves_original_separator() {
        let err = HookError::missing_backend_attribute("submodule_backend:submodule", "submodule_backend");
        assert_eq!(
            err.message,
            "Failed to find attribute 'submodule_backend:submodule' in the backend module 'submodule_backend'"
        );
    }
}
