//! Reader-friendly, Python-literal-style formatting for `DEBUG Calling`,
//! `OK`, and error diagnostics.
//!
//! The wire itself is plain JSON between the daemon and its worker; this
//! module only produces the human-facing text the client sees.

use crate::hook::HookKind;
use serde_json::Value;

/// Formats a `config_settings` argument (or any arbitrary JSON value) the
/// way Python's `repr()` would: `None`, `True`/`False`, single-quoted
/// strings, and dict/list literals.
pub fn format_py_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", escape_single_quotes(s)),
        Value::Array(items) => {
            let inner = items.iter().map(format_py_value).collect::<Vec<_>>().join(", ");
            format!("[{inner}]")
        }
        Value::Object(map) => {
            let inner = map
                .iter()
                .map(|(k, v)| format!("'{}': {}", escape_single_quotes(k), format_py_value(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{inner}}}")
        }
    }
}

fn escape_single_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Formats a path-typed argument for the `DEBUG Calling` line: `None` when
/// absent, otherwise a single-quoted path.
pub fn format_py_path(path: Option<&str>) -> String {
    match path {
        Some(path) => format!("'{path}'"),
        None => "None".to_string(),
    }
}

/// Formats a hook's successful return value for the `OK <value>` line.
///
/// Path-returning hooks report their string verbatim, unquoted. The three
/// `get_requires_for_build_*` hooks report a bracketed, single-quoted list
/// of requirement strings. Anything else falls back to the general
/// Python-literal formatting.
pub fn format_return_value(hook: HookKind, value: &Value) -> String {
    if hook.returns_list() {
        let items = value.as_array().cloned().unwrap_or_default();
        let inner = items
            .iter()
            .map(|item| match item {
                Value::String(s) => format!("'{}'", escape_single_quotes(s)),
                other => format_py_value(other),
            })
            .collect::<Vec<_>>()
            .join(", ");
        return format!("[{inner}]");
    }

    match value {
        Value::String(s) => s.clone(),
        other => format_py_value(other),
    }
}
