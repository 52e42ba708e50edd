//! Backend specifier parsing: `module[(:|.)attr]`.
//!
//! This is pure string processing and needs no Python interpreter — only
//! the subsequent import and attribute walk (§4.D steps 3–4) require the
//! worker.

/// Which character separated `module` from `attr` in the original
/// specifier, preserved only for diagnostics (it does not affect how
/// resolution proceeds: both yield attribute access on the imported
/// module).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Colon,
    Dot,
}

/// A parsed `build-backend` specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSpec {
    /// The exact string the client sent, unnormalized — used verbatim in
    /// `DEBUG Calling` and `MissingBackendAttribute` diagnostics.
    pub raw: String,
    pub module: String,
    /// Present only if a `:` or `.` was found; dot-joined if there's more
    /// than one trailing attribute hop (e.g. `pkg:a.b` attr is `a.b`).
    pub attr: Option<String>,
    separator: Option<Separator>,
}

impl BackendSpec {
    /// Splits `backend` on the first occurrence of either `:` or `.`,
    /// whichever appears first. Neither appearing leaves `attr` absent.
    pub fn parse(backend: &str) -> Self {
        let split_at = backend
            .char_indices()
            .find(|(_, c)| *c == ':' || *c == '.')
            .map(|(i, c)| (i, if c == ':' { Separator::Colon } else { Separator::Dot }));

        match split_at {
            Some((i, sep)) => {
                let module = backend[..i].to_string();
                let attr = backend[i + 1..].to_string();
                Self {
                    raw: backend.to_string(),
                    module,
                    attr: Some(attr),
                    separator: Some(sep),
                }
            }
            None => Self {
                raw: backend.to_string(),
                module: backend.to_string(),
                attr: None,
                separator: None,
            },
        }
    }

    /// Each dot-separated hop of `attr`, in walk order. Empty if there is
    /// no attribute to walk.
    pub fn attr_hops(&self) -> Vec<String> {
        match &self.attr {
            Some(attr) => attr.split('.').map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    /// Whether this specifier has the shape of a dotted import path (e.g.
    /// `pkg.sub`) rather than an explicit `module:attr` entry point. When
    /// true, resolution should try importing `raw` whole before falling
    /// back to `module` + attribute-walk — see the module doc on the
    /// submodule/attribute ambiguity.
    pub fn is_dotted_path(&self) -> bool {
        self.separator == Some(Separator::Dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_separator_splits_at_first_dot() {
        let spec = BackendSpec::parse("setuptools.build_meta");
        assert_eq!(spec.module, "setuptools");
        assert_eq!(spec.attr.as_deref(), Some("build_meta"));
        assert!(spec.is_dotted_path());
    }

    #[test]
    fn bare_module() {
        let spec = BackendSpec::parse("flit_core");
        assert_eq!(spec.module, "flit_core");
        assert_eq!(spec.attr, None);
        assert!(spec.attr_hops().is_empty());
        assert!(!spec.is_dotted_path());
    }

    #[test]
    fn colon_attribute() {
        let spec = BackendSpec::parse("cls_backend:Class");
        assert_eq!(spec.module, "cls_backend");
        assert_eq!(spec.attr.as_deref(), Some("Class"));
        assert_eq!(spec.raw, "cls_backend:Class");
        assert!(!spec.is_dotted_path());
    }

    #[test]
    fn dotted_submodule_loaded_by_attribute_access() {
        // `pkg.sub` splits at the first dot: module="pkg", attr="sub". This
        // is the standardized convention — a genuine submodule ends up
        // loaded by attribute lookup after the parent import, which is why
        // `is_dotted_path` tells the worker to try importing `raw` whole
        // first.
        let spec = BackendSpec::parse("submodule_backend.submodule");
        assert_eq!(spec.module, "submodule_backend");
        assert_eq!(spec.attr.as_deref(), Some("submodule"));
        assert!(spec.is_dotted_path());
    }

    #[test]
    fn colon_then_dotted_attr_walks_hop_by_hop() {
        let spec = BackendSpec::parse("submodule_backend:submodule");
        assert_eq!(spec.module, "submodule_backend");
        assert_eq!(spec.attr_hops(), vec!["submodule"]);
    }

    #[test]
    fn multi_hop_attribute() {
        let spec = BackendSpec::parse("pkg:a.b");
        assert_eq!(spec.module, "pkg");
        assert_eq!(spec.attr_hops(), vec!["a", "b"]);
    }

    #[test]
    fn colon_wins_over_later_dot() {
        let spec = BackendSpec::parse("pkg:a.b");
        // The separator recorded is `:` even though `.` appears later in
        // the attr portion.
        assert_eq!(spec.attr.as_deref(), Some("a.b"));
    }
}
