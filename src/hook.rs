//! The closed set of PEP 517 build-backend hooks and their fixed,
//! hook-specific argument schemas.

use std::fmt;

/// One of the standardized build-backend entry points.
///
/// Dispatch on `HookKind` is a closed match, never reflective method
/// discovery: the daemon only ever asks a backend for one of these eight
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    BuildWheel,
    BuildSdist,
    BuildEditable,
    PrepareMetadataForBuildWheel,
    PrepareMetadataForBuildEditable,
    GetRequiresForBuildWheel,
    GetRequiresForBuildEditable,
    GetRequiresForBuildSdist,
}

/// Names in the grouped order used by the `InvalidHookName` diagnostic:
/// wheel-build, wheel-metadata, wheel-requires, editable (same three),
/// then sdist-build, sdist-requires (sdist has no prepare-metadata hook).
pub const ALL_HOOKS_DIAGNOSTIC_ORDER: [HookKind; 8] = [
    HookKind::BuildWheel,
    HookKind::PrepareMetadataForBuildWheel,
    HookKind::GetRequiresForBuildWheel,
    HookKind::BuildEditable,
    HookKind::PrepareMetadataForBuildEditable,
    HookKind::GetRequiresForBuildEditable,
    HookKind::BuildSdist,
    HookKind::GetRequiresForBuildSdist,
];

/// An argument of a hook's fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A `*_directory` argument: empty means `None`, otherwise resolved
    /// relative to the daemon's current working directory.
    Directory,
    /// The `config_settings` argument: empty means `None`, otherwise parsed
    /// as a JSON object.
    ConfigSettings,
}

/// One entry of a hook's argument schema: the prompted name and how to
/// decode the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
}

const fn dir(name: &'static str) -> ArgSpec {
    ArgSpec {
        name,
        kind: ArgKind::Directory,
    }
}

const CONFIG_SETTINGS: ArgSpec = ArgSpec {
    name: "config_settings",
    kind: ArgKind::ConfigSettings,
};

impl HookKind {
    /// Parses the wire name sent after the `hook-name` prompt.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Some(match name {
            "build_wheel" => Self::BuildWheel,
            "build_sdist" => Self::BuildSdist,
            "build_editable" => Self::BuildEditable,
            "prepare_metadata_for_build_wheel" => Self::PrepareMetadataForBuildWheel,
            "prepare_metadata_for_build_editable" => Self::PrepareMetadataForBuildEditable,
            "get_requires_for_build_wheel" => Self::GetRequiresForBuildWheel,
            "get_requires_for_build_editable" => Self::GetRequiresForBuildEditable,
            "get_requires_for_build_sdist" => Self::GetRequiresForBuildSdist,
            _ => return None,
        })
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::BuildWheel => "build_wheel",
            Self::BuildSdist => "build_sdist",
            Self::BuildEditable => "build_editable",
            Self::PrepareMetadataForBuildWheel => "prepare_metadata_for_build_wheel",
            Self::PrepareMetadataForBuildEditable => "prepare_metadata_for_build_editable",
            Self::GetRequiresForBuildWheel => "get_requires_for_build_wheel",
            Self::GetRequiresForBuildEditable => "get_requires_for_build_editable",
            Self::GetRequiresForBuildSdist => "get_requires_for_build_sdist",
        }
    }

    /// The fixed, ordered argument schema prompted for this hook.
    pub fn arg_schema(self) -> &'static [ArgSpec] {
        match self {
            Self::BuildWheel | Self::BuildEditable => {
                const SCHEMA: [ArgSpec; 3] = [dir("wheel_directory"), CONFIG_SETTINGS, dir("metadata_directory")];
                &SCHEMA
            }
            Self::BuildSdist => {
                const SCHEMA: [ArgSpec; 2] = [dir("sdist_directory"), CONFIG_SETTINGS];
                &SCHEMA
            }
            Self::PrepareMetadataForBuildWheel | Self::PrepareMetadataForBuildEditable => {
                const SCHEMA: [ArgSpec; 2] = [dir("metadata_directory"), CONFIG_SETTINGS];
                &SCHEMA
            }
            Self::GetRequiresForBuildWheel
            | Self::GetRequiresForBuildEditable
            | Self::GetRequiresForBuildSdist => {
                const SCHEMA: [ArgSpec; 1] = [CONFIG_SETTINGS];
                &SCHEMA
            }
        }
    }

    /// Whether this hook's success value is a list of requirement strings
    /// (the three `get_requires_for_build_*` hooks) rather than a single
    /// path-like string.
    pub fn returns_list(self) -> bool {
        matches!(
            self,
            Self::GetRequiresForBuildWheel
                | Self::GetRequiresForBuildEditable
                | Self::GetRequiresForBuildSdist
        )
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_names() {
        for hook in ALL_HOOKS_DIAGNOSTIC_ORDER {
            assert_eq!(HookKind::from_wire_name(hook.wire_name()), Some(hook));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(HookKind::from_wire_name("hook_does_not_exist"), None);
    }

    #[test]
    fn build_sdist_has_no_metadata_directory() {
        let names: Vec<&str> = HookKind::BuildSdist
            .arg_schema()
            .iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["sdist_directory", "config_settings"]);
    }

    #[test]
    fn get_requires_hooks_return_lists() {
        assert!(HookKind::GetRequiresForBuildWheel.returns_list());
        assert!(!HookKind::BuildWheel.returns_list());
    }
}
