//! Configuration resolution across layered sources.
//!
//! Four layers feed one options object, highest precedence last:
//!
//! 1. built-in defaults ([`Options::builtin`])
//! 2. workspace/user settings ([`Settings`])
//! 3. the project config file (`svgo.toml` under the workspace root)
//! 4. the call-site intent (pretty forced on or off)
//!
//! A broken or missing project file is logged and treated as an empty
//! layer; it never aborts a command.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SvgedError;
use crate::host::EditorHost;
use crate::options::{DEFAULT_PLUGINS, Js2Svg, Options, Toggle};

/// Fixed name of the project-level config file, resolved against the first
/// workspace root.
pub const PROJECT_CONFIG_FILE: &str = "svgo.toml";

/// Workspace/user settings for the SVG command section.
///
/// Deserializes from whatever store the host keeps settings in: the three
/// serialization keys plus one boolean per known toggle name, all flat in
/// the section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Indentation width in spaces.
    pub indent: Option<u8>,
    /// Pretty-print output (overridden by the invoked command).
    pub pretty: Option<bool>,
    /// Serialize childless elements as `<elem/>`.
    pub use_short_tags: Option<bool>,
    /// Per-toggle overrides keyed by toggle name. Only names from
    /// [`DEFAULT_PLUGINS`] are consulted.
    #[serde(flatten)]
    pub toggles: BTreeMap<String, bool>,
}

impl Settings {
    /// Parse settings from a TOML section.
    pub fn from_toml(section: &str) -> Result<Settings, SvgedError> {
        toml::from_str(section)
            .map_err(|err| SvgedError::ConfigLoad("<settings>".into(), err.to_string()))
    }

    /// Express these settings as an options layer. Unset keys stay unset
    /// so lower layers show through.
    fn as_layer(&self) -> Options {
        let mut layer = Options {
            js2svg: Js2Svg {
                pretty: self.pretty,
                indent: self.indent,
                use_short_tags: self.use_short_tags,
            },
            plugins: BTreeMap::new(),
        };
        for &(name, _) in DEFAULT_PLUGINS {
            if let Some(&enabled) = self.toggles.get(name) {
                layer.plugins.insert(name.to_string(), Toggle::Switch(enabled));
            }
        }
        layer
    }
}

/// Load a project config file. `Ok(None)` when the file does not exist.
pub fn load_project_file(path: &Path) -> Result<Option<Options>, SvgedError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|err| SvgedError::ConfigLoad(path.to_path_buf(), err.to_string()))?;
    let options = toml::from_str(&content)
        .map_err(|err| SvgedError::ConfigLoad(path.to_path_buf(), err.to_string()))?;
    Ok(Some(options))
}

/// The project layer: empty when there is no workspace root, no file, or
/// the file cannot be loaded. Load failures are logged, never fatal.
fn project_layer(path: Option<&Path>) -> Options {
    let Some(path) = path else {
        return Options::empty();
    };
    match load_project_file(path) {
        Ok(Some(options)) => options,
        Ok(None) => Options::empty(),
        Err(err) => {
            log::warn!("ignoring project config: {err}");
            Options::empty()
        }
    }
}

/// Merge all four layers for one invocation. `pretty` is the call-site
/// intent and always wins.
pub fn resolve_layers(settings: &Settings, project_file: Option<&Path>, pretty: bool) -> Options {
    let intent = Options {
        js2svg: Js2Svg {
            pretty: Some(pretty),
            ..Js2Svg::default()
        },
        plugins: BTreeMap::new(),
    };
    Options::builtin()
        .merged(settings.as_layer())
        .merged(project_layer(project_file))
        .merged(intent)
}

/// Resolve options for a command running against a host. Built fresh per
/// invocation; nothing is cached.
pub fn resolve(host: &dyn EditorHost, pretty: bool) -> Options {
    resolve_layers(&host.configuration(), host.project_config_path().as_deref(), pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings(section: &str) -> Settings {
        Settings::from_toml(section).unwrap()
    }

    #[test]
    fn test_settings_toggle_overrides_default() {
        let settings = settings("removeComments = false");
        let options = resolve_layers(&settings, None, false);
        assert!(!options.plugin_enabled("removeComments"));
        // defaults untouched elsewhere
        assert!(options.plugin_enabled("removeMetadata"));
    }

    #[test]
    fn test_unknown_settings_keys_ignored() {
        let settings = settings("someFutureToggle = true");
        let options = resolve_layers(&settings, None, false);
        assert!(!options.plugin_enabled("someFutureToggle"));
    }

    #[test]
    fn test_serialization_settings_read() {
        let settings = settings("indent = 2\nuseShortTags = false\npretty = true");
        let options = resolve_layers(&settings, None, true);
        assert_eq!(options.indent(), 2);
        assert!(!options.use_short_tags());
    }

    #[test]
    fn test_intent_beats_settings_pretty() {
        let settings = settings("pretty = true");
        assert!(!resolve_layers(&settings, None, false).pretty());
        let settings = self::settings("pretty = false");
        assert!(resolve_layers(&settings, None, true).pretty());
    }

    #[test]
    fn test_project_file_beats_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        fs::write(&path, "[plugins]\nsortAttrs = true").unwrap();

        let settings = settings("sortAttrs = false");
        let options = resolve_layers(&settings, Some(&path), false);
        assert!(options.plugin_enabled("sortAttrs"));
    }

    #[test]
    fn test_intent_beats_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        fs::write(&path, "[js2svg]\npretty = true").unwrap();

        let options = resolve_layers(&Settings::default(), Some(&path), false);
        assert!(!options.pretty());
    }

    #[test]
    fn test_missing_file_equals_no_root() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join(PROJECT_CONFIG_FILE);

        let settings = settings("removeViewBox = false");
        let with_missing = resolve_layers(&settings, Some(&absent), false);
        let without_root = resolve_layers(&settings, None, false);
        assert_eq!(with_missing, without_root);
    }

    #[test]
    fn test_malformed_file_falls_back_to_empty_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"[plugins\nnot toml at all").unwrap();

        let settings = settings("removeComments = false");
        let broken = resolve_layers(&settings, Some(&path), false);
        let empty = resolve_layers(&settings, None, false);
        assert_eq!(broken, empty);
    }

    #[test]
    fn test_load_project_file_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_project_file(&dir.path().join("nope.toml")).unwrap();
        assert!(loaded.is_none());
    }
}
