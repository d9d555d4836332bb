//! Optimizer options and configuration-layer merging.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The default transformation toggles, in the order the optimizer runs them.
///
/// `removeTitle` and `removeViewBox` ship disabled: titles matter for
/// accessibility and a missing viewBox breaks CSS scaling.
pub const DEFAULT_PLUGINS: &[(&str, bool)] = &[
    ("cleanupAttrs", true),
    ("removeDoctype", true),
    ("removeXMLProcInst", true),
    ("removeComments", true),
    ("removeMetadata", true),
    ("removeTitle", false),
    ("removeDesc", true),
    ("removeUselessDefs", true),
    ("removeEditorsNSData", true),
    ("removeEmptyAttrs", true),
    ("removeHiddenElems", true),
    ("removeEmptyText", true),
    ("removeEmptyContainers", true),
    ("removeViewBox", false),
    ("cleanupEnableBackground", true),
    ("convertStyleToAttrs", true),
    ("convertColors", true),
    ("convertPathData", true),
    ("convertTransform", true),
    ("removeUnknownsAndDefaults", true),
    ("removeNonInheritableGroupAttrs", true),
    ("removeUselessStrokeAndFill", true),
    ("removeUnusedNS", true),
    ("cleanupIDs", true),
    ("cleanupNumericValues", true),
    ("moveElemsAttrsToGroup", true),
    ("moveGroupAttrsToElems", true),
    ("collapseGroups", true),
    ("mergePaths", true),
    ("convertShapeToPath", true),
    ("sortAttrs", true),
];

/// Serialization settings (`js2svg` on the optimizer surface).
///
/// All fields are optional so that a partially-specified layer only
/// overrides what it actually sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Js2Svg {
    /// Pretty-print with one element per line.
    pub pretty: Option<bool>,
    /// Indentation width in spaces when pretty-printing.
    pub indent: Option<u8>,
    /// Serialize childless elements as `<elem/>` instead of `<elem></elem>`.
    pub use_short_tags: Option<bool>,
}

impl Js2Svg {
    /// Overlay `other` onto `self`; set fields in `other` win.
    fn merged(self, other: Js2Svg) -> Js2Svg {
        Js2Svg {
            pretty: other.pretty.or(self.pretty),
            indent: other.indent.or(self.indent),
            use_short_tags: other.use_short_tags.or(self.use_short_tags),
        }
    }
}

/// A named transformation: on, off, or on with parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Switch(bool),
    Params(toml::value::Table),
}

impl Toggle {
    pub fn is_enabled(&self) -> bool {
        match self {
            Toggle::Switch(on) => *on,
            Toggle::Params(_) => true,
        }
    }
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Self {
        Toggle::Switch(on)
    }
}

/// A full set of optimizer options: one configuration layer, or the result
/// of merging several.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub js2svg: Js2Svg,
    pub plugins: BTreeMap<String, Toggle>,
}

impl Options {
    /// An empty layer: sets nothing, overrides nothing.
    pub fn empty() -> Options {
        Options::default()
    }

    /// The built-in defaults layer ([`DEFAULT_PLUGINS`], default serialization).
    pub fn builtin() -> Options {
        Options {
            js2svg: Js2Svg::default(),
            plugins: DEFAULT_PLUGINS
                .iter()
                .map(|&(name, on)| (name.to_string(), Toggle::Switch(on)))
                .collect(),
        }
    }

    /// Overlay `other` onto `self` and return the result.
    ///
    /// Key-by-key: scalar conflicts are replaced (never accumulated),
    /// nested parameter tables are merged recursively. Deterministic for
    /// any fixed sequence of layers.
    pub fn merged(mut self, other: Options) -> Options {
        self.js2svg = self.js2svg.merged(other.js2svg);
        for (name, toggle) in other.plugins {
            let merged = match (self.plugins.remove(&name), toggle) {
                (Some(Toggle::Params(mut base)), Toggle::Params(incoming)) => {
                    merge_tables(&mut base, incoming);
                    Toggle::Params(base)
                }
                (_, incoming) => incoming,
            };
            self.plugins.insert(name, merged);
        }
        self
    }

    /// Whether a named toggle is enabled in the resolved options.
    pub fn plugin_enabled(&self, name: &str) -> bool {
        self.plugins.get(name).is_some_and(Toggle::is_enabled)
    }

    /// Effective pretty flag (defaults off).
    pub fn pretty(&self) -> bool {
        self.js2svg.pretty.unwrap_or(false)
    }

    /// Effective indent width (defaults to 4 spaces).
    pub fn indent(&self) -> usize {
        usize::from(self.js2svg.indent.unwrap_or(4))
    }

    /// Effective short-tag flag (defaults on).
    pub fn use_short_tags(&self) -> bool {
        self.js2svg.use_short_tags.unwrap_or(true)
    }
}

fn merge_tables(base: &mut toml::value::Table, overlay: toml::value::Table) {
    for (key, value) in overlay {
        match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut existing)), toml::Value::Table(incoming)) => {
                merge_tables(&mut existing, incoming);
                base.insert(key, toml::Value::Table(existing));
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
