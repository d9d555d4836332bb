//! svged - SVG minify/prettify commands for editor hosts
//!
//! svged wires SVG optimization into any editor that can implement the
//! [`EditorHost`] trait: it resolves layered configuration, selects SVG
//! documents, runs an [`Optimizer`] and writes the result back as one
//! atomic edit. A built-in [`XmlEngine`] handles the structural toggles;
//! richer optimizers plug in through the same trait.

mod commands;
mod config;
mod engine;
mod error;
mod host;
mod options;
mod select;

pub use commands::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use host::*;
pub use options::*;
pub use select::*;

/// Minify an SVG string with the built-in engine and default options.
pub fn minify(svg: &str) -> Result<String, SvgedError> {
    run_builtin(svg, false)
}

/// Prettify an SVG string with the built-in engine and default options.
pub fn prettify(svg: &str) -> Result<String, SvgedError> {
    run_builtin(svg, true)
}

fn run_builtin(svg: &str, pretty: bool) -> Result<String, SvgedError> {
    let options = resolve_layers(&Settings::default(), None, pretty);
    XmlEngine.optimize(svg, &options)
}
