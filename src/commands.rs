//! Command dispatch and the apply pipeline.
//!
//! Single-document commands act on the active document and silently do
//! nothing when there is no active document or it is not an SVG buffer.
//! Bulk commands fan out one task per qualifying open document with no
//! ordering guarantee between them; errors are collected after every task
//! has settled so one bad document cannot block the others.

use crate::config;
use crate::engine::Optimizer;
use crate::error::SvgedError;
use crate::host::{Document, EditorHost};
use crate::options::Options;
use crate::select::is_svg_document;

/// The named actions exposed to the host's command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Minify,
    Prettify,
    MinifyAll,
    PrettifyAll,
}

impl Command {
    /// Identifier under which the host registers this command.
    pub fn name(self) -> &'static str {
        match self {
            Command::Minify => "minify",
            Command::Prettify => "prettify",
            Command::MinifyAll => "minify-all",
            Command::PrettifyAll => "prettify-all",
        }
    }

    fn pretty(self) -> bool {
        matches!(self, Command::Prettify | Command::PrettifyAll)
    }

    fn done_label(self) -> &'static str {
        if self.pretty() { "Prettified" } else { "Minified" }
    }

    fn is_bulk(self) -> bool {
        matches!(self, Command::MinifyAll | Command::PrettifyAll)
    }
}

/// Run one command invocation against a host.
pub async fn dispatch(
    host: &dyn EditorHost,
    optimizer: &dyn Optimizer,
    command: Command,
) -> Result<(), SvgedError> {
    if command.is_bulk() {
        run_all(host, optimizer, command).await
    } else {
        run_active(host, optimizer, command).await
    }
}

async fn run_active(
    host: &dyn EditorHost,
    optimizer: &dyn Optimizer,
    command: Command,
) -> Result<(), SvgedError> {
    let Some(document) = host.active_document() else {
        return Ok(());
    };
    if !is_svg_document(&document) {
        return Ok(());
    }
    let options = config::resolve(host, command.pretty());
    apply(host, optimizer, &document, &options, command.done_label()).await
}

async fn run_all(
    host: &dyn EditorHost,
    optimizer: &dyn Optimizer,
    command: Command,
) -> Result<(), SvgedError> {
    let options = config::resolve(host, command.pretty());
    let documents: Vec<Document> = host
        .open_documents()
        .into_iter()
        .filter(is_svg_document)
        .collect();

    let tasks = documents
        .iter()
        .map(|document| apply(host, optimizer, document, &options, command.done_label()));
    let results = futures::future::join_all(tasks).await;
    results.into_iter().collect()
}

/// Optimize one document and write the result back: text in, optimizer,
/// foreground, atomic replace, confirmation. An optimizer failure
/// propagates before any edit is made.
async fn apply(
    host: &dyn EditorHost,
    optimizer: &dyn Optimizer,
    document: &Document,
    options: &Options,
    done_label: &str,
) -> Result<(), SvgedError> {
    let text = host.document_text(&document.id)?;
    let optimized = optimizer.optimize(&text, options)?;
    host.show_document(&document.id).await?;
    host.set_text(&document.id, &optimized).await?;
    host.notify(&format!("{done_label} {}", document.file_name));
    log::debug!(
        "{} {}: {} -> {} bytes",
        done_label,
        document.file_name,
        text.len(),
        optimized.len()
    );
    Ok(())
}
