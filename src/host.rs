//! Editor host abstraction.
//!
//! The host owns every piece of mutable state: which documents are open,
//! which one is active, and the document text itself. This crate only reads
//! descriptors and asks the host to replace text, so command logic stays
//! testable without a real editor behind it.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::{PROJECT_CONFIG_FILE, Settings};
use crate::error::SvgedError;

/// Host-assigned identifier for an open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Descriptor for an open document: identity plus the attributes the
/// selector needs. The text lives with the host, not here.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    /// Language tag the host assigned to the buffer (e.g. `xml`).
    pub language_id: String,
    /// Full file name, extension included.
    pub file_name: String,
}

/// The editor runtime this crate runs inside.
///
/// Replacement and focus changes are suspension points; reads are plain
/// calls. Implementations decide what "foreground" and "notification" mean
/// for their surface (a CLI host may treat both as no-ops).
#[async_trait(?Send)]
pub trait EditorHost {
    /// The document with focus, if any.
    fn active_document(&self) -> Option<Document>;

    /// Every currently open document.
    fn open_documents(&self) -> Vec<Document>;

    /// Full current text of a document.
    fn document_text(&self, id: &DocumentId) -> Result<String, SvgedError>;

    /// First workspace root, if a workspace is open.
    fn workspace_root(&self) -> Option<PathBuf>;

    /// The host's persisted settings for this crate's section.
    fn configuration(&self) -> Settings;

    /// Where to look for the project config file. Defaults to the fixed
    /// relative path under the first workspace root.
    fn project_config_path(&self) -> Option<PathBuf> {
        self.workspace_root().map(|root| root.join(PROJECT_CONFIG_FILE))
    }

    /// Bring a document to the foreground if it is not already there.
    async fn show_document(&self, id: &DocumentId) -> Result<(), SvgedError>;

    /// Replace the document's entire content as one atomic edit, preserving
    /// cursor and scroll position where feasible.
    async fn set_text(&self, id: &DocumentId, text: &str) -> Result<(), SvgedError>;

    /// Show a brief confirmation message to the user.
    fn notify(&self, message: &str);
}
