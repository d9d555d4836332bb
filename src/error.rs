use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgedError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Failed to load config {0}: {1}")]
    ConfigLoad(PathBuf, String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::events::attributes::AttrError> for SvgedError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        SvgedError::XmlParse(e.into())
    }
}
