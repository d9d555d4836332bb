//! Document selection.

use crate::host::Document;

/// Language tag hosts assign to generic markup buffers.
pub const SVG_LANGUAGE_ID: &str = "xml";

/// True iff the document qualifies for SVG commands: tagged as generic
/// markup and named `*.svg`. Pure predicate, used for both the active
/// document and bulk filtering.
pub fn is_svg_document(document: &Document) -> bool {
    document.language_id == SVG_LANGUAGE_ID && document.file_name.ends_with(".svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DocumentId;

    fn doc(language_id: &str, file_name: &str) -> Document {
        Document {
            id: DocumentId(file_name.to_string()),
            language_id: language_id.to_string(),
            file_name: file_name.to_string(),
        }
    }

    #[test]
    fn test_accepts_xml_svg() {
        assert!(is_svg_document(&doc("xml", "icon.svg")));
        assert!(is_svg_document(&doc("xml", "assets/logo.svg")));
    }

    #[test]
    fn test_rejects_wrong_language() {
        assert!(!is_svg_document(&doc("svelte", "icon.svg")));
        assert!(!is_svg_document(&doc("rust", "icon.svg")));
    }

    #[test]
    fn test_rejects_wrong_extension() {
        assert!(!is_svg_document(&doc("xml", "icon.xml")));
        assert!(!is_svg_document(&doc("xml", "icon.svg.bak")));
        assert!(!is_svg_document(&doc("xml", "svg")));
    }
}
