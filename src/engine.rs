//! The optimizer contract and the built-in XML engine.
//!
//! [`XmlEngine`] covers the structural side of optimization: it parses the
//! document, applies the toggles it understands (comment/metadata/doctype
//! removal, empty-container pruning, group collapsing, attribute sorting)
//! and re-serializes honoring the `js2svg` settings. Toggles it does not
//! know (path data, colors, transforms) are accepted and ignored; those
//! belong to richer [`Optimizer`] implementations.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::SvgedError;
use crate::options::Options;

/// External optimizer contract: text in, optimized text out. Errors on
/// malformed input; never partially succeeds.
pub trait Optimizer {
    fn optimize(&self, text: &str, options: &Options) -> Result<String, SvgedError>;
}

/// Built-in structural engine over quick-xml.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlEngine;

impl Optimizer for XmlEngine {
    fn optimize(&self, text: &str, options: &Options) -> Result<String, SvgedError> {
        let mut doc = parse(text)?;
        apply_plugins(&mut doc, options);
        Ok(serialize(&doc, options))
    }
}

struct SvgDocument {
    /// Rendered XML declaration, e.g. `<?xml version="1.0"?>`.
    xml_decl: Option<String>,
    /// DOCTYPE body without the `<!DOCTYPE`/`>` framing.
    doctype: Option<String>,
    root: XmlElement,
}

struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    CData(String),
    Pi(String),
}

impl XmlElement {
    fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    fn is_container(&self) -> bool {
        matches!(self.local_name(), "g" | "defs" | "a" | "symbol" | "marker" | "mask" | "pattern")
    }

    fn has_content(&self) -> bool {
        self.children.iter().any(|node| match node {
            XmlNode::Text(text) => !text.trim().is_empty(),
            _ => true,
        })
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn name_prefix(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

// ---------------------------------------------------------------------------
// parsing

fn parse(text: &str) -> Result<SvgDocument, SvgedError> {
    let mut reader = Reader::from_str(text);

    let mut xml_decl = None;
    let mut doctype = None;
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Decl(decl) => {
                let mut rendered = String::from("<?xml version=\"");
                rendered.push_str(&String::from_utf8_lossy(decl.version()?.as_ref()));
                rendered.push('"');
                if let Some(encoding) = decl.encoding().transpose()? {
                    rendered.push_str(" encoding=\"");
                    rendered.push_str(&String::from_utf8_lossy(encoding.as_ref()));
                    rendered.push('"');
                }
                if let Some(standalone) = decl.standalone().transpose()? {
                    rendered.push_str(" standalone=\"");
                    rendered.push_str(&String::from_utf8_lossy(standalone.as_ref()));
                    rendered.push('"');
                }
                rendered.push_str("?>");
                xml_decl = Some(rendered);
            }
            Event::DocType(dt) => {
                doctype = Some(String::from_utf8_lossy(&dt).into_owned());
            }
            Event::Start(start) => {
                let mut element = open_element(&start)?;
                read_children(&mut reader, &mut element)?;
                root = Some(element);
                break;
            }
            Event::Empty(start) => {
                root = Some(open_element(&start)?);
                break;
            }
            Event::Eof => break,
            // comments, whitespace and PIs before the root are dropped
            _ => {}
        }
    }

    let root = root.ok_or_else(|| SvgedError::InvalidSvg("no root element".into()))?;
    if root.local_name() != "svg" {
        return Err(SvgedError::InvalidSvg(format!(
            "root element is <{}>, expected <svg>",
            root.name
        )));
    }

    Ok(SvgDocument {
        xml_decl,
        doctype,
        root,
    })
}

fn read_children(reader: &mut Reader<&[u8]>, element: &mut XmlElement) -> Result<(), SvgedError> {
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let mut child = open_element(&start)?;
                read_children(reader, &mut child)?;
                element.children.push(XmlNode::Element(child));
            }
            Event::Empty(start) => {
                element.children.push(XmlNode::Element(open_element(&start)?));
            }
            Event::End(_) => break,
            Event::Text(text) => {
                element
                    .children
                    .push(XmlNode::Text(text.unescape()?.into_owned()));
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(XmlNode::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(XmlNode::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                element
                    .children
                    .push(XmlNode::Pi(String::from_utf8_lossy(&pi).into_owned()));
            }
            Event::Eof => {
                return Err(SvgedError::InvalidSvg(format!(
                    "unexpected end of input inside <{}>",
                    element.name
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn open_element(start: &BytesStart) -> Result<XmlElement, SvgedError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| SvgedError::InvalidSvg(format!("bad attribute: {err}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// structural toggles

fn apply_plugins(doc: &mut SvgDocument, options: &Options) {
    if options.plugin_enabled("removeXMLProcInst") {
        doc.xml_decl = None;
    }
    if options.plugin_enabled("removeDoctype") {
        doc.doctype = None;
    }
    if options.plugin_enabled("removeComments") {
        remove_comments(&mut doc.root);
    }
    if options.plugin_enabled("removeMetadata") {
        remove_named(&mut doc.root, "metadata");
    }
    if options.plugin_enabled("removeTitle") {
        remove_named(&mut doc.root, "title");
    }
    if options.plugin_enabled("removeDesc") {
        remove_named(&mut doc.root, "desc");
    }
    if options.plugin_enabled("removeEditorsNSData") {
        remove_editor_ns_data(&mut doc.root);
    }
    if options.plugin_enabled("collapseGroups") {
        collapse_groups(&mut doc.root);
    }
    if options.plugin_enabled("removeEmptyContainers") {
        remove_empty_containers(&mut doc.root);
    }
    if options.plugin_enabled("sortAttrs") {
        sort_attrs(&mut doc.root);
    }
}

fn remove_comments(element: &mut XmlElement) {
    element.children.retain(|node| !matches!(node, XmlNode::Comment(_)));
    for child in child_elements_mut(element) {
        remove_comments(child);
    }
}

/// Remove all descendant elements with the given local name.
fn remove_named(element: &mut XmlElement, name: &str) {
    element.children.retain(|node| match node {
        XmlNode::Element(child) => child.local_name() != name,
        _ => true,
    });
    for child in child_elements_mut(element) {
        remove_named(child, name);
    }
}

/// Drop elements, attributes and namespace declarations left behind by
/// vector editors (inkscape:*, sodipodi:*).
fn remove_editor_ns_data(element: &mut XmlElement) {
    const EDITOR_PREFIXES: &[&str] = &["inkscape", "sodipodi"];

    element.children.retain(|node| match node {
        XmlNode::Element(child) => {
            !name_prefix(&child.name).is_some_and(|p| EDITOR_PREFIXES.contains(&p))
        }
        _ => true,
    });
    element.attrs.retain(|(key, _)| {
        let prefix = name_prefix(key);
        let is_editor_attr = prefix.is_some_and(|p| EDITOR_PREFIXES.contains(&p));
        let is_editor_xmlns =
            prefix == Some("xmlns") && EDITOR_PREFIXES.contains(&local_part(key));
        !is_editor_attr && !is_editor_xmlns
    });
    for child in child_elements_mut(element) {
        remove_editor_ns_data(child);
    }
}

/// Hoist children of attribute-less `<g>` wrappers into the parent.
fn collapse_groups(element: &mut XmlElement) {
    for child in child_elements_mut(element) {
        collapse_groups(child);
    }

    let mut collapsed = Vec::with_capacity(element.children.len());
    for node in element.children.drain(..) {
        match node {
            XmlNode::Element(child) if child.local_name() == "g" && child.attrs.is_empty() => {
                collapsed.extend(child.children);
            }
            other => collapsed.push(other),
        }
    }
    element.children = collapsed;
}

/// Remove container elements with no meaningful content, bottom-up so that
/// nested empty containers disappear in one pass.
fn remove_empty_containers(element: &mut XmlElement) {
    for child in child_elements_mut(element) {
        remove_empty_containers(child);
    }
    element.children.retain(|node| match node {
        XmlNode::Element(child) => !(child.is_container() && !child.has_content()),
        _ => true,
    });
}

/// Sort attributes: xmlns declarations first, then alphabetically.
fn sort_attrs(element: &mut XmlElement) {
    element.attrs.sort_by(|(a, _), (b, _)| {
        let a_xmlns = a == "xmlns" || name_prefix(a) == Some("xmlns");
        let b_xmlns = b == "xmlns" || name_prefix(b) == Some("xmlns");
        match (a_xmlns, b_xmlns) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.cmp(b),
        }
    });
    for child in child_elements_mut(element) {
        sort_attrs(child);
    }
}

fn child_elements_mut(element: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    element.children.iter_mut().filter_map(|node| match node {
        XmlNode::Element(child) => Some(child),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// serialization

fn serialize(doc: &SvgDocument, options: &Options) -> String {
    let pretty = options.pretty();
    let mut out = String::new();

    if let Some(decl) = &doc.xml_decl {
        out.push_str(decl);
        if pretty {
            out.push('\n');
        }
    }
    if let Some(doctype) = &doc.doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(doctype);
        out.push('>');
        if pretty {
            out.push('\n');
        }
    }

    write_element(&mut out, &doc.root, options, 0);
    if pretty {
        out.push('\n');
    }
    out
}

fn write_element(out: &mut String, element: &XmlElement, options: &Options, depth: usize) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }

    if !element.has_content() {
        if options.use_short_tags() {
            out.push_str("/>");
        } else {
            out.push_str("></");
            out.push_str(&element.name);
            out.push('>');
        }
        return;
    }

    out.push('>');

    // Text-only elements stay on one line even when pretty-printing.
    let inline = options.pretty()
        && element
            .children
            .iter()
            .all(|node| matches!(node, XmlNode::Text(_)));

    if options.pretty() && !inline {
        let pad = " ".repeat(options.indent() * (depth + 1));
        for node in &element.children {
            if node_is_blank(node) {
                continue;
            }
            out.push('\n');
            out.push_str(&pad);
            write_node(out, node, options, depth + 1);
        }
        out.push('\n');
        out.push_str(&" ".repeat(options.indent() * depth));
    } else {
        for node in &element.children {
            if node_is_blank(node) {
                continue;
            }
            write_node(out, node, options, depth);
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_node(out: &mut String, node: &XmlNode, options: &Options, depth: usize) {
    match node {
        XmlNode::Element(element) => write_element(out, element, options, depth),
        XmlNode::Text(text) => escape_into(out, text.trim(), false),
        XmlNode::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        XmlNode::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        XmlNode::Pi(pi) => {
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>");
        }
    }
}

fn node_is_blank(node: &XmlNode) -> bool {
    matches!(node, XmlNode::Text(text) if text.trim().is_empty())
}

fn escape_into(out: &mut String, value: &str, in_attr: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
