//! HTML5 parser entry points
//!
//! Runs html5ever with [`DomSink`] so documents and fragments are built
//! directly in a mock-dom arena.

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{LocalName, Namespace as HtmlNamespace, ParseOpts, QualName, parse_document, parse_fragment};
use mock_dom::{CallbackMode, Document, NodeData, NodeId};

use crate::ParseError;
use crate::sink::DomSink;

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat `<noscript>` content as raw text, as a scripting browser does
    pub scripting_enabled: bool,
    /// Record the source line of every element the parser creates
    pub source_locations: bool,
    /// Tag name of the context element for fragment parsing
    pub fragment_context: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            source_locations: false,
            fragment_context: "body".to_string(),
        }
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn html5ever_options(&self) -> ParseOpts {
        ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: self.options.scripting_enabled,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse a full document into a fresh arena
    pub fn parse(&self, html: &str) -> Document {
        let mut doc = Document::empty();
        self.build_document(&mut doc, html);
        doc
    }

    /// Replace the content of `doc` with the parsed document. Custom
    /// elements in the new tree see their connect callbacks once parsing is
    /// complete.
    pub fn parse_into(&self, doc: &mut Document, html: &str) -> Result<(), ParseError> {
        for child in doc.child_nodes(NodeId::ROOT).to_vec() {
            doc.remove_child(NodeId::ROOT, child)?;
        }
        doc.set_quirks_mode(Default::default());
        self.build_document(doc, html);
        doc.connect_all();
        Ok(())
    }

    fn build_document(&self, doc: &mut Document, html: &str) {
        tracing::debug!(bytes = html.len(), "parsing HTML document");
        let first = doc.len();
        let sink = DomSink::new(doc, NodeId::ROOT, self.options.source_locations);
        let errors = parse_document(sink, self.html5ever_options()).one(html);
        tracing::debug!(nodes = doc.len() - first, errors, "parsed HTML document");
    }

    /// Parse `html` as the children of a context element named by
    /// [`ParseOptions::fragment_context`]. The result is a detached
    /// fragment owned by `doc`.
    pub fn parse_fragment(&self, doc: &mut Document, html: &str) -> Result<NodeId, ParseError> {
        let context = self.options.fragment_context.clone();
        self.fragment_in_context(doc, html, &context)
    }

    fn fragment_in_context(&self, doc: &mut Document, html: &str, context: &str) -> Result<NodeId, ParseError> {
        let holder = doc.create_document_fragment();
        let sink = DomSink::new(doc, holder, self.options.source_locations);
        let context_name = QualName::new(
            None,
            HtmlNamespace::from(mock_dom::Namespace::HTML_URI),
            LocalName::from(context.to_ascii_lowercase()),
        );
        let errors = parse_fragment(
            sink,
            self.html5ever_options(),
            context_name,
            Vec::new(),
            self.options.scripting_enabled,
        )
        .one(html);

        // The tree builder wraps fragment content in an <html> element
        let wrapper = doc.first_element_child(holder).ok_or(ParseError::MissingFragmentRoot)?;
        for child in doc.child_nodes(wrapper).to_vec() {
            doc.append_child_with(holder, child, CallbackMode::Suppressed)?;
        }
        doc.remove_child_with(holder, wrapper, CallbackMode::Suppressed)?;
        tracing::debug!(
            context,
            nodes = doc.descendants(holder).len(),
            errors,
            "parsed HTML fragment"
        );
        Ok(holder)
    }

    /// `element.innerHTML = html`: replace the children of `target` (the
    /// content fragment for templates) with the parsed fragment
    pub fn set_inner_html(&self, doc: &mut Document, target: NodeId, html: &str) -> Result<(), ParseError> {
        let (container, context) = match doc.node(target).map(|node| node.data()) {
            Some(NodeData::Element(el)) => match el.template_content() {
                Some(content) => (content, "template".to_string()),
                None => (target, el.local_name().to_string()),
            },
            Some(NodeData::DocumentFragment(_)) => (target, self.options.fragment_context.clone()),
            _ => return Err(ParseError::InvalidTarget(target)),
        };
        let fragment = self.fragment_in_context(doc, html, &context)?;
        for child in doc.child_nodes(container).to_vec() {
            doc.remove_child(container, child)?;
        }
        doc.append_child(container, fragment)?;
        Ok(())
    }
}

/// Parse a full document with default options
pub fn parse_html_to_document(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse into an existing document, replacing its content
pub fn parse_html_into(doc: &mut Document, html: &str) -> Result<(), ParseError> {
    HtmlParser::new().parse_into(doc, html)
}

/// Parse a `<body>`-context fragment owned by `doc`
pub fn parse_html_to_fragment(doc: &mut Document, html: &str) -> Result<NodeId, ParseError> {
    HtmlParser::new().parse_fragment(doc, html)
}

/// `innerHTML` setter for [`Document`]
pub trait InnerHtml {
    fn set_inner_html(&mut self, target: NodeId, html: &str) -> Result<(), ParseError>;
}

impl InnerHtml for Document {
    fn set_inner_html(&mut self, target: NodeId, html: &str) -> Result<(), ParseError> {
        HtmlParser::new().set_inner_html(self, target, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_dom::{NodeType, QuirksMode};

    #[test]
    fn test_parse_minimal_html() {
        let doc = parse_html_to_document("");
        assert!(doc.document_element().is_some(), "even empty HTML gets html/head/body");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.quirks_mode(), QuirksMode::Quirks);
    }

    #[test]
    fn test_doctype_and_quirks() {
        let doc = parse_html_to_document("<!DOCTYPE html><title>Hi</title>");
        let doctype = doc.doctype().unwrap();
        assert_eq!(doc.node(doctype).unwrap().node_type(), NodeType::DocumentType);
        assert_eq!(doc.quirks_mode(), QuirksMode::NoQuirks);
        assert_eq!(doc.compat_mode(), "CSS1Compat");
        assert_eq!(doc.title(), "Hi");
    }

    #[test]
    fn test_text_is_merged() {
        let doc = parse_html_to_document("<p>a&amp;b</p>");
        let p = doc.query_selector(NodeId::ROOT, "p").unwrap().unwrap();
        assert_eq!(doc.child_nodes(p).len(), 1);
        assert_eq!(doc.text_content(p).as_deref(), Some("a&b"));
    }

    #[test]
    fn test_source_locations() {
        let parser = HtmlParser::with_options(ParseOptions {
            source_locations: true,
            ..ParseOptions::default()
        });
        let doc = parser.parse("<!DOCTYPE html>\n<body>\n<p>one</p>\n<p>two</p>");
        let lines: Vec<Option<u64>> = doc
            .get_elements_by_tag_name(NodeId::ROOT, "p")
            .into_iter()
            .map(|p| doc.node(p).unwrap().source_line())
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(Option::is_some));
        assert!(lines[0] < lines[1]);
    }

    #[test]
    fn test_fragment_is_detached() {
        let mut doc = Document::new();
        let fragment = parse_html_to_fragment(&mut doc, "<b>x</b>tail").unwrap();
        assert_eq!(doc.parent_node(fragment), None);
        assert_eq!(doc.child_nodes(fragment).len(), 2);
        assert!(!doc.is_connected(fragment));
    }

    #[test]
    fn test_set_inner_html_rejects_text() {
        let mut doc = Document::new();
        let text = doc.create_text_node("x");
        assert!(matches!(
            doc.set_inner_html(text, "<b></b>"),
            Err(ParseError::InvalidTarget(_))
        ));
    }
}
