//! HTML Serializer
//!
//! Renders a subtree back to HTML text. With default options the output
//! reparses to the same tree; the remaining switches trade fidelity for
//! smaller or prettier markup.

use serde::{Deserialize, Serialize};

use crate::node::{FragmentData, NodeData};
use crate::{Document, ElementData, Namespace, NodeId};

/// Elements that never have children or an end tag
const EMPTY_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "image", "img", "input",
    "keygen", "link", "meta", "param", "source", "trace", "track", "wbr",
];

/// The parser drops a newline right after these start tags
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Attributes dropped when empty under `remove_empty_attributes`
const REMOVE_EMPTY_ATTR: &[&str] = &["class", "dir", "id", "lang", "name", "title"];

const BOOLEAN_ATTR: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "compact", "controls", "declare", "default",
    "defaultchecked", "defaultmuted", "defaultselected", "defer", "disabled", "enabled", "formnovalidate",
    "hidden", "indeterminate", "inert", "ismap", "itemscope", "loop", "multiple", "muted", "nohref", "nomodule",
    "noresize", "noshade", "novalidate", "nowrap", "open", "pauseonexit", "readonly", "required", "reversed",
    "scoped", "seamless", "selected", "sortable", "truespeed", "typemustmatch", "visible",
];

/// Text inside these is never re-indented or collapsed
const WHITESPACE_SENSITIVE: &[&str] = &["pre", "code", "script", "style", "template", "textarea", "output", "plaintext"];

/// Text inside these is emitted without entity escaping
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "iframe", "noscript", "xmp", "noembed", "noframes", "plaintext"];

/// Elements followed by a line break when line wrapping is on
const STRUCTURE_ELEMENTS: &[&str] = &["html", "body", "head", "iframe", "meta", "link", "base", "title", "script", "style"];

/// Comment prefixes of hydration annotations; `remove_html_comments` keeps these
const ANNOTATION_PREFIXES: &[&str] = &["r.", "o.", "s.", "t.", "c."];

const SHADOW_ROOT_TAG: &str = "mock:shadow-root";

/// Serializer switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializeOptions {
    /// Include the node itself, not only its children
    pub outer_html: bool,
    /// Sort attributes and class tokens, collapse text runs
    pub pretty_html: bool,
    pub indent_spaces: usize,
    pub new_lines: bool,
    /// Collapse leading/trailing whitespace runs of text outside
    /// whitespace-sensitive elements
    pub collapse_whitespace: bool,
    /// Wrap attributes and text past this width
    pub approximate_line_width: Option<usize>,
    pub remove_empty_attributes: bool,
    pub remove_attribute_quotes: bool,
    pub remove_boolean_attribute_quotes: bool,
    pub remove_html_comments: bool,
    /// Render the element's shadow root inline as `<mock:shadow-root>`
    pub serialize_shadow_root: bool,
    /// Tags whose start/end tags are dropped (children still render)
    pub exclude_tags: Vec<String>,
    /// Tags whose children are dropped
    pub exclude_tag_content: Vec<String>,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            outer_html: false,
            pretty_html: false,
            indent_spaces: 0,
            new_lines: false,
            collapse_whitespace: true,
            approximate_line_width: None,
            remove_empty_attributes: false,
            remove_attribute_quotes: false,
            remove_boolean_attribute_quotes: false,
            remove_html_comments: false,
            serialize_shadow_root: false,
            exclude_tags: Vec::new(),
            exclude_tag_content: Vec::new(),
        }
    }
}

impl SerializeOptions {
    /// Indented, one node per line
    pub fn pretty() -> Self {
        Self {
            pretty_html: true,
            indent_spaces: 2,
            new_lines: true,
            ..Self::default()
        }
    }

    fn line_width(&self) -> Option<usize> {
        if self.pretty_html {
            return None;
        }
        self.approximate_line_width.filter(|&width| width > 0)
    }

    fn formats(&self) -> bool {
        self.new_lines || self.indent_spaces > 0
    }

    /// Any switch that adds layout whitespace of its own
    fn reflows(&self) -> bool {
        self.pretty_html || self.formats() || self.line_width().is_some()
    }
}

/// Serialize `node` (or only its children, unless `outer_html`) to HTML
pub fn serialize_node_to_html(doc: &Document, node: NodeId, options: &SerializeOptions) -> String {
    let mut serializer = Serializer {
        doc,
        options,
        out: String::new(),
        indent: 0,
        line_width: 0,
        within_body: false,
    };

    let is_document = matches!(doc.node(node).map(|n| n.data()), Some(NodeData::Document));
    if options.outer_html && !is_document {
        serializer.node(node);
    } else {
        for child in serializer.content_children(node) {
            serializer.node(child);
        }
    }

    let mut text = serializer.out;
    if options.reflows() {
        if text.ends_with('\n') {
            text.pop();
        }
        if text.starts_with('\n') {
            text.remove(0);
        }
    }
    text
}

struct Serializer<'a> {
    doc: &'a Document,
    options: &'a SerializeOptions,
    out: String,
    indent: usize,
    line_width: usize,
    within_body: bool,
}

impl Serializer<'_> {
    fn node(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(node) = doc.node(id) else {
            return;
        };
        match node.data() {
            NodeData::Element(el) => self.element(id, el),
            NodeData::Text(text) => self.text(id, text),
            NodeData::Comment(comment) => self.comment(id, comment),
            NodeData::DocumentType(_) => self.out.push_str("<!doctype html>"),
            NodeData::Document | NodeData::DocumentFragment(_) => {
                for child in self.content_children(id) {
                    self.node(child);
                }
            }
        }
    }

    /// Children to render: template elements render their content fragment
    fn content_children(&self, id: NodeId) -> Vec<NodeId> {
        let source = self
            .doc
            .element_data(id)
            .and_then(ElementData::template_content)
            .unwrap_or(id);
        self.doc.child_nodes(source).to_vec()
    }

    fn element(&mut self, id: NodeId, el: &ElementData) {
        let tag = el.local_name().to_string();
        self.open_and_children(id, Some(el), &tag);
    }

    fn shadow_root(&mut self, fragment: NodeId) {
        self.open_and_children(fragment, None, SHADOW_ROOT_TAG);
    }

    /// Shared element path; `el` is `None` for the synthetic shadow root wrapper
    fn open_and_children(&mut self, id: NodeId, el: Option<&ElementData>, tag: &str) {
        let options = self.options;
        if tag == "body" {
            self.within_body = true;
        }
        let ignore_tag = options.exclude_tags.iter().any(|t| t == tag);

        if !ignore_tag {
            let sensitive = options.formats() && self.within_whitespace_sensitive(id);
            if !sensitive {
                self.break_line();
                self.write_indent();
            }
            self.out.push('<');
            self.out.push_str(tag);
            self.line_width += tag.len() + 1;
            if let Some(el) = el {
                self.attributes(el);
            }
            self.out.push('>');
            if el.is_some_and(|el| el.is_html() && LEADING_NEWLINE_ELEMENTS.contains(&tag))
                && self.starts_with_newline(id)
            {
                self.out.push('\n');
                self.line_width = 0;
            }
        }

        let void = el.is_some_and(|el| el.is_html() && EMPTY_ELEMENTS.contains(&tag));
        if !void {
            if options.serialize_shadow_root
                && let Some(shadow) = el.and_then(ElementData::shadow_root)
            {
                self.indent += options.indent_spaces;
                self.shadow_root(shadow);
                self.indent -= options.indent_spaces;
                if options.new_lines && self.only_blank_children(id) {
                    self.out.push('\n');
                    self.line_width = 0;
                    self.write_indent();
                }
            }

            if !options.exclude_tag_content.iter().any(|t| t == tag) {
                let children = self.content_children(id);
                let keep_blank = self.within_whitespace_sensitive(id);
                if !children.is_empty() && (keep_blank || !self.only_blank_children(id)) {
                    let sensitive = options.formats() && self.within_whitespace_sensitive(id);
                    let formatted = !sensitive && !ignore_tag;
                    if formatted {
                        self.indent += options.indent_spaces;
                    }
                    for child in children {
                        self.node(child);
                    }
                    if formatted {
                        self.indent -= options.indent_spaces;
                        self.break_line();
                        self.write_indent();
                    }
                }
                if !ignore_tag {
                    self.out.push_str("</");
                    self.out.push_str(tag);
                    self.out.push('>');
                }
            }
        }

        if options.line_width().is_some() && STRUCTURE_ELEMENTS.contains(&tag) {
            self.out.push('\n');
            self.line_width = 0;
        }
        if tag == "body" {
            self.within_body = false;
        }
    }

    fn attributes(&mut self, el: &ElementData) {
        let options = self.options;
        let mut attrs: Vec<_> = el.attributes().iter().collect();
        if options.pretty_html {
            attrs.sort_by(|a, b| a.name().cmp(b.name()));
        }

        for attr in attrs {
            let name = attr.name();
            let mut value = attr.value().to_string();
            if options.remove_empty_attributes && value.is_empty() && REMOVE_EMPTY_ATTR.contains(&name) {
                continue;
            }

            let qualified = match attr.namespace() {
                None | Some(Namespace::Html) => name.to_string(),
                Some(Namespace::Xml) => format!("xml:{name}"),
                Some(Namespace::Xmlns) if name == "xmlns" => name.to_string(),
                Some(Namespace::Xmlns) => format!("xmlns:{name}"),
                Some(Namespace::XLink) => format!("xlink:{name}"),
                Some(other) => format!("{}:{name}", other.uri()),
            };
            self.attribute_separator(qualified.len() + 1);
            self.out.push_str(&qualified);

            if options.pretty_html && name == "class" {
                let mut tokens: Vec<&str> = value.split_ascii_whitespace().collect();
                tokens.sort_unstable();
                value = tokens.join(" ");
            }
            if value.is_empty() {
                if options.remove_boolean_attribute_quotes && BOOLEAN_ATTR.contains(&name) {
                    continue;
                }
                if options.remove_empty_attributes && name.starts_with("data-") {
                    continue;
                }
            }
            self.attribute_value(&value);
        }

        if let Some(style) = el.style() {
            self.attribute_separator(6);
            self.out.push_str("style");
            self.attribute_value(&style.css_text());
        }
    }

    fn attribute_separator(&mut self, width: usize) {
        self.line_width += width;
        match self.options.line_width() {
            Some(max) if self.line_width > max => {
                self.out.push('\n');
                self.line_width = self.indent + self.options.indent_spaces;
                self.push_spaces(self.line_width);
            }
            _ => self.out.push(' '),
        }
    }

    fn attribute_value(&mut self, value: &str) {
        let escaped = escape(value, true);
        self.line_width += escaped.len() + 3;
        if self.options.remove_attribute_quotes && can_remove_quotes(value) {
            self.out.push('=');
            self.out.push_str(&escaped);
        } else {
            self.out.push_str("=\"");
            self.out.push_str(&escaped);
            self.out.push('"');
        }
    }

    fn text(&mut self, id: NodeId, text: &str) {
        let options = self.options;
        let trimmed = trim_ascii_whitespace(text);

        if trimmed.is_empty() {
            if self.within_whitespace_sensitive(id) {
                self.out.push_str(text);
                self.line_width += text.len();
            } else if options.line_width().is_some() && !self.within_body {
                // layout whitespace outside <body>
            } else if !options.pretty_html {
                self.line_width += 1;
                match options.line_width() {
                    Some(max) if self.line_width > max => {
                        self.out.push('\n');
                        self.line_width = 0;
                    }
                    _ if options.collapse_whitespace => self.out.push(' '),
                    _ => self.out.push_str(text),
                }
            }
            return;
        }

        let sensitive = self.within_whitespace_sensitive(id);
        if options.formats() && !sensitive {
            self.break_line();
            self.write_indent();
        }

        let raw_parent = self
            .doc
            .parent_node(id)
            .and_then(|parent| self.doc.element_data(parent))
            .is_some_and(|parent| RAW_TEXT_ELEMENTS.contains(&parent.local_name()));
        if raw_parent {
            let raw = if sensitive { text } else { trimmed };
            self.out.push_str(raw);
            self.line_width += raw.len();
            return;
        }

        if sensitive {
            self.push_text(&escape(text, false));
        } else if options.pretty_html {
            let collapsed = trimmed.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
            self.push_text(&escape(&collapsed, false));
        } else if let Some(max) = options.line_width() {
            self.wrap_words(text, max);
        } else if options.collapse_whitespace {
            self.push_text(&escape(&collapse_edges(text), false));
        } else {
            self.push_text(&escape(text, false));
        }
    }

    fn wrap_words(&mut self, text: &str, max: usize) {
        if text.starts_with(|c: char| c.is_ascii_whitespace()) {
            self.out.push(' ');
            self.line_width += 1;
        }
        let mut words = text.split_ascii_whitespace().peekable();
        while let Some(word) = words.next() {
            let word = escape(word, false);
            if self.line_width + word.len() > max && self.line_width > 0 {
                self.out.push('\n');
                self.line_width = 0;
            }
            self.push_text(&word);
            if words.peek().is_some() {
                self.out.push(' ');
                self.line_width += 1;
            }
        }
        if text.ends_with(|c: char| c.is_ascii_whitespace()) {
            self.out.push(' ');
            self.line_width += 1;
        }
    }

    fn comment(&mut self, id: NodeId, comment: &str) {
        if self.options.remove_html_comments && !ANNOTATION_PREFIXES.iter().any(|p| comment.starts_with(p)) {
            return;
        }
        if self.options.formats() && !self.within_whitespace_sensitive(id) {
            self.break_line();
            self.write_indent();
        }
        self.out.push_str("<!--");
        self.out.push_str(comment);
        self.out.push_str("-->");
        self.line_width += comment.len() + 7;
    }

    /// Element has no children besides a single whitespace-only text node
    fn only_blank_children(&self, id: NodeId) -> bool {
        match self.content_children(id).as_slice() {
            [] => true,
            [only] => self
                .doc
                .node(*only)
                .and_then(|node| node.as_text())
                .is_some_and(|text| trim_ascii_whitespace(text).is_empty()),
            _ => false,
        }
    }

    fn starts_with_newline(&self, id: NodeId) -> bool {
        self.content_children(id)
            .first()
            .and_then(|&first| self.doc.node(first))
            .and_then(|node| node.as_text())
            .is_some_and(|text| text.starts_with('\n'))
    }

    /// Inclusive ancestor walk; template contents count as inside their template
    fn within_whitespace_sensitive(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.doc.node(node_id) else {
                return false;
            };
            match node.data() {
                NodeData::Element(el) if WHITESPACE_SENSITIVE.contains(&el.local_name()) => return true,
                NodeData::DocumentFragment(FragmentData { template: Some(template), .. }) => {
                    current = Some(*template);
                    continue;
                }
                _ => {}
            }
            current = node.parent();
        }
        false
    }

    fn break_line(&mut self) {
        if self.options.new_lines && !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
            self.line_width = 0;
        }
    }

    fn write_indent(&mut self) {
        if self.options.indent_spaces > 0 {
            self.push_spaces(self.indent);
            self.line_width += self.indent;
        }
    }

    fn push_spaces(&mut self, count: usize) {
        self.out.extend(std::iter::repeat_n(' ', count));
    }

    fn push_text(&mut self, text: &str) {
        self.out.push_str(text);
        self.line_width += text.len();
    }
}

/// `&` and NBSP always; `"` in attributes, `<`/`>` in text
fn escape(value: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Bare attribute token: non-empty, no whitespace, quotes, `=<>` backtick, slashes or hyphens
fn can_remove_quotes(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, ' ' | '\t' | '\n' | '\u{c}' | '\r' | '"' | '\'' | '`' | '=' | '<' | '>' | '/' | '\\' | '-'))
}

/// Unlike `str::trim`, keeps NBSP
fn trim_ascii_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Leading and trailing whitespace runs become a single space each
fn collapse_edges(text: &str) -> String {
    let start = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let mut out = String::with_capacity(text.len());
    if start.len() < text.len() {
        out.push(' ');
    }
    let core = start.trim_end_matches(|c: char| c.is_ascii_whitespace());
    out.push_str(core);
    if core.len() < start.len() {
        out.push(' ');
    }
    out
}
