//! DOM Node types
//!
//! Every node lives in its document's arena. `Node` carries the tree links
//! shared by all kinds; `NodeData` holds the per-kind payload.

use crate::{AttributeMap, CssStyleDeclaration, ElementKind, EventListener, Namespace, NodeId};

/// `nodeType` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
}

/// A node in the document arena
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
    pub(crate) listeners: Vec<ListenerEntry>,
    /// Source line recorded by the parser, when enabled
    pub(crate) source_line: Option<u64>,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
            listeners: Vec::new(),
            source_line: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids (`childNodes`)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn source_line(&self) -> Option<u64> {
        self.source_line
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }
}

/// Per-kind node payload
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    DocumentType(DocumentTypeData),
    Element(ElementData),
    Text(String),
    Comment(String),
    DocumentFragment(FragmentData),
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::DocumentType(_) => NodeType::DocumentType,
            Self::Element(_) => NodeType::Element,
            Self::Text(_) => NodeType::Text,
            Self::Comment(_) => NodeType::Comment,
            Self::DocumentFragment(_) => NodeType::DocumentFragment,
        }
    }

    /// `nodeName`
    pub fn node_name(&self) -> String {
        match self {
            Self::Document => "#document".to_string(),
            Self::DocumentType(doctype) => doctype.name.clone(),
            Self::Element(el) => el.tag_name(),
            Self::Text(_) => "#text".to_string(),
            Self::Comment(_) => "#comment".to_string(),
            Self::DocumentFragment(_) => "#document-fragment".to_string(),
        }
    }
}

/// `<!DOCTYPE name PUBLIC "public_id" "system_id">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

/// Fragment payload (plain fragments, shadow roots, template contents)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentData {
    /// Shadow host, for shadow roots
    pub host: Option<NodeId>,
    /// Owning `<template>`, for template contents
    pub template: Option<NodeId>,
}

/// Element payload
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-cased for HTML elements, verbatim otherwise
    pub(crate) local_name: String,
    pub(crate) namespace: Option<Namespace>,
    pub(crate) kind: ElementKind,
    pub(crate) attributes: AttributeMap,
    /// Inline style; stands in for the `style` attribute
    pub(crate) style: Option<CssStyleDeclaration>,
    pub(crate) shadow_root: Option<NodeId>,
    pub(crate) template_content: Option<NodeId>,
    /// Backed by a custom element definition
    pub(crate) upgraded: bool,
}

impl ElementData {
    pub(crate) fn new(local_name: &str, namespace: Option<Namespace>) -> Self {
        let is_html = matches!(namespace, Some(Namespace::Html));
        let local_name = if is_html {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_string()
        };
        let kind = if is_html {
            ElementKind::from_tag(&local_name)
        } else {
            ElementKind::Generic
        };
        Self {
            local_name,
            namespace,
            kind,
            attributes: AttributeMap::new(is_html),
            style: None,
            shadow_root: None,
            template_content: None,
            upgraded: false,
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Upper-cased for HTML elements
    pub fn tag_name(&self) -> String {
        if self.is_html() {
            self.local_name.to_ascii_uppercase()
        } else {
            self.local_name.clone()
        }
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_ref().map(Namespace::uri)
    }

    pub fn is_html(&self) -> bool {
        matches!(self.namespace, Some(Namespace::Html))
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn style(&self) -> Option<&CssStyleDeclaration> {
        self.style.as_ref()
    }

    pub fn shadow_root(&self) -> Option<NodeId> {
        self.shadow_root
    }

    pub fn template_content(&self) -> Option<NodeId> {
        self.template_content
    }

    pub fn is_upgraded(&self) -> bool {
        self.upgraded
    }

    /// Autonomous custom element names carry a hyphen
    pub fn is_custom(&self) -> bool {
        self.local_name.contains('-')
    }

    /// `true` when `name` refers to the inline style attribute
    pub(crate) fn is_style_attribute(&self, name: &str) -> bool {
        if self.attributes.is_case_insensitive() {
            name.eq_ignore_ascii_case("style")
        } else {
            name == "style"
        }
    }
}

/// Registered `(type, listener)` pair
#[derive(Debug, Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) event_type: String,
    pub(crate) listener: EventListener,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_tag_case() {
        let el = ElementData::new("DiV", Some(Namespace::Html));
        assert_eq!(el.local_name(), "div");
        assert_eq!(el.tag_name(), "DIV");
        assert!(el.attributes().is_case_insensitive());
    }

    #[test]
    fn test_foreign_tag_keeps_case() {
        let el = ElementData::new("linearGradient", Some(Namespace::Svg));
        assert_eq!(el.tag_name(), "linearGradient");
        assert_eq!(el.kind(), ElementKind::Generic);
        assert!(!el.attributes().is_case_insensitive());
    }

    #[test]
    fn test_node_names() {
        assert_eq!(NodeData::Text("x".into()).node_name(), "#text");
        assert_eq!(NodeData::Document.node_name(), "#document");
        assert_eq!(NodeData::DocumentFragment(FragmentData::default()).node_type() as u16, 11);
    }
}
