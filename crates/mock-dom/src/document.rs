//! Document - High-level document API
//!
//! The document owns the node arena. Element, tree, event and custom element
//! operations are all methods on `Document` taking `NodeId` handles.

use std::collections::HashMap;
use std::rc::Rc;

use crate::node::{DocumentTypeData, ElementData, FragmentData, Node, NodeData};
use crate::window::WindowState;
use crate::{
    CallbackMode, CustomElementRegistry, CustomElements, DomError, DomResult, ElementInstance, ElementKind,
    Namespace, NodeId, SelectorEngine, SimpleSelectorEngine,
};

/// Document compatibility mode, as reported by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuirksMode {
    #[default]
    NoQuirks,
    LimitedQuirks,
    Quirks,
}

/// HTML Document
pub struct Document {
    nodes: Vec<Node>,
    /// Id of the first non-root slot; ids below it belong to nodes
    /// dropped by an earlier reset
    first_id: u32,
    pub(crate) window: Option<WindowState>,
    pub(crate) registry: CustomElementRegistry,
    /// Custom element instances keyed by host element
    pub(crate) instances: HashMap<NodeId, ElementInstance>,
    quirks_mode: QuirksMode,
    selector_engine: Rc<dyn SelectorEngine>,
}

impl Document {
    /// Create a document with the minimal html/head/body skeleton
    pub fn new() -> Self {
        let mut doc = Self::empty();
        doc.build_skeleton();
        doc
    }

    /// Create a document holding only the document node
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            first_id: 1,
            window: None,
            registry: CustomElementRegistry::default(),
            instances: HashMap::new(),
            quirks_mode: QuirksMode::default(),
            selector_engine: Rc::new(SimpleSelectorEngine),
        }
    }

    fn build_skeleton(&mut self) {
        let html = self.create_element("html");
        let head = self.create_element("head");
        let body = self.create_element("body");
        self.link_child(NodeId::ROOT, html, None);
        self.link_child(html, head, None);
        self.link_child(html, body, None);
    }

    /// Drop every node, listener and component instance and restore the
    /// html/head/body skeleton. Definitions and the window location survive.
    pub fn reset(&mut self) {
        self.first_id += (self.nodes.len() - 1) as u32;
        self.nodes.truncate(1);
        self.nodes[0] = Node::new(NodeData::Document);
        self.instances.clear();
        self.quirks_mode = QuirksMode::default();
        if let Some(window) = &mut self.window {
            window.listeners.clear();
        }
        self.build_skeleton();
        tracing::debug!("document reset");
    }

    // ---- arena ----

    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.first_id + (self.nodes.len() - 1) as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Allocate an element, giving templates their content fragment
    pub(crate) fn alloc_element(&mut self, local_name: &str, namespace: Option<Namespace>) -> NodeId {
        let id = self.alloc(NodeData::Element(ElementData::new(local_name, namespace)));
        if self.element_kind(id) == Some(ElementKind::Template) {
            let content = self.alloc(NodeData::DocumentFragment(FragmentData {
                host: None,
                template: Some(id),
            }));
            if let Some(el) = self.element_data_mut(id) {
                el.template_content = Some(content);
            }
        }
        id
    }

    /// Arena slot of `id`; `None` for ids dropped by a reset
    fn slot(&self, id: NodeId) -> Option<usize> {
        match id.0 {
            0 => Some(0),
            raw if raw >= self.first_id => Some((raw - self.first_id) as usize + 1),
            _ => None,
        }
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).and_then(|slot| self.nodes.get(slot))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot(id).and_then(|slot| self.nodes.get_mut(slot))
    }

    pub(crate) fn try_node(&self, id: NodeId) -> DomResult<&Node> {
        self.node(id).ok_or(DomError::InvalidNode(id))
    }

    pub(crate) fn try_node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.node_mut(id).ok_or(DomError::InvalidNode(id))
    }

    /// Element payload of `id`, if it is an element
    pub fn element_data(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    pub(crate) fn element_data_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.node_mut(id).and_then(Node::as_element_mut)
    }

    pub(crate) fn try_element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.element_data(id).ok_or(DomError::InvalidNode(id))
    }

    pub(crate) fn try_element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.element_data_mut(id).ok_or(DomError::InvalidNode(id))
    }

    /// Number of arena slots, detached nodes included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---- factories ----

    /// `document.createElement`: an HTML element, instantiated right away
    /// when its tag has a custom element definition
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        let id = self.alloc_element(tag_name, Some(Namespace::Html));
        self.instantiate_if_defined(id);
        id
    }

    /// `document.createElementNS`. A `prefix:` in the qualified name is dropped.
    pub fn create_element_ns(&mut self, namespace_uri: Option<&str>, qualified_name: &str) -> NodeId {
        let namespace = namespace_uri.and_then(Namespace::from_uri);
        let local_name = qualified_name
            .split_once(':')
            .map_or(qualified_name, |(_, local)| local);
        let id = self.alloc_element(local_name, namespace);
        self.instantiate_if_defined(id);
        id
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Comment(text.to_string()))
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::DocumentFragment(FragmentData::default()))
    }

    pub fn create_document_type(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(NodeData::DocumentType(DocumentTypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    // ---- derived views ----

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_nodes(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.element_data(id).is_some())
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.document_child_named("head")
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.document_child_named("body")
    }

    fn document_child_named(&self, name: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.child_nodes(html)
            .iter()
            .copied()
            .find(|&id| self.element_data(id).is_some_and(|el| el.local_name() == name))
    }

    /// The doctype node, if the document has one
    pub fn doctype(&self) -> Option<NodeId> {
        self.child_nodes(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| matches!(self.node(id).map(Node::data), Some(NodeData::DocumentType(_))))
    }

    /// Get document title (whitespace-collapsed text of the first <title>)
    pub fn title(&self) -> String {
        let Some(title) = self.first_element_named("title") else {
            return String::new();
        };
        self.text_content(title)
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Set document title, creating <title> in <head> if needed
    pub fn set_title(&mut self, title: &str) -> DomResult<()> {
        let element = match self.first_element_named("title") {
            Some(existing) => existing,
            None => {
                let head = self.head().ok_or(DomError::HierarchyRequest("document has no <head>"))?;
                let element = self.create_element("title");
                self.append_child(head, element)?;
                element
            }
        };
        self.set_text_content(element, title)
    }

    fn first_element_named(&self, name: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .into_iter()
            .find(|&id| self.element_data(id).is_some_and(|el| el.is_html() && el.local_name() == name))
    }

    /// Get element by ID (first match in tree order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .into_iter()
            .find(|&node| self.element_data(node).is_some_and(|el| el.attributes().get_named_item("id").is_some_and(|attr| attr.value() == id)))
    }

    pub fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    pub fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    /// `document.compatMode`
    pub fn compat_mode(&self) -> &'static str {
        match self.quirks_mode {
            QuirksMode::Quirks => "BackCompat",
            QuirksMode::NoQuirks | QuirksMode::LimitedQuirks => "CSS1Compat",
        }
    }

    /// Whether the document has a `defaultView`
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    /// `window.location` of the owning window
    pub fn location(&self) -> Option<&url::Url> {
        self.window.as_ref().map(|w| &w.location)
    }

    /// `customElements` registry view
    pub fn custom_elements(&mut self) -> CustomElements<'_> {
        CustomElements::new(self)
    }

    /// Component instance backing `element`, if it has been upgraded
    pub fn custom_element_instance(&self, element: NodeId) -> Option<ElementInstance> {
        self.instances.get(&element).cloned()
    }

    pub fn selector_engine(&self) -> Rc<dyn SelectorEngine> {
        Rc::clone(&self.selector_engine)
    }

    /// Swap in another selector engine
    pub fn set_selector_engine(&mut self, engine: Rc<dyn SelectorEngine>) {
        self.selector_engine = engine;
    }

    /// Fire the connect lifecycle over everything currently in the document
    pub fn connect_all(&mut self) {
        self.connect_walk(NodeId::ROOT, CallbackMode::Fire);
    }

    /// Record the source line a parser created `id` from
    pub fn set_source_line(&mut self, id: NodeId, line: u64) {
        if let Some(node) = self.node_mut(id) {
            node.source_line = Some(line);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("quirks_mode", &self.quirks_mode)
            .field("has_window", &self.window.is_some())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new();
        let html = doc.document_element().unwrap();
        assert_eq!(doc.element_data(html).unwrap().local_name(), "html");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.child_nodes(html).len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert_eq!(doc.len(), 1);
        assert!(doc.document_element().is_none());
        assert!(doc.body().is_none());
    }

    #[test]
    fn test_title_round_trip() {
        let mut doc = Document::new();
        assert_eq!(doc.title(), "");
        doc.set_title("  Hello \n world ").unwrap();
        assert_eq!(doc.title(), "Hello world");
        doc.set_title("Again").unwrap();
        assert_eq!(doc.get_elements_by_tag_name(NodeId::ROOT, "title").len(), 1);
    }

    #[test]
    fn test_template_gets_content_fragment() {
        let mut doc = Document::new();
        let template = doc.create_element("template");
        let content = doc.template_content(template).unwrap();
        assert_eq!(doc.node(content).unwrap().node_type(), crate::NodeType::DocumentFragment);
    }

    #[test]
    fn test_reset_restores_skeleton() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();

        doc.reset();
        assert_eq!(doc.len(), 4);
        assert!(doc.child_nodes(doc.body().unwrap()).is_empty());
    }

    #[test]
    fn test_reset_never_reuses_ids() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.reset();
        let span = doc.create_element("span");
        assert_ne!(div, span);
        assert!(doc.node(div).is_none());
        assert_eq!(doc.set_attribute(div, "id", "stale"), Err(DomError::InvalidNode(div)));
        assert_eq!(doc.tag_name(span).as_deref(), Some("SPAN"));
        assert!(!doc.has_attribute(span, "id"));
        assert!(doc.body().is_some_and(|body| doc.node(body).is_some()));
    }

    #[test]
    fn test_compat_mode() {
        let mut doc = Document::new();
        assert_eq!(doc.compat_mode(), "CSS1Compat");
        doc.set_quirks_mode(QuirksMode::Quirks);
        assert_eq!(doc.compat_mode(), "BackCompat");
    }
}
