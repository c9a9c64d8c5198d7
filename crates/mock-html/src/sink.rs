//! Tree sink
//!
//! html5ever's tree builder drives this adapter, which builds nodes straight
//! into a mock-dom arena. Every mutation runs with callbacks suppressed; the
//! caller decides when the connect walk happens.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode as HtmlQuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace as HtmlNamespace, QualName};
use mock_dom::{CallbackMode, Document, DomResult, Namespace, NodeId, QuirksMode};

/// Owned element name handed back to the tree builder
#[derive(Debug)]
pub(crate) struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &HtmlNamespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// `TreeSink` over a borrowed document
pub(crate) struct DomSink<'a> {
    doc: RefCell<&'a mut Document>,
    /// Node the parser treats as its document
    root: NodeId,
    source_locations: bool,
    current_line: Cell<u64>,
    integration_points: RefCell<HashSet<NodeId>>,
    errors: Cell<usize>,
}

impl<'a> DomSink<'a> {
    pub(crate) fn new(doc: &'a mut Document, root: NodeId, source_locations: bool) -> Self {
        Self {
            doc: RefCell::new(doc),
            root,
            source_locations,
            current_line: Cell::new(1),
            integration_points: RefCell::new(HashSet::new()),
            errors: Cell::new(0),
        }
    }

    fn set_attributes(&self, element: NodeId, attrs: Vec<Attribute>) {
        let mut doc = self.doc.borrow_mut();
        for attr in attrs {
            let ns: &str = &attr.name.ns;
            let local: &str = &attr.name.local;
            let result = if ns.is_empty() {
                doc.set_attribute(element, local, &*attr.value)
            } else {
                warn_unknown_namespace(ns);
                let qualified = match &attr.name.prefix {
                    Some(prefix) => format!("{prefix}:{local}"),
                    None => local.to_string(),
                };
                doc.set_attribute_ns(element, Some(ns), &qualified, &*attr.value)
            };
            report(result, "set attribute");
        }
    }

    /// Append `text` to `parent`, merging into a trailing text node
    fn append_text(&self, parent: NodeId, text: &str) {
        let mut doc = self.doc.borrow_mut();
        if let Some(last) = doc.last_child(parent)
            && let Some(existing) = doc.node(last).and_then(|node| node.as_text()).map(str::to_string)
        {
            report(doc.set_text_content(last, &format!("{existing}{text}")), "merge text");
            return;
        }
        let node = doc.create_text_node(text);
        report(doc.append_child_with(parent, node, CallbackMode::Suppressed), "append text");
    }
}

impl TreeSink for DomSink<'_> {
    type Handle = NodeId;
    type Output = usize;
    type ElemName<'b>
        = OwnedElemName
    where
        Self: 'b;

    /// Number of parse errors the tree builder reported
    fn finish(self) -> usize {
        self.errors.get()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.errors.set(self.errors.get() + 1);
        tracing::debug!(line = self.current_line.get(), "parse error: {}", msg);
    }

    fn get_document(&self) -> NodeId {
        self.root
    }

    fn elem_name<'b>(&'b self, target: &'b NodeId) -> OwnedElemName {
        let doc = self.doc.borrow();
        let (ns, local) = match doc.element_data(*target) {
            Some(el) => (el.namespace_uri().unwrap_or(""), el.local_name()),
            None => ("", ""),
        };
        OwnedElemName(QualName::new(None, HtmlNamespace::from(ns), LocalName::from(local)))
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> NodeId {
        let ns: &str = &name.ns;
        warn_unknown_namespace(ns);
        let namespace = (!ns.is_empty()).then_some(ns);
        let id = self.doc.borrow_mut().create_element_ns(namespace, &name.local);
        if self.source_locations {
            self.doc.borrow_mut().set_source_line(id, self.current_line.get());
        }
        if flags.mathml_annotation_xml_integration_point {
            self.integration_points.borrow_mut().insert(id);
        }
        self.set_attributes(id, attrs);
        id
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.doc.borrow_mut().create_comment(&text)
    }

    /// Processing instructions only occur in foreign content; they become comments
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> NodeId {
        self.doc.borrow_mut().create_comment(&format!("?{target} {data}"))
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => {
                let result = self
                    .doc
                    .borrow_mut()
                    .append_child_with(*parent, node, CallbackMode::Suppressed);
                report(result, "append");
            }
            NodeOrText::AppendText(text) => self.append_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(&self, element: &NodeId, prev_element: &NodeId, child: NodeOrText<NodeId>) {
        let has_parent = self.doc.borrow().parent_node(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, name: StrTendril, public_id: StrTendril, system_id: StrTendril) {
        let mut doc = self.doc.borrow_mut();
        let doctype = doc.create_document_type(&name, &public_id, &system_id);
        report(
            doc.append_child_with(self.root, doctype, CallbackMode::Suppressed),
            "append doctype",
        );
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        match self.doc.borrow().template_content(*target) {
            Some(content) => content,
            None => {
                tracing::warn!(node = %target, "template contents requested for a non-template");
                *target
            }
        }
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: HtmlQuirksMode) {
        // Fragments keep the mode of the document they land in
        if self.root != NodeId::ROOT {
            return;
        }
        let mode = match mode {
            HtmlQuirksMode::Quirks => QuirksMode::Quirks,
            HtmlQuirksMode::LimitedQuirks => QuirksMode::LimitedQuirks,
            HtmlQuirksMode::NoQuirks => QuirksMode::NoQuirks,
        };
        self.doc.borrow_mut().set_quirks_mode(mode);
    }

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut doc = self.doc.borrow_mut();
        let Some(parent) = doc.parent_node(*sibling) else {
            tracing::warn!(node = %sibling, "insertion before a detached sibling");
            return;
        };
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                if let Some(previous) = doc.previous_sibling(*sibling)
                    && let Some(existing) = doc.node(previous).and_then(|node| node.as_text()).map(str::to_string)
                {
                    report(doc.set_text_content(previous, &format!("{existing}{text}")), "merge text");
                    return;
                }
                doc.create_text_node(&text)
            }
        };
        report(
            doc.insert_before_with(parent, node, Some(*sibling), CallbackMode::Suppressed),
            "insert before",
        );
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Attribute>) {
        let missing: Vec<Attribute> = {
            let doc = self.doc.borrow();
            attrs
                .into_iter()
                .filter(|attr| {
                    let ns: &str = &attr.name.ns;
                    let ns = (!ns.is_empty()).then_some(ns);
                    doc.get_attribute_ns(*target, ns, &attr.name.local).is_none()
                })
                .collect()
        };
        self.set_attributes(*target, missing);
    }

    fn remove_from_parent(&self, target: &NodeId) {
        let mut doc = self.doc.borrow_mut();
        if let Some(parent) = doc.parent_node(*target) {
            report(
                doc.remove_child_with(parent, *target, CallbackMode::Suppressed),
                "remove from parent",
            );
        }
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut doc = self.doc.borrow_mut();
        for child in doc.child_nodes(*node).to_vec() {
            report(
                doc.append_child_with(*new_parent, child, CallbackMode::Suppressed),
                "reparent",
            );
        }
    }

    fn is_mathml_annotation_xml_integration_point(&self, handle: &NodeId) -> bool {
        self.integration_points.borrow().contains(handle)
    }

    fn set_current_line(&self, line_number: u64) {
        self.current_line.set(line_number);
    }
}

fn warn_unknown_namespace(uri: &str) {
    if matches!(Namespace::from_uri(uri), Some(Namespace::Other(_))) {
        tracing::warn!(uri, "unknown namespace from the parser");
    }
}

/// Tree construction never aborts; rejected steps are logged
fn report<T>(result: DomResult<T>, step: &'static str) {
    if let Err(err) = result {
        tracing::warn!(step, "tree construction step rejected: {}", err);
    }
}

