//! DOM tree operations
//!
//! Navigation, insertion and removal over the document arena, plus the
//! connect/disconnect walks that drive custom element lifecycle callbacks.

use crate::node::{FragmentData, NodeData};
use crate::{CallbackMode, Document, DomError, DomResult, NodeId};

impl Document {
    // ---- navigation ----

    /// `parentNode`
    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// `parentElement`
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent_node(id).filter(|&parent| self.element_data(parent).is_some())
    }

    /// `childNodes`
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// `children` (element children only)
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_nodes(id)
            .iter()
            .copied()
            .filter(|&child| self.element_data(child).is_some())
            .collect()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id).last().copied()
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id)
            .iter()
            .copied()
            .find(|&child| self.element_data(child).is_some())
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent_node(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        siblings.get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent_node(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).copied())
    }

    /// Inclusive descendant check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_node(id);
        }
        false
    }

    /// Pre-order descendants of `root` (root excluded)
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_nodes(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.child_nodes(id).iter().rev().copied());
        }
        out
    }

    /// `isConnected`: the ancestor walk reaches the document node, crossing
    /// from shadow roots to their hosts
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.node(current) else {
                return false;
            };
            match (&node.data, node.parent) {
                (NodeData::Document, _) => return true,
                (_, Some(parent)) => current = parent,
                (NodeData::DocumentFragment(FragmentData { host: Some(host), .. }), None) => current = *host,
                _ => return false,
            }
        }
    }

    // ---- mutation ----

    /// `appendChild`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before_with(parent, child, None, CallbackMode::Fire)
    }

    /// `appendChild` with explicit callback handling
    pub fn append_child_with(&mut self, parent: NodeId, child: NodeId, mode: CallbackMode) -> DomResult<NodeId> {
        self.insert_before_with(parent, child, None, mode)
    }

    /// `insertBefore`; a `None` reference appends
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<NodeId> {
        self.insert_before_with(parent, child, reference, CallbackMode::Fire)
    }

    /// `insertBefore` with explicit callback handling. Fragments are
    /// flattened: their children move over one by one and the fragment is
    /// left empty.
    pub fn insert_before_with(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
        mode: CallbackMode,
    ) -> DomResult<NodeId> {
        self.validate_insertion(parent, child)?;

        let mut reference = reference;
        if let Some(r) = reference {
            if self.parent_node(r) != Some(parent) {
                return Err(DomError::NotFound { parent, child: r });
            }
            if r == child {
                reference = self.next_sibling(child);
            }
        }

        if matches!(self.try_node(child)?.data, NodeData::DocumentFragment(_)) {
            let moved = self.child_nodes(child).to_vec();
            for node in moved {
                self.insert_before_with(parent, node, reference, mode)?;
            }
            return Ok(child);
        }

        if let Some(old_parent) = self.parent_node(child) {
            self.remove_child_with(old_parent, child, mode)?;
        }

        let index = reference.and_then(|r| self.child_nodes(parent).iter().position(|&c| c == r));
        self.link_child(parent, child, index);

        if self.is_connected(child) {
            self.connect_walk(child, mode);
        }
        Ok(child)
    }

    fn validate_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.try_node(parent)?;
        if !matches!(
            parent_node.data,
            NodeData::Document | NodeData::Element(_) | NodeData::DocumentFragment(_)
        ) {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }
        if matches!(self.try_node(child)?.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest("a document cannot be inserted"));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest("the new child is an ancestor of the parent"));
        }
        Ok(())
    }

    /// `removeChild`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.remove_child_with(parent, child, CallbackMode::Fire)
    }

    /// `removeChild` with explicit callback handling
    pub fn remove_child_with(&mut self, parent: NodeId, child: NodeId, mode: CallbackMode) -> DomResult<NodeId> {
        self.try_node(parent)?;
        if self.parent_node(child) != Some(parent) {
            return Err(DomError::NotFound { parent, child });
        }
        let was_connected = self.is_connected(child);
        self.unlink(child);
        if was_connected {
            self.disconnect_walk(child, mode);
        }
        Ok(child)
    }

    /// `replaceChild`: insert `new_child` where `old_child` is, then remove it
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<NodeId> {
        if self.parent_node(old_child) != Some(parent) {
            return Err(DomError::NotFound { parent, child: old_child });
        }
        if new_child == old_child {
            return Ok(old_child);
        }
        self.insert_before(parent, new_child, Some(old_child))?;
        self.remove_child(parent, old_child)
    }

    /// `remove()`: detach from the parent, if any
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        if let Some(parent) = self.parent_node(id) {
            self.remove_child(parent, id)?;
        }
        Ok(())
    }

    /// Attach a detached node without validation or callbacks
    pub(crate) fn link_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            match index {
                Some(i) => node.children.insert(i, child),
                None => node.children.push(child),
            }
        }
    }

    /// Detach a node from its parent without callbacks
    pub(crate) fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.node_mut(child).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
    }

    // ---- content ----

    /// `textContent`; `None` for documents and doctypes
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match &self.node(id)?.data {
            NodeData::Text(text) | NodeData::Comment(text) => Some(text.clone()),
            NodeData::Element(_) | NodeData::DocumentFragment(_) => {
                let text: String = self
                    .descendants(id)
                    .into_iter()
                    .filter_map(|d| self.node(d).and_then(|node| node.as_text()))
                    .collect();
                Some(text)
            }
            NodeData::Document | NodeData::DocumentType(_) => None,
        }
    }

    /// Set `textContent`. Elements and fragments lose all children and
    /// receive a single text node (none for an empty string).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        if let NodeData::Text(data) | NodeData::Comment(data) = &mut self.try_node_mut(id)?.data {
            *data = text.to_string();
            return Ok(());
        }
        match self.try_node(id)?.data {
            NodeData::Text(_) | NodeData::Comment(_) | NodeData::Document | NodeData::DocumentType(_) => Ok(()),
            NodeData::Element(_) | NodeData::DocumentFragment(_) => {
                for child in self.child_nodes(id).to_vec() {
                    self.remove_child(id, child)?;
                }
                if !text.is_empty() {
                    let node = self.create_text_node(text);
                    self.append_child(id, node)?;
                }
                Ok(())
            }
        }
    }

    // ---- lookup ----

    /// `getElementsByTagName`: descendant elements, `*` matches all
    pub fn get_elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(root, &mut out, &|doc, id| {
            doc.element_data(id).is_some_and(|el| {
                tag_name == "*"
                    || if el.is_html() {
                        el.local_name().eq_ignore_ascii_case(tag_name)
                    } else {
                        el.local_name() == tag_name
                    }
            })
        });
        out
    }

    /// `getElementsByClassName`: descendant elements carrying every class
    pub fn get_elements_by_class_name(&self, root: NodeId, class_names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = class_names.split_ascii_whitespace().collect();
        let mut out = Vec::new();
        if wanted.is_empty() {
            return out;
        }
        self.collect_elements(root, &mut out, &|doc, id| {
            let classes = doc.get_attribute(id, "class").unwrap_or_default();
            wanted
                .iter()
                .all(|w| classes.split_ascii_whitespace().any(|c| c == *w))
        });
        out
    }

    fn collect_elements(&self, parent: NodeId, out: &mut Vec<NodeId>, pred: &dyn Fn(&Document, NodeId) -> bool) {
        for child in self.children(parent) {
            if pred(self, child) {
                out.push(child);
            }
            self.collect_elements(child, out, pred);
        }
    }

    // ---- cloning ----

    /// `cloneNode`. Elements are recreated through the element factory so
    /// kind and custom element definition carry over.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let clone = match self.try_node(id)?.data.clone() {
            NodeData::Document => {
                return Err(DomError::HierarchyRequest("documents cannot be cloned"));
            }
            NodeData::Element(source) => {
                let uri = source.namespace_uri().map(str::to_string);
                let clone = self.create_element_ns(uri.as_deref(), source.local_name());
                let el = self.try_element_mut(clone)?;
                for attr in source.attributes() {
                    el.attributes.set_named_item_ns(attr.clone());
                }
                if let Some(style) = source.style() {
                    el.style = Some(style.clone());
                }
                if deep {
                    if let (Some(from), Some(to)) = (source.template_content(), self.template_content(clone)) {
                        for child in self.child_nodes(from).to_vec() {
                            let copy = self.clone_node(child, true)?;
                            self.link_child(to, copy, None);
                        }
                    }
                }
                clone
            }
            NodeData::DocumentFragment(_) => self.create_document_fragment(),
            data => self.alloc(data),
        };

        if deep {
            for child in self.child_nodes(id).to_vec() {
                let copy = self.clone_node(child, true)?;
                self.link_child(clone, copy, None);
            }
        }
        Ok(clone)
    }

    // ---- lifecycle walks ----

    /// Depth-first connect walk after `node` was attached under the document
    pub(crate) fn connect_walk(&mut self, node: NodeId, mode: CallbackMode) {
        if mode == CallbackMode::Fire && self.is_connected(node) {
            self.upgrade_if_defined(node);
        }
        if let Some(el) = self.element_data(node) {
            let shadow_root = el.shadow_root();
            if el.is_custom() && mode == CallbackMode::Fire && self.has_window() && self.is_connected(node) {
                tracing::trace!(node = %node, "connect");
                self.fire_connected(node);
            }
            if let Some(shadow_root) = shadow_root {
                for child in self.child_nodes(shadow_root).to_vec() {
                    self.connect_walk(child, mode);
                }
            }
        }
        for child in self.child_nodes(node).to_vec() {
            self.connect_walk(child, mode);
        }
    }

    /// Mirror of [`Self::connect_walk`] after `node` left the document
    pub(crate) fn disconnect_walk(&mut self, node: NodeId, mode: CallbackMode) {
        if let Some(el) = self.element_data(node) {
            let shadow_root = el.shadow_root();
            if el.is_custom() && mode == CallbackMode::Fire {
                tracing::trace!(node = %node, "disconnect");
                self.fire_disconnected(node);
            }
            if let Some(shadow_root) = shadow_root {
                for child in self.child_nodes(shadow_root).to_vec() {
                    self.disconnect_walk(child, mode);
                }
            }
        }
        for child in self.child_nodes(node).to_vec() {
            self.disconnect_walk(child, mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(doc: &mut Document) -> (NodeId, NodeId, NodeId, NodeId) {
        let ul = doc.create_element("ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        let c = doc.create_element("li");
        for li in [a, b, c] {
            doc.append_child(ul, li).unwrap();
        }
        (ul, a, b, c)
    }

    #[test]
    fn test_append_and_siblings() {
        let mut doc = Document::new();
        let (ul, a, b, c) = list(&mut doc);
        assert_eq!(doc.child_nodes(ul), &[a, b, c]);
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.previous_sibling(a), None);
        assert_eq!(doc.last_child(ul), Some(c));
        assert_eq!(doc.parent_node(b), Some(ul));
    }

    #[test]
    fn test_insert_before_moves_node() {
        let mut doc = Document::new();
        let (ul, a, b, c) = list(&mut doc);
        doc.insert_before(ul, c, Some(a)).unwrap();
        assert_eq!(doc.child_nodes(ul), &[c, a, b]);
    }

    #[test]
    fn test_insert_before_missing_reference() {
        let mut doc = Document::new();
        let (ul, _, _, _) = list(&mut doc);
        let stray = doc.create_element("li");
        let other = doc.create_element("li");
        let err = doc.insert_before(ul, other, Some(stray)).unwrap_err();
        assert_eq!(err, DomError::NotFound { parent: ul, child: stray });
    }

    #[test]
    fn test_remove_child_not_a_child() {
        let mut doc = Document::new();
        let (ul, a, _, _) = list(&mut doc);
        let div = doc.create_element("div");
        assert!(matches!(doc.remove_child(div, a), Err(DomError::NotFound { .. })));
        doc.remove_child(ul, a).unwrap();
        assert_eq!(doc.parent_node(a), None);
        assert_eq!(doc.child_element_count(ul), 2);
    }

    #[test]
    fn test_remove_without_parent_is_noop() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.remove(div).unwrap();
    }

    #[test]
    fn test_replace_child() {
        let mut doc = Document::new();
        let (ul, a, b, c) = list(&mut doc);
        let d = doc.create_element("li");
        doc.replace_child(ul, d, b).unwrap();
        assert_eq!(doc.child_nodes(ul), &[a, d, c]);
        assert_eq!(doc.parent_node(b), None);
    }

    #[test]
    fn test_fragment_is_flattened() {
        let mut doc = Document::new();
        let frag = doc.create_document_fragment();
        let one = doc.create_text_node("1");
        let two = doc.create_text_node("2");
        doc.append_child(frag, one).unwrap();
        doc.append_child(frag, two).unwrap();

        let div = doc.create_element("div");
        doc.append_child(div, frag).unwrap();
        assert_eq!(doc.child_nodes(div), &[one, two]);
        assert!(doc.child_nodes(frag).is_empty());
    }

    #[test]
    fn test_cannot_insert_ancestor() {
        let mut doc = Document::new();
        let (ul, a, _, _) = list(&mut doc);
        assert!(matches!(doc.append_child(a, ul), Err(DomError::HierarchyRequest(_))));
        assert!(matches!(doc.append_child(ul, ul), Err(DomError::HierarchyRequest(_))));
    }

    #[test]
    fn test_is_connected() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        assert!(!doc.is_connected(div));
        doc.append_child(body, div).unwrap();
        assert!(doc.is_connected(div));

        let shadow = doc.attach_shadow(div).unwrap();
        let span = doc.create_element("span");
        doc.append_child(shadow, span).unwrap();
        assert!(doc.is_connected(span));

        let frag = doc.create_document_fragment();
        let p = doc.create_element("p");
        doc.append_child(frag, p).unwrap();
        assert!(!doc.is_connected(p));
    }

    #[test]
    fn test_text_content() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        let a = doc.create_text_node("a");
        let b = doc.create_text_node("b");
        let comment = doc.create_comment("skip");
        doc.append_child(div, a).unwrap();
        doc.append_child(div, comment).unwrap();
        doc.append_child(div, span).unwrap();
        doc.append_child(span, b).unwrap();
        assert_eq!(doc.text_content(div).as_deref(), Some("ab"));

        doc.set_text_content(div, "new").unwrap();
        assert_eq!(doc.child_nodes(div).len(), 1);
        assert_eq!(doc.text_content(div).as_deref(), Some("new"));
        assert_eq!(doc.text_content(NodeId::ROOT), None);
    }

    #[test]
    fn test_get_elements_by_tag_and_class() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let (ul, a, b, _) = list(&mut doc);
        doc.append_child(body, ul).unwrap();
        doc.set_attribute(a, "class", "x y").unwrap();
        doc.set_attribute(b, "class", "y").unwrap();

        assert_eq!(doc.get_elements_by_tag_name(NodeId::ROOT, "LI").len(), 3);
        assert_eq!(doc.get_elements_by_class_name(NodeId::ROOT, "y"), vec![a, b]);
        assert_eq!(doc.get_elements_by_class_name(NodeId::ROOT, "y  x"), vec![a]);
        assert!(doc.get_elements_by_class_name(NodeId::ROOT, " ").is_empty());
    }

    #[test]
    fn test_clone_node() {
        let mut doc = Document::new();
        let (ul, _, _, _) = list(&mut doc);
        doc.set_attribute(ul, "id", "menu").unwrap();
        doc.set_attribute(ul, "style", "color: red").unwrap();

        let shallow = doc.clone_node(ul, false).unwrap();
        assert!(doc.child_nodes(shallow).is_empty());
        assert_eq!(doc.get_attribute(shallow, "id").as_deref(), Some("menu"));
        assert_eq!(doc.get_attribute(shallow, "style").as_deref(), Some("color: red;"));

        let deep = doc.clone_node(ul, true).unwrap();
        assert_eq!(doc.child_element_count(deep), 3);
        assert_ne!(doc.child_nodes(deep)[0], doc.child_nodes(ul)[0]);
        assert_eq!(doc.parent_node(deep), None);
    }

    #[test]
    fn test_clone_template_copies_content() {
        let mut doc = Document::new();
        let template = doc.create_element("template");
        let content = doc.template_content(template).unwrap();
        let p = doc.create_element("p");
        doc.append_child(content, p).unwrap();

        let copy = doc.clone_node(template, true).unwrap();
        let copy_content = doc.template_content(copy).unwrap();
        assert_ne!(copy_content, content);
        assert_eq!(doc.child_element_count(copy_content), 1);
    }
}
