//! Custom Elements v1
//!
//! Custom element registry, lifecycle callbacks and the upgrade protocol.
//!
//! Component instances live in a side table on the document keyed by the
//! host `NodeId`, never inside `ElementData`. Upgrading a placeholder builds
//! the component's element in a fresh arena slot, moves the placeholder's
//! children over and then swaps the slot contents, so every `NodeId` handed
//! out before the definition arrived keeps resolving to the live element.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::node::{Node, NodeData};
use crate::{Document, DomError, DomResult, NodeId};

/// Result of a lifecycle callback or event listener. Errors are logged and
/// swallowed by the caller.
pub type CallbackResult = anyhow::Result<()>;

/// Component behaviour attached to an autonomous custom element.
///
/// Callbacks always receive the element's current `NodeId`; an id captured
/// in [`CustomElement::constructed`] during an upgrade is a scratch slot
/// that stops being valid once the upgrade finishes.
pub trait CustomElement {
    /// Runs right after the constructor, with the element in place
    fn constructed(&mut self, _doc: &mut Document, _element: NodeId) -> CallbackResult {
        Ok(())
    }

    fn connected_callback(&mut self, _doc: &mut Document, _element: NodeId) -> CallbackResult {
        Ok(())
    }

    fn disconnected_callback(&mut self, _doc: &mut Document, _element: NodeId) -> CallbackResult {
        Ok(())
    }

    /// Fires for names listed in `observed_attributes`
    fn attribute_changed_callback(
        &mut self,
        _doc: &mut Document,
        _element: NodeId,
        _name: &str,
        _old_value: Option<&str>,
        _new_value: Option<&str>,
    ) -> CallbackResult {
        Ok(())
    }
}

/// Component constructor registered with `define`
pub type ElementConstructor = Rc<dyn Fn() -> Box<dyn CustomElement>>;

/// Shared handle to a live component instance
pub type ElementInstance = Rc<RefCell<Box<dyn CustomElement>>>;

/// Whether lifecycle callbacks fire during a tree operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackMode {
    #[default]
    Fire,
    /// Bulk moves (upgrades, parsing) run without callbacks
    Suppressed,
}

/// `ElementDefinitionOptions` plus the static `observedAttributes`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDefinitionOptions {
    pub observed_attributes: Vec<String>,
    pub extends: Option<String>,
}

impl ElementDefinitionOptions {
    pub fn observed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            observed_attributes: names.into_iter().map(Into::into).collect(),
            extends: None,
        }
    }

    fn observes(&self, name: &str) -> bool {
        self.observed_attributes
            .iter()
            .any(|observed| observed.eq_ignore_ascii_case(name))
    }
}

struct Definition {
    constructor: ElementConstructor,
    options: ElementDefinitionOptions,
}

#[derive(Default)]
struct WaiterState {
    constructor: Option<ElementConstructor>,
    waker: Option<Waker>,
}

/// Custom elements registry
#[derive(Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, Definition>,
    when_defined: HashMap<String, Vec<Rc<RefCell<WaiterState>>>>,
}

impl CustomElementRegistry {
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Defined names, unordered
    pub fn names(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    fn constructor(&self, name: &str) -> Option<ElementConstructor> {
        self.definitions.get(name).map(|def| Rc::clone(&def.constructor))
    }

    fn observes(&self, name: &str, attribute: &str) -> bool {
        self.definitions
            .get(name)
            .is_some_and(|def| def.options.observes(attribute))
    }
}

impl std::fmt::Debug for CustomElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomElementRegistry")
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .field("pending", &self.when_defined.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Future returned by `when_defined`, resolving to the constructor
pub struct WhenDefined {
    state: Rc<RefCell<WaiterState>>,
}

impl Future for WhenDefined {
    type Output = ElementConstructor;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        if let Some(constructor) = state.constructor.clone() {
            return Poll::Ready(constructor);
        }
        state.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

/// `window.customElements`
pub struct CustomElements<'a> {
    doc: &'a mut Document,
}

impl<'a> CustomElements<'a> {
    pub(crate) fn new(doc: &'a mut Document) -> Self {
        Self { doc }
    }

    /// `customElements.define`: register, resolve pending `when_defined`
    /// futures and upgrade every matching element already in the document.
    pub fn define<F>(&mut self, name: &str, constructor: F, options: ElementDefinitionOptions) -> DomResult<()>
    where
        F: Fn() -> Box<dyn CustomElement> + 'static,
    {
        if name.is_empty() || name.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(DomError::InvalidCustomElementName(name.to_string()));
        }
        let registry = &mut self.doc.registry;
        if registry.is_defined(name) {
            return Err(DomError::AlreadyDefined(name.to_string()));
        }

        let constructor: ElementConstructor = Rc::new(constructor);
        registry.definitions.insert(
            name.to_string(),
            Definition {
                constructor: Rc::clone(&constructor),
                options,
            },
        );
        tracing::debug!(name, "custom element defined");

        for waiter in registry.when_defined.remove(name).unwrap_or_default() {
            let mut state = waiter.borrow_mut();
            state.constructor = Some(Rc::clone(&constructor));
            if let Some(waker) = state.waker.take() {
                waker.wake();
            }
        }

        self.doc.upgrade_all(name, &constructor);
        Ok(())
    }

    /// `customElements.get`
    pub fn get(&self, name: &str) -> Option<ElementConstructor> {
        self.doc.registry.constructor(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.doc.registry.is_defined(name)
    }

    /// `customElements.whenDefined`. Never resolves if `name` is never defined.
    pub fn when_defined(&mut self, name: &str) -> WhenDefined {
        let state = Rc::new(RefCell::new(WaiterState {
            constructor: self.doc.registry.constructor(name),
            waker: None,
        }));
        if state.borrow().constructor.is_none() {
            self.doc
                .registry
                .when_defined
                .entry(name.to_string())
                .or_default()
                .push(Rc::clone(&state));
        }
        WhenDefined { state }
    }
}

impl Document {
    /// Give a freshly created element its component, if its tag is defined
    pub(crate) fn instantiate_if_defined(&mut self, element: NodeId) {
        let Some(el) = self.element_data(element) else {
            return;
        };
        if !el.is_html() || !el.is_custom() {
            return;
        }
        if let Some(constructor) = self.registry.constructor(el.local_name()) {
            self.construct_instance(element, &constructor);
        }
    }

    /// Upgrade a custom element created before its name was defined
    pub(crate) fn upgrade_if_defined(&mut self, element: NodeId) {
        let Some(el) = self.element_data(element) else {
            return;
        };
        if !el.is_html() || !el.is_custom() || el.is_upgraded() {
            return;
        }
        if let Some(constructor) = self.registry.constructor(el.local_name()) {
            self.upgrade(element, &constructor);
        }
    }

    fn construct_instance(&mut self, element: NodeId, constructor: &ElementConstructor) {
        let instance: ElementInstance = Rc::new(RefCell::new((**constructor)()));
        self.instances.insert(element, instance);
        if let Some(el) = self.element_data_mut(element) {
            el.upgraded = true;
        }
        self.invoke_lifecycle(element, "constructed", |component, doc, id| component.constructed(doc, id));
    }

    /// Upgrade every not-yet-upgraded `name` element in the document,
    /// shadow trees included
    fn upgrade_all(&mut self, name: &str, constructor: &ElementConstructor) {
        let mut candidates = Vec::new();
        self.collect_upgrade_candidates(NodeId::ROOT, name, &mut candidates);
        for placeholder in candidates {
            self.upgrade(placeholder, constructor);
            if self.is_connected(placeholder) {
                self.fire_connected(placeholder);
            }
        }
    }

    fn collect_upgrade_candidates(&self, parent: NodeId, name: &str, out: &mut Vec<NodeId>) {
        for &child in self.child_nodes(parent) {
            if let Some(el) = self.element_data(child) {
                if el.is_html() && el.local_name() == name && !el.is_upgraded() {
                    out.push(child);
                }
                if let Some(shadow_root) = el.shadow_root() {
                    self.collect_upgrade_candidates(shadow_root, name, out);
                }
            }
            self.collect_upgrade_candidates(child, name, out);
        }
    }

    /// Retrofit `placeholder` with a component built by `constructor`
    fn upgrade(&mut self, placeholder: NodeId, constructor: &ElementConstructor) {
        let Some(source) = self.element_data(placeholder).cloned() else {
            return;
        };
        tracing::debug!(element = %placeholder, name = source.local_name(), "upgrading custom element");

        let fresh = self.alloc_element(source.local_name(), source.namespace().cloned());
        if let Some(el) = self.element_data_mut(fresh) {
            for attr in source.attributes() {
                el.attributes.set_named_item_ns(attr.clone());
            }
            if source.style().is_some() {
                el.style = source.style.clone();
            }
            if el.shadow_root.is_none() {
                el.shadow_root = source.shadow_root();
            }
        }

        self.construct_instance(fresh, constructor);

        for child in self.child_nodes(placeholder).to_vec() {
            self.unlink(child);
            self.link_child(fresh, child, None);
        }

        self.adopt_slot(placeholder, fresh);
    }

    /// Move the contents of slot `fresh` into `target`, keeping `target`'s
    /// parent link and listeners, and repoint everything that referred to
    /// `fresh`.
    fn adopt_slot(&mut self, target: NodeId, fresh: NodeId) {
        let Some(slot) = self.node_mut(fresh) else {
            return;
        };
        let moved = std::mem::replace(slot, Node::new(NodeData::Comment(String::new())));
        let Some(node) = self.node_mut(target) else {
            return;
        };
        node.data = moved.data;
        node.children = moved.children;
        node.listeners.extend(moved.listeners);

        for child in self.child_nodes(target).to_vec() {
            if let Some(node) = self.node_mut(child) {
                node.parent = Some(target);
            }
        }
        let (shadow_root, template_content) = match self.element_data(target) {
            Some(el) => (el.shadow_root(), el.template_content()),
            None => (None, None),
        };
        if let Some(NodeData::DocumentFragment(fragment)) = shadow_root.and_then(|id| self.node_mut(id)).map(|n| &mut n.data) {
            fragment.host = Some(target);
        }
        if let Some(NodeData::DocumentFragment(fragment)) = template_content.and_then(|id| self.node_mut(id)).map(|n| &mut n.data) {
            fragment.template = Some(target);
        }
        if let Some(instance) = self.instances.remove(&fresh) {
            self.instances.insert(target, instance);
        }
    }

    pub(crate) fn fire_connected(&mut self, element: NodeId) {
        self.invoke_lifecycle(element, "connectedCallback", |component, doc, id| {
            component.connected_callback(doc, id)
        });
    }

    pub(crate) fn fire_disconnected(&mut self, element: NodeId) {
        self.invoke_lifecycle(element, "disconnectedCallback", |component, doc, id| {
            component.disconnected_callback(doc, id)
        });
    }

    /// `attributeChangedCallback` for observed attributes of custom elements
    pub(crate) fn fire_attribute_changed(
        &mut self,
        element: NodeId,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        let Some(el) = self.element_data(element) else {
            return;
        };
        if !el.is_custom() || !self.instances.contains_key(&element) {
            return;
        }
        if !self.registry.observes(el.local_name(), name) {
            return;
        }
        self.invoke_lifecycle(element, "attributeChangedCallback", |component, doc, id| {
            component.attribute_changed_callback(doc, id, name, old_value, new_value)
        });
    }

    /// Run one callback on the instance behind `element`, logging failures
    fn invoke_lifecycle<F>(&mut self, element: NodeId, callback: &'static str, f: F)
    where
        F: FnOnce(&mut Box<dyn CustomElement>, &mut Document, NodeId) -> CallbackResult,
    {
        let Some(instance) = self.instances.get(&element).cloned() else {
            return;
        };
        let Ok(mut component) = instance.try_borrow_mut() else {
            tracing::warn!(element = %element, callback, "re-entrant lifecycle callback skipped");
            return;
        };
        if let Err(err) = f(&mut component, self, element) {
            tracing::error!(element = %element, callback, "custom element callback failed: {err:#}");
        }
    }
}
