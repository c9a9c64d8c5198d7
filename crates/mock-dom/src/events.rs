//! DOM Events
//!
//! Per-node listener lists and a synchronous, bubbling dispatch. Bubbling
//! climbs parent links up to the document node and then, when the document
//! has a window, once more to the window.

use std::any::Any;
use std::rc::Rc;

use crate::node::{ListenerEntry, NodeData};
use crate::{CallbackResult, Document, NodeId};

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Node(NodeId),
    Window,
}

/// `EventInit` dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

/// DOM event (also covers `CustomEvent` through `detail`)
#[derive(Clone)]
pub struct Event {
    event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
    target: Option<EventTarget>,
    current_target: Option<EventTarget>,
    default_prevented: bool,
    cancel_bubble: bool,
    detail: Option<Rc<dyn Any>>,
}

impl Event {
    pub fn new(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            composed: init.composed,
            target: None,
            current_target: None,
            default_prevented: false,
            cancel_bubble: false,
            detail: None,
        }
    }

    /// `new CustomEvent(type, { detail })`
    pub fn with_detail<T: Any>(event_type: &str, init: EventInit, detail: T) -> Self {
        Self {
            detail: Some(Rc::new(detail)),
            ..Self::new(event_type, init)
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> Option<EventTarget> {
        self.target
    }

    pub fn current_target(&self) -> Option<EventTarget> {
        self.current_target
    }

    /// `CustomEvent.detail`, downcast to the caller's type
    pub fn detail<T: Any>(&self) -> Option<&T> {
        self.detail.as_deref().and_then(|d| d.downcast_ref::<T>())
    }

    /// Sets `defaultPrevented`; propagation carries on
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.cancel_bubble = true;
    }

    /// Same flag as [`Event::stop_propagation`]: listeners already queued on
    /// the current node still run.
    pub fn stop_immediate_propagation(&mut self) {
        self.cancel_bubble = true;
    }

    pub fn cancel_bubble(&self) -> bool {
        self.cancel_bubble
    }

    /// `composedPath()`: target, its ancestors up to the document, then the
    /// window when there is one
    pub fn composed_path(&self, doc: &Document) -> Vec<EventTarget> {
        let mut path = Vec::new();
        let mut current = match self.target {
            Some(EventTarget::Node(node)) => Some(node),
            Some(EventTarget::Window) => return vec![EventTarget::Window],
            None => return path,
        };
        while let Some(node) = current {
            path.push(EventTarget::Node(node));
            if node == NodeId::ROOT {
                if doc.has_window() {
                    path.push(EventTarget::Window);
                }
                break;
            }
            current = doc.parent_node(node);
        }
        path
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("bubbles", &self.bubbles)
            .field("cancelable", &self.cancelable)
            .field("target", &self.target)
            .field("current_target", &self.current_target)
            .field("default_prevented", &self.default_prevented)
            .field("cancel_bubble", &self.cancel_bubble)
            .field("has_detail", &self.detail.is_some())
            .finish()
    }
}

type ListenerFn = dyn Fn(&mut Document, &mut Event) -> CallbackResult;

/// Event listener callback. Equality is identity of the shared closure, so
/// keep a clone around to remove it later.
#[derive(Clone)]
pub struct EventListener(Rc<ListenerFn>);

impl EventListener {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Document, &mut Event) -> CallbackResult + 'static,
    {
        Self(Rc::new(f))
    }

    fn call(&self, doc: &mut Document, event: &mut Event) -> CallbackResult {
        (self.0)(doc, event)
    }
}

impl PartialEq for EventListener {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0))
    }
}

impl Document {
    /// `addEventListener`; duplicates are kept
    pub fn add_event_listener(&mut self, target: NodeId, event_type: &str, listener: EventListener) {
        if let Some(node) = self.node_mut(target) {
            node.listeners.push(ListenerEntry {
                event_type: event_type.to_string(),
                listener,
            });
        }
    }

    /// `removeEventListener`: drops the first matching `(type, listener)`
    pub fn remove_event_listener(&mut self, target: NodeId, event_type: &str, listener: &EventListener) {
        if let Some(node) = self.node_mut(target) {
            remove_entry(&mut node.listeners, event_type, listener);
        }
    }

    /// Listener on the window; ignored when the document has none
    pub fn add_window_listener(&mut self, event_type: &str, listener: EventListener) {
        if let Some(window) = &mut self.window {
            window.listeners.push(ListenerEntry {
                event_type: event_type.to_string(),
                listener,
            });
        }
    }

    pub fn remove_window_listener(&mut self, event_type: &str, listener: &EventListener) {
        if let Some(window) = &mut self.window {
            remove_entry(&mut window.listeners, event_type, listener);
        }
    }

    /// `dispatchEvent`. Returns `false` when a listener called
    /// `prevent_default`.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> bool {
        event.target = Some(EventTarget::Node(target));
        let mut current = Some(target);
        while let Some(node) = current {
            self.invoke_listeners(EventTarget::Node(node), event);
            if !event.bubbles || event.cancel_bubble {
                break;
            }
            let Some(n) = self.node(node) else {
                break;
            };
            let at_document = matches!(n.data, NodeData::Document);
            let host = match &n.data {
                NodeData::DocumentFragment(fragment) => fragment.host,
                _ => None,
            };
            current = if n.parent.is_some() {
                n.parent
            } else if at_document {
                if self.has_window() {
                    self.invoke_listeners(EventTarget::Window, event);
                }
                None
            } else if event.composed {
                host
            } else {
                None
            };
        }
        event.current_target = None;
        !event.default_prevented
    }

    /// Dispatch directly on the window
    pub fn dispatch_window_event(&mut self, event: &mut Event) -> bool {
        event.target = Some(EventTarget::Window);
        self.invoke_listeners(EventTarget::Window, event);
        event.current_target = None;
        !event.default_prevented
    }

    fn invoke_listeners(&mut self, current: EventTarget, event: &mut Event) {
        event.current_target = Some(current);
        let entries = match current {
            EventTarget::Node(node) => self.node(node).map(|n| n.listeners.as_slice()),
            EventTarget::Window => self.window.as_ref().map(|w| w.listeners.as_slice()),
        };
        let listeners: Vec<EventListener> = entries
            .unwrap_or_default()
            .iter()
            .filter(|entry| entry.event_type == event.event_type)
            .map(|entry| entry.listener.clone())
            .collect();

        for listener in listeners {
            if let Err(err) = listener.call(self, event) {
                tracing::error!(event = %event.event_type, current_target = ?current, "event listener failed: {err:#}");
            }
        }
    }
}

fn remove_entry(entries: &mut Vec<ListenerEntry>, event_type: &str, listener: &EventListener) {
    if let Some(index) = entries
        .iter()
        .position(|entry| entry.event_type == event_type && entry.listener == *listener)
    {
        entries.remove(index);
    }
}
