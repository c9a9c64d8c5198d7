//! Mock DOM - Document Object Model without a browser
//!
//! Arena-backed node tree with enough DOM semantics (namespaces, attribute
//! identity, inline styles, event bubbling, custom element upgrades) to run
//! component code during tests and server-side rendering, plus the
//! serializer that turns a subtree back into HTML text.
//!
//! Parsing lives in the `mock-html` crate, which drives html5ever against
//! the building blocks exposed here.

mod attributes;
mod classlist;
mod custom_elements;
mod dataset;
mod document;
mod element;
mod element_kind;
mod error;
mod events;
mod namespace;
mod node;
mod selector;
mod serializer;
mod style;
mod tree;
mod window;

pub use attributes::{Attr, AttributeMap};
pub use classlist::ClassList;
pub use custom_elements::{
    CallbackMode, CallbackResult, CustomElement, CustomElementRegistry, CustomElements,
    ElementConstructor, ElementDefinitionOptions, ElementInstance, WhenDefined,
};
pub use dataset::Dataset;
pub use document::{Document, QuirksMode};
pub use element_kind::{ElementKind, PropertyType, PropertyValue, ReflectedProperty};
pub use error::{DomError, DomResult};
pub use events::{Event, EventInit, EventListener, EventTarget};
pub use namespace::Namespace;
pub use node::{DocumentTypeData, ElementData, FragmentData, Node, NodeData, NodeType};
pub use selector::{SelectorEngine, SimpleSelectorEngine};
pub use serializer::{SerializeOptions, serialize_node_to_html};
pub use style::CssStyleDeclaration;
pub use window::{Storage, Window};

/// Node identifier. Ids are handed out in increasing order and are never
/// reused by the same document, even across [`Document::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node of every arena
    pub const ROOT: NodeId = NodeId(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
