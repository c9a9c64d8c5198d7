//! DOM errors
//!
//! Synchronous failures raised at the call site. Listener and lifecycle
//! callback failures never surface here; they are logged and swallowed.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Reference node is not a child of the parent
    #[error("node {child} not found within the child nodes of {parent}")]
    NotFound { parent: NodeId, child: NodeId },

    /// Insertion would break the tree shape
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    /// Id does not name a node of the expected kind
    #[error("node {0} is not valid for this operation")]
    InvalidNode(NodeId),

    /// Empty token
    #[error("the token provided must not be empty")]
    Syntax,

    /// Token containing ASCII whitespace
    #[error("the token provided ('{0}') contains HTML space characters, which are not valid in tokens")]
    InvalidCharacter(String),

    /// Selector the selector engine cannot parse
    #[error("'{0}' is not a valid selector")]
    InvalidSelector(String),

    /// `customElements.define` with a malformed name
    #[error("\"{0}\" is not a valid custom element name")]
    InvalidCustomElementName(String),

    /// Second definition for the same name
    #[error("the name \"{0}\" has already been used with this registry")]
    AlreadyDefined(String),

    /// No reflected property of that name on the element
    #[error("unknown property '{property}' on <{tag}>")]
    UnknownProperty { tag: String, property: String },

    /// Location that does not parse as a URL
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
