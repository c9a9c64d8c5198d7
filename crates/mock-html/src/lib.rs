//! Mock HTML Parser
//!
//! HTML5 parsing into the mock DOM, built on html5ever. The tree builder
//! writes straight into a [`mock_dom::Document`] arena through a
//! `TreeSink`; serialization back to text lives in `mock-dom` itself.

mod parser;
mod sink;

use mock_dom::{DomError, NodeId};

pub use parser::{
    HtmlParser, InnerHtml, ParseOptions, parse_html_into, parse_html_to_document, parse_html_to_fragment,
};

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A tree operation on the target document failed
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Node that cannot receive parsed children
    #[error("node {0} cannot hold parsed content")]
    InvalidTarget(NodeId),

    /// The tree builder produced no fragment root element
    #[error("fragment parse produced no root element")]
    MissingFragmentRoot,
}
