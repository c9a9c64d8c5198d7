//! Namespaces
//!
//! The fixed vocabulary of namespace URIs the mock DOM distinguishes, plus a
//! catch-all for anything else a caller hands in.

/// Namespace URI of an element or attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
    XLink,
    Xml,
    Xmlns,
    /// Unrecognized URI, kept verbatim
    Other(String),
}

impl Namespace {
    pub const HTML_URI: &'static str = "http://www.w3.org/1999/xhtml";
    pub const SVG_URI: &'static str = "http://www.w3.org/2000/svg";
    pub const MATHML_URI: &'static str = "http://www.w3.org/1998/Math/MathML";
    pub const XLINK_URI: &'static str = "http://www.w3.org/1999/xlink";
    pub const XML_URI: &'static str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS_URI: &'static str = "http://www.w3.org/2000/xmlns/";

    /// Classify a namespace URI. Empty strings mean "no namespace".
    pub fn from_uri(uri: &str) -> Option<Self> {
        Some(match uri {
            "" => return None,
            Self::HTML_URI => Self::Html,
            Self::SVG_URI => Self::Svg,
            Self::MATHML_URI => Self::MathMl,
            Self::XLINK_URI => Self::XLink,
            Self::XML_URI => Self::Xml,
            Self::XMLNS_URI => Self::Xmlns,
            other => Self::Other(other.to_string()),
        })
    }

    /// The namespace URI
    pub fn uri(&self) -> &str {
        match self {
            Self::Html => Self::HTML_URI,
            Self::Svg => Self::SVG_URI,
            Self::MathMl => Self::MATHML_URI,
            Self::XLink => Self::XLINK_URI,
            Self::Xml => Self::XML_URI,
            Self::Xmlns => Self::XMLNS_URI,
            Self::Other(uri) => uri,
        }
    }

    /// Attribute lookups treat XLink as "no namespace"
    pub(crate) fn normalize_for_lookup(ns: Option<&Namespace>) -> Option<&Namespace> {
        match ns {
            Some(Namespace::XLink) => None,
            other => other,
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uri_round_trip() {
        for ns in [Namespace::Html, Namespace::Svg, Namespace::MathMl, Namespace::XLink, Namespace::Xml, Namespace::Xmlns] {
            assert_eq!(Namespace::from_uri(ns.uri()), Some(ns));
        }
        assert_eq!(Namespace::from_uri(""), None);
        assert_eq!(
            Namespace::from_uri("urn:custom"),
            Some(Namespace::Other("urn:custom".to_string()))
        );
    }

    #[test]
    fn test_xlink_normalizes_to_none() {
        assert_eq!(Namespace::normalize_for_lookup(Some(&Namespace::XLink)), None);
        assert_eq!(Namespace::normalize_for_lookup(Some(&Namespace::Svg)), Some(&Namespace::Svg));
    }
}
