//! Element Attributes
//!
//! Ordered, namespace-aware attribute collection (NamedNodeMap).
//!
//! Identity of an attribute is the pair `(name, namespace)`. Setting an
//! existing pair rewrites the value in place so ordering is preserved.

use std::ops::Index;

use crate::Namespace;

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    name: String,
    value: String,
    namespace: Option<Namespace>,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            namespace: None,
        }
    }

    pub fn with_namespace(namespace: Option<Namespace>, name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            namespace,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl ToString) {
        self.value = value.to_string();
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_ref().map(Namespace::uri)
    }

    fn matches(&self, namespace: Option<&Namespace>, name: &str) -> bool {
        self.name == name
            && Namespace::normalize_for_lookup(self.namespace.as_ref()) == Namespace::normalize_for_lookup(namespace)
    }
}

/// Named node map (attribute collection)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    attributes: Vec<Attr>,
    case_insensitive: bool,
}

impl AttributeMap {
    /// Create an empty map. HTML elements use case-insensitive maps,
    /// SVG/XML ones case-sensitive.
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            attributes: Vec::new(),
            case_insensitive,
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Get number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute by index
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attributes.get(index)
    }

    /// Get a null-namespace attribute by name
    pub fn get_named_item(&self, name: &str) -> Option<&Attr> {
        let name = self.normalize_name(name);
        self.get_named_item_ns(None, &name)
    }

    /// Get an attribute by `(namespace, name)`; XLink and no namespace
    /// are treated as the same namespace here.
    pub fn get_named_item_ns(&self, namespace: Option<&Namespace>, name: &str) -> Option<&Attr> {
        self.attributes.iter().find(|a| a.matches(namespace, name))
    }

    pub(crate) fn get_named_item_ns_mut(&mut self, namespace: Option<&Namespace>, name: &str) -> Option<&mut Attr> {
        self.attributes.iter_mut().find(|a| a.matches(namespace, name))
    }

    /// Set a null-namespace attribute
    pub fn set_named_item(&mut self, attr: Attr) -> Option<String> {
        self.set_named_item_ns(Attr { namespace: None, ..attr })
    }

    /// Set an attribute, replacing the value of an existing
    /// `(name, namespace)` pair in place. XLink and no namespace address
    /// the same attribute. Returns the previous value.
    pub fn set_named_item_ns(&mut self, mut attr: Attr) -> Option<String> {
        if attr.namespace.is_none() {
            attr.name = self.normalize_name(&attr.name);
        }
        if let Some(existing) = self.get_named_item_ns_mut(attr.namespace.as_ref(), &attr.name) {
            return Some(std::mem::replace(&mut existing.value, attr.value));
        }
        self.attributes.push(attr);
        None
    }

    /// Remove a null-namespace attribute by name
    pub fn remove_named_item(&mut self, name: &str) -> Option<Attr> {
        let name = self.normalize_name(name);
        self.remove_named_item_ns(None, &name)
    }

    /// Remove an attribute by `(namespace, name)`
    pub fn remove_named_item_ns(&mut self, namespace: Option<&Namespace>, name: &str) -> Option<Attr> {
        let index = self.attributes.iter().position(|a| a.matches(namespace, name))?;
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has_named_item(&self, name: &str) -> bool {
        self.get_named_item(name).is_some()
    }

    /// Get attribute names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Iterate over attributes
    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.attributes.iter()
    }

    fn normalize_name(&self, name: &str) -> String {
        if self.case_insensitive {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }
}

impl Index<usize> for AttributeMap {
    type Output = Attr;

    fn index(&self, index: usize) -> &Attr {
        &self.attributes[index]
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = AttributeMap::new(true);
        attrs.set_named_item(Attr::new("class", "btn"));
        attrs.set_named_item(Attr::new("id", "submit"));

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_named_item("class").map(Attr::value), Some("btn"));
        assert_eq!(attrs.get_named_item("id").map(Attr::value), Some("submit"));
    }

    #[test]
    fn test_same_pair_replaces_in_place() {
        let mut attrs = AttributeMap::new(false);
        attrs.set_named_item_ns(Attr::new("a", "1"));
        attrs.set_named_item_ns(Attr::new("b", "2"));
        let old = attrs.set_named_item_ns(Attr::new("a", "3"));

        assert_eq!(old.as_deref(), Some("1"));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name(), "a");
        assert_eq!(attrs[0].value(), "3");
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut attrs = AttributeMap::new(false);
        attrs.set_named_item_ns(Attr::new("lang", "en"));
        attrs.set_named_item_ns(Attr::with_namespace(Some(Namespace::Xml), "lang", "fr"));

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_named_item_ns(None, "lang").map(Attr::value), Some("en"));
        assert_eq!(attrs.get_named_item_ns(Some(&Namespace::Xml), "lang").map(Attr::value), Some("fr"));
    }

    #[test]
    fn test_xlink_merges_with_null_namespace_on_lookup() {
        let mut attrs = AttributeMap::new(false);
        attrs.set_named_item_ns(Attr::with_namespace(Some(Namespace::XLink), "href", "#a"));

        assert_eq!(attrs.get_named_item_ns(None, "href").map(Attr::value), Some("#a"));
        assert_eq!(attrs.get_named_item("href").map(Attr::value), Some("#a"));
        assert!(attrs.remove_named_item("href").is_some());
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_case_insensitive_map() {
        let mut html = AttributeMap::new(true);
        html.set_named_item(Attr::new("DATA-Foo", "x"));
        assert_eq!(html.names(), vec!["data-foo"]);
        assert!(html.has_named_item("Data-FOO"));

        let mut svg = AttributeMap::new(false);
        svg.set_named_item(Attr::new("viewBox", "0 0 1 1"));
        assert!(svg.has_named_item("viewBox"));
        assert!(!svg.has_named_item("viewbox"));
    }

    #[test]
    fn test_value_is_coerced_to_string() {
        let mut attrs = AttributeMap::new(true);
        attrs.set_named_item(Attr::new("tabindex", 3));
        assert_eq!(attrs.item(0).map(Attr::value), Some("3"));
    }
}
