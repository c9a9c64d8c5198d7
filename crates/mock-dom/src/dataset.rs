//! DOMStringMap (dataset)
//!
//! camelCase view over an element's `data-*` attributes. Writes go through
//! the element's attribute API so observed-attribute callbacks still fire.

use crate::{Document, DomResult, NodeId};

/// Live `data-*` view of one element
pub struct Dataset<'a> {
    doc: &'a mut Document,
    element: NodeId,
}

impl<'a> Dataset<'a> {
    pub(crate) fn new(doc: &'a mut Document, element: NodeId) -> Self {
        Self { doc, element }
    }

    /// Get value by camelCase key
    pub fn get(&self, key: &str) -> Option<String> {
        self.doc.get_attribute(self.element, &Self::to_attribute_name(key))
    }

    /// Set value by camelCase key
    pub fn set(&mut self, key: &str, value: impl ToString) -> DomResult<()> {
        self.doc.set_attribute(self.element, &Self::to_attribute_name(key), value)
    }

    /// Delete by key
    pub fn remove(&mut self, key: &str) -> DomResult<bool> {
        let name = Self::to_attribute_name(key);
        let existed = self.doc.has_attribute(self.element, &name);
        self.doc.remove_attribute(self.element, &name)?;
        Ok(existed)
    }

    /// Check if key exists
    pub fn has(&self, key: &str) -> bool {
        self.doc.has_attribute(self.element, &Self::to_attribute_name(key))
    }

    /// All camelCase keys in attribute order
    pub fn keys(&self) -> Vec<String> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }

    /// `(camelCaseKey, value)` pairs in attribute order
    pub fn entries(&self) -> Vec<(String, String)> {
        let Some(attrs) = self.doc.attributes(self.element) else {
            return Vec::new();
        };
        attrs
            .iter()
            .filter(|attr| attr.namespace().is_none())
            .filter_map(|attr| {
                attr.name()
                    .strip_prefix("data-")
                    .map(|key| (to_camel_case(key), attr.value().to_string()))
            })
            .collect()
    }

    /// Convert key to attribute name
    pub fn to_attribute_name(key: &str) -> String {
        format!("data-{}", to_kebab_case(key))
    }
}

/// Convert kebab-case to camelCase
pub(crate) fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert camelCase to kebab-case
pub(crate) fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
