//! DOMTokenList (classList)
//!
//! Live view over an element's `class` attribute. Reads re-tokenize the
//! attribute every time; writes store the normalized token list back.

use crate::{Document, DomError, DomResult, NodeId};

/// `element.classList`
pub struct ClassList<'a> {
    doc: &'a mut Document,
    element: NodeId,
}

impl<'a> ClassList<'a> {
    pub(crate) fn new(doc: &'a mut Document, element: NodeId) -> Self {
        Self { doc, element }
    }

    /// Distinct tokens in attribute order
    pub fn tokens(&self) -> Vec<String> {
        let value = self.doc.get_attribute(self.element, "class").unwrap_or_default();
        let mut tokens: Vec<String> = Vec::new();
        for token in value.split_ascii_whitespace() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        tokens
    }

    /// Get number of tokens
    pub fn len(&self) -> usize {
        self.tokens().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    /// Get token at index
    pub fn item(&self, index: usize) -> Option<String> {
        self.tokens().into_iter().nth(index)
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens().iter().any(|t| t == token)
    }

    /// Add token(s)
    pub fn add(&mut self, tokens: &[&str]) -> DomResult<()> {
        validate(tokens)?;
        let mut current = self.tokens();
        let before = current.len();
        for token in tokens {
            if !current.iter().any(|t| t == token) {
                current.push(token.to_string());
            }
        }
        if current.len() == before {
            return Ok(());
        }
        self.store(&current)
    }

    /// Remove token(s)
    pub fn remove(&mut self, tokens: &[&str]) -> DomResult<()> {
        validate(tokens)?;
        if !self.doc.has_attribute(self.element, "class") {
            return Ok(());
        }
        let mut current = self.tokens();
        current.retain(|t| !tokens.contains(&t.as_str()));
        self.store(&current)
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> DomResult<bool> {
        validate(&[token])?;
        let present = self.contains(token);
        match force {
            Some(true) | None if !present => {
                self.add(&[token])?;
                Ok(true)
            }
            Some(false) | None if present => {
                self.remove(&[token])?;
                Ok(false)
            }
            _ => Ok(present),
        }
    }

    /// Replace token, returns whether `old_token` was present
    pub fn replace(&mut self, old_token: &str, new_token: &str) -> DomResult<bool> {
        validate(&[old_token, new_token])?;
        let mut current = self.tokens();
        let Some(index) = current.iter().position(|t| t == old_token) else {
            return Ok(false);
        };
        if current.iter().any(|t| t == new_token) {
            current.remove(index);
        } else {
            current[index] = new_token.to_string();
        }
        self.store(&current)?;
        Ok(true)
    }

    /// Serialized value (`classList.value`)
    pub fn value(&self) -> String {
        self.tokens().join(" ")
    }

    fn store(&mut self, tokens: &[String]) -> DomResult<()> {
        self.doc.set_attribute(self.element, "class", tokens.join(" "))
    }
}

fn validate(tokens: &[&str]) -> DomResult<()> {
    for token in tokens {
        if token.is_empty() {
            return Err(DomError::Syntax);
        }
        if token.chars().any(|c| c.is_ascii_whitespace()) {
            return Err(DomError::InvalidCharacter(token.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let mut classes = doc.class_list(div);
        classes.add(&["x"]).unwrap();
        classes.add(&["x"]).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(doc.get_attribute(div, "class").as_deref(), Some("x"));
    }

    #[test]
    fn test_toggle_twice_restores_attribute() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "a b").unwrap();

        assert!(doc.class_list(div).toggle("x", None).unwrap());
        assert_eq!(doc.get_attribute(div, "class").as_deref(), Some("a b x"));
        assert!(!doc.class_list(div).toggle("x", None).unwrap());
        assert_eq!(doc.get_attribute(div, "class").as_deref(), Some("a b"));
    }

    #[test]
    fn test_duplicate_tokens_collapse() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "a  a b").unwrap();
        assert_eq!(doc.class_list(div).tokens(), vec!["a", "b"]);
        assert_eq!(doc.class_list(div).item(1).as_deref(), Some("b"));
    }

    #[test]
    fn test_add_existing_token_keeps_attribute_text() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "a  a b").unwrap();
        doc.class_list(div).add(&["a", "b"]).unwrap();
        assert_eq!(doc.get_attribute(div, "class").as_deref(), Some("a  a b"));

        doc.class_list(div).add(&["c"]).unwrap();
        assert_eq!(doc.get_attribute(div, "class").as_deref(), Some("a b c"));
    }

    #[test]
    fn test_invalid_tokens() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let mut classes = doc.class_list(div);
        assert_eq!(classes.add(&[""]), Err(DomError::Syntax));
        assert_eq!(classes.add(&["a b"]), Err(DomError::InvalidCharacter("a b".into())));
        assert!(classes.toggle("", None).is_err());
        assert!(!doc.has_attribute(div, "class"));
    }

    #[test]
    fn test_remove_without_attribute_does_not_create_it() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.class_list(div).remove(&["a"]).unwrap();
        assert!(!doc.has_attribute(div, "class"));
    }

    #[test]
    fn test_replace() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "a b c").unwrap();
        assert!(doc.class_list(div).replace("b", "z").unwrap());
        assert!(!doc.class_list(div).replace("q", "z").unwrap());
        assert!(doc.class_list(div).replace("a", "c").unwrap());
        assert_eq!(doc.class_list(div).value(), "z c");
    }
}
