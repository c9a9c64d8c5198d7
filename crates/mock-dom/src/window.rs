//! Window
//!
//! Owns a document and the browser-ish globals around it: location,
//! window-level listeners, the custom element registry and web storage.

use url::Url;

use crate::node::ListenerEntry;
use crate::{CustomElements, Document, DomResult, Event, EventListener};

/// Window state the document needs for dispatch and URL resolution
#[derive(Debug, Clone)]
pub(crate) struct WindowState {
    pub(crate) location: Url,
    pub(crate) listeners: Vec<ListenerEntry>,
}

/// `window`
#[derive(Debug)]
pub struct Window {
    document: Document,
    /// Mirrored into the document's window state for URL resolution
    location: Url,
    local_storage: Storage,
    session_storage: Storage,
}

impl Window {
    pub const DEFAULT_URL: &'static str = "http://localhost/";

    /// Window over a fresh html/head/body document at [`Self::DEFAULT_URL`]
    ///
    /// `DEFAULT_URL` is a constant absolute URL, so parsing it cannot fail.
    pub fn new() -> Self {
        let location = Url::parse(Self::DEFAULT_URL).expect("DEFAULT_URL is an absolute URL");
        Self::with_location(Document::new(), location)
    }

    /// Window at `url`
    pub fn with_url(url: &str) -> DomResult<Self> {
        Ok(Self::with_location(Document::new(), Url::parse(url)?))
    }

    /// Become the `defaultView` of an existing (e.g. parsed) document
    pub fn with_document(document: Document, url: &str) -> DomResult<Self> {
        Ok(Self::with_location(document, Url::parse(url)?))
    }

    fn with_location(mut document: Document, location: Url) -> Self {
        document.window = Some(WindowState {
            location: location.clone(),
            listeners: Vec::new(),
        });
        Self {
            document,
            location,
            local_storage: Storage::default(),
            session_storage: Storage::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Detach the document; it no longer has a `defaultView`
    pub fn into_document(mut self) -> Document {
        self.document.window = None;
        self.document
    }

    /// `window.customElements`
    pub fn custom_elements(&mut self) -> CustomElements<'_> {
        self.document.custom_elements()
    }

    /// `window.location`
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Navigate `location` (no loading happens)
    pub fn set_location(&mut self, url: &str) -> DomResult<()> {
        self.location = self.location.join(url)?;
        if let Some(state) = &mut self.document.window {
            state.location = self.location.clone();
        }
        Ok(())
    }

    pub fn add_event_listener(&mut self, event_type: &str, listener: EventListener) {
        self.document.add_window_listener(event_type, listener);
    }

    pub fn remove_event_listener(&mut self, event_type: &str, listener: &EventListener) {
        self.document.remove_window_listener(event_type, listener);
    }

    pub fn dispatch_event(&mut self, event: &mut Event) -> bool {
        self.document.dispatch_window_event(event)
    }

    pub fn local_storage(&self) -> &Storage {
        &self.local_storage
    }

    pub fn local_storage_mut(&mut self) -> &mut Storage {
        &mut self.local_storage
    }

    pub fn session_storage(&self) -> &Storage {
        &self.session_storage
    }

    pub fn session_storage_mut(&mut self) -> &mut Storage {
        &mut self.session_storage
    }

    /// Restore the document skeleton and drop listeners and storage
    pub fn reset(&mut self) {
        self.document.reset();
        self.local_storage.clear();
        self.session_storage.clear();
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

/// Web storage (`localStorage`/`sessionStorage`): string pairs in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage {
    items: Vec<(String, String)>,
}

impl Storage {
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_item(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.items.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.items.push((key.to_string(), value)),
        }
    }

    pub fn remove_item(&mut self, key: &str) {
        self.items.retain(|(k, _)| k != key);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Key at `index`
    pub fn key(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomError, PropertyValue};

    #[test]
    fn test_default_location() {
        let window = Window::new();
        assert_eq!(window.location().as_str(), "http://localhost/");
        assert!(window.document().has_window());
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(Window::with_url("not a url"), Err(DomError::InvalidUrl(_))));
    }

    #[test]
    fn test_relative_navigation() {
        let mut window = Window::with_url("https://example.com/app/index.html").unwrap();
        window.set_location("../about").unwrap();
        assert_eq!(window.location().as_str(), "https://example.com/about");
        assert_eq!(window.document().location().map(Url::as_str), Some("https://example.com/about"));

        assert!(window.set_location("http://[bad").is_err());
        assert_eq!(window.location().as_str(), "https://example.com/about");
    }

    #[test]
    fn test_url_properties_resolve_against_location() {
        let mut window = Window::with_url("https://example.com/docs/").unwrap();
        let doc = window.document_mut();
        let a = doc.create_element("a");
        doc.set_attribute(a, "href", "guide.html").unwrap();
        assert_eq!(
            doc.get_property(a, "href").unwrap(),
            PropertyValue::from("https://example.com/docs/guide.html")
        );
    }

    #[test]
    fn test_storage() {
        let mut window = Window::new();
        let storage = window.local_storage_mut();
        storage.set_item("a", 1);
        storage.set_item("b", "two");
        storage.set_item("a", "one");
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get_item("a"), Some("one"));
        assert_eq!(storage.key(1), Some("b"));
        storage.remove_item("a");
        assert_eq!(storage.key(0), Some("b"));

        window.reset();
        assert!(window.local_storage().is_empty());
    }

    #[test]
    fn test_into_document_drops_window() {
        let window = Window::new();
        let doc = window.into_document();
        assert!(!doc.has_window());
    }
}
