//! Element API
//!
//! Attribute access, inline style, reflected properties, shadow roots and
//! selector queries. Attribute writes report to the custom element
//! machinery so observed attributes fire `attributeChangedCallback`.

use crate::node::{FragmentData, NodeData};
use crate::{
    Attr, AttributeMap, ClassList, CssStyleDeclaration, Dataset, Document, DomError, DomResult, ElementKind,
    Namespace, NodeId, PropertyType, PropertyValue, SerializeOptions, serialize_node_to_html,
};

impl Document {
    /// Attribute map of an element (the inline style is kept apart)
    pub fn attributes(&self, id: NodeId) -> Option<&AttributeMap> {
        self.element_data(id).map(|el| el.attributes())
    }

    pub fn element_kind(&self, id: NodeId) -> Option<ElementKind> {
        self.element_data(id).map(|el| el.kind())
    }

    /// `tagName`
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        self.element_data(id).map(|el| el.tag_name())
    }

    /// `nodeName`
    pub fn node_name(&self, id: NodeId) -> Option<String> {
        self.node(id).map(|node| node.data().node_name())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element_data(id)?;
        if el.is_style_attribute(name) {
            return el.style().map(CssStyleDeclaration::css_text);
        }
        el.attributes().get_named_item(name).map(|attr| attr.value().to_string())
    }

    pub fn get_attribute_ns(&self, id: NodeId, namespace_uri: Option<&str>, name: &str) -> Option<String> {
        let namespace = namespace_uri.and_then(Namespace::from_uri);
        self.element_data(id)?
            .attributes()
            .get_named_item_ns(namespace.as_ref(), name)
            .map(|attr| attr.value().to_string())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element_data(id).is_some_and(|el| {
            if el.is_style_attribute(name) {
                el.style().is_some()
            } else {
                el.attributes().has_named_item(name)
            }
        })
    }

    /// Attribute names in order, `style` last when present
    pub fn get_attribute_names(&self, id: NodeId) -> Vec<String> {
        let Some(el) = self.element_data(id) else {
            return Vec::new();
        };
        let mut names: Vec<String> = el.attributes().names().into_iter().map(str::to_string).collect();
        if el.style().is_some() {
            names.push("style".to_string());
        }
        names
    }

    /// `setAttribute`. HTML elements lower-case the name.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl ToString) -> DomResult<()> {
        let value = value.to_string();
        let el = self.try_element_mut(id)?;
        let (name, old) = if el.is_style_attribute(name) {
            let old = el.style.as_ref().map(CssStyleDeclaration::css_text);
            el.style.get_or_insert_with(CssStyleDeclaration::new).set_css_text(&value);
            ("style".to_string(), old)
        } else {
            let attr = Attr::new(name, &value);
            let old = el.attributes.set_named_item(attr);
            let name = if el.attributes.is_case_insensitive() {
                name.to_ascii_lowercase()
            } else {
                name.to_string()
            };
            (name, old)
        };
        self.fire_attribute_changed(id, &name, old.as_deref(), Some(&value));
        Ok(())
    }

    /// `setAttributeNS`. The prefix of a qualified name is dropped; the
    /// serializer restores well-known prefixes from the namespace.
    pub fn set_attribute_ns(
        &mut self,
        id: NodeId,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        value: impl ToString,
    ) -> DomResult<()> {
        let namespace = namespace_uri.and_then(Namespace::from_uri);
        if namespace.is_none() {
            return self.set_attribute(id, qualified_name, value);
        }
        let local_name = match qualified_name.split_once(':') {
            Some((_, local)) => local,
            None => qualified_name,
        };
        let value = value.to_string();
        let el = self.try_element_mut(id)?;
        let old = el
            .attributes
            .set_named_item_ns(Attr::with_namespace(namespace, local_name, &value));
        self.fire_attribute_changed(id, local_name, old.as_deref(), Some(&value));
        Ok(())
    }

    /// `removeAttribute`
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        let el = self.try_element_mut(id)?;
        if el.is_style_attribute(name) {
            if let Some(style) = el.style.take() {
                self.fire_attribute_changed(id, "style", Some(&style.css_text()), None);
            }
            return Ok(());
        }
        if let Some(attr) = el.attributes.remove_named_item(name) {
            self.fire_attribute_changed(id, attr.name(), Some(attr.value()), None);
        }
        Ok(())
    }

    /// `removeAttributeNS`
    pub fn remove_attribute_ns(&mut self, id: NodeId, namespace_uri: Option<&str>, name: &str) -> DomResult<()> {
        let namespace = namespace_uri.and_then(Namespace::from_uri);
        let el = self.try_element_mut(id)?;
        if let Some(attr) = el.attributes.remove_named_item_ns(namespace.as_ref(), name) {
            self.fire_attribute_changed(id, attr.name(), Some(attr.value()), None);
        }
        Ok(())
    }

    /// `toggleAttribute`; returns whether the attribute is now present
    pub fn toggle_attribute(&mut self, id: NodeId, name: &str, force: Option<bool>) -> DomResult<bool> {
        let present = self.has_attribute(id, name);
        match force {
            Some(true) | None if !present => {
                self.set_attribute(id, name, "")?;
                Ok(true)
            }
            Some(false) | None if present => {
                self.remove_attribute(id, name)?;
                Ok(false)
            }
            _ => Ok(present),
        }
    }

    pub fn id(&self, id: NodeId) -> String {
        self.get_attribute(id, "id").unwrap_or_default()
    }

    pub fn set_id(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute(id, "id", value)
    }

    pub fn class_name(&self, id: NodeId) -> String {
        self.get_attribute(id, "class").unwrap_or_default()
    }

    pub fn set_class_name(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute(id, "class", value)
    }

    /// `classList`
    pub fn class_list(&mut self, id: NodeId) -> ClassList<'_> {
        ClassList::new(self, id)
    }

    /// `dataset`
    pub fn dataset(&mut self, id: NodeId) -> Dataset<'_> {
        Dataset::new(self, id)
    }

    /// Inline style, if the element has one
    pub fn style(&self, id: NodeId) -> Option<&CssStyleDeclaration> {
        self.element_data(id)?.style()
    }

    /// Inline style for writing, created empty on first access
    pub fn style_mut(&mut self, id: NodeId) -> DomResult<&mut CssStyleDeclaration> {
        let el = self.try_element_mut(id)?;
        Ok(el.style.get_or_insert_with(CssStyleDeclaration::new))
    }

    // ---- reflected properties ----

    /// Read a typed property reflected from an attribute (`a.href`,
    /// `input.disabled`, `canvas.width`, ...)
    pub fn get_property(&self, id: NodeId, name: &str) -> DomResult<PropertyValue> {
        let el = self.try_element(id)?;
        let prop = el.kind().property(name).ok_or_else(|| DomError::UnknownProperty {
            tag: el.local_name().to_string(),
            property: name.to_string(),
        })?;
        let raw = self.get_attribute(id, prop.attribute);
        Ok(match prop.ty {
            PropertyType::Str => PropertyValue::Str(raw.unwrap_or_else(|| prop.default.to_string())),
            PropertyType::Bool => PropertyValue::Bool(raw.is_some()),
            PropertyType::Long => {
                let parsed = raw.and_then(|v| v.trim().parse::<i64>().ok());
                PropertyValue::Long(parsed.unwrap_or_else(|| prop.default.parse().unwrap_or(0)))
            }
            PropertyType::Url => PropertyValue::Str(match raw {
                Some(raw) => self.resolve_url(&raw),
                None => String::new(),
            }),
        })
    }

    /// Write a typed property through to its attribute
    pub fn set_property(&mut self, id: NodeId, name: &str, value: impl Into<PropertyValue>) -> DomResult<()> {
        let el = self.try_element(id)?;
        let prop = el.kind().property(name).ok_or_else(|| DomError::UnknownProperty {
            tag: el.local_name().to_string(),
            property: name.to_string(),
        })?;
        let value = value.into();
        match prop.ty {
            PropertyType::Bool => {
                self.toggle_attribute(id, prop.attribute, Some(value.is_truthy()))?;
            }
            PropertyType::Str | PropertyType::Url | PropertyType::Long => {
                self.set_attribute(id, prop.attribute, value)?;
            }
        }
        Ok(())
    }

    /// Resolve against the window location; unresolvable input is returned as-is
    fn resolve_url(&self, raw: &str) -> String {
        match self.location().map(|base| base.join(raw)) {
            Some(Ok(url)) => url.to_string(),
            _ => raw.to_string(),
        }
    }

    // ---- template & shadow DOM ----

    /// `template.content`
    pub fn template_content(&self, id: NodeId) -> Option<NodeId> {
        self.element_data(id)?.template_content()
    }

    /// `attachShadow`: a fragment whose `host` is this element
    pub fn attach_shadow(&mut self, id: NodeId) -> DomResult<NodeId> {
        if self.try_element(id)?.shadow_root().is_some() {
            return Err(DomError::HierarchyRequest("element already hosts a shadow root"));
        }
        let root = self.alloc(NodeData::DocumentFragment(FragmentData {
            host: Some(id),
            template: None,
        }));
        self.try_element_mut(id)?.shadow_root = Some(root);
        Ok(root)
    }

    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.element_data(id)?.shadow_root()
    }

    /// Host of a shadow root
    pub fn host(&self, fragment: NodeId) -> Option<NodeId> {
        match self.node(fragment)?.data() {
            NodeData::DocumentFragment(data) => data.host,
            _ => None,
        }
    }

    // ---- selectors ----

    /// `element.matches(selector)`
    pub fn matches(&self, id: NodeId, selector: &str) -> DomResult<bool> {
        self.selector_engine().matches(self, selector, id)
    }

    /// `querySelector` over the descendants of `root`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        self.selector_engine().select_one(self, selector, root)
    }

    /// `querySelectorAll` over the descendants of `root`
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        self.selector_engine().select_all(self, selector, root)
    }

    /// `closest`: nearest inclusive ancestor element matching `selector`
    pub fn closest(&self, id: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let engine = self.selector_engine();
        let mut current = Some(id).filter(|&node| self.element_data(node).is_some());
        while let Some(node) = current {
            if engine.matches(self, selector, node)? {
                return Ok(Some(node));
            }
            current = self.parent_element(node);
        }
        Ok(None)
    }

    // ---- serialization ----

    /// `innerHTML` getter
    pub fn inner_html(&self, id: NodeId) -> String {
        serialize_node_to_html(self, id, &SerializeOptions::default())
    }

    /// `outerHTML` getter
    pub fn outer_html(&self, id: NodeId) -> String {
        let options = SerializeOptions {
            outer_html: true,
            ..SerializeOptions::default()
        };
        serialize_node_to_html(self, id, &options)
    }
}
