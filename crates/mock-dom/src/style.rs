//! CSSStyleDeclaration
//!
//! Raw storage of an element's inline `style` attribute. No cascade, no
//! value validation: properties are kept as dash-cased name/value strings
//! in insertion order.

use crate::dataset::to_kebab_case;

/// Inline style declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    properties: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from `style` attribute text
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        style.set_css_text(css_text);
        style
    }

    /// Set a property. Empty values delete the property.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = css_property_name(name);
        let value = value.trim();
        if value.is_empty() {
            self.properties.retain(|(prop, _)| *prop != name);
            return;
        }
        match self.properties.iter_mut().find(|(prop, _)| *prop == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.properties.push((name, value.to_string())),
        }
    }

    /// Get a property value, or the empty string when unset
    pub fn get_property_value(&self, name: &str) -> &str {
        let name = css_property_name(name);
        self.properties
            .iter()
            .find(|(prop, _)| *prop == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Remove a property, returning its old value (empty when unset)
    pub fn remove_property(&mut self, name: &str) -> String {
        let name = css_property_name(name);
        match self.properties.iter().position(|(prop, _)| *prop == name) {
            Some(index) => self.properties.remove(index).1,
            None => String::new(),
        }
    }

    /// Property read through the dynamic surface (`style.backgroundColor`)
    pub fn get(&self, name: &str) -> &str {
        self.get_property_value(name)
    }

    /// Property write through the dynamic surface (`style.backgroundColor = ..`)
    pub fn set(&mut self, name: &str, value: &str) {
        self.set_property(name, value);
    }

    /// Serialize as `prop: value;` pairs
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(prop, value)| format!("{prop}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replace every property with the declarations in `css_text`
    pub fn set_css_text(&mut self, css_text: &str) {
        self.properties.clear();
        for rule in css_text.split(';') {
            // Values may contain further colons (urls, timing functions)
            let Some((prop, value)) = rule.split_once(':') else {
                continue;
            };
            let prop = prop.trim();
            let value = value.trim();
            if !prop.is_empty() && !value.is_empty() {
                self.set_property(prop, value);
            }
        }
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property name at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.properties.get(index).map(|(prop, _)| prop.as_str())
    }

    /// Iterate `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for CssStyleDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.css_text())
    }
}

/// camelCase to dash-case; custom properties pass through untouched
fn css_property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    match name {
        "cssFloat" => "float".to_string(),
        _ => to_kebab_case(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_text_round_trip() {
        let style = CssStyleDeclaration::parse("color: red; font-size: 2px");
        assert_eq!(style.len(), 2);
        assert_eq!(style.css_text(), "color: red; font-size: 2px;");
        assert_eq!(CssStyleDeclaration::parse(&style.css_text()), style);
    }

    #[test]
    fn test_camel_case_access() {
        let mut style = CssStyleDeclaration::new();
        style.set("backgroundColor", "blue");
        assert_eq!(style.get_property_value("background-color"), "blue");
        assert_eq!(style.get("backgroundColor"), "blue");
        assert_eq!(style.item(0), Some("background-color"));
    }

    #[test]
    fn test_empty_value_removes_property() {
        let mut style = CssStyleDeclaration::parse("color: red; margin: 0");
        style.set("color", "");
        assert_eq!(style.len(), 1);
        assert_eq!(style.get("color"), "");
        assert_eq!(style.css_text(), "margin: 0;");
    }

    #[test]
    fn test_value_keeps_colons() {
        let style = CssStyleDeclaration::parse("background: url(http://x/y.png); transition: all 1s cubic-bezier(0,0,1,1)");
        assert_eq!(style.get("background"), "url(http://x/y.png)");
        assert_eq!(style.get("transition"), "all 1s cubic-bezier(0,0,1,1)");
    }

    #[test]
    fn test_setter_clears_previous_properties() {
        let mut style = CssStyleDeclaration::parse("color: red");
        style.set_css_text("margin: 1px;;  : nothing; padding:");
        assert_eq!(style.css_text(), "margin: 1px;");
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut style = CssStyleDeclaration::parse("a: 1; b: 2");
        style.set_property("a", "3");
        assert_eq!(style.css_text(), "a: 3; b: 2;");
        assert_eq!(style.remove_property("a"), "3");
        assert_eq!(style.remove_property("a"), "");
    }

    #[test]
    fn test_custom_properties() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("--accentColor", "red");
        assert_eq!(style.css_text(), "--accentColor: red;");
    }
}
