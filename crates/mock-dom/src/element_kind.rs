//! Element kinds and reflected properties
//!
//! Specialized HTML elements are a closed set resolved from the tag name at
//! creation time. Each kind contributes a static table of typed properties
//! that read and write through the element's attributes.

/// Specialized element facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    Anchor,
    Base,
    Button,
    Canvas,
    Form,
    Image,
    Input,
    Link,
    Meta,
    Option,
    Script,
    Select,
    Slot,
    Style,
    Template,
    TextArea,
    Title,
    #[default]
    Generic,
}

impl ElementKind {
    /// Resolve from a lower-cased HTML tag name
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "a" => Self::Anchor,
            "base" => Self::Base,
            "button" => Self::Button,
            "canvas" => Self::Canvas,
            "form" => Self::Form,
            "img" => Self::Image,
            "input" => Self::Input,
            "link" => Self::Link,
            "meta" => Self::Meta,
            "option" => Self::Option,
            "script" => Self::Script,
            "select" => Self::Select,
            "slot" => Self::Slot,
            "style" => Self::Style,
            "template" => Self::Template,
            "textarea" => Self::TextArea,
            "title" => Self::Title,
            _ => Self::Generic,
        }
    }

    /// Properties specific to this kind
    pub fn properties(self) -> &'static [ReflectedProperty] {
        match self {
            Self::Anchor => ANCHOR,
            Self::Base => BASE,
            Self::Button => BUTTON,
            Self::Canvas => CANVAS,
            Self::Form => FORM,
            Self::Image => IMAGE,
            Self::Input => INPUT,
            Self::Link => LINK,
            Self::Meta => META,
            Self::Option => OPTION,
            Self::Script => SCRIPT,
            Self::Select => SELECT,
            Self::Slot => SLOT,
            Self::Style => STYLE,
            Self::TextArea => TEXTAREA,
            Self::Template | Self::Title | Self::Generic => &[],
        }
    }

    /// Look up a property by its camelCase name, kind table first
    pub fn property(self, name: &str) -> Option<&'static ReflectedProperty> {
        self.properties()
            .iter()
            .chain(GLOBAL)
            .find(|prop| prop.name == name)
    }
}

/// How a reflected property converts to and from its attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// Attribute value verbatim
    Str,
    /// Attribute presence
    Bool,
    /// Attribute value resolved against the window location
    Url,
    /// Attribute parsed as an integer
    Long,
}

/// Typed property reflected onto an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectedProperty {
    pub name: &'static str,
    pub attribute: &'static str,
    pub ty: PropertyType,
    /// Value read when the attribute is missing or unparsable
    pub default: &'static str,
}

const fn prop(name: &'static str, attribute: &'static str, ty: PropertyType, default: &'static str) -> ReflectedProperty {
    ReflectedProperty { name, attribute, ty, default }
}

const fn string(name: &'static str, attribute: &'static str) -> ReflectedProperty {
    prop(name, attribute, PropertyType::Str, "")
}

const fn boolean(name: &'static str, attribute: &'static str) -> ReflectedProperty {
    prop(name, attribute, PropertyType::Bool, "")
}

const fn url(name: &'static str, attribute: &'static str) -> ReflectedProperty {
    prop(name, attribute, PropertyType::Url, "")
}

const fn long(name: &'static str, attribute: &'static str, default: &'static str) -> ReflectedProperty {
    prop(name, attribute, PropertyType::Long, default)
}

static GLOBAL: &[ReflectedProperty] = &[
    string("id", "id"),
    string("className", "class"),
    string("title", "title"),
    string("lang", "lang"),
    string("dir", "dir"),
    boolean("hidden", "hidden"),
    long("tabIndex", "tabindex", "-1"),
    string("slot", "slot"),
    string("accessKey", "accesskey"),
];

static ANCHOR: &[ReflectedProperty] = &[
    url("href", "href"),
    string("target", "target"),
    string("rel", "rel"),
    string("download", "download"),
    string("hreflang", "hreflang"),
    string("type", "type"),
];

static BASE: &[ReflectedProperty] = &[url("href", "href"), string("target", "target")];

static BUTTON: &[ReflectedProperty] = &[
    boolean("disabled", "disabled"),
    boolean("autofocus", "autofocus"),
    string("name", "name"),
    prop("type", "type", PropertyType::Str, "submit"),
    string("value", "value"),
    url("formAction", "formaction"),
];

static CANVAS: &[ReflectedProperty] = &[long("width", "width", "300"), long("height", "height", "150")];

static FORM: &[ReflectedProperty] = &[
    url("action", "action"),
    prop("method", "method", PropertyType::Str, "get"),
    prop("enctype", "enctype", PropertyType::Str, "application/x-www-form-urlencoded"),
    string("name", "name"),
    string("target", "target"),
    boolean("noValidate", "novalidate"),
];

static IMAGE: &[ReflectedProperty] = &[
    url("src", "src"),
    string("alt", "alt"),
    string("srcset", "srcset"),
    string("sizes", "sizes"),
    string("loading", "loading"),
    string("crossOrigin", "crossorigin"),
    long("width", "width", "0"),
    long("height", "height", "0"),
];

static INPUT: &[ReflectedProperty] = &[
    prop("type", "type", PropertyType::Str, "text"),
    string("name", "name"),
    string("value", "value"),
    string("placeholder", "placeholder"),
    string("min", "min"),
    string("max", "max"),
    string("step", "step"),
    string("pattern", "pattern"),
    string("autocomplete", "autocomplete"),
    boolean("checked", "checked"),
    boolean("disabled", "disabled"),
    boolean("readOnly", "readonly"),
    boolean("required", "required"),
    boolean("multiple", "multiple"),
    boolean("autofocus", "autofocus"),
    long("maxLength", "maxlength", "-1"),
    long("size", "size", "20"),
    url("src", "src"),
];

static LINK: &[ReflectedProperty] = &[
    url("href", "href"),
    string("rel", "rel"),
    string("type", "type"),
    string("media", "media"),
    string("as", "as"),
    string("crossOrigin", "crossorigin"),
    string("integrity", "integrity"),
];

static META: &[ReflectedProperty] = &[
    string("name", "name"),
    string("content", "content"),
    string("httpEquiv", "http-equiv"),
    string("charset", "charset"),
];

static OPTION: &[ReflectedProperty] = &[
    string("value", "value"),
    string("label", "label"),
    boolean("selected", "selected"),
    boolean("disabled", "disabled"),
];

static SCRIPT: &[ReflectedProperty] = &[
    url("src", "src"),
    string("type", "type"),
    boolean("async", "async"),
    boolean("defer", "defer"),
    boolean("noModule", "nomodule"),
    string("crossOrigin", "crossorigin"),
    string("integrity", "integrity"),
];

static SELECT: &[ReflectedProperty] = &[
    string("name", "name"),
    boolean("disabled", "disabled"),
    boolean("multiple", "multiple"),
    boolean("required", "required"),
    long("size", "size", "0"),
];

static SLOT: &[ReflectedProperty] = &[string("name", "name")];

static STYLE: &[ReflectedProperty] = &[string("media", "media"), string("type", "type")];

static TEXTAREA: &[ReflectedProperty] = &[
    string("name", "name"),
    string("placeholder", "placeholder"),
    boolean("disabled", "disabled"),
    boolean("readOnly", "readonly"),
    boolean("required", "required"),
    long("rows", "rows", "2"),
    long("cols", "cols", "20"),
    long("maxLength", "maxlength", "-1"),
];

/// Value of a reflected property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Str(String),
    Bool(bool),
    Long(i64),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Loose truthiness used when a boolean property receives another type
    pub(crate) fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Long(n) => *n != 0,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Long(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}
