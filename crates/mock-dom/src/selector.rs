//! CSS Selector Engine
//!
//! The document reaches selectors only through [`SelectorEngine`], so a
//! fuller engine can be swapped in with `Document::set_selector_engine`.
//! [`SimpleSelectorEngine`] covers the selectors component code actually
//! uses: type/universal, id, class, attribute matchers (with the `i` flag),
//! the four combinators, tree-structural pseudo-classes and `:not`/`:is`/
//! `:where`.

use crate::{Document, DomError, DomResult, NodeId};

/// Selector-engine seam used by `matches`, `querySelector(All)` and `closest`
pub trait SelectorEngine {
    /// Does `element` match `selector`
    fn matches(&self, doc: &Document, selector: &str, element: NodeId) -> DomResult<bool>;

    /// Matching descendant elements of `root`, in document order
    fn select_all(&self, doc: &Document, selector: &str, root: NodeId) -> DomResult<Vec<NodeId>>;

    /// First matching descendant element of `root`
    fn select_one(&self, doc: &Document, selector: &str, root: NodeId) -> DomResult<Option<NodeId>> {
        Ok(self.select_all(doc, selector, root)?.into_iter().next())
    }
}

/// Built-in engine over the mock DOM
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSelectorEngine;

impl SelectorEngine for SimpleSelectorEngine {
    fn matches(&self, doc: &Document, selector: &str, element: NodeId) -> DomResult<bool> {
        let list = SelectorList::parse(selector)?;
        if doc.element_data(element).is_none() {
            return Ok(false);
        }
        let cx = MatchContext { doc, scope: Some(element) };
        Ok(cx.matches_list(&list, element))
    }

    fn select_all(&self, doc: &Document, selector: &str, root: NodeId) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let cx = MatchContext { doc, scope: Some(root) };
        Ok(doc
            .descendants(root)
            .into_iter()
            .filter(|&id| doc.element_data(id).is_some() && cx.matches_list(&list, id))
            .collect())
    }
}

// ============================================================================
// Selector AST
// ============================================================================

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators, left to right.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<Vec<SelectorComponent>>,
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Root,
    Empty,
    Scope,
    Defined,
    Link,
    Checked,
    Disabled,
    Enabled,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(matcher) = &self.matcher else {
            return true;
        };
        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_string()
            }
        };
        let value = fold(value);
        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                value.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected || value.starts_with(&format!("{expected}-"))
            }
            // Empty operands never match for the substring family
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && value.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && value.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && value.contains(&fold(expected)),
        }
    }
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse "2n+1", "odd", "even", "3", "-n+3"
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s.split_ascii_whitespace().collect::<String>().to_ascii_lowercase();
        match s.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }
        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::new(0, n));
        }

        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else {
            rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
        };
        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        let a = i64::from(self.a);
        let diff = i64::from(n) - i64::from(self.b);
        if a == 0 {
            return diff == 0;
        }
        diff % a == 0 && diff / a >= 0
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl SelectorList {
    pub fn parse(input: &str) -> DomResult<Self> {
        let mut parser = Parser { input, pos: 0 };
        let list = parser
            .selector_list()
            .ok_or_else(|| DomError::InvalidSelector(input.to_string()))?;
        parser.skip_whitespace();
        if parser.peek().is_some() {
            return Err(DomError::InvalidSelector(input.to_string()));
        }
        Ok(list)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Stops (without consuming) at end of input or an unbalanced `)`
    fn selector_list(&mut self) -> Option<SelectorList> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.complex()?);
            self.skip_whitespace();
            if !self.eat(',') {
                return Some(SelectorList(selectors));
            }
        }
    }

    fn complex(&mut self) -> Option<ComplexSelector> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return None,
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Some(ComplexSelector { compounds, combinators })
    }

    fn compound(&mut self) -> Option<Vec<SelectorComponent>> {
        let mut components = Vec::new();
        while let Some(c) = self.peek() {
            let component = match c {
                '*' if components.is_empty() => {
                    self.bump();
                    SelectorComponent::Universal
                }
                '#' => {
                    self.bump();
                    SelectorComponent::Id(self.ident()?)
                }
                '.' => {
                    self.bump();
                    SelectorComponent::Class(self.ident()?)
                }
                '[' => {
                    self.bump();
                    SelectorComponent::Attribute(self.attribute()?)
                }
                ':' => {
                    self.bump();
                    SelectorComponent::PseudoClass(self.pseudo_class()?)
                }
                c if components.is_empty() && is_ident_start(c) => {
                    SelectorComponent::Type(self.ident()?)
                }
                _ => break,
            };
            components.push(component);
        }
        (!components.is_empty()).then_some(components)
    }

    fn ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                out.push(self.bump()?);
            } else if is_ident_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        let first = out.chars().next()?;
        (!first.is_ascii_digit()).then_some(out)
    }

    fn string(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => out.push(self.bump()?),
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    /// After `[`
    fn attribute(&mut self) -> Option<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        if self.eat(']') {
            return Some(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let op = match self.bump()? {
            '=' => '=',
            op @ ('~' | '|' | '^' | '$' | '*') if self.eat('=') => op,
            _ => return None,
        };
        self.skip_whitespace();
        let value = match self.peek()? {
            quote @ ('"' | '\'') => {
                self.bump();
                self.string(quote)?
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.bump();
                true
            }
            Some('s' | 'S') => {
                self.bump();
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        if !self.eat(']') {
            return None;
        }

        let matcher = match op {
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            '*' => AttributeMatcher::Substring(value),
            _ => AttributeMatcher::Exact(value),
        };
        Some(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    /// After `:`; pseudo-elements are rejected
    fn pseudo_class(&mut self) -> Option<PseudoClass> {
        let name = self.ident()?.to_ascii_lowercase();
        if self.eat('(') {
            let pseudo = match name.as_str() {
                "not" => PseudoClass::Not(self.selector_list()?),
                "is" => PseudoClass::Is(self.selector_list()?),
                "where" => PseudoClass::Where(self.selector_list()?),
                "nth-child" => PseudoClass::NthChild(self.nth()?),
                "nth-last-child" => PseudoClass::NthLastChild(self.nth()?),
                "nth-of-type" => PseudoClass::NthOfType(self.nth()?),
                "nth-last-of-type" => PseudoClass::NthLastOfType(self.nth()?),
                _ => return None,
            };
            self.skip_whitespace();
            return self.eat(')').then_some(pseudo);
        }

        Some(match name.as_str() {
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "scope" => PseudoClass::Scope,
            "defined" => PseudoClass::Defined,
            "link" | "any-link" => PseudoClass::Link,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            _ => return None,
        })
    }

    fn nth(&mut self) -> Option<NthExpression> {
        let rest = &self.input[self.pos..];
        let end = rest.find(')')?;
        let expr = NthExpression::parse(&rest[..end])?;
        self.pos += end;
        Some(expr)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

// ============================================================================
// Matching
// ============================================================================

struct MatchContext<'a> {
    doc: &'a Document,
    scope: Option<NodeId>,
}

impl MatchContext<'_> {
    fn matches_list(&self, list: &SelectorList, element: NodeId) -> bool {
        list.0
            .iter()
            .any(|complex| self.matches_complex(complex, complex.compounds.len() - 1, element))
    }

    /// Right-to-left: `compounds[index]` against `element`, then walk the
    /// combinator to the left
    fn matches_complex(&self, complex: &ComplexSelector, index: usize, element: NodeId) -> bool {
        if !complex.compounds[index]
            .iter()
            .all(|component| self.matches_component(component, element))
        {
            return false;
        }
        if index == 0 {
            return true;
        }

        let doc = self.doc;
        match complex.combinators[index - 1] {
            Combinator::Child => doc
                .parent_element(element)
                .is_some_and(|parent| self.matches_complex(complex, index - 1, parent)),
            Combinator::Descendant => {
                let mut current = doc.parent_element(element);
                while let Some(ancestor) = current {
                    if self.matches_complex(complex, index - 1, ancestor) {
                        return true;
                    }
                    current = doc.parent_element(ancestor);
                }
                false
            }
            Combinator::NextSibling => self
                .element_siblings_before(element)
                .last()
                .is_some_and(|&prev| self.matches_complex(complex, index - 1, prev)),
            Combinator::SubsequentSibling => self
                .element_siblings_before(element)
                .iter()
                .any(|&prev| self.matches_complex(complex, index - 1, prev)),
        }
    }

    fn matches_component(&self, component: &SelectorComponent, element: NodeId) -> bool {
        let doc = self.doc;
        let Some(data) = doc.element_data(element) else {
            return false;
        };
        match component {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(tag) => {
                if data.is_html() {
                    data.local_name().eq_ignore_ascii_case(tag)
                } else {
                    data.local_name() == tag
                }
            }
            SelectorComponent::Id(id) => doc.get_attribute(element, "id").as_deref() == Some(id.as_str()),
            SelectorComponent::Class(class) => doc
                .get_attribute(element, "class")
                .is_some_and(|value| value.split_ascii_whitespace().any(|c| c == class)),
            SelectorComponent::Attribute(attr) => attr.matches(doc.get_attribute(element, &attr.name).as_deref()),
            SelectorComponent::PseudoClass(pseudo) => self.matches_pseudo_class(pseudo, element),
        }
    }

    fn matches_pseudo_class(&self, pseudo: &PseudoClass, element: NodeId) -> bool {
        let doc = self.doc;
        match pseudo {
            PseudoClass::Root => doc.parent_node(element) == Some(NodeId::ROOT),
            PseudoClass::Empty => doc.child_nodes(element).iter().all(|&child| {
                doc.node(child)
                    .is_some_and(|node| !node.is_element() && node.as_text().is_none_or(str::is_empty))
            }),
            PseudoClass::Scope => self.scope == Some(element),
            PseudoClass::Defined => doc
                .element_data(element)
                .is_some_and(|el| !el.is_custom() || doc.custom_element_instance(element).is_some()),
            PseudoClass::Link => {
                doc.element_data(element)
                    .is_some_and(|el| matches!(el.local_name(), "a" | "area" | "link"))
                    && doc.has_attribute(element, "href")
            }
            PseudoClass::Checked => doc.has_attribute(element, "checked") || doc.has_attribute(element, "selected"),
            PseudoClass::Disabled => self.is_form_control(element) && doc.has_attribute(element, "disabled"),
            PseudoClass::Enabled => self.is_form_control(element) && !doc.has_attribute(element, "disabled"),
            PseudoClass::FirstChild => self.position(element, false).is_some_and(|(i, _)| i == 1),
            PseudoClass::LastChild => self.position(element, false).is_some_and(|(i, n)| i == n),
            PseudoClass::OnlyChild => self.position(element, false).is_some_and(|(_, n)| n == 1),
            PseudoClass::FirstOfType => self.position(element, true).is_some_and(|(i, _)| i == 1),
            PseudoClass::LastOfType => self.position(element, true).is_some_and(|(i, n)| i == n),
            PseudoClass::OnlyOfType => self.position(element, true).is_some_and(|(_, n)| n == 1),
            PseudoClass::NthChild(expr) => self.position(element, false).is_some_and(|(i, _)| expr.matches(i)),
            PseudoClass::NthLastChild(expr) => self
                .position(element, false)
                .is_some_and(|(i, n)| expr.matches(n - i + 1)),
            PseudoClass::NthOfType(expr) => self.position(element, true).is_some_and(|(i, _)| expr.matches(i)),
            PseudoClass::NthLastOfType(expr) => self
                .position(element, true)
                .is_some_and(|(i, n)| expr.matches(n - i + 1)),
            PseudoClass::Not(list) => !self.matches_list(list, element),
            PseudoClass::Is(list) | PseudoClass::Where(list) => self.matches_list(list, element),
        }
    }

    fn is_form_control(&self, element: NodeId) -> bool {
        self.doc.element_data(element).is_some_and(|el| {
            el.is_html()
                && matches!(
                    el.local_name(),
                    "button" | "input" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
                )
        })
    }

    /// Element siblings preceding `element`, in document order
    fn element_siblings_before(&self, element: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.doc.parent_node(element) else {
            return Vec::new();
        };
        self.doc
            .child_nodes(parent)
            .iter()
            .copied()
            .take_while(|&sibling| sibling != element)
            .filter(|&sibling| self.doc.element_data(sibling).is_some())
            .collect()
    }

    /// 1-based index among element siblings (optionally of the same type)
    /// and the sibling count. `None` for parentless elements.
    fn position(&self, element: NodeId, same_type: bool) -> Option<(i32, i32)> {
        let doc = self.doc;
        let parent = doc.parent_node(element)?;
        let data = doc.element_data(element)?;
        let siblings: Vec<NodeId> = doc
            .child_nodes(parent)
            .iter()
            .copied()
            .filter(|&sibling| {
                doc.element_data(sibling).is_some_and(|other| {
                    !same_type || (other.local_name() == data.local_name() && other.namespace() == data.namespace())
                })
            })
            .collect();
        let index = siblings.iter().position(|&s| s == element)?;
        Some((index as i32 + 1, siblings.len() as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Document, Vec<NodeId>) {
        // <ul id="list"><li class="a">1</li><li class="b" data-x="Foo">2</li><li class="a b">3</li></ul>
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let ul = doc.create_element("ul");
        doc.set_attribute(ul, "id", "list").unwrap();
        doc.append_child(body, ul).unwrap();
        let mut items = vec![ul];
        for (class, text) in [("a", "1"), ("b", "2"), ("a b", "3")] {
            let li = doc.create_element("li");
            doc.set_attribute(li, "class", class).unwrap();
            let t = doc.create_text_node(text);
            doc.append_child(li, t).unwrap();
            doc.append_child(ul, li).unwrap();
            items.push(li);
        }
        doc.set_attribute(items[2], "data-x", "Foo").unwrap();
        (doc, items)
    }

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("even"), Some(NthExpression::new(2, 0)));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::new(0, 3)));
        assert_eq!(NthExpression::parse("2n + 1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n+3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("bogus"), None);
    }

    #[test]
    fn test_nth_expression_matches() {
        let first_three = NthExpression::new(-1, 3);
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        let odd = NthExpression::new(2, 1);
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(5));

        let far = NthExpression::new(1, i32::MIN);
        assert!(far.matches(1));
        assert!(!NthExpression::new(-1, i32::MIN).matches(1));
        assert!(!NthExpression::new(0, i32::MAX).matches(1));
    }

    #[test]
    fn test_type_selector_case_in_foreign_content() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let svg = doc.create_element_ns(Some(crate::Namespace::SVG_URI), "svg");
        let gradient = doc.create_element_ns(Some(crate::Namespace::SVG_URI), "linearGradient");
        doc.append_child(svg, gradient).unwrap();
        doc.append_child(body, svg).unwrap();

        let engine = SimpleSelectorEngine;
        assert_eq!(engine.select_one(&doc, "linearGradient", NodeId::ROOT).unwrap(), Some(gradient));
        assert_eq!(engine.select_one(&doc, "lineargradient", NodeId::ROOT).unwrap(), None);
        assert_eq!(engine.select_one(&doc, "svg > linearGradient", NodeId::ROOT).unwrap(), Some(gradient));
        assert_eq!(engine.select_one(&doc, "BODY", NodeId::ROOT).unwrap(), Some(body));
    }

    #[test]
    fn test_attribute_selector_case_insensitive() {
        let sel = AttributeSelector {
            name: "type".to_string(),
            matcher: Some(AttributeMatcher::Exact("text".to_string())),
            case_insensitive: true,
        };
        assert!(sel.matches(Some("TEXT")));
        assert!(!sel.matches(None));
    }

    #[test]
    fn test_compound_and_combinators() {
        let (doc, items) = fixture();
        let engine = SimpleSelectorEngine;
        let root = NodeId::ROOT;

        assert_eq!(engine.select_all(&doc, "li.a", root).unwrap(), vec![items[1], items[3]]);
        assert_eq!(engine.select_all(&doc, "#list > .b", root).unwrap(), vec![items[2], items[3]]);
        assert_eq!(engine.select_all(&doc, "body li.a.b", root).unwrap(), vec![items[3]]);
        assert_eq!(engine.select_all(&doc, ".a + li", root).unwrap(), vec![items[2]]);
        assert_eq!(engine.select_all(&doc, ".a ~ li", root).unwrap(), vec![items[2], items[3]]);
        assert_eq!(engine.select_one(&doc, "UL", root).unwrap(), Some(items[0]));
    }

    #[test]
    fn test_attribute_and_pseudo_classes() {
        let (doc, items) = fixture();
        let engine = SimpleSelectorEngine;
        let root = NodeId::ROOT;

        assert_eq!(engine.select_all(&doc, "[data-x='foo' i]", root).unwrap(), vec![items[2]]);
        assert_eq!(engine.select_all(&doc, "[data-x=foo]", root).unwrap(), vec![]);
        assert_eq!(engine.select_all(&doc, "li:first-child", root).unwrap(), vec![items[1]]);
        assert_eq!(engine.select_all(&doc, "li:nth-child(odd)", root).unwrap(), vec![items[1], items[3]]);
        assert_eq!(engine.select_all(&doc, "li:not(.a)", root).unwrap(), vec![items[2]]);
        assert_eq!(engine.select_all(&doc, ":is(ul, .b)", root).unwrap(), vec![items[0], items[2], items[3]]);
        assert!(engine.matches(&doc, "html:root", doc.document_element().unwrap()).unwrap());
        assert!(engine.matches(&doc, "head:empty", doc.head().unwrap()).unwrap());
    }

    #[test]
    fn test_select_all_excludes_root() {
        let (doc, items) = fixture();
        let engine = SimpleSelectorEngine;
        assert_eq!(engine.select_all(&doc, "ul", items[0]).unwrap(), vec![]);
        assert_eq!(engine.select_all(&doc, ":scope > li", items[0]).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_selectors() {
        let (doc, _) = fixture();
        let engine = SimpleSelectorEngine;
        for bad in ["", "li,", "[x", "::before", ":bogus", "a >", "#1a"] {
            assert!(
                matches!(engine.select_all(&doc, bad, NodeId::ROOT), Err(DomError::InvalidSelector(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
