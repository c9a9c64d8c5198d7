//! Edge case tests for mock-dom
//!
//! Structural errors, fragment moves, cloning and the odd attribute rules.

use mock_dom::{Attr, AttributeMap, Document, DomError, Namespace, NodeId, NodeType};

#[test]
fn test_remove_child_of_wrong_parent() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let head = doc.head().unwrap();
    let div = doc.create_element("div");
    doc.append_child(body, div).unwrap();

    assert_eq!(
        doc.remove_child(head, div),
        Err(DomError::NotFound { parent: head, child: div })
    );
    assert_eq!(doc.parent_node(div), Some(body));
}

#[test]
fn test_insert_before_foreign_reference() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let head = doc.head().unwrap();
    let div = doc.create_element("div");
    assert!(matches!(
        doc.insert_before(body, div, Some(head)),
        Err(DomError::NotFound { .. })
    ));
    assert_eq!(doc.parent_node(div), None);
}

#[test]
fn test_cycles_are_rejected() {
    let mut doc = Document::new();
    let outer = doc.create_element("div");
    let inner = doc.create_element("div");
    doc.append_child(outer, inner).unwrap();
    assert!(matches!(doc.append_child(inner, outer), Err(DomError::HierarchyRequest(_))));
    assert!(matches!(doc.append_child(outer, outer), Err(DomError::HierarchyRequest(_))));
    assert!(matches!(doc.append_child(outer, NodeId::ROOT), Err(DomError::HierarchyRequest(_))));
}

#[test]
fn test_fragment_is_flattened_and_emptied() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let fragment = doc.create_document_fragment();
    let items: Vec<NodeId> = (0..3)
        .map(|i| {
            let p = doc.create_element("p");
            doc.set_id(p, &format!("p{i}")).unwrap();
            doc.append_child(fragment, p).unwrap();
            p
        })
        .collect();

    doc.append_child(body, fragment).unwrap();
    assert_eq!(doc.child_nodes(body), items.as_slice());
    assert!(doc.child_nodes(fragment).is_empty());
    assert!(items.iter().all(|&p| doc.parent_node(p) == Some(body)));
}

#[test]
fn test_reinsert_moves_node() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let a = doc.create_element("a");
    let b = doc.create_element("b");
    doc.append_child(body, a).unwrap();
    doc.append_child(body, b).unwrap();
    doc.insert_before(body, b, Some(a)).unwrap();
    assert_eq!(doc.child_nodes(body), &[b, a]);

    doc.insert_before(body, a, Some(a)).unwrap();
    assert_eq!(doc.child_nodes(body), &[b, a]);
}

#[test]
fn test_replace_child_and_remove() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let old = doc.create_element("old-el");
    let new = doc.create_element("span");
    doc.append_child(body, old).unwrap();
    doc.replace_child(body, new, old).unwrap();
    assert_eq!(doc.child_nodes(body), &[new]);
    assert_eq!(doc.parent_node(old), None);

    // no parent: no-op
    doc.remove(old).unwrap();
    doc.remove(new).unwrap();
    assert!(doc.child_nodes(body).is_empty());
}

#[test]
fn test_deep_clone() {
    let mut doc = Document::new();
    let ul = doc.create_element("ul");
    doc.set_attribute(ul, "class", "menu").unwrap();
    doc.set_attribute(ul, "style", "margin: 0").unwrap();
    let li = doc.create_element("li");
    let text = doc.create_text_node("item");
    doc.append_child(li, text).unwrap();
    doc.append_child(ul, li).unwrap();

    let shallow = doc.clone_node(ul, false).unwrap();
    assert!(doc.child_nodes(shallow).is_empty());
    assert_eq!(doc.get_attribute(shallow, "style").as_deref(), Some("margin: 0;"));

    let deep = doc.clone_node(ul, true).unwrap();
    assert_eq!(doc.outer_html(deep), doc.outer_html(ul));
    assert_ne!(doc.first_child(deep), Some(li));
    assert!(matches!(doc.clone_node(NodeId::ROOT, true), Err(DomError::HierarchyRequest(_))));
}

#[test]
fn test_xlink_attributes_answer_plain_lookups() {
    let mut doc = Document::new();
    let image = doc.create_element_ns(Some(Namespace::SVG_URI), "image");
    doc.set_attribute_ns(image, Some(Namespace::XLINK_URI), "xlink:href", "#a").unwrap();
    assert_eq!(doc.get_attribute(image, "href").as_deref(), Some("#a"));
    assert_eq!(doc.get_attribute_ns(image, None, "href").as_deref(), Some("#a"));

    let mut map = AttributeMap::new(false);
    map.set_named_item_ns(Attr::with_namespace(Some(Namespace::XLink), "href", "#a"));
    map.set_named_item_ns(Attr::with_namespace(Some(Namespace::Xml), "href", "#c"));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_named_item_ns(Some(&Namespace::Xml), "href").map(Attr::value), Some("#c"));
}

#[test]
fn test_attribute_identity_keeps_position() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.set_attribute(div, "a", 1).unwrap();
    doc.set_attribute(div, "b", 2).unwrap();
    doc.set_attribute(div, "A", 3).unwrap();
    assert_eq!(doc.get_attribute_names(div), vec!["a", "b"]);
    assert_eq!(doc.get_attribute(div, "a").as_deref(), Some("3"));
}

#[test]
fn test_svg_attributes_are_case_sensitive() {
    let mut doc = Document::new();
    let svg = doc.create_element_ns(Some(Namespace::SVG_URI), "svg");
    doc.set_attribute(svg, "viewBox", "0 0 10 10").unwrap();
    assert_eq!(doc.get_attribute(svg, "viewbox"), None);
    assert_eq!(doc.tag_name(svg).as_deref(), Some("svg"));

    let div = doc.create_element("DIV");
    assert_eq!(doc.tag_name(div).as_deref(), Some("DIV"));
    assert_eq!(doc.node(div).unwrap().node_type(), NodeType::Element);
}

#[test]
fn test_text_content() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    let b = doc.create_element("b");
    let t1 = doc.create_text_node("hello ");
    let t2 = doc.create_text_node("world");
    let comment = doc.create_comment("skip");
    doc.append_child(div, t1).unwrap();
    doc.append_child(b, t2).unwrap();
    doc.append_child(div, b).unwrap();
    doc.append_child(div, comment).unwrap();
    assert_eq!(doc.text_content(div).as_deref(), Some("hello world"));

    doc.set_text_content(div, "replaced").unwrap();
    assert_eq!(doc.child_nodes(div).len(), 1);
    assert_eq!(doc.inner_html(div), "replaced");
}

#[test]
fn test_lookups() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let section = doc.create_element("section");
    doc.set_attribute(section, "class", "card wide").unwrap();
    let p = doc.create_element("p");
    doc.set_attribute(p, "class", "card").unwrap();
    doc.set_id(p, "intro").unwrap();
    doc.append_child(section, p).unwrap();
    doc.append_child(body, section).unwrap();

    assert_eq!(doc.get_elements_by_class_name(NodeId::ROOT, "card"), vec![section, p]);
    assert_eq!(doc.get_elements_by_class_name(NodeId::ROOT, "wide card"), vec![section]);
    assert_eq!(doc.get_elements_by_tag_name(body, "P"), vec![p]);
    assert_eq!(doc.get_element_by_id("intro"), Some(p));
    assert_eq!(doc.query_selector(NodeId::ROOT, "section > #intro").unwrap(), Some(p));
    assert_eq!(doc.query_selector_all(section, "p.card").unwrap(), vec![p]);
    assert!(matches!(doc.query_selector(NodeId::ROOT, "p["), Err(DomError::InvalidSelector(_))));
}

#[test]
fn test_dataset() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.dataset(div).set("userId", "42").unwrap();
    assert_eq!(doc.get_attribute(div, "data-user-id").as_deref(), Some("42"));
    assert_eq!(doc.dataset(div).get("userId").as_deref(), Some("42"));
    assert!(doc.dataset(div).remove("userId").unwrap());
    assert!(!doc.has_attribute(div, "data-user-id"));
}

#[test]
fn test_title() {
    let mut doc = Document::new();
    assert_eq!(doc.title(), "");
    doc.set_title("  Hello \n  World ").unwrap();
    assert_eq!(doc.title(), "Hello World");
    assert_eq!(doc.compat_mode(), "CSS1Compat");
}
