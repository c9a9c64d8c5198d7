//! Edge case tests for mock-html
//!
//! Malformed markup that exercises the tree builder's repair paths.

use mock_dom::{Document, NodeId};
use mock_html::{HtmlParser, ParseOptions, parse_html_to_document, parse_html_to_fragment};

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse_html_to_document("<div><p><span>text");
    let span = doc.query_selector(NodeId::ROOT, "div > p > span").unwrap();
    assert!(span.is_some());
    assert_eq!(doc.text_content(span.unwrap()).as_deref(), Some("text"));
}

#[test]
fn test_misnested_formatting_is_repaired() -> anyhow::Result<()> {
    let mut doc = Document::new();
    let fragment = parse_html_to_fragment(&mut doc, "<p><b>1<p>2</b>3</p>")?;
    let html = doc.inner_html(fragment);
    assert_eq!(html, "<p><b>1</b></p><p><b>2</b>3</p>");
    Ok(())
}

#[test]
fn test_table_text_is_foster_parented() -> anyhow::Result<()> {
    let mut doc = Document::new();
    let fragment = parse_html_to_fragment(&mut doc, "<table>x<tr><td>1</td></tr></table>")?;
    let first = doc.first_child(fragment).unwrap();
    assert_eq!(doc.text_content(first).as_deref(), Some("x"));
    let table = doc.next_sibling(first).unwrap();
    assert_eq!(doc.tag_name(table).as_deref(), Some("TABLE"));
    assert!(doc.query_selector(table, "tbody > tr > td")?.is_some());
    Ok(())
}

#[test]
fn test_duplicate_attributes_keep_first() {
    let doc = parse_html_to_document(r#"<div id="a" id="b"></div>"#);
    assert!(doc.get_element_by_id("a").is_some());
    assert!(doc.get_element_by_id("b").is_none());
}

#[test]
fn test_stray_html_tag_merges_attributes() {
    let doc = parse_html_to_document(r#"<html lang="en"><body><html data-x="1" lang="fr">"#);
    let html = doc.document_element().unwrap();
    assert_eq!(doc.get_attribute(html, "lang").as_deref(), Some("en"));
    assert_eq!(doc.get_attribute(html, "data-x").as_deref(), Some("1"));
}

#[test]
fn test_only_whitespace() {
    let doc = parse_html_to_document("   \t\n\r\n   ");
    assert!(doc.body().is_some());
    assert_eq!(doc.children(doc.body().unwrap()).len(), 0);
}

#[test]
fn test_noscript_follows_scripting_flag() -> anyhow::Result<()> {
    let mut doc = Document::new();
    let scripted = parse_html_to_fragment(&mut doc, "<noscript><b>x</b></noscript>")?;
    let noscript = doc.first_child(scripted).unwrap();
    assert_eq!(doc.child_element_count(noscript), 0);

    let parser = HtmlParser::with_options(ParseOptions {
        scripting_enabled: false,
        ..ParseOptions::default()
    });
    let plain = parser.parse_fragment(&mut doc, "<noscript><b>x</b></noscript>")?;
    let noscript = doc.first_child(plain).unwrap();
    assert_eq!(doc.child_element_count(noscript), 1);
    Ok(())
}

#[test]
fn test_fragment_context() -> anyhow::Result<()> {
    let mut doc = Document::new();
    let parser = HtmlParser::with_options(ParseOptions {
        fragment_context: "tr".to_string(),
        ..ParseOptions::default()
    });
    let fragment = parser.parse_fragment(&mut doc, "<td>a</td><td>b</td>")?;
    assert_eq!(doc.child_element_count(fragment), 2);
    assert_eq!(doc.inner_html(fragment), "<td>a</td><td>b</td>");
    Ok(())
}
