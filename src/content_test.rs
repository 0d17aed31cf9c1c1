use serde_json::json;

use super::*;

fn caret(path: &[usize], offset: usize) -> Selection {
    Selection::caret(TextPoint::new(path.to_vec(), offset))
}

// =============================================================
// Serde shape
// =============================================================

#[test]
fn deserialize_editor_json() {
    let value: TextElement = serde_json::from_value(json!({
        "children": [
            { "text": "Hello " },
            { "text": "world", "bold": true }
        ]
    }))
    .unwrap();
    assert_eq!(value.kind, None);
    assert_eq!(value.children.len(), 2);
    let TextNode::Text(bold) = &value.children[1] else {
        panic!("expected leaf");
    };
    assert_eq!(bold.marks.get("bold"), Some(&json!(true)));
}

#[test]
fn serialize_plain_omits_type() {
    let json = serde_json::to_value(TextElement::plain("Hi")).unwrap();
    assert_eq!(json, json!({ "children": [{ "text": "Hi" }] }));
}

#[test]
fn element_attrs_survive_roundtrip() {
    let input = json!({
        "type": "paragraph",
        "align": "center",
        "children": [{ "text": "x" }]
    });
    let value: TextElement = serde_json::from_value(input.clone()).unwrap();
    assert_eq!(value.kind.as_deref(), Some("paragraph"));
    assert_eq!(serde_json::to_value(&value).unwrap(), input);
}

// =============================================================
// Lines / plain text
// =============================================================

#[test]
fn inline_link_flows_with_text() {
    let value: TextElement = serde_json::from_value(json!({
        "children": [
            { "text": "see " },
            { "type": "link", "url": "https://example.test", "children": [{ "text": "docs" }] },
            { "text": "!" }
        ]
    }))
    .unwrap();
    assert_eq!(value.lines(), vec!["see docs!".to_string()]);
}

#[test]
fn nested_blocks_each_start_a_line() {
    let value: TextElement = serde_json::from_value(json!({
        "children": [
            { "type": "paragraph", "children": [{ "text": "one" }] },
            { "type": "paragraph", "children": [{ "text": "" }] },
            { "type": "paragraph", "children": [{ "text": "three" }] }
        ]
    }))
    .unwrap();
    assert_eq!(value.plain_text(), "one\n\nthree");
}

#[test]
fn explicit_newlines_split_lines() {
    assert_eq!(TextElement::plain("a\nb").lines(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn blank_detection() {
    assert!(TextElement::plain("").is_blank());
    assert!(TextElement::with_children(vec![]).is_blank());
    assert!(!TextElement::plain(" ").is_blank());
}

// =============================================================
// Path lookup
// =============================================================

#[test]
fn node_at_resolves_nested_leaf() {
    let roots = vec![TextNode::Element(TextElement::with_children(vec![TextNode::leaf("a"), TextNode::leaf("b")]))];
    let Some(TextNode::Text(leaf)) = node_at(&roots, &[0, 1]) else {
        panic!("expected leaf");
    };
    assert_eq!(leaf.text, "b");
    assert!(node_at(&roots, &[0, 2]).is_none());
    assert!(node_at(&roots, &[]).is_none());
    assert!(node_at(&roots, &[0, 0, 0]).is_none());
}

#[test]
fn leaf_at_mut_rejects_element_paths() {
    let mut roots = vec![TextNode::Element(TextElement::plain("a"))];
    assert!(leaf_at_mut(&mut roots, &[0]).is_none());
    assert!(leaf_at_mut(&mut roots, &[0, 0]).is_some());
}

#[test]
fn splice_chars_clamps_and_respects_char_boundaries() {
    assert_eq!(splice_chars("abc", 10, "X"), "abcX");
    assert_eq!(splice_chars("你好", 1, "X"), "你X好");
    assert_eq!(splice_chars("", 0, "X"), "X");
}

// =============================================================
// Composition shadow document
// =============================================================

#[test]
fn shadow_inserts_candidate_one_past_caret() {
    let live = TextElement::plain("abc");
    let selection = caret(&[0, 0], 1);
    let shadow = build_composition_shadow(&live, Some(&selection), "X").unwrap();
    assert_eq!(shadow.plain_text(), "abXc");
    assert_eq!(live.plain_text(), "abc");
}

// The candidate lands one character right of the caret, not at it.
// A caret at the start of "abc" previews as "aXbc".
#[test]
fn shadow_caret_shift_is_one_character() {
    let live = TextElement::plain("abc");
    let shadow = build_composition_shadow(&live, Some(&caret(&[0, 0], 0)), "X").unwrap();
    assert_eq!(shadow.plain_text(), "aXbc");
}

#[test]
fn shadow_at_end_of_leaf_appends() {
    let live = TextElement::plain("abc");
    let shadow = build_composition_shadow(&live, Some(&caret(&[0, 0], 3)), "中文").unwrap();
    assert_eq!(shadow.plain_text(), "abc中文");
}

#[test]
fn shadow_targets_the_addressed_leaf_only() {
    let live = TextElement::with_children(vec![TextNode::leaf("ab"), TextNode::leaf("cd")]);
    let shadow = build_composition_shadow(&live, Some(&caret(&[0, 1], 0)), "X").unwrap();
    assert_eq!(shadow.children[0], TextNode::leaf("ab"));
    assert_eq!(shadow.children[1], TextNode::leaf("cXd"));
}

#[test]
fn shadow_none_for_range_selection() {
    let live = TextElement::plain("abc");
    let range = Selection { anchor: TextPoint::new(vec![0, 0], 0), focus: TextPoint::new(vec![0, 0], 2) };
    assert!(build_composition_shadow(&live, Some(&range), "X").is_none());
}

#[test]
fn shadow_none_without_selection() {
    assert!(build_composition_shadow(&TextElement::plain("abc"), None, "X").is_none());
}

#[test]
fn shadow_none_for_dangling_path() {
    let live = TextElement::plain("abc");
    assert!(build_composition_shadow(&live, Some(&caret(&[0, 4], 0)), "X").is_none());
}

// =============================================================
// Root-relative addressing
// =============================================================

#[test]
fn leaf_at_requires_root_index_zero() {
    let value = TextElement::plain("abc");
    assert_eq!(value.leaf_at(&[0, 0]).map(|l| l.text.as_str()), Some("abc"));
    assert!(value.leaf_at(&[1, 0]).is_none());
    assert!(value.leaf_at(&[0]).is_none());
}

#[test]
fn end_point_follows_last_leaf() {
    let value: TextElement = serde_json::from_value(json!({
        "children": [
            { "text": "see " },
            { "type": "link", "children": [{ "text": "docs" }] }
        ]
    }))
    .unwrap();
    assert_eq!(value.end_point(), Some(TextPoint::new(vec![0, 1, 0], 4)));
}

#[test]
fn end_point_none_for_childless_element() {
    assert_eq!(TextElement::with_children(vec![]).end_point(), None);
}
