//! Text-document fragments: the content tree carried by every text region.
//!
//! The tree mirrors the editor's JSON shape: elements hold `children`, leaves
//! hold `text`, and anything else (element `type`, leaf marks) rides along in
//! open-ended maps. This layer never interprets marks; it only needs plain
//! text for measurement and leaf addressing for composition previews.
//!
//! Paths and selections are addressed from the editor root, whose single child
//! is the region's top-level element. A caret in the first leaf of a plain
//! paragraph is therefore at path `[0, 0]`.

#[cfg(test)]
#[path = "content_test.rs"]
mod content_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::COMPOSITION_CARET_SHIFT;

/// Element kinds laid out inline with their surrounding text.
const INLINE_KINDS: &[&str] = &["link"];

/// A node in a text-document fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextNode {
    Text(TextLeaf),
    Element(TextElement),
}

/// A plain-text leaf with optional marks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextLeaf {
    pub text: String,
    /// Marks such as `bold` or `font-size`, preserved verbatim.
    #[serde(flatten)]
    pub marks: Map<String, Value>,
}

/// A block or inline element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextElement {
    /// Element type (`"paragraph"`, `"link"`, ...). Absent for plain paragraphs.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub children: Vec<TextNode>,
    /// Any other element attributes, preserved verbatim.
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl TextNode {
    #[must_use]
    pub fn leaf(text: impl Into<String>) -> Self {
        Self::Text(TextLeaf { text: text.into(), marks: Map::new() })
    }
}

impl TextElement {
    /// A paragraph holding a single unmarked leaf.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self { kind: None, children: vec![TextNode::leaf(text)], attrs: Map::new() }
    }

    /// A paragraph with the given children.
    #[must_use]
    pub fn with_children(children: Vec<TextNode>) -> Self {
        Self { kind: None, children, attrs: Map::new() }
    }

    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.kind.as_deref().is_some_and(|k| INLINE_KINDS.contains(&k))
    }

    /// Logical lines of the fragment. Nested blocks and explicit newlines each
    /// start a new line; inline elements flow with their neighbours.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![String::new()];
        let mut fresh = true;
        collect_lines(&self.children, &mut lines, &mut fresh);
        lines.iter().flat_map(|line| line.split('\n').map(str::to_string)).collect()
    }

    /// All text joined with `\n` between lines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines().join("\n")
    }

    /// Leaf at an editor-root path (`[0, ...]`), if the path addresses one.
    #[must_use]
    pub fn leaf_at(&self, path: &[usize]) -> Option<&TextLeaf> {
        let (&0, rest) = path.split_first()? else {
            return None;
        };
        let mut children = &self.children;
        let (last, inner) = rest.split_last()?;
        for index in inner {
            let TextNode::Element(el) = children.get(*index)? else {
                return None;
            };
            children = &el.children;
        }
        match children.get(*last)? {
            TextNode::Text(leaf) => Some(leaf),
            TextNode::Element(_) => None,
        }
    }

    /// Caret position after the last character of the last leaf.
    #[must_use]
    pub fn end_point(&self) -> Option<TextPoint> {
        let mut path = vec![0];
        let mut children = &self.children;
        loop {
            let last = children.len().checked_sub(1)?;
            path.push(last);
            match &children[last] {
                TextNode::Text(leaf) => return Some(TextPoint::new(path, leaf.text.chars().count())),
                TextNode::Element(el) => children = &el.children,
            }
        }
    }

    /// Whether the fragment renders no characters at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines().iter().all(String::is_empty)
    }
}

fn collect_lines(children: &[TextNode], lines: &mut Vec<String>, fresh: &mut bool) {
    for child in children {
        match child {
            TextNode::Text(leaf) => {
                if let Some(line) = lines.last_mut() {
                    line.push_str(&leaf.text);
                }
                *fresh = false;
            }
            TextNode::Element(el) if el.is_inline() => collect_lines(&el.children, lines, fresh),
            TextNode::Element(el) => {
                if !*fresh {
                    lines.push(String::new());
                    *fresh = true;
                }
                collect_lines(&el.children, lines, fresh);
                *fresh = false;
            }
        }
    }
}

/// Path from the editor root to a node: one child index per level.
pub type Path = Vec<usize>;

/// A caret position: leaf path plus a character offset into that leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPoint {
    pub path: Path,
    pub offset: usize,
}

impl TextPoint {
    #[must_use]
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Editor selection. Collapsed when anchor and focus coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: TextPoint,
    pub focus: TextPoint,
}

impl Selection {
    /// A collapsed selection (caret) at `point`.
    #[must_use]
    pub fn caret(point: TextPoint) -> Self {
        Self { anchor: point.clone(), focus: point }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Look up a node by path in a list of root children.
#[must_use]
pub fn node_at<'a>(roots: &'a [TextNode], path: &[usize]) -> Option<&'a TextNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get(*first)?;
    for index in rest {
        let TextNode::Element(el) = node else {
            return None;
        };
        node = el.children.get(*index)?;
    }
    Some(node)
}

/// Mutable leaf lookup by path in a list of root children.
pub fn leaf_at_mut<'a>(roots: &'a mut [TextNode], path: &[usize]) -> Option<&'a mut TextLeaf> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for index in rest {
        let TextNode::Element(el) = node else {
            return None;
        };
        node = el.children.get_mut(*index)?;
    }
    match node {
        TextNode::Text(leaf) => Some(leaf),
        TextNode::Element(_) => None,
    }
}

/// Insert `data` into `text` at character offset `at`, clamped to the end.
#[must_use]
pub fn splice_chars(text: &str, at: usize, data: &str) -> String {
    let byte = text.char_indices().nth(at).map_or(text.len(), |(i, _)| i);
    let mut out = String::with_capacity(text.len() + data.len());
    out.push_str(&text[..byte]);
    out.push_str(data);
    out.push_str(&text[byte..]);
    out
}

/// Build the shadow document for an in-flight IME candidate.
///
/// Returns a deep copy of `value` with `data` spliced into the caret's leaf,
/// [`COMPOSITION_CARET_SHIFT`] characters to the right of the caret. Returns
/// `None` when there is no selection, the selection spans a range, or the
/// caret does not address a leaf. `value` itself is never modified.
#[must_use]
pub fn build_composition_shadow(value: &TextElement, selection: Option<&Selection>, data: &str) -> Option<TextElement> {
    let selection = selection.filter(|s| s.is_collapsed())?;
    let caret = &selection.anchor;
    let mut root = vec![TextNode::Element(value.clone())];
    let leaf = leaf_at_mut(&mut root, &caret.path)?;
    leaf.text = splice_chars(&leaf.text, caret.offset + COMPOSITION_CARET_SHIFT, data);
    match root.pop() {
        Some(TextNode::Element(shadow)) => Some(shadow),
        _ => None,
    }
}
