//! The editor seam: what the overlay needs from a rich-text editor.
//!
//! The overlay never reaches into an editor's model. It binds content,
//! toggles read-only, reads and moves the selection, pushes programmatic
//! replacements, and forwards user input. [`PlainTextEditor`] is a small
//! in-process implementation: enough for hosts without a richer editor and
//! for exercising the overlay in tests.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use crate::content::{Selection, TextElement, TextNode, TextPoint, leaf_at_mut, splice_chars};

/// A user edit forwarded from the host's input handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditInput {
    /// Type or paste text at the selection, replacing any selected range.
    InsertText(String),
    /// Backspace.
    DeleteBackward,
}

/// Editable instance bound to one region's content.
pub trait TextEditor {
    /// The top-level content node.
    fn value(&self) -> &TextElement;

    /// Replace content programmatically (undo/redo, remote update). Must not
    /// be recorded as a user edit.
    fn replace_value(&mut self, value: TextElement);

    fn selection(&self) -> Option<&Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    fn is_readonly(&self) -> bool;

    fn set_readonly(&mut self, readonly: bool);

    /// Apply user input. Returns `true` when the content changed.
    fn apply(&mut self, input: EditInput) -> bool;
}

/// Builds a fresh editor for newly mounted content.
pub type EditorFactory = fn(TextElement) -> Box<dyn TextEditor>;

/// Default [`EditorFactory`].
#[must_use]
pub fn plain_editor(value: TextElement) -> Box<dyn TextEditor> {
    Box::new(PlainTextEditor::new(value))
}

/// Minimal editor over leaf text. Edits stay within the caret's leaf;
/// cross-leaf ranges are rejected.
#[derive(Debug, Clone)]
pub struct PlainTextEditor {
    value: TextElement,
    selection: Option<Selection>,
    readonly: bool,
    undo_stack: Vec<TextElement>,
}

impl PlainTextEditor {
    /// A read-only editor over `value` with no selection.
    #[must_use]
    pub fn new(value: TextElement) -> Self {
        Self { value, selection: None, readonly: true, undo_stack: Vec::new() }
    }

    /// Number of user edits that can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Revert the last user edit. Returns `false` when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.value = previous;
        self.clamp_selection();
        true
    }

    fn leaf_len(&self, path: &[usize]) -> Option<usize> {
        self.value.leaf_at(path).map(|leaf| leaf.text.chars().count())
    }

    /// Drop a selection whose leaf vanished; pull offsets back inside the leaf.
    fn clamp_selection(&mut self) {
        let Some(selection) = self.selection.take() else {
            return;
        };
        let clamp = |point: TextPoint, len: Option<usize>| len.map(|len| TextPoint::new(point.path, point.offset.min(len)));
        let anchor_len = self.leaf_len(&selection.anchor.path);
        let focus_len = self.leaf_len(&selection.focus.path);
        let anchor = clamp(selection.anchor, anchor_len);
        let focus = clamp(selection.focus, focus_len);
        self.selection = anchor.zip(focus).map(|(anchor, focus)| Selection { anchor, focus });
    }

    /// Selected span within one leaf as `(path, start, end)` in chars.
    fn leaf_span(&self) -> Option<(Vec<usize>, usize, usize)> {
        let selection = self.selection.as_ref()?;
        if selection.anchor.path != selection.focus.path {
            return None;
        }
        let start = selection.anchor.offset.min(selection.focus.offset);
        let end = selection.anchor.offset.max(selection.focus.offset);
        Some((selection.anchor.path.clone(), start, end))
    }

    fn edit_leaf(&mut self, path: &[usize], start: usize, end: usize, insert: &str) -> bool {
        let mut roots = vec![TextNode::Element(self.value.clone())];
        let Some(leaf) = leaf_at_mut(&mut roots, path) else {
            return false;
        };
        let kept: String = leaf.text.chars().take(start).chain(leaf.text.chars().skip(end)).collect();
        leaf.text = splice_chars(&kept, start, insert);
        let Some(TextNode::Element(next)) = roots.pop() else {
            return false;
        };
        self.undo_stack.push(std::mem::replace(&mut self.value, next));
        let caret = start + insert.chars().count();
        self.selection = Some(Selection::caret(TextPoint::new(path.to_vec(), caret)));
        true
    }
}

impl TextEditor for PlainTextEditor {
    fn value(&self) -> &TextElement {
        &self.value
    }

    fn replace_value(&mut self, value: TextElement) {
        self.value = value;
        self.clamp_selection();
    }

    fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.clamp_selection();
    }

    fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    fn apply(&mut self, input: EditInput) -> bool {
        if self.readonly {
            return false;
        }
        let Some((path, start, end)) = self.leaf_span() else {
            return false;
        };
        match input {
            EditInput::InsertText(text) => {
                if text.is_empty() && start == end {
                    return false;
                }
                self.edit_leaf(&path, start, end, &text)
            }
            EditInput::DeleteBackward => {
                if start < end {
                    self.edit_leaf(&path, start, end, "")
                } else if start > 0 {
                    self.edit_leaf(&path, start - 1, start, "")
                } else {
                    false
                }
            }
        }
    }
}
