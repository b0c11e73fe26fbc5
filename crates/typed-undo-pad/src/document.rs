/// Text buffer owned by the host and shared with the edits that change it.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle shared between the pad and every recorded edit.
pub type SharedDocument = Rc<RefCell<Document>>;

/// Selection as char offsets. `head` is where the caret sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    /// Collapsed selection at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.anchor, self.head)
    }
}

/// A plain text document with a single selection.
#[derive(Debug, Default)]
pub struct Document {
    text: String,
    selection: Selection,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Length in chars.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Sets the selection, clamping both ends to the text.
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.len_chars();
        self.selection = Selection {
            anchor: selection.anchor.min(len),
            head: selection.head.min(len),
        };
    }

    /// Inserts `text` at char offset `at` and leaves the caret after it.
    pub fn insert(&mut self, at: usize, text: &str) {
        let byte = self.byte_index(at);
        self.text.insert_str(byte, text);
        self.selection = Selection::caret(at + text.chars().count());
    }

    /// Removes `count` chars starting at `at`, returning them.
    /// The caret ends up at `at`.
    pub fn remove(&mut self, at: usize, count: usize) -> String {
        let start = self.byte_index(at);
        let end = self.byte_index(at + count);
        let removed: String = self.text.drain(start..end).collect();
        self.selection = Selection::caret(at.min(self.len_chars()));
        removed
    }

    /// Byte offset of char offset `at`, clamped to the end of the text.
    fn byte_index(&self, at: usize) -> usize {
        self.text
            .char_indices()
            .nth(at)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
