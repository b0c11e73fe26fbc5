/// Concrete edits over a [`SharedDocument`].
///
/// Each edit is created after its effect has been applied to the document
/// and only replays that effect on undo/redo.
use std::rc::Rc;

use typed_undo::UndoableEdit;

use crate::document::{Selection, SharedDocument};

/// Text typed at a position. Consecutive keystrokes within a word merge.
#[derive(Debug)]
pub struct InsertText {
    doc: SharedDocument,
    at: usize,
    text: String,
    selection_before: Selection,
}

impl InsertText {
    /// Inserts `text` at the caret and returns the edit describing it.
    pub fn apply(doc: &SharedDocument, text: &str) -> Self {
        let mut d = doc.borrow_mut();
        let selection_before = d.selection();
        let at = selection_before.head;
        d.insert(at, text);
        Self {
            doc: Rc::clone(doc),
            at,
            text: text.to_string(),
            selection_before,
        }
    }

    fn end(&self) -> usize {
        self.at + self.text.chars().count()
    }
}

impl UndoableEdit for InsertText {
    fn undo(&mut self) {
        let mut doc = self.doc.borrow_mut();
        doc.remove(self.at, self.text.chars().count());
        doc.set_selection(self.selection_before);
    }

    fn redo(&mut self) {
        self.doc.borrow_mut().insert(self.at, &self.text);
    }

    fn merge(&mut self, edit: &dyn UndoableEdit) -> bool {
        let Some(next) = edit.downcast_ref::<InsertText>() else {
            return false;
        };
        // A word ends at whitespace; the next keystroke starts a new step.
        if next.at != self.end() || self.text.ends_with(char::is_whitespace) {
            return false;
        }
        self.text.push_str(&next.text);
        true
    }

    fn replace(&self, previous: &dyn UndoableEdit) -> bool {
        previous.is::<SelectionChange>()
    }

    fn description(&self) -> &str {
        "Typing"
    }
}

/// Backspace over `removed`, which ended at the caret.
#[derive(Debug)]
pub struct DeleteText {
    doc: SharedDocument,
    at: usize,
    removed: String,
    selection_before: Selection,
}

impl DeleteText {
    /// Deletes up to `count` chars before the caret.
    ///
    /// Returns `None` when the caret is at the start of the document.
    pub fn apply(doc: &SharedDocument, count: usize) -> Option<Self> {
        let mut d = doc.borrow_mut();
        let selection_before = d.selection();
        let end = selection_before.head;
        let at = end.saturating_sub(count);
        if at == end {
            return None;
        }
        let removed = d.remove(at, end - at);
        Some(Self {
            doc: Rc::clone(doc),
            at,
            removed,
            selection_before,
        })
    }
}

impl UndoableEdit for DeleteText {
    fn undo(&mut self) {
        let mut doc = self.doc.borrow_mut();
        doc.insert(self.at, &self.removed);
        doc.set_selection(self.selection_before);
    }

    fn redo(&mut self) {
        self.doc
            .borrow_mut()
            .remove(self.at, self.removed.chars().count());
    }

    fn merge(&mut self, edit: &dyn UndoableEdit) -> bool {
        let Some(next) = edit.downcast_ref::<DeleteText>() else {
            return false;
        };
        if next.at + next.removed.chars().count() != self.at {
            return false;
        }
        self.at = next.at;
        self.removed.insert_str(0, &next.removed);
        true
    }

    fn replace(&self, previous: &dyn UndoableEdit) -> bool {
        previous.is::<SelectionChange>()
    }

    fn description(&self) -> &str {
        "Delete"
    }
}

/// Selection move. Cosmetic, so never undone on its own.
#[derive(Debug)]
pub struct SelectionChange {
    doc: SharedDocument,
    before: Selection,
    after: Selection,
}

impl SelectionChange {
    /// Moves the selection and returns the edit describing it.
    pub fn apply(doc: &SharedDocument, selection: Selection) -> Self {
        let mut d = doc.borrow_mut();
        let before = d.selection();
        d.set_selection(selection);
        Self {
            doc: Rc::clone(doc),
            before,
            after: d.selection(),
        }
    }
}

impl UndoableEdit for SelectionChange {
    fn undo(&mut self) {
        self.doc.borrow_mut().set_selection(self.before);
    }

    fn redo(&mut self) {
        self.doc.borrow_mut().set_selection(self.after);
    }

    fn merge(&mut self, edit: &dyn UndoableEdit) -> bool {
        match edit.downcast_ref::<SelectionChange>() {
            Some(next) => {
                self.after = next.after;
                true
            }
            None => false,
        }
    }

    fn is_significant(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "Selection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use typed_undo::UndoManager;

    fn text(doc: &SharedDocument) -> String {
        doc.borrow().text().to_string()
    }

    #[test]
    fn test_typing_merges_within_word() {
        let doc = Document::shared();
        let mut mgr = UndoManager::default();
        mgr.push(InsertText::apply(&doc, "he"));
        mgr.push(InsertText::apply(&doc, "llo"));
        mgr.push(InsertText::apply(&doc, " "));
        mgr.push(InsertText::apply(&doc, "world"));
        assert_eq!(text(&doc), "hello world");
        assert_eq!(mgr.len(), 2);

        mgr.undo().unwrap();
        assert_eq!(text(&doc), "hello ");
        mgr.undo().unwrap();
        assert_eq!(text(&doc), "");
        assert!(!mgr.is_modified());

        mgr.redo().unwrap();
        mgr.redo().unwrap();
        assert_eq!(text(&doc), "hello world");
    }

    #[test]
    fn test_backspace_merges() {
        let doc = Document::shared();
        let mut mgr = UndoManager::default();
        mgr.push(InsertText::apply(&doc, "abcdef"));
        mgr.set_unmodified();
        mgr.push(DeleteText::apply(&doc, 1).unwrap());
        mgr.push(DeleteText::apply(&doc, 2).unwrap());
        assert_eq!(text(&doc), "abc");
        assert_eq!(mgr.len(), 2);

        mgr.undo().unwrap();
        assert_eq!(text(&doc), "abcdef");
        assert_eq!(doc.borrow().selection(), Selection::caret(6));
        assert!(!mgr.is_modified());
    }

    #[test]
    fn test_delete_at_start_is_none() {
        let doc = Document::shared();
        assert!(DeleteText::apply(&doc, 3).is_none());
    }

    #[test]
    fn test_selection_is_insignificant_and_merges() {
        let doc = Document::shared();
        let mut mgr = UndoManager::default();
        mgr.push(InsertText::apply(&doc, "abc "));
        mgr.set_unmodified();
        mgr.push(SelectionChange::apply(&doc, Selection::caret(1)));
        mgr.push(SelectionChange::apply(&doc, Selection { anchor: 0, head: 2 }));
        assert_eq!(mgr.len(), 2);
        assert!(!mgr.is_modified());

        mgr.undo().unwrap();
        assert_eq!(text(&doc), "");
        assert_eq!(doc.borrow().selection(), Selection::caret(0));

        mgr.redo().unwrap();
        assert_eq!(text(&doc), "abc ");
        assert_eq!(doc.borrow().selection(), Selection::caret(4));
    }

    #[test]
    fn test_typing_replaces_pending_selection_move() {
        let doc = Document::shared();
        let mut mgr = UndoManager::default();
        mgr.push(InsertText::apply(&doc, "ac "));
        mgr.push(SelectionChange::apply(&doc, Selection::caret(1)));
        mgr.push(InsertText::apply(&doc, "b"));
        assert_eq!(text(&doc), "abc ");
        assert_eq!(mgr.len(), 2);

        mgr.undo().unwrap();
        assert_eq!(text(&doc), "ac ");
        assert_eq!(doc.borrow().selection(), Selection::caret(1));
    }
}
