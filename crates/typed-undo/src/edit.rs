/// The contract every recorded change implements.
use std::any::Any;

/// Upcast helper so edits can inspect each other's concrete type.
///
/// Blanket-implemented for every `'static` type; implementors of
/// [`UndoableEdit`] never write this by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single reversible change recorded by the [`UndoManager`](crate::UndoManager).
///
/// The host applies the forward effect itself before handing the edit to
/// [`UndoManager::add`](crate::UndoManager::add). From then on the manager
/// decides when `undo` and `redo` run.
///
/// Implementations must not call back into the manager that owns them.
pub trait UndoableEdit: AsAny {
    /// Reverts the change.
    fn undo(&mut self);

    /// Re-applies the change.
    fn redo(&mut self);

    /// Tries to absorb a newer `edit` into `self`.
    ///
    /// Called on the most recent edit in the history when another edit is
    /// added. On `true` the newer edit is dropped and its effect is assumed
    /// to be covered by `self` from now on. A text editor can use this to
    /// fold single keystrokes into one word.
    fn merge(&mut self, _edit: &dyn UndoableEdit) -> bool {
        false
    }

    /// Decides whether `self` supersedes the `previous` edit outright.
    ///
    /// Only consulted when `merge` declined. On `true` the previous edit is
    /// dropped from the history and `self` takes its slot.
    fn replace(&self, _previous: &dyn UndoableEdit) -> bool {
        false
    }

    /// Whether this edit on its own is worth undoing and saving.
    ///
    /// Insignificant edits (selection moves, merges that ended where they
    /// started) ride along with their neighbours: undo and redo skip over
    /// them and they never flip the modified flag.
    fn is_significant(&self) -> bool {
        true
    }

    /// Short label for menus and logs.
    fn description(&self) -> &str {
        ""
    }
}

impl dyn UndoableEdit {
    /// Returns the edit as `T` if that is its concrete type.
    ///
    /// Prefer this over `as_any()` on a `Box<dyn UndoableEdit>`, where
    /// method resolution picks the box itself rather than the edit.
    pub fn downcast_ref<T: UndoableEdit>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Whether the edit's concrete type is `T`.
    pub fn is<T: UndoableEdit>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl std::fmt::Debug for dyn UndoableEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoableEdit")
            .field("description", &self.description())
            .field("significant", &self.is_significant())
            .finish()
    }
}
