/// Linear undo/redo manager.
///
/// Keeps an ordered list of edits and a cursor into it. Edits before the
/// cursor are applied, edits from the cursor on are reverted and available
/// for redo. A separate save marker records which cursor position matches
/// the data as it was last saved.
use crate::config::{HistoryConfig, DEFAULT_LIMIT};
use crate::edit::UndoableEdit;
use crate::error::{HistoryError, Result};

/// Callback invoked after every state change.
pub type Listener = Box<dyn FnMut()>;

/// Manages the undo/redo history of a single undo scope.
///
/// All operations run synchronously to completion. The manager is not
/// re-entrant: a listener or an edit callback cannot reach the manager
/// while it is mutably borrowed for the call that invoked it.
///
/// A panicking edit callback unwinds through the manager. The cursor moves
/// before `undo` is called and after `redo` returns, so the edit whose
/// callback panicked is treated as reverted. No further recovery is
/// attempted.
pub struct UndoManager {
    /// Recorded edits, oldest first.
    edits: Vec<Box<dyn UndoableEdit>>,
    /// Number of edits whose effect is in force.
    position: usize,
    /// Cursor position matching the saved data, `None` once unreachable.
    unmodified_position: Option<usize>,
    /// Maximum number of edits kept.
    limit: usize,
    /// Change notification hook.
    listener: Option<Listener>,
}

impl std::fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoManager")
            .field("len", &self.edits.len())
            .field("position", &self.position)
            .field("unmodified_position", &self.unmodified_position)
            .field("limit", &self.limit)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl UndoManager {
    /// Creates an empty manager remembering at most `limit` edits.
    ///
    /// A limit of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        Self {
            edits: Vec::new(),
            position: 0,
            unmodified_position: Some(0),
            limit: sanitize_limit(limit),
            listener: None,
        }
    }

    /// Creates an empty manager from a [`HistoryConfig`].
    pub fn with_config(config: &HistoryConfig) -> Self {
        Self::new(config.limit)
    }

    /// Replaces the change listener. `None` disables notification.
    ///
    /// The listener runs after `add`, `undo`, `redo` and `clear`.
    pub fn set_listener(&mut self, listener: Option<Listener>) {
        self.listener = listener;
    }

    /// Records an edit whose forward effect the host has already applied.
    ///
    /// Any redoable edits are discarded first. Unless the save marker sits
    /// at the end of the history, the last edit gets a chance to merge the
    /// new one, and failing that the new edit may replace the last one.
    pub fn add(&mut self, edit: Box<dyn UndoableEdit>) {
        if self.edits.len() > self.position {
            tracing::trace!(
                dropped = self.edits.len() - self.position,
                "Discarding redo branch"
            );
            self.edits.truncate(self.position);
        }

        let at_save_marker = self.unmodified_position == Some(self.edits.len());
        match self.edits.last_mut() {
            Some(last) if !at_save_marker => {
                if last.merge(&*edit) {
                    tracing::trace!(into = last.description(), "Merged edit");
                } else {
                    if edit.replace(&**last) {
                        tracing::trace!(
                            old = last.description(),
                            new = edit.description(),
                            "Replaced edit"
                        );
                        self.edits.pop();
                    }
                    self.edits.push(edit);
                }
            }
            _ => self.edits.push(edit),
        }

        self.position = self.edits.len();
        self.apply_limit();

        if self
            .unmodified_position
            .is_some_and(|unmodified| unmodified >= self.position)
        {
            tracing::debug!("Save point lost: history after it was overwritten");
            self.unmodified_position = None;
        }

        tracing::trace!(len = self.edits.len(), "Recorded edit");
        self.notify();
    }

    /// Records a concrete edit. Shorthand for `add(Box::new(edit))`.
    pub fn push<E: UndoableEdit>(&mut self, edit: E) {
        self.add(Box::new(edit));
    }

    /// Whether a significant edit lies before the cursor.
    pub fn can_undo(&self) -> bool {
        self.test_undo(self.position).is_some()
    }

    /// Whether a significant edit lies after the cursor.
    pub fn can_redo(&self) -> bool {
        self.test_redo(self.position).is_some()
    }

    /// Undoes back to and including the nearest significant edit.
    ///
    /// Insignificant edits between the cursor and that edit are undone too.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToUndo`] if no significant edit can be
    /// undone. The history is left untouched in that case.
    pub fn undo(&mut self) -> Result<()> {
        let target = self
            .test_undo(self.position)
            .ok_or(HistoryError::NothingToUndo)?;
        while self.position > target {
            self.position -= 1;
            let edit = &mut self.edits[self.position];
            tracing::trace!(index = self.position, edit = edit.description(), "Undo");
            edit.undo();
        }
        self.notify();
        Ok(())
    }

    /// Redoes up to and including the next significant edit.
    ///
    /// Insignificant edits between the cursor and that edit are redone too.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToRedo`] if no significant edit can be
    /// redone. The history is left untouched in that case.
    pub fn redo(&mut self) -> Result<()> {
        let target = self
            .test_redo(self.position)
            .ok_or(HistoryError::NothingToRedo)?;
        while self.position < target {
            let edit = &mut self.edits[self.position];
            tracing::trace!(index = self.position, edit = edit.description(), "Redo");
            edit.redo();
            self.position += 1;
        }
        self.notify();
        Ok(())
    }

    /// Whether the data differs from the last saved state.
    ///
    /// Positions separated from the save marker only by insignificant
    /// edits count as unmodified. Past the last significant edit the window
    /// reaches one edit beyond the marker, so a longer run of insignificant
    /// edits added after saving reports modified.
    pub fn is_modified(&self) -> bool {
        let Some(unmodified) = self.unmodified_position else {
            return true;
        };
        if self.position == unmodified {
            return false;
        }
        if self.edits.len() <= unmodified {
            return true;
        }
        // Positions reachable from the save marker by crossing only
        // insignificant edits show the same data.
        let from = self.test_undo(unmodified).map_or(unmodified, |i| i + 1);
        let to = self
            .test_redo(unmodified)
            .map_or(unmodified + 1, |end| end - 1);
        self.position < from || self.position > to
    }

    /// Marks the current position as matching the saved data.
    pub fn set_unmodified(&mut self) {
        self.unmodified_position = Some(self.position);
    }

    /// Maximum number of edits kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Changes the limit and evicts the oldest edits right away if needed.
    ///
    /// Shrinking below the current length drops edits silently, including
    /// applied ones the host could otherwise still undo. A limit of zero is
    /// raised to one.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = sanitize_limit(limit);
        self.apply_limit();
    }

    /// Removes all edits and marks the empty history as saved.
    pub fn clear(&mut self) {
        self.edits.clear();
        self.position = 0;
        self.unmodified_position = Some(0);
        self.notify();
    }

    /// Number of recorded edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether no edits are recorded.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of edits currently applied.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Description of the significant edit the next `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.test_undo(self.position)
            .map(|i| self.edits[i].description())
    }

    /// Description of the significant edit the next `redo` would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        self.test_redo(self.position)
            .map(|end| self.edits[end - 1].description())
    }

    /// Index of the nearest significant edit before `position`.
    fn test_undo(&self, position: usize) -> Option<usize> {
        self.edits[..position.min(self.edits.len())]
            .iter()
            .rposition(|edit| edit.is_significant())
    }

    /// Position just past the nearest significant edit at or after `position`.
    fn test_redo(&self, position: usize) -> Option<usize> {
        self.edits
            .iter()
            .enumerate()
            .skip(position)
            .find(|(_, edit)| edit.is_significant())
            .map(|(i, _)| i + 1)
    }

    /// Evicts the oldest edits until the history fits the limit.
    fn apply_limit(&mut self) {
        let Some(excess) = self.edits.len().checked_sub(self.limit) else {
            return;
        };
        if excess == 0 {
            return;
        }

        // Evicting reverted edits loses their effect for good, so no saved
        // state that included them can come back.
        let reverted_evicted = self.position < excess;
        self.edits.drain(..excess);
        self.position = self.position.saturating_sub(excess);
        self.unmodified_position = match self.unmodified_position {
            Some(unmodified) if unmodified >= excess && !reverted_evicted => {
                Some(unmodified - excess)
            }
            Some(_) => {
                tracing::debug!("Save point evicted from history");
                None
            }
            None => None,
        };
        tracing::debug!(evicted = excess, limit = self.limit, "Applied history limit");
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener();
        }
    }
}

fn sanitize_limit(limit: usize) -> usize {
    if limit == 0 {
        tracing::warn!("History limit of 0 is invalid, using 1");
        return 1;
    }
    limit
}
