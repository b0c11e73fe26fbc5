/// History error types.
use thiserror::Error;

/// Errors reported by [`UndoManager`](crate::UndoManager) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// No significant edit before the cursor.
    #[error("cannot undo")]
    NothingToUndo,

    /// No significant edit after the cursor.
    #[error("cannot redo")]
    NothingToRedo,
}

/// Result alias for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
