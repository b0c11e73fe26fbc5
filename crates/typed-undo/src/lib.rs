/// Linear undo/redo history.
///
/// Provides an `UndoManager` that records host-supplied `UndoableEdit`s,
/// steps backward and forward through them, coalesces small edits via
/// merge/replace and tracks whether the data has diverged from the last
/// saved point. The host owns the data; edits only know how to reverse
/// and reapply their own change.
pub mod config;
pub mod edit;
pub mod error;
pub mod manager;

pub use config::HistoryConfig;
pub use edit::{AsAny, UndoableEdit};
pub use error::{HistoryError, Result};
pub use manager::UndoManager;
