/// Scratch-pad host for the `typed-undo` history manager.
///
/// Owns a text document, turns line commands into concrete edits and
/// records them in an `UndoManager`.
pub mod document;
pub mod edits;
pub mod pad;

pub use document::{Document, Selection, SharedDocument};
pub use pad::{Command, Pad, Status};
