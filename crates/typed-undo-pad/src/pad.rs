/// Line commands and the session that applies them.
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use typed_undo::{HistoryConfig, UndoManager};

use crate::document::{Document, Selection, SharedDocument};
use crate::edits::{DeleteText, InsertText, SelectionChange};

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert text at the caret.
    Type(String),
    /// Delete chars before the caret.
    Delete(usize),
    /// Move the selection.
    Select(usize, usize),
    Undo,
    Redo,
    /// Mark the current text as saved.
    Save,
    /// Drop all history.
    Clear,
    /// Change the history limit.
    Limit(usize),
    /// Print the status line only.
    Show,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let number = |arg: &str| -> Result<usize> {
            arg.trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid number for `{name}`: {arg:?}"))
        };
        let command = match name {
            "type" if !rest.is_empty() => Self::Type(rest.to_string()),
            "type" => bail!("`type` needs some text"),
            "delete" => Self::Delete(number(rest)?),
            "select" => {
                let Some((anchor, head)) = rest.trim().split_once(' ') else {
                    bail!("`select` needs a start and an end");
                };
                Self::Select(number(anchor)?, number(head)?)
            }
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "save" => Self::Save,
            "clear" => Self::Clear,
            "limit" => Self::Limit(number(rest)?),
            "show" => Self::Show,
            other => bail!("Unknown command: {other:?}"),
        };
        Ok(command)
    }
}

/// A document with its undo history.
pub struct Pad {
    doc: SharedDocument,
    history: UndoManager,
    /// History notifications seen so far.
    changes: Rc<Cell<u64>>,
}

impl Pad {
    pub fn new(config: &HistoryConfig) -> Self {
        let changes = Rc::new(Cell::new(0));
        let mut history = UndoManager::with_config(config);
        let counter = Rc::clone(&changes);
        history.set_listener(Some(Box::new(move || counter.set(counter.get() + 1))));
        Self {
            doc: Document::shared(),
            history,
            changes,
        }
    }

    pub fn text(&self) -> String {
        self.doc.borrow().text().to_string()
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to undo or redo.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        tracing::debug!(?command, "Executing");
        match command {
            Command::Type(text) => self.history.push(InsertText::apply(&self.doc, &text)),
            Command::Delete(count) => match DeleteText::apply(&self.doc, count) {
                Some(edit) => self.history.push(edit),
                None => tracing::info!("Nothing to delete"),
            },
            Command::Select(anchor, head) => {
                let edit = SelectionChange::apply(&self.doc, Selection { anchor, head });
                self.history.push(edit);
            }
            Command::Undo => self.history.undo()?,
            Command::Redo => self.history.redo()?,
            Command::Save => self.history.set_unmodified(),
            Command::Clear => self.history.clear(),
            Command::Limit(limit) => self.history.set_limit(limit),
            Command::Show => {}
        }
        Ok(())
    }

    pub fn status(&self) -> Status {
        let doc = self.doc.borrow();
        Status {
            text: doc.text().to_string(),
            selection: doc.selection(),
            modified: self.history.is_modified(),
            undo: self.history.undo_description().map(str::to_string),
            redo: self.history.redo_description().map(str::to_string),
            changes: self.changes.get(),
        }
    }
}

/// Snapshot printed after each command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub selection: Selection,
    pub modified: bool,
    pub undo: Option<String>,
    pub redo: Option<String>,
    pub changes: u64,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selection = if self.selection.is_empty() {
            self.selection.head.to_string()
        } else {
            self.selection.to_string()
        };
        write!(
            f,
            "{}{:?} [{}] undo: {} | redo: {} | changes: {}",
            if self.modified { "*" } else { " " },
            self.text,
            selection,
            self.undo.as_deref().unwrap_or("-"),
            self.redo.as_deref().unwrap_or("-"),
            self.changes,
        )
    }
}
