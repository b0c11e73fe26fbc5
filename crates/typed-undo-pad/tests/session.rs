// End-to-end sessions: scripts of line commands run against a pad.

use typed_undo::HistoryConfig;
use typed_undo_pad::{Command, Pad, Selection};

fn run_script(pad: &mut Pad, script: &str) -> Vec<String> {
    let mut errors = Vec::new();
    for line in script.lines() {
        let line = line.trim_start();
        if line.is_empty() {
            continue;
        }
        let result = line
            .parse::<Command>()
            .and_then(|command| pad.execute(command));
        if let Err(e) = result {
            errors.push(e.to_string());
        }
    }
    errors
}

#[test]
fn test_words_undo_one_at_a_time() {
    let mut pad = Pad::new(&HistoryConfig::default());
    let errors = run_script(
        &mut pad,
        "type t\ntype he \ntype quick \ntype fox\nundo\nundo",
    );
    assert!(errors.is_empty());
    assert_eq!(pad.text(), "the ");
    assert_eq!(pad.status().redo.as_deref(), Some("Typing"));
}

#[test]
fn test_selection_moves_do_not_dirty_the_document() {
    let mut pad = Pad::new(&HistoryConfig::default());
    run_script(&mut pad, "type hello\nsave\nselect 0 5\nselect 1 2");
    let status = pad.status();
    assert!(!status.modified);
    assert_eq!(status.selection, Selection { anchor: 1, head: 2 });
    assert_eq!(status.undo.as_deref(), Some("Typing"));
}

#[test]
fn test_edit_after_undo_loses_save_point() {
    let mut pad = Pad::new(&HistoryConfig::default());
    let errors = run_script(
        &mut pad,
        "type one \ntype two\nsave\nundo\ntype three\nundo\nundo\nredo\nredo\nredo",
    );
    assert_eq!(errors, ["cannot redo"]);
    assert_eq!(pad.text(), "one three");
    assert!(pad.status().modified);
}

#[test]
fn test_limit_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, r#"{"limit": 2}"#).unwrap();
    let config = HistoryConfig::load(&path).unwrap();

    let mut pad = Pad::new(&config);
    let errors = run_script(&mut pad, "type a \ntype b \ntype c \nundo\nundo\nundo");
    assert_eq!(errors, ["cannot undo"]);
    assert_eq!(pad.text(), "a ");
}

#[test]
fn test_backspace_then_undo_restores_text() {
    let mut pad = Pad::new(&HistoryConfig::default());
    let errors = run_script(&mut pad, "type hello\nsave\ndelete 2\ndelete 1\nundo");
    assert!(errors.is_empty());
    assert_eq!(pad.text(), "hello");
    assert!(!pad.status().modified);
}
