use std::io::Write;
use std::sync::{Arc, Mutex};

use core_actions::{EditAction, EditKind, PersistError, PopupLayout, dispatch, open_editor, save};
use core_text::Position;
use pretty_assertions::assert_eq;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn open_edit_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.go");
    std::fs::write(&path, "package main\r\n\r\nfunc main() {\r\n}").unwrap();

    let mut state = open_editor(Some(&path));
    assert_eq!(
        state.buffer().lines(),
        vec!["package main", "", "func main() {", "}", ""]
    );
    assert!(!state.is_dirty());
    assert_eq!(state.title().get(), path.display().to_string());

    state.move_to(Position::new(2, 13));
    dispatch(EditAction::Enter, &mut state, PopupLayout::Below);
    for c in "fmt".chars() {
        dispatch(EditAction::Edit(EditKind::InsertChar(c)), &mut state, PopupLayout::Below);
    }
    assert!(state.is_dirty());
    assert!(state.title().get().ends_with(" *"));

    let written = save(&mut state, None).unwrap();
    assert_eq!(written, path);
    assert!(!state.is_dirty());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "package main\n\nfunc main() {\n\tfmt\n}\n"
    );
}

#[test]
fn missing_file_opens_empty_buffer_bound_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.rs");
    let mut state = open_editor(Some(&path));
    assert_eq!(state.buffer().lines(), vec!["", ""]);
    assert_eq!(state.file_name(), Some(path.as_path()));

    state.insert_text("fn x() {}");
    save(&mut state, None).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fn x() {}\n");
}

#[test]
fn empty_file_saves_back_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "").unwrap();

    let mut state = open_editor(Some(&path));
    assert_eq!(state.buffer().lines(), vec![""]);
    save(&mut state, None).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), Vec::<u8>::new());
}

#[test]
fn save_as_adopts_the_new_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = open_editor(None);
    assert_eq!(state.title().get(), "untitled");
    state.insert_text("hello");

    let bad = dir.path().join("no_such_dir").join("x.txt");
    let err = save(&mut state, Some(&bad)).unwrap_err();
    assert!(matches!(err, PersistError::Write { .. }));
    assert!(state.is_dirty(), "failed write leaves the buffer dirty");
    assert_eq!(state.file_name(), None);

    let good = dir.path().join("x.txt");
    save(&mut state, Some(&good)).unwrap();
    assert_eq!(state.file_name(), Some(good.as_path()));
    assert_eq!(state.title().get(), good.display().to_string());
}

#[test]
fn persistence_logs_never_contain_buffer_text() {
    let capture = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secret.txt");
    std::fs::write(&path, "hunter2\n").unwrap();
    tracing::subscriber::with_default(subscriber, || {
        let mut state = open_editor(Some(&path));
        dispatch(EditAction::Paste("swordfish".into()), &mut state, PopupLayout::Below);
        save(&mut state, None).unwrap();
    });

    let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("file_opened"), "missing open log: {logs}");
    assert!(logs.contains("file_saved"), "missing save log: {logs}");
    assert!(!logs.contains("hunter2"));
    assert!(!logs.contains("swordfish"));
}
