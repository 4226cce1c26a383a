use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use core_events::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    ShutdownSignal,
};
use core_keymap::Keymap;
use core_model::{App, View};
use core_render::{EditorView, Theme};
use core_state::EditorState;
use core_syntax::CompletionIndex;
use core_terminal::{Color, MemorySurface};
use core_text::{Buffer, Position};
use pretty_assertions::assert_eq;

fn session(text: &str, name: &str, width: u16, height: u16) -> (App, Rc<RefCell<EditorState>>) {
    let mut st = EditorState::with_index(Buffer::from_text(text), CompletionIndex::isolated());
    st.set_file_name(Some(PathBuf::from(name)));
    st.index_buffer();
    let state = Rc::new(RefCell::new(st));
    let editor = EditorView::new(Rc::clone(&state), Theme::default());
    let id = editor.id();
    let mut app = App::new(Box::new(editor), Keymap::new(), ShutdownSignal::new());
    app.resize(width, height);
    app.focus(id);
    (app, state)
}

fn typed(app: &mut App, text: &str) {
    for c in text.chars() {
        let code = match c {
            '\n' => KeyCode::Enter,
            '\t' => KeyCode::Tab,
            c => KeyCode::Char(c),
        };
        app.handle_event(&InputEvent::Key(KeyEvent::plain(code)));
    }
}

fn left_click(app: &mut App, column: u16, row: u16) {
    app.handle_event(&InputEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        mods: KeyModifiers::empty(),
    }));
}

fn render(app: &mut App, width: u16, height: u16) -> MemorySurface {
    let mut s = MemorySurface::new(width, height);
    app.draw(&mut s);
    s
}

#[test]
fn writing_a_go_function() {
    let (mut app, state) = session("\n", "main.go", 40, 6);
    typed(&mut app, "func main() {\nx := 1\n");
    assert_eq!(
        state.borrow().buffer().lines(),
        vec!["func main() {", "\tx := 1", "\t", ""]
    );

    let s = render(&mut app, 40, 6);
    assert_eq!(s.row_text(0).trim_end(), " 1 func main() {");
    assert_eq!(s.row_text(1).trim_end(), " 2     x := 1");
    // keyword, call, operator, integer
    assert_eq!(s.cell(3, 0).map(|c| c.style.fg), Some(Color::Purple));
    assert_eq!(s.cell(8, 0).map(|c| c.style.fg), Some(Color::RoyalBlue));
    assert_eq!(s.cell(10, 1).map(|c| c.style.fg), Some(Color::DarkRed));
    assert_eq!(s.cell(12, 1).map(|c| c.style.fg), Some(Color::DarkRed));
    assert_eq!(s.cursor(), Some((7, 2)));
}

#[test]
fn completion_uses_words_from_the_buffer() {
    let (mut app, state) = session("package main\n\n", "main.go", 60, 8);
    app.handle_event(&InputEvent::Key(KeyEvent::plain(KeyCode::Down)));
    typed(&mut app, "pac\t");
    assert_eq!(state.borrow().buffer().line(1).as_deref(), Some("package"));
    assert!(state.borrow().completion().is_none());

    let ctrl_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CTRL);
    // not bound on the surface itself
    assert!(!app.handle_event(&InputEvent::Key(ctrl_z)));
}

#[test]
fn double_click_selects_a_token_and_typing_replaces_it() {
    let (mut app, state) = session("let value = 10;\n", "lib.rs", 40, 4);
    left_click(&mut app, 8, 0);
    left_click(&mut app, 8, 0);
    let selection = state.borrow().selection();
    assert!(selection.is_some());

    let s = render(&mut app, 40, 4);
    assert_eq!(s.cell(7, 0).map(|c| c.style.bg), Some(Color::LightGray));
    assert_eq!(s.cell(11, 0).map(|c| c.style.bg), Some(Color::LightGray));
    assert_eq!(s.cell(5, 0).map(|c| c.style.bg), Some(Color::Reset));

    typed(&mut app, "n");
    assert_eq!(state.borrow().buffer().line(0).as_deref(), Some("let n = 10;"));
    assert_eq!(state.borrow().cursor(), Position::new(0, 5));
}

#[test]
fn wheel_scrolls_without_moving_the_cursor() {
    let text: String = (0..100).map(|i| format!("{i}\n")).collect();
    let (mut app, state) = session(&text, "notes.txt", 20, 10);
    app.set_scroll_sensitivity(0.5);
    app.handle_event(&InputEvent::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 4,
        row: 8,
        mods: KeyModifiers::empty(),
    }));
    assert_eq!(state.borrow().top(), 5);
    assert_eq!(state.borrow().cursor(), Position::new(0, 0));
    let s = render(&mut app, 20, 10);
    assert_eq!(s.row_text(0).trim_end(), "   5 4");
    assert_eq!(s.cursor(), None);
}
