//! Application-wide key table. These run before the focused view sees the
//! key, whichever view that is.

use std::cell::RefCell;
use std::rc::Rc;

use core_actions::{EditAction, PopupLayout, dispatch, save};
use core_events::KeyEvent;
use core_keymap::Keymap;
use core_model::{Ctx, GlobalHandler};
use core_render::{PromptHandle, PromptMode, Tabs};
use core_state::EditorState;
use tracing::{debug, info};

/// Shell keys. Buffer commands act on whichever tab is active when the key
/// arrives.
pub fn global_keymap(tabs: &Tabs, prompt: &PromptHandle) -> Keymap<GlobalHandler> {
    let mut keys: Keymap<GlobalHandler> = Keymap::new();

    keys.bind(
        KeyEvent::ctrl('q'),
        Box::new(|ctx: &mut Ctx| ctx.request_shutdown()),
    );

    let (t, p) = (tabs.clone(), prompt.clone());
    keys.bind(
        KeyEvent::ctrl('s'),
        Box::new(move |ctx: &mut Ctx| save_or_prompt(&t.active_state(), &p, ctx)),
    );

    let t = tabs.clone();
    keys.bind(
        KeyEvent::ctrl('w'),
        Box::new(move |ctx: &mut Ctx| {
            if !t.close_active() {
                info!(target: "runtime", "last_tab_closed");
                ctx.request_shutdown();
            }
        }),
    );

    let p = prompt.clone();
    keys.bind(
        KeyEvent::ctrl('f'),
        Box::new(move |ctx: &mut Ctx| p.open(PromptMode::Find, ctx)),
    );

    let p = prompt.clone();
    keys.bind(
        KeyEvent::ctrl('g'),
        Box::new(move |ctx: &mut Ctx| p.open(PromptMode::Goto, ctx)),
    );

    for (key, action) in [
        (KeyEvent::ctrl('z'), EditAction::Undo),
        (KeyEvent::ctrl('r'), EditAction::Redo),
    ] {
        let t = tabs.clone();
        keys.bind(
            key,
            Box::new(move |_ctx: &mut Ctx| {
                let st = t.active_state();
                dispatch(action.clone(), &mut st.borrow_mut(), PopupLayout::default());
            }),
        );
    }

    keys
}

/// Write to the bound file. Without a file name, or when the write fails,
/// ask for one instead; the buffer is left untouched either way.
fn save_or_prompt(state: &Rc<RefCell<EditorState>>, prompt: &PromptHandle, ctx: &mut Ctx) {
    if state.borrow().file_name().is_none() {
        debug!(target: "io", "save_without_name");
        prompt.open(PromptMode::SaveAs, ctx);
        return;
    }
    let result = save(&mut state.borrow_mut(), None);
    if let Err(err) = result {
        prompt.open_with_message(PromptMode::SaveAs, Some(err.to_string()), ctx);
    }
}
