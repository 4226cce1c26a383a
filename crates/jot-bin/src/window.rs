//! The window body: the editor group (tab strip over the active editor) and
//! a bottom row switching between the status bar and the prompt.

use core_model::{Switch, VStack, View, ViewBase, ViewId};
use core_render::{EditorGroup, PromptBar, PromptHandle, StatusBar, Tabs, Theme};

pub struct Window {
    pub root: Box<dyn View>,
    pub editor: ViewId,
    pub prompt: PromptHandle,
}

pub fn build(tabs: &Tabs, theme: Theme) -> Window {
    let group = EditorGroup::new(tabs.clone(), theme);
    let editor_id = group.id();
    let prompt = PromptBar::new(tabs.clone(), editor_id, theme);
    let handle = prompt.handle();
    let status = StatusBar::new(&tabs.status(), theme);
    let bottom = Switch::new(ViewBase::fixed(1), vec![Box::new(status), Box::new(prompt)]);
    let root = VStack::new(vec![Box::new(group), Box::new(bottom)]);
    Window {
        root: Box::new(root),
        editor: editor_id,
        prompt: handle,
    }
}
