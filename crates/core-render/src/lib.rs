//! Concrete views for the editor window.
//!
//! - [`EditorView`]: gutter, highlighted text, search and selection
//!   overlays, completion popup. Editing keys are turned into
//!   [`core_actions::EditAction`]s and dispatched against the shared state.
//! - [`EditorGroup`]: the open editors behind a tab strip, reached from
//!   outside the tree through a [`Tabs`] handle.
//! - [`StatusBar`]: one-row bar mirroring the active editor's status.
//! - [`PromptBar`]: find, goto-line and save-as input, opened through a
//!   [`PromptHandle`].
//!
//! All views share one [`Theme`].

pub mod editor_view;
pub mod group;
pub mod prompt;
pub mod status;
pub mod style;

pub use editor_view::{EditorView, POPUP_WIDTH, gutter_width};
pub use group::{EditorGroup, Tabs};
pub use prompt::{FIND_HINTS, PromptBar, PromptHandle, PromptMode};
pub use status::{STATUS_HINTS, StatusBar};
pub use style::Theme;
