//! View controllers.
//!
//! Each controller owns the transient state of one dashboard view and knows
//! how to fold backend responses into it. None of them perform I/O: they hand
//! back [`Request`](crate::task::Request)s for the app to dispatch and accept
//! the matching results later. That keeps every state transition testable
//! without a runtime.
//!
//! * [`news`] — the News and Saved lists.
//! * [`prompt`] — the chat-style prompt console.
//! * [`sources`] — the source manager.

pub mod news;
pub mod prompt;
pub mod sources;

pub use news::NewsList;
pub use prompt::{PromptConsole, Role};
pub use sources::SourceManager;

use ratatui::widgets::ListState;

// -- list navigation shared by the list views --------------------------------

pub fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => (i + 1).min(len - 1),
        None => 0,
    };
    state.select(Some(i));
}

pub fn select_previous(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => i.saturating_sub(1),
        None => 0,
    };
    state.select(Some(i));
}

pub fn select_first(state: &mut ListState, len: usize) {
    if len > 0 {
        state.select(Some(0));
    }
}

pub fn select_last(state: &mut ListState, len: usize) {
    if len > 0 {
        state.select(Some(len - 1));
    }
}

/// Keep the selection inside a list that was just replaced.
pub fn clamp_selection(state: &mut ListState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        Some(_) => {}
        None => state.select(Some(0)),
    }
}
