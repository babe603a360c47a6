//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions. Global keys (quit, tab
//! switching) are checked first; everything else goes to the mounted view.
//! The prompt and source views take free text, so letters only act as
//! commands in the read-only list views.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Tab, View};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if ctrl => app.quit = true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::F(n @ 1..=4) => app.select_tab(Tab::ALL[usize::from(n) - 1]),
        _ => handle_view_key(app, key.code, ctrl),
    }
}

fn handle_view_key(app: &mut App, code: KeyCode, ctrl: bool) {
    match &mut app.view {
        View::News(list) => match code {
            KeyCode::Char('q') => app.quit = true,
            KeyCode::Down | KeyCode::Char('j') => list.select_next(),
            KeyCode::Up | KeyCode::Char('k') => list.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => list.select_first(),
            KeyCode::End | KeyCode::Char('G') => list.select_last(),
            KeyCode::Char('r') | KeyCode::F(5) => app.reload(),
            KeyCode::Char('S') => app.scrape(),
            _ => {}
        },
        View::Prompt(console) => match code {
            KeyCode::Enter => app.submit_prompt(),
            KeyCode::Backspace => console.backspace(),
            KeyCode::Up => console.scroll_up(),
            KeyCode::Down => console.scroll_down(),
            KeyCode::Char(c) if !ctrl => console.push_char(c),
            _ => {}
        },
        View::Sources(manager) => match code {
            KeyCode::Enter => app.add_source(),
            KeyCode::Delete => app.remove_selected_source(),
            KeyCode::F(5) => app.reload(),
            KeyCode::Backspace => manager.backspace(),
            KeyCode::Up => manager.select_previous(),
            KeyCode::Down => manager.select_next(),
            KeyCode::Char(c) if !ctrl => manager.push_char(c),
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyEventState;
    use tokio::runtime::Handle;

    use super::*;
    use crate::task::Dispatcher;
    use crate::testing::FakeBackend;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(tab: Tab) -> App {
        let (dispatcher, _rx) = Dispatcher::new(Arc::new(FakeBackend::default()), Handle::current());
        App::new(dispatcher, tab)
    }

    #[tokio::test]
    async fn q_quits_from_list_views_but_types_in_prompt() {
        let mut news = app(Tab::News);
        handle_key_event(&mut news, press(KeyCode::Char('q')));
        assert!(news.quit);

        let mut prompt = app(Tab::Prompt);
        handle_key_event(&mut prompt, press(KeyCode::Char('q')));
        assert!(!prompt.quit);
        let View::Prompt(console) = &prompt.view else {
            panic!("prompt view expected");
        };
        assert_eq!(console.draft, "q");
    }

    #[tokio::test]
    async fn esc_and_ctrl_c_quit_everywhere() {
        let mut sources = app(Tab::Sources);
        handle_key_event(&mut sources, press(KeyCode::Esc));
        assert!(sources.quit);

        let mut prompt = app(Tab::Prompt);
        handle_key_event(&mut prompt, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(prompt.quit);
    }

    #[tokio::test]
    async fn tab_keys_cycle_and_function_keys_jump() {
        let mut app = app(Tab::News);
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.tab(), Tab::Prompt);
        handle_key_event(&mut app, press(KeyCode::BackTab));
        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.tab(), Tab::Saved);
        handle_key_event(&mut app, press(KeyCode::F(3)));
        assert_eq!(app.tab(), Tab::Sources);
    }

    #[tokio::test]
    async fn release_events_are_ignored() {
        let mut app = app(Tab::News);
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }

    #[tokio::test]
    async fn typing_in_sources_edits_draft() {
        let mut app = app(Tab::Sources);
        for c in "http://x".chars() {
            handle_key_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, press(KeyCode::Backspace));
        let View::Sources(manager) = &app.view else {
            panic!("sources view expected");
        };
        assert_eq!(manager.draft, "http://");
    }
}
