//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## Layout
//!
//! ```text
//! ┌─────────┐┌──────────────────────────────┐
//! │ sidebar ││ mounted view                 │
//! │         ││                              │
//! └─────────┘└──────────────────────────────┘
//!  status bar
//! ```
//!
//! Each view has its own `draw_*` function taking only that view's state, so
//! they can be rendered (and tested) without an [`App`].

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Tab, View};
use crate::view::{NewsList, PromptConsole, Role, SourceManager};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [body, status_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());
    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(14), Constraint::Min(1)]).areas(body);

    draw_sidebar(app.tab(), frame, sidebar_area);
    match &mut app.view {
        View::News(list) => draw_news(list, frame, content_area),
        View::Prompt(console) => draw_prompt(console, frame, content_area),
        View::Sources(manager) => draw_sources(manager, frame, content_area),
    }
    draw_status_bar(app, frame, status_area);
}

/// Render the tab selector.
fn draw_sidebar(current: Tab, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| ListItem::new(format!("F{} {}", i + 1, tab.label())))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Black)
                .bg(Color::Cyan),
        );

    let mut state = ListState::default().with_selected(Tab::ALL.iter().position(|t| *t == current));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the News or Saved list.
pub fn draw_news(list: &mut NewsList, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", list.title()))
        .borders(Borders::ALL);

    if list.items.is_empty() {
        let text = if list.loading() { "Loading…" } else { list.empty_message() };
        let empty = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let [list_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|item| {
            let mut title = Vec::new();
            if item.saved {
                title.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
            }
            title.push(Span::styled(
                item.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));

            let mut lines = vec![
                Line::from(title),
                Line::from(Span::styled(
                    item.metadata_line(),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            if let Some(summary) = item.summary_text() {
                lines.push(Line::from(Span::raw(summary)));
            }
            ListItem::new(Text::from(lines))
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(widget, list_area, &mut list.list_state);

    let link = list
        .selected_item()
        .map(|item| item.url.as_str())
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(link, Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)),
    ]));
    frame.render_widget(footer, footer_area);
}

/// Render the prompt history and the draft line.
pub fn draw_prompt(console: &PromptConsole, frame: &mut Frame, area: Rect) {
    let [history_area, input_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

    let title = match console.conversation_id {
        Some(id) => format!(" Prompt · conversation #{id} "),
        None => " Prompt ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(history_area);

    let mut lines: Vec<Line> = Vec::new();
    for turn in &console.history {
        let colour = match turn.role {
            Role::User => Color::Blue,
            Role::Agent => Color::Green,
        };
        let mut text_lines = turn.text.lines();
        lines.push(Line::from(vec![
            Span::styled(
                turn.role.label(),
                Style::default().fg(colour).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(text_lines.next().unwrap_or_default(), Style::default().fg(colour)),
        ]));
        lines.extend(text_lines.map(|l| Line::from(Span::styled(l, Style::default().fg(colour)))));
    }

    // Counted before the block is attached so the total is rows of text only.
    let history = Paragraph::new(lines).wrap(Wrap { trim: false });
    let height = u16::try_from(history.line_count(inner.width)).unwrap_or(u16::MAX);
    let scroll = height
        .saturating_sub(inner.height)
        .saturating_sub(console.scroll_back);
    frame.render_widget(history.block(block).scroll((scroll, 0)), history_area);

    let input_title = if console.waiting() {
        " Message (waiting for reply…) "
    } else {
        " Message "
    };
    let input = Paragraph::new(Line::from(vec![
        Span::raw(console.draft.as_str()),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().title(input_title).borders(Borders::ALL));
    frame.render_widget(input, input_area);
}

/// Render the source input and the source list.
pub fn draw_sources(manager: &mut SourceManager, frame: &mut Frame, area: Rect) {
    let [input_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let draft = if manager.draft.is_empty() {
        Line::from(Span::styled("https://...", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::raw(manager.draft.as_str()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    };
    let input = Paragraph::new(draft)
        .block(Block::default().title(" Add source ").borders(Borders::ALL));
    frame.render_widget(input, input_area);

    let block = Block::default().title(" Sources ").borders(Borders::ALL);
    if manager.sources.is_empty() {
        let text = if manager.loading() { "Loading…" } else { "No sources." };
        let empty = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block);
        frame.render_widget(empty, list_area);
        return;
    }

    let items: Vec<ListItem> = manager
        .sources
        .iter()
        .map(|source| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    source.url.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    source.status_line(),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(widget, list_area, &mut manager.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.tab() {
        Tab::News => "q: quit  Tab: switch  ↑/↓: scroll  r: reload  S: scrape",
        Tab::Saved => "q: quit  Tab: switch  ↑/↓: scroll  r: reload",
        Tab::Prompt => "Esc: quit  Tab: switch  Enter: send  ↑/↓: scroll",
        Tab::Sources => "Esc: quit  Tab: switch  Enter: add  Del: remove  F5: reload",
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
    ];
    let pending = app.pending();
    if pending > 0 {
        spans.push(Span::styled(
            format!("{pending} pending  "),
            Style::default().fg(Color::Green),
        ));
    }
    spans.push(Span::raw(help));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::api::{ClientError, Feed, PromptReply};
    use crate::testing::{news_item, source};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn render(draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(draw).unwrap();
        screen_text(&terminal)
    }

    #[test]
    fn empty_news_shows_empty_state_after_fetch() {
        let mut list = NewsList::new(Feed::Latest);
        let (seq, _) = list.reload();
        list.apply(seq, Err(ClientError::Status(500)));

        let text = render(|f| {
            let area = f.area();
            draw_news(&mut list, f, area)
        });
        assert!(text.contains("No news yet."));
    }

    #[test]
    fn news_shows_loading_before_first_fetch_resolves() {
        let mut list = NewsList::new(Feed::Saved);
        list.reload();

        let text = render(|f| {
            let area = f.area();
            draw_news(&mut list, f, area)
        });
        assert!(text.contains("Loading"));
        assert!(!text.contains("No saved items."));
    }

    #[test]
    fn news_items_render_title_metadata_and_summary() {
        let mut list = NewsList::new(Feed::Latest);
        let mut item = news_item("Heatpumps");
        item.summary = Some("Subsidy extended".into());
        let (seq, _) = list.reload();
        list.apply(seq, Ok(vec![item, news_item("Solar")]));

        let text = render(|f| {
            let area = f.area();
            draw_news(&mut list, f, area)
        });
        assert!(text.contains("Heatpumps"));
        assert!(text.contains("2025-01-01 — test — energy"));
        assert!(text.contains("Subsidy extended"));
        assert!(text.contains("Solar"));
        assert!(!text.contains("No news yet."));
        assert!(text.contains("https://news.test/Heatpumps"), "selected link in footer");
    }

    #[test]
    fn prompt_history_shows_both_roles() {
        let mut console = PromptConsole::new();
        console.apply_reply(
            "hello".into(),
            Ok(PromptReply {
                reply: "hi".into(),
                conversation_id: Some(9),
            }),
        );

        let text = render(|f| {
            let area = f.area();
            draw_prompt(&console, f, area)
        });
        assert!(text.contains("You: hello"));
        assert!(text.contains("Agent: hi"));
        assert!(text.contains("conversation #9"));
    }

    #[test]
    fn prompt_shows_waiting_marker() {
        let mut console = PromptConsole::new();
        console.submit();
        let text = render(|f| {
            let area = f.area();
            draw_prompt(&console, f, area)
        });
        assert!(text.contains("waiting for reply"));
    }

    #[test]
    fn sources_render_rows_or_empty_state() {
        let mut manager = SourceManager::new();
        let (seq, _) = manager.reload();
        manager.apply_load(seq, Ok(vec![]));
        let text = render(|f| {
            let area = f.area();
            draw_sources(&mut manager, f, area)
        });
        assert!(text.contains("No sources."));

        let (seq, _) = manager.reload();
        manager.apply_load(seq, Ok(vec![source("http://x.test")]));
        let text = render(|f| {
            let area = f.area();
            draw_sources(&mut manager, f, area)
        });
        assert!(text.contains("http://x.test"));
        assert!(text.contains("rss — Last check: -"));
        assert!(!text.contains("No sources."));
    }

    #[test]
    fn prompt_keeps_tail_of_long_word_wrapped_reply_visible() {
        let mut console = PromptConsole::new();
        let words: Vec<String> = (0..30).map(|i| format!("{i:02}").repeat(25)).collect();
        console.apply_reply(
            "tell me everything".into(),
            Ok(PromptReply {
                reply: format!("{} ENDMARK", words.join(" ")),
                conversation_id: None,
            }),
        );

        let text = render(|f| {
            let area = f.area();
            draw_prompt(&console, f, area)
        });
        assert!(text.contains("ENDMARK"));
    }
}
