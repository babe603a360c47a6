use clap::ValueEnum;
use tracing::{debug, info};

use crate::api::Feed;
use crate::task::{Dispatcher, Envelope, Request, Response, Scope};
use crate::view::{NewsList, PromptConsole, SourceManager};

/// The dashboard's views, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    News,
    Prompt,
    Sources,
    Saved,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::News, Tab::Prompt, Tab::Sources, Tab::Saved];

    pub fn label(self) -> &'static str {
        match self {
            Tab::News => "News",
            Tab::Prompt => "Prompt",
            Tab::Sources => "Sources",
            Tab::Saved => "Saved",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// What applying a response did to the mounted view.
enum Applied {
    /// A list reload landed.
    Load(String),
    /// Something changed that needs no follow-up.
    Status(String),
    /// A mutation finished; the list must be re-fetched.
    Mutated(String),
}

/// The mounted view controller.
pub enum View {
    News(NewsList),
    Prompt(PromptConsole),
    Sources(SourceManager),
}

impl View {
    fn for_tab(tab: Tab) -> Self {
        match tab {
            Tab::News => View::News(NewsList::new(Feed::Latest)),
            Tab::Saved => View::News(NewsList::new(Feed::Saved)),
            Tab::Prompt => View::Prompt(PromptConsole::new()),
            Tab::Sources => View::Sources(SourceManager::new()),
        }
    }
}

pub struct App {
    tab: Tab,
    pub view: View,
    /// Lifetime of the mounted view's pending requests.
    scope: Scope,
    dispatcher: Dispatcher,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Outcome of the last mutation, kept in front of the reload status.
    note: Option<String>,
}

impl App {
    /// Build the app and mount `initial`, firing its first request.
    pub fn new(mut dispatcher: Dispatcher, initial: Tab) -> Self {
        let scope = dispatcher.open_scope();
        let mut app = Self {
            tab: initial,
            view: View::for_tab(initial),
            scope,
            dispatcher,
            quit: false,
            status: "Starting…".into(),
            note: None,
        };
        app.on_mount();
        app
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Requests of the mounted view still in flight.
    pub fn pending(&self) -> usize {
        self.scope.pending()
    }

    // -- tab router ----------------------------------------------------------

    /// Switch to `tab`: unmount the current view (aborting its work) and
    /// mount a fresh one. Selecting the active tab does nothing.
    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        info!(from = ?self.tab, to = ?tab, "switching view");
        // Replacing the scope drops the old one, which aborts its tasks.
        self.scope = self.dispatcher.open_scope();
        self.tab = tab;
        self.view = View::for_tab(tab);
        self.on_mount();
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.tab.previous());
    }

    fn on_mount(&mut self) {
        self.note = None;
        if matches!(self.view, View::Prompt(_)) {
            self.status = "Type a prompt and press Enter".into();
        } else {
            self.reload();
        }
    }

    fn dispatch(&mut self, seq: u64, request: Request) {
        self.dispatcher.dispatch(&mut self.scope, seq, request);
    }

    // -- user actions --------------------------------------------------------

    /// Re-fetch the mounted list view.
    pub fn reload(&mut self) {
        let (seq, request) = match &mut self.view {
            View::News(list) => list.reload(),
            View::Sources(manager) => manager.reload(),
            View::Prompt(_) => return,
        };
        self.dispatch(seq, request);
    }

    /// Send the prompt draft.
    pub fn submit_prompt(&mut self) {
        if let View::Prompt(console) = &mut self.view {
            let request = console.submit();
            self.status = "Waiting for reply…".into();
            self.dispatch(0, request);
        }
    }

    /// Add the drafted source URL.
    pub fn add_source(&mut self) {
        if let View::Sources(manager) = &self.view {
            let request = manager.add();
            self.dispatch(0, request);
        }
    }

    /// Remove the selected source.
    pub fn remove_selected_source(&mut self) {
        if let View::Sources(manager) = &self.view {
            if let Some(request) = manager.remove_selected() {
                self.dispatch(0, request);
            }
        }
    }

    /// Trigger a backend scrape (News view only).
    pub fn scrape(&mut self) {
        if matches!(&self.view, View::News(list) if list.feed() == Feed::Latest) {
            self.status = "Scraping sources…".into();
            self.dispatch(0, Request::Scrape);
        }
    }

    // -- responses -----------------------------------------------------------

    /// Apply a finished request to the mounted view.
    ///
    /// Responses issued by a view that has since been unmounted are dropped,
    /// as are responses that do not belong to the mounted view's kind.
    pub fn handle(&mut self, envelope: Envelope) {
        if envelope.epoch != self.scope.epoch() {
            debug!(epoch = envelope.epoch, current = self.scope.epoch(), "dropping late response");
            return;
        }
        let seq = envelope.seq;

        let applied = match envelope.response {
            Response::News { feed, result } => match &mut self.view {
                View::News(list) if list.feed() == feed => list.apply(seq, result).map(Applied::Load),
                _ => None,
            },
            Response::Scraped(result) => match &self.view {
                View::News(_) => Some(Applied::Mutated(match result {
                    Ok(report) => report.describe(),
                    Err(e) => format!("Scrape failed: {}", e.summary()),
                })),
                _ => None,
            },
            Response::Prompt { prompt, result } => match &mut self.view {
                View::Prompt(console) => Some(Applied::Status(console.apply_reply(prompt, result))),
                _ => None,
            },
            Response::Sources(result) => match &mut self.view {
                View::Sources(manager) => manager.apply_load(seq, result).map(Applied::Load),
                _ => None,
            },
            Response::SourceAdded { url, result } => match &mut self.view {
                View::Sources(manager) => Some(Applied::Mutated(manager.apply_added(&url, result))),
                _ => None,
            },
            Response::SourceRemoved { url, result } => match &mut self.view {
                View::Sources(manager) => Some(Applied::Mutated(manager.apply_removed(&url, result))),
                _ => None,
            },
        };

        match applied {
            Some(Applied::Load(status)) => self.set_load_status(status),
            Some(Applied::Status(status)) => self.status = status,
            // Mutations always finish with a full re-fetch, whatever their outcome.
            Some(Applied::Mutated(note)) => {
                self.status = note.clone();
                self.note = Some(note);
                self.reload();
            }
            None => debug!(epoch = envelope.epoch, seq, "response not applied"),
        }
    }

    fn set_load_status(&mut self, status: String) {
        self.status = match self.note.take() {
            Some(note) => format!("{note} · {status}"),
            None => status,
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
