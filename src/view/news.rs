//! The News and Saved lists.
//!
//! Both show a read-only collection of [`NewsItem`]s in backend order; they
//! differ only in the endpoint they read and their empty-state text.

use ratatui::widgets::ListState;
use tracing::{debug, warn};

use super::{clamp_selection, select_first, select_last, select_next, select_previous};
use crate::api::{ClientError, Feed, NewsItem};
use crate::task::{Request, Sequencer};

pub struct NewsList {
    feed: Feed,
    /// Items from the latest applied fetch, in backend order.
    pub items: Vec<NewsItem>,
    pub list_state: ListState,
    reloads: Sequencer,
}

impl NewsList {
    pub fn new(feed: Feed) -> Self {
        Self {
            feed,
            items: Vec::new(),
            list_state: ListState::default(),
            reloads: Sequencer::default(),
        }
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn title(&self) -> &'static str {
        match self.feed {
            Feed::Latest => "News",
            Feed::Saved => "Saved",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self.feed {
            Feed::Latest => "No news yet.",
            Feed::Saved => "No saved items.",
        }
    }

    /// True while the newest reload is still outstanding.
    pub fn loading(&self) -> bool {
        self.reloads.loading()
    }

    /// Start a reload; returns its sequence number and the request to send.
    pub fn reload(&mut self) -> (u64, Request) {
        (self.reloads.issue(), Request::LoadNews(self.feed))
    }

    /// Fold a fetch result into the list.
    ///
    /// A failed fetch empties the list instead of keeping stale items. Returns
    /// the status line to show, or `None` if the response was older than one
    /// already applied and was dropped.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<NewsItem>, ClientError>) -> Option<String> {
        if !self.reloads.accept(seq) {
            debug!(feed = ?self.feed, seq, "dropping stale news reload");
            return None;
        }

        let status = match result {
            Ok(items) => {
                let count = items.len();
                self.items = items;
                format!("Fetched {count} items")
            }
            Err(e) => {
                warn!(feed = ?self.feed, error = %e, "news fetch failed");
                self.items.clear();
                format!("Could not load {}: {}", self.title().to_lowercase(), e.summary())
            }
        };
        clamp_selection(&mut self.list_state, self.items.len());
        Some(status)
    }

    pub fn selected_item(&self) -> Option<&NewsItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        select_next(&mut self.list_state, self.items.len());
    }

    pub fn select_previous(&mut self) {
        select_previous(&mut self.list_state, self.items.len());
    }

    pub fn select_first(&mut self) {
        select_first(&mut self.list_state, self.items.len());
    }

    pub fn select_last(&mut self) {
        select_last(&mut self.list_state, self.items.len());
    }
}
