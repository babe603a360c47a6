//! The source manager: list, add and remove monitored sources.
//!
//! Mutations never patch the local list. Each one runs to completion, then
//! the app issues a fresh [`reload`](SourceManager::reload), so the list only
//! ever shows what the backend last returned.

use ratatui::widgets::ListState;
use tracing::{debug, warn};

use super::{clamp_selection, select_next, select_previous};
use crate::api::{ClientError, MutationReceipt, Source};
use crate::task::{Request, Sequencer};

#[derive(Default)]
pub struct SourceManager {
    pub sources: Vec<Source>,
    /// URL being typed for the next add.
    pub draft: String,
    pub list_state: ListState,
    reloads: Sequencer,
}

impl SourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&self) -> bool {
        self.reloads.loading()
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn backspace(&mut self) {
        self.draft.pop();
    }

    /// Start a reload; returns its sequence number and the request to send.
    pub fn reload(&mut self) -> (u64, Request) {
        (self.reloads.issue(), Request::LoadSources)
    }

    /// Replace the list with a fetch result. Returns `None` when the
    /// response was stale and dropped.
    pub fn apply_load(&mut self, seq: u64, result: Result<Vec<Source>, ClientError>) -> Option<String> {
        if !self.reloads.accept(seq) {
            debug!(seq, "dropping stale sources reload");
            return None;
        }

        let status = match result {
            Ok(sources) => {
                let count = sources.len();
                self.sources = sources;
                format!("{count} sources")
            }
            Err(e) => {
                warn!(error = %e, "sources fetch failed");
                self.sources.clear();
                format!("Could not load sources: {}", e.summary())
            }
        };
        clamp_selection(&mut self.list_state, self.sources.len());
        Some(status)
    }

    /// Ask to add the drafted URL. No validation happens here; the backend
    /// decides what it accepts.
    pub fn add(&self) -> Request {
        Request::AddSource(self.draft.clone())
    }

    /// Ask to remove the selected source, if any.
    pub fn remove_selected(&self) -> Option<Request> {
        self.selected_source()
            .map(|s| Request::RemoveSource(s.url.clone()))
    }

    /// An add finished, successfully or not. Clears the draft.
    pub fn apply_added(&mut self, url: &str, result: Result<MutationReceipt, ClientError>) -> String {
        self.draft.clear();
        describe_mutation("add", url, result)
    }

    /// A remove finished, successfully or not.
    pub fn apply_removed(&mut self, url: &str, result: Result<MutationReceipt, ClientError>) -> String {
        describe_mutation("remove", url, result)
    }

    pub fn selected_source(&self) -> Option<&Source> {
        self.list_state.selected().and_then(|i| self.sources.get(i))
    }

    pub fn select_next(&mut self) {
        select_next(&mut self.list_state, self.sources.len());
    }

    pub fn select_previous(&mut self) {
        select_previous(&mut self.list_state, self.sources.len());
    }
}

fn describe_mutation(action: &str, url: &str, result: Result<MutationReceipt, ClientError>) -> String {
    match result {
        Ok(MutationReceipt { result: Some(text) }) => text,
        Ok(MutationReceipt { result: None }) => format!("Requested {action} of {url}"),
        Err(e) => {
            warn!(action, url, error = %e, "source mutation failed");
            format!("Could not {action} {url}: {}", e.summary())
        }
    }
}
