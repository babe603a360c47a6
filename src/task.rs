//! Background request dispatch.
//!
//! Every backend call runs as a task on the tokio runtime and posts its
//! outcome back to the UI thread over an unbounded channel, which the main
//! loop drains once per tick.
//!
//! Two tags travel with each response:
//!
//! * the **epoch** of the [`Scope`] that issued it. A scope lives exactly as
//!   long as the view that owns it; dropping it aborts the view's tasks, and
//!   anything that still arrives with an old epoch is dropped by the app.
//! * a **sequence number** for list reloads, checked by a [`Sequencer`] so a
//!   slow old reload cannot overwrite a newer one.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{
    Backend, ClientError, Feed, MutationReceipt, NewsItem, PromptReply, ScrapeReport, Source,
};

/// Work a view can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadNews(Feed),
    SendPrompt(String),
    LoadSources,
    AddSource(String),
    RemoveSource(String),
    Scrape,
}

/// The outcome of a [`Request`], always carrying both branches.
#[derive(Debug)]
pub enum Response {
    News {
        feed: Feed,
        result: Result<Vec<NewsItem>, ClientError>,
    },
    Prompt {
        /// The text that was sent, echoed back for the history.
        prompt: String,
        result: Result<PromptReply, ClientError>,
    },
    Sources(Result<Vec<Source>, ClientError>),
    SourceAdded {
        url: String,
        result: Result<MutationReceipt, ClientError>,
    },
    SourceRemoved {
        url: String,
        result: Result<MutationReceipt, ClientError>,
    },
    Scraped(Result<ScrapeReport, ClientError>),
}

/// A [`Response`] tagged with the scope epoch and sequence number it was
/// issued under.
#[derive(Debug)]
pub struct Envelope {
    pub epoch: u64,
    /// Reload sequence number; `0` for requests that are not sequenced.
    pub seq: u64,
    pub response: Response,
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The lifetime of one mounted view's pending work.
///
/// Dropping the scope aborts every task still registered with it.
pub struct Scope {
    epoch: u64,
    tasks: Vec<JoinHandle<()>>,
}

impl Scope {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(task);
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let live = self.pending();
        if live > 0 {
            debug!(epoch = self.epoch, live, "aborting pending requests");
        }
        for task in &self.tasks {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Monotonic reload counter for one list view.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: u64,
    applied: u64,
}

impl Sequencer {
    /// Reserve the number for a new reload.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a reload tagged `seq` is newer than anything applied so far.
    /// Accepting it makes it the new baseline.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }

    /// True while the most recently issued reload has not been applied.
    pub fn loading(&self) -> bool {
        self.issued > self.applied
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Spawns backend calls and routes their results back to the UI thread.
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    runtime: Handle,
    tx: UnboundedSender<Envelope>,
    last_epoch: u64,
}

impl Dispatcher {
    /// Create a dispatcher running calls on `runtime`.
    ///
    /// Returns the receiver the main loop should drain on every tick.
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle) -> (Self, UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            backend,
            runtime,
            tx,
            last_epoch: 0,
        };
        (dispatcher, rx)
    }

    /// Open the scope for a newly mounted view.
    pub fn open_scope(&mut self) -> Scope {
        self.last_epoch += 1;
        Scope {
            epoch: self.last_epoch,
            tasks: Vec::new(),
        }
    }

    /// Run `request` in the background on behalf of `scope`.
    pub fn dispatch(&self, scope: &mut Scope, seq: u64, request: Request) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let epoch = scope.epoch;
        debug!(epoch, seq, ?request, "dispatching");

        let task = self.runtime.spawn(async move {
            let response = perform(backend.as_ref(), request).await;
            // If the receiver is gone the UI has exited; nothing to do.
            if tx.send(Envelope { epoch, seq, response }).is_err() {
                warn!(epoch, seq, "response dropped, UI channel closed");
            }
        });
        scope.track(task);
    }
}

async fn perform(backend: &dyn Backend, request: Request) -> Response {
    match request {
        Request::LoadNews(feed) => Response::News {
            feed,
            result: backend.news(feed).await,
        },
        Request::SendPrompt(prompt) => {
            let result = backend.prompt(&prompt).await;
            Response::Prompt { prompt, result }
        }
        Request::LoadSources => Response::Sources(backend.sources().await),
        Request::AddSource(url) => {
            let result = backend.add_source(&url).await;
            Response::SourceAdded { url, result }
        }
        Request::RemoveSource(url) => {
            let result = backend.remove_source(&url).await;
            Response::SourceRemoved { url, result }
        }
        Request::Scrape => Response::Scraped(backend.scrape().await),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
