//! Backend access layer.
//!
//! This module defines the [`Backend`] trait, the wire types the views hold,
//! and the HTTP implementation ([`HttpBackend`]).
//!
//! ## For contributors — adding an endpoint
//!
//! 1. Add the response type to `model.rs` (tolerate `null`s the way the
//!    existing types do).
//! 2. Add a method to [`Backend`] and implement it in `http.rs` on top of
//!    `get` / `post`.
//! 3. Add a `Request` / `Response` pair in [`crate::task`] so views can
//!    dispatch it, and mirror the method in the test fake (`testing.rs`).

mod error;
mod http;
mod model;

pub use error::ClientError;
pub use http::HttpBackend;
pub use model::{MutationReceipt, NewsItem, PromptReply, ScrapeReport, Source};

use async_trait::async_trait;

/// Which news collection a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Everything the backend has collected (`/news`).
    Latest,
    /// Items flagged as saved (`/saved`).
    Saved,
}

/// The operations the dashboard needs from its backend.
///
/// Calls run on the tokio runtime from [`crate::task`], so implementations
/// must be [`Send`] + [`Sync`]. Every call resolves to `Ok` or `Err`; callers
/// decide what a failure means for their view.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch one of the news collections, in backend order.
    async fn news(&self, feed: Feed) -> Result<Vec<NewsItem>, ClientError>;

    /// Send one prompt and wait for the agent's reply.
    async fn prompt(&self, text: &str) -> Result<PromptReply, ClientError>;

    /// Fetch every configured source.
    async fn sources(&self) -> Result<Vec<Source>, ClientError>;

    /// Ask the backend to start monitoring `url`.
    async fn add_source(&self, url: &str) -> Result<MutationReceipt, ClientError>;

    /// Ask the backend to stop monitoring `url`.
    async fn remove_source(&self, url: &str) -> Result<MutationReceipt, ClientError>;

    /// Run a scrape of all sources now.
    async fn scrape(&self) -> Result<ScrapeReport, ClientError>;
}
