//! In-memory backend and fixtures shared by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{
    Backend, ClientError, Feed, MutationReceipt, NewsItem, PromptReply, ScrapeReport, Source,
};

/// Shorthand constructor for a news item titled `title`.
pub fn news_item(title: &str) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        url: format!("https://news.test/{title}"),
        date: "2025-01-01".to_string(),
        source: "test".to_string(),
        topic: "energy".to_string(),
        summary: None,
        saved: false,
    }
}

/// Shorthand constructor for a source at `url`.
pub fn source(url: &str) -> Source {
    Source {
        url: url.to_string(),
        kind: "rss".to_string(),
        last_check: None,
    }
}

/// A backend that keeps its state in memory and behaves like the real one:
/// adding a source makes it appear in the next listing, removing it makes it
/// disappear.
///
/// Endpoints named with [`fail`](Self::fail) answer HTTP 500 instead.
#[derive(Default)]
pub struct FakeBackend {
    news: Mutex<Vec<NewsItem>>,
    saved: Mutex<Vec<NewsItem>>,
    sources: Mutex<Vec<Source>>,
    reply: Mutex<String>,
    failing: Mutex<HashSet<&'static str>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn set_news(&self, items: Vec<NewsItem>) {
        *self.news.lock().unwrap() = items;
    }

    pub fn set_saved(&self, items: Vec<NewsItem>) {
        *self.saved.lock().unwrap() = items;
    }

    pub fn set_sources(&self, sources: Vec<Source>) {
        *self.sources.lock().unwrap() = sources;
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Make `endpoint` (`news`, `saved`, `prompt`, `sources`, `add`,
    /// `remove`, `scrape`) fail with HTTP 500.
    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    /// Every call received so far, as `endpoint` or `endpoint:arg`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, endpoint: &'static str, call: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(ClientError::Status(500));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn news(&self, feed: Feed) -> Result<Vec<NewsItem>, ClientError> {
        match feed {
            Feed::Latest => {
                self.enter("news", "news".into()).await?;
                Ok(self.news.lock().unwrap().clone())
            }
            Feed::Saved => {
                self.enter("saved", "saved".into()).await?;
                Ok(self.saved.lock().unwrap().clone())
            }
        }
    }

    async fn prompt(&self, text: &str) -> Result<PromptReply, ClientError> {
        self.enter("prompt", format!("prompt:{text}")).await?;
        Ok(PromptReply {
            reply: self.reply.lock().unwrap().clone(),
            conversation_id: Some(1),
        })
    }

    async fn sources(&self) -> Result<Vec<Source>, ClientError> {
        self.enter("sources", "sources".into()).await?;
        Ok(self.sources.lock().unwrap().clone())
    }

    async fn add_source(&self, url: &str) -> Result<MutationReceipt, ClientError> {
        self.enter("add", format!("add:{url}")).await?;
        self.sources.lock().unwrap().push(source(url));
        Ok(MutationReceipt {
            result: Some(format!("[OK] added {url}")),
        })
    }

    async fn remove_source(&self, url: &str) -> Result<MutationReceipt, ClientError> {
        self.enter("remove", format!("remove:{url}")).await?;
        self.sources.lock().unwrap().retain(|s| s.url != url);
        Ok(MutationReceipt {
            result: Some(format!("[OK] removed {url}")),
        })
    }

    async fn scrape(&self) -> Result<ScrapeReport, ClientError> {
        self.enter("scrape", "scrape".into()).await?;
        Ok(ScrapeReport {
            success: true,
            new_articles: 0,
            message: None,
            error: None,
        })
    }
}
