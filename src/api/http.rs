//! HTTP implementation of [`Backend`].
//!
//! Plain JSON over `reqwest`: no auth, no retries. The only policy applied
//! here is the optional request timeout, with a separate, longer one for
//! manual scrapes; everything else is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};

use super::model::{NewsEnvelope, PromptRequest, SourcesEnvelope, UrlRequest};
use super::{Backend, ClientError, Feed, MutationReceipt, NewsItem, PromptReply, ScrapeReport, Source};

/// A backend reached over HTTP at a fixed origin.
pub struct HttpBackend {
    client: Client,
    /// Origin without a trailing slash, e.g. `http://localhost:8000`.
    base: String,
    timeout: Option<Duration>,
    /// A manual scrape summarises every new article before answering.
    scrape_timeout: Option<Duration>,
}

impl HttpBackend {
    /// Create a client for the backend at `base`.
    ///
    /// # Arguments
    ///
    /// * `base` — origin of the backend (`http://host:port`, optionally with
    ///   a path prefix).
    /// * `timeout` — per-request limit; `None` waits forever.
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let parsed = Url::parse(base).map_err(|e| ClientError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            timeout,
            scrape_timeout: timeout,
        })
    }

    /// Limit for `POST /scrape/manual`; `None` waits forever.
    pub fn with_scrape_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scrape_timeout = timeout;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, ClientError> {
        let request = match timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };
        Ok(request.send().await?)
    }

    #[instrument(skip(self))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(self.client.get(self.url(path)), self.timeout).await?;
        decode(response).await
    }

    #[instrument(skip(self, body))]
    async fn post<B, T>(&self, path: &str, body: &B, timeout: Option<Duration>) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.client.post(self.url(path)).json(body), timeout).await?;
        decode(response).await
    }

    /// POST whose answer is informational only: transport and status
    /// failures are still errors, an unreadable body is not.
    #[instrument(skip(self, body))]
    async fn post_informational<B>(&self, path: &str, body: &B) -> Result<MutationReceipt, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self.send(self.client.post(self.url(path)).json(body), self.timeout).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "backend rejected request");
            return Err(ClientError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            debug!(error = %e, "ignoring unreadable mutation body");
            MutationReceipt::default()
        }))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        warn!(%status, "backend rejected request");
        return Err(ClientError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    debug!(len = bytes.len(), "response received");
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn news(&self, feed: Feed) -> Result<Vec<NewsItem>, ClientError> {
        let path = match feed {
            Feed::Latest => "/news",
            Feed::Saved => "/saved",
        };
        let envelope: NewsEnvelope = self.get(path).await?;
        Ok(envelope.news.unwrap_or_default())
    }

    async fn prompt(&self, text: &str) -> Result<PromptReply, ClientError> {
        self.post("/prompt", &PromptRequest { prompt: text }, self.timeout)
            .await
    }

    async fn sources(&self) -> Result<Vec<Source>, ClientError> {
        let envelope: SourcesEnvelope = self.get("/sources").await?;
        Ok(envelope.sources.unwrap_or_default())
    }

    async fn add_source(&self, url: &str) -> Result<MutationReceipt, ClientError> {
        self.post_informational("/sources/add", &UrlRequest { url }).await
    }

    async fn remove_source(&self, url: &str) -> Result<MutationReceipt, ClientError> {
        self.post_informational("/sources/remove", &UrlRequest { url }).await
    }

    async fn scrape(&self) -> Result<ScrapeReport, ClientError> {
        self.post("/scrape/manual", &serde_json::json!({}), self.scrape_timeout)
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
