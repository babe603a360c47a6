//! Wire types exchanged with the backend.
//!
//! The entity types ([`NewsItem`], [`Source`]) are what the views hold; the
//! envelope and request types only exist to match the JSON shapes on the
//! wire and never leave the [`api`](crate::api) module.
//!
//! The backend is loose about nulls (SQLite columns come back as `null`), so
//! text fields that are always displayed read `null` as the empty string and
//! list envelopes read a missing or `null` collection as empty.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A news entry as stored by the backend.
///
/// Never mutated by the client; the order of a fetched `Vec<NewsItem>` is the
/// rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// External link to the full article.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,

    /// Publication date exactly as the backend stored it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic: String,

    #[serde(default)]
    pub summary: Option<String>,

    /// Whether the backend flagged this item as saved.
    #[serde(default)]
    pub saved: bool,
}

impl NewsItem {
    /// The `date — source — topic` line under the title.
    pub fn metadata_line(&self) -> String {
        format!(
            "{} — {} — {}",
            display_timestamp(&self.date),
            self.source,
            self.topic
        )
    }

    /// Summary text, if there is any worth showing.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// A monitored source. `url` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub url: String,

    /// Detected kind (`rss`, `html`, `json`, ...).
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,

    #[serde(default)]
    pub last_check: Option<String>,
}

impl Source {
    /// The `type — Last check: ...` line under the URL.
    pub fn status_line(&self) -> String {
        let checked = self
            .last_check
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(display_timestamp)
            .unwrap_or_else(|| "-".into());
        format!("{} — Last check: {checked}", self.kind)
    }
}

/// The backend's answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptReply {
    pub reply: String,

    /// Row id of the stored conversation, when the backend kept one.
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

/// Informational body returned by the source mutation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MutationReceipt {
    #[serde(default)]
    pub result: Option<String>,
}

/// Outcome of a manual scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapeReport {
    pub success: bool,

    #[serde(default)]
    pub new_articles: u64,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

impl ScrapeReport {
    /// One-line description for the status bar.
    pub fn describe(&self) -> String {
        match (&self.message, &self.error) {
            (Some(message), _) => message.clone(),
            (None, Some(error)) => format!("Scrape failed: {error}"),
            (None, None) if self.success => format!("Scrape found {} new articles", self.new_articles),
            (None, None) => "Scrape failed".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes and request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct NewsEnvelope {
    #[serde(default)]
    pub news: Option<Vec<NewsItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SourcesEnvelope {
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PromptRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UrlRequest<'a> {
    pub url: &'a str,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Timestamp display
// ---------------------------------------------------------------------------

/// Normalise a backend timestamp for display.
///
/// Scraped dates arrive in whatever format the feed used, so several are
/// tried in turn. Anything unrecognised is returned verbatim.
pub fn display_timestamp(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}
