//! Feed adapters: `fetch(league, year, week) -> FeedEnvelope` for each
//! of {weather, market, odds, injury_news, nextgenstats}.
//!
//! `HttpFeedAdapter` follows the teacher's `espn::http` client shape
//! (a lazily-built shared `reqwest::Client`, `.send().await?.error_for_status()?`)
//! generalized to a generic normalized-feed GET plus a timeout/retry
//! policy.

use std::time::Duration;

use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;

use crate::feeds::envelope::FeedEnvelope;

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("ffl-sim-core")
        .build()
        .expect("failed to build feed HTTP client")
});

/// A source of normalized feed data for one domain (weather, market,
/// odds, injury_news, nextgenstats).
#[async_trait::async_trait]
pub trait FeedAdapter: Send + Sync {
    fn feed_name(&self) -> &str;
    async fn fetch(&self, league_id: u32, year: u16, week: u32) -> FeedEnvelope;
}

/// Fetches a feed over HTTP, schema-validating the response and falling
/// back to a neutral envelope flagged `schema_invalid` on timeout,
/// transport failure, or failed validation.
pub struct HttpFeedAdapter {
    feed_name: String,
    url_template: String,
    timeout: Duration,
    retries: u32,
    validate: Box<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl HttpFeedAdapter {
    pub fn new(
        feed_name: impl Into<String>,
        url_template: impl Into<String>,
        timeout_seconds: f64,
        retries: u32,
    ) -> Self {
        Self {
            feed_name: feed_name.into(),
            url_template: url_template.into(),
            timeout: Duration::from_secs_f64(timeout_seconds.max(0.0)),
            retries,
            validate: Box::new(|_| true),
        }
    }

    pub fn with_validator(mut self, validate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Box::new(validate);
        self
    }

    fn url(&self, league_id: u32, year: u16, week: u32) -> String {
        self.url_template
            .replace("{league_id}", &league_id.to_string())
            .replace("{year}", &year.to_string())
            .replace("{week}", &week.to_string())
    }
}

#[async_trait::async_trait]
impl FeedAdapter for HttpFeedAdapter {
    fn feed_name(&self) -> &str {
        &self.feed_name
    }

    async fn fetch(&self, league_id: u32, year: u16, week: u32) -> FeedEnvelope {
        let url = self.url(league_id, year, week);
        let mut last_err: Option<String> = None;

        for _ in 0..=self.retries {
            let attempt = CLIENT.get(&url).timeout(self.timeout).send().await;
            match attempt {
                Ok(resp) => match resp.error_for_status() {
                    Ok(resp) => match resp.json::<Value>().await {
                        Ok(data) => {
                            if (self.validate)(&data) {
                                let now = Utc::now();
                                return FeedEnvelope::new(data, now, now);
                            }
                            return FeedEnvelope::neutral(
                                Utc::now(),
                                "schema_invalid",
                                format!("feed {} failed schema validation", self.feed_name),
                            );
                        }
                        Err(e) => last_err = Some(e.to_string()),
                    },
                    Err(e) => last_err = Some(e.to_string()),
                },
                Err(e) => last_err = Some(e.to_string()),
            }
        }

        FeedEnvelope::neutral(
            Utc::now(),
            "feed_unavailable",
            format!(
                "feed {} unavailable after {} attempt(s): {}",
                self.feed_name,
                self.retries + 1,
                last_err.unwrap_or_else(|| "unknown error".into())
            ),
        )
    }
}

/// A fixed, pre-recorded feed, used by tests and the demonstration
/// binary where no live adapter is wired in.
pub struct StaticFeedAdapter {
    feed_name: String,
    envelope: FeedEnvelope,
}

impl StaticFeedAdapter {
    pub fn new(feed_name: impl Into<String>, envelope: FeedEnvelope) -> Self {
        Self {
            feed_name: feed_name.into(),
            envelope,
        }
    }
}

#[async_trait::async_trait]
impl FeedAdapter for StaticFeedAdapter {
    fn feed_name(&self) -> &str {
        &self.feed_name
    }

    async fn fetch(&self, _league_id: u32, _year: u16, _week: u32) -> FeedEnvelope {
        self.envelope.clone()
    }
}
