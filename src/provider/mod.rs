//! Provider API client: one HTTP GET per logical call, JSON decoding, and
//! throttle recovery.
//!
//! The client does not consult the rate limiter itself; callers are
//! responsible for `RateLimiter::acquire()` immediately before each call.

pub mod rate_limit;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::warn;
use url::Url;

use crate::config::ProviderSettings;
use crate::models::{HarvestWindow, MatchId, MatchRecord};

pub use rate_limit::RateLimiter;

/// Errors from the provider layer.
///
/// Non-2xx statuses other than 429 are not errors here; they are reported
/// and surfaced as `None` so callers treat them as "no data available".
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("still throttled after {attempts} attempts")]
    ThrottleExhausted { attempts: u32 },
}

/// Seam over the provider's two query types, so the harvest job can be
/// exercised without a live HTTP surface.
#[async_trait]
pub trait MatchApi: Send + Sync {
    /// List candidate match ids for a player within one window.
    ///
    /// `None` means the call failed transiently; callers treat it as
    /// "found nothing this window".
    async fn list_match_ids(
        &self,
        puuid: &str,
        window: &HarvestWindow,
    ) -> Result<Option<Vec<MatchId>>, ProviderError>;

    /// Fetch the full detail document for one match. `None` means the
    /// match could not be fetched and must not be cached.
    async fn fetch_match(&self, id: &MatchId) -> Result<Option<MatchRecord>, ProviderError>;
}

/// HTTP client for the provider's match API.
pub struct ProviderClient {
    client: Client,
    list_endpoint: String,
    detail_endpoint: String,
    api_key: String,
    queue: u32,
    max_throttle_retries: u32,
}

impl ProviderClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            list_endpoint: settings.list_endpoint.trim_end_matches('/').to_string(),
            detail_endpoint: settings.detail_endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            queue: settings.queue,
            max_throttle_retries: settings.max_throttle_retries,
        })
    }

    fn listing_url(&self, puuid: &str, window: &HarvestWindow) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}/{}/ids", self.list_endpoint, puuid))?;
        url.query_pairs_mut()
            .append_pair("startTime", &window.start_unix().to_string())
            .append_pair("endTime", &window.end_unix().to_string())
            .append_pair("queue", &self.queue.to_string())
            .append_pair("start", "0")
            .append_pair("count", "100")
            .append_pair("api_key", &self.api_key);
        Ok(url)
    }

    fn detail_url(&self, id: &MatchId) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}/{}", self.detail_endpoint, id))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    /// Issue one GET, decoding the body as JSON.
    ///
    /// 429 responses are retried after the provider-directed `Retry-After`
    /// delay, up to `max_throttle_retries` times. Any other non-2xx status
    /// is reported and yields `None`.
    async fn call(&self, url: Url) -> Result<Option<Value>, ProviderError> {
        let mut attempts = 0u32;
        loop {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;
                if attempts > self.max_throttle_retries {
                    return Err(ProviderError::ThrottleExhausted { attempts });
                }
                let retry_after = retry_after_seconds(&response);
                warn!(
                    path = url.path(),
                    retry_after,
                    attempt = attempts,
                    "provider throttled request, backing off"
                );
                sleep(Duration::from_secs(retry_after)).await;
                continue;
            }

            if !status.is_success() {
                warn!(status = %status, path = url.path(), "provider call failed");
                return Ok(None);
            }

            return match response.json::<Value>().await {
                Ok(body) => Ok(Some(body)),
                Err(e) => {
                    warn!(path = url.path(), error = %e, "malformed provider response body");
                    Ok(None)
                }
            };
        }
    }
}

#[async_trait]
impl MatchApi for ProviderClient {
    async fn list_match_ids(
        &self,
        puuid: &str,
        window: &HarvestWindow,
    ) -> Result<Option<Vec<MatchId>>, ProviderError> {
        let url = self.listing_url(puuid, window)?;
        let Some(body) = self.call(url).await? else {
            return Ok(None);
        };
        match serde_json::from_value::<Vec<MatchId>>(body) {
            Ok(ids) => Ok(Some(ids)),
            Err(e) => {
                warn!(error = %e, "listing response was not an array of match ids");
                Ok(None)
            }
        }
    }

    async fn fetch_match(&self, id: &MatchId) -> Result<Option<MatchRecord>, ProviderError> {
        let url = self.detail_url(id)?;
        let Some(body) = self.call(url).await? else {
            return Ok(None);
        };
        match MatchRecord::from_document(body) {
            Some(record) => Ok(Some(record)),
            None => {
                warn!(match_id = %id, "detail payload missing metadata.matchId, skipping");
                Ok(None)
            }
        }
    }
}

/// Parse a `Retry-After` header value in seconds, defaulting to 1 when the
/// header is absent or unparseable.
fn retry_after_seconds(response: &Response) -> u64 {
    parse_retry_after(
        response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok()),
    )
}

fn parse_retry_after(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(1)
}
