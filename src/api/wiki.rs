//! OSRS Wiki real-time price API integration.
//!
//! Two read-only endpoints, no auth:
//! - `/mapping` — JSON array of item metadata (id, name, buy limit, ...)
//! - `/latest`  — `{"data": {"<id>": {high, highTime, low, lowTime}}}`
//!
//! API docs: https://prices.runescape.wiki/
//! The wiki asks clients to send a descriptive User-Agent.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::PriceSource;
use crate::config::ApiConfig;
use crate::types::{ItemMeta, PricePoint, TraderError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const SOURCE_NAME: &str = "osrs-wiki";

const MAPPING_PATH: &str = "/mapping";
const LATEST_PATH: &str = "/latest";

/// Base delay for exponential backoff between retries (ms).
const BASE_BACKOFF_MS: u64 = 500;

// ---------------------------------------------------------------------------
// API response types (wiki JSON → Rust)
// ---------------------------------------------------------------------------

/// One element of the `/mapping` array. We only deserialize the fields
/// we need; `limit` is absent for items with no published buy limit.
#[derive(Debug, Deserialize)]
struct MappingEntry {
    id: u64,
    name: String,
    #[serde(default)]
    limit: Option<u64>,
    #[serde(default)]
    members: bool,
    #[serde(default)]
    highalch: Option<u64>,
}

/// Envelope of the `/latest` endpoint.
#[derive(Debug, Deserialize)]
struct LatestEnvelope {
    data: HashMap<String, LatestEntry>,
}

/// Price record for one item. Either side may be `null` when the item
/// has not traded recently.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestEntry {
    #[serde(default)]
    high: Option<u64>,
    #[serde(default)]
    high_time: Option<i64>,
    #[serde(default)]
    low: Option<u64>,
    #[serde(default)]
    low_time: Option<i64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OSRS Wiki price API client.
pub struct WikiClient {
    http: Client,
    base_url: String,
    max_retries: u32,
}

impl WikiClient {
    /// Create a new client from the `[api]` config section.
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for the wiki API")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            max_retries: cfg.max_retries,
        })
    }

    // -- Internal helpers ------------------------------------------------

    /// GET `path` with bounded retry + exponential backoff.
    ///
    /// Transport errors and 429/5xx responses are retried; any other
    /// non-2xx status fails immediately. Persistent failure surfaces as
    /// `TraderError::Network` — never an indefinite hang (the per-call
    /// timeout bounds each attempt).
    async fn get_with_retry(&self, path: &str) -> Result<reqwest::Response, TraderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = BASE_BACKOFF_MS * 2u64.pow(attempt - 1);
                debug!(attempt, delay_ms = delay, path, "Retrying wiki API call");
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }

            match self.http.get(&url).send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        return Ok(resp);
                    }

                    // Retryable: rate limiting and server-side failures
                    if status.as_u16() == 429 || status.as_u16() >= 500 {
                        let body = resp.text().await.unwrap_or_default();
                        warn!(status = %status, attempt, path, "Retryable wiki API error");
                        last_error = format!("HTTP {status}: {body}");
                        continue;
                    }

                    let body = resp.text().await.unwrap_or_default();
                    return Err(TraderError::network(
                        path,
                        format!("HTTP {status}: {body}"),
                    ));
                }
                Err(e) => {
                    warn!(attempt, path, error = %e, "Wiki API request failed");
                    last_error = format!("Request error: {e}");
                    continue;
                }
            }
        }

        Err(TraderError::network(
            path,
            format!("failed after {} retries: {last_error}", self.max_retries),
        ))
    }

    /// Convert a wiki timestamp (seconds since epoch) to `DateTime<Utc>`.
    fn secs_to_datetime(secs: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(secs, 0).single()
    }

    fn to_item_meta(entry: MappingEntry) -> ItemMeta {
        ItemMeta {
            id: entry.id,
            name: entry.name,
            buy_limit: entry.limit,
            members: entry.members,
            high_alch: entry.highalch,
        }
    }

    fn to_price_point(entry: LatestEntry) -> PricePoint {
        PricePoint {
            high: entry.high,
            high_time: entry.high_time.and_then(Self::secs_to_datetime),
            low: entry.low,
            low_time: entry.low_time.and_then(Self::secs_to_datetime),
        }
    }
}

// ---------------------------------------------------------------------------
// PriceSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl PriceSource for WikiClient {
    /// Fetch the item metadata mapping, keyed by item id.
    async fn fetch_mapping(&self) -> Result<HashMap<u64, ItemMeta>, TraderError> {
        debug!(path = MAPPING_PATH, "Fetching item mapping");

        let resp = self.get_with_retry(MAPPING_PATH).await?;
        let entries: Vec<MappingEntry> = resp
            .json()
            .await
            .map_err(|e| TraderError::parse(MAPPING_PATH, e))?;

        let metas: HashMap<u64, ItemMeta> = entries
            .into_iter()
            .map(|e| (e.id, Self::to_item_meta(e)))
            .collect();

        info!(items = metas.len(), "Item mapping fetched");
        Ok(metas)
    }

    /// Fetch the latest prices, keyed by item id.
    ///
    /// Entries whose id key is not numeric are skipped with a warning
    /// rather than failing the whole snapshot.
    async fn fetch_latest(&self) -> Result<HashMap<u64, PricePoint>, TraderError> {
        debug!(path = LATEST_PATH, "Fetching latest prices");

        let resp = self.get_with_retry(LATEST_PATH).await?;
        let envelope: LatestEnvelope = resp
            .json()
            .await
            .map_err(|e| TraderError::parse(LATEST_PATH, e))?;

        let mut prices = HashMap::with_capacity(envelope.data.len());
        for (key, entry) in envelope.data {
            match key.parse::<u64>() {
                Ok(id) => {
                    prices.insert(id, Self::to_price_point(entry));
                }
                Err(_) => {
                    warn!(key = %key, "Skipping non-numeric item id in price feed");
                }
            }
        }

        info!(items = prices.len(), "Latest prices fetched");
        Ok(prices)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
