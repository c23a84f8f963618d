//! Remote job-listing source. Fetch failures are reported to the caller,
//! which degrades to an empty board instead of propagating them.

pub mod normalize;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub use normalize::normalize_all;

/// A loosely-typed listing as delivered by the provider.
pub type RawJob = Map<String, Value>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source returned status {0}")]
    Status(u16),

    #[error("Expected a JSON array of jobs")]
    NotAnArray,
}

#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_jobs(&self) -> Result<Vec<RawJob>, SourceError>;
}

/// Fetches listings with a single GET. No retry and no timeout.
#[derive(Clone)]
pub struct HttpJobSource {
    client: Client,
    url: String,
}

impl HttpJobSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch_jobs(&self) -> Result<Vec<RawJob>, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let raw = raw_jobs_from_value(body)?;
        debug!("Fetched {} raw jobs from {}", raw.len(), self.url);
        Ok(raw)
    }
}

/// Keeps the object elements of a JSON array; anything else in the array is skipped.
pub fn raw_jobs_from_value(body: Value) -> Result<Vec<RawJob>, SourceError> {
    let Value::Array(items) = body else {
        return Err(SourceError::NotAnArray);
    };
    let total = items.len();
    let raw: Vec<RawJob> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();
    if raw.len() < total {
        warn!("Skipped {} non-object entries in job feed", total - raw.len());
    }
    Ok(raw)
}
