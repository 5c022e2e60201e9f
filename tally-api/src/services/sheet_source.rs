use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use timesheet::{Dataset, TimesheetError};

#[derive(Error, Debug)]
pub enum SheetFetchError {
    #[error("no sheet url configured")]
    NotConfigured,
    #[error("sheet unreachable: {0}")]
    Unavailable(String),
    #[error("sheet returned status {0}")]
    Status(u16),
    #[error("sheet body unreadable: {0}")]
    Body(String),
}

#[derive(Error, Debug)]
pub enum DataRefreshError {
    #[error(transparent)]
    Fetch(#[from] SheetFetchError),
    #[error("sheet export unparseable: {0}")]
    Parse(#[from] TimesheetError),
}

/// Thin client for the published CSV export of the source sheet.
#[derive(Debug, Clone)]
pub struct SheetClient {
    url: String,
    client: reqwest::Client,
}

impl SheetClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_csv(&self) -> Result<String, SheetFetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SheetFetchError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SheetFetchError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SheetFetchError::Body(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(SheetFetchError::Body("empty response body".to_string()));
        }
        Ok(body)
    }
}

const SNAPSHOT_KEY: &str = "latest";

/// Fetches and parses the remote export, keeping a time-boxed
/// last-known-good snapshot. A failed fetch falls back to the snapshot
/// while it is still fresh, so a flaky source degrades instead of
/// blanking the dashboard.
pub struct DataService {
    client: Option<SheetClient>,
    snapshots: moka::sync::Cache<&'static str, Arc<Dataset>>,
}

impl DataService {
    pub fn new(client: Option<SheetClient>, snapshot_ttl: Duration) -> Self {
        Self {
            client,
            snapshots: moka::sync::Cache::builder()
                .max_capacity(1)
                .time_to_live(snapshot_ttl)
                .build(),
        }
    }

    pub async fn load(&self) -> Result<Arc<Dataset>, DataRefreshError> {
        match self.fetch_fresh().await {
            Ok(dataset) => {
                self.snapshots.insert(SNAPSHOT_KEY, dataset.clone());
                Ok(dataset)
            }
            Err(err) => match self.snapshots.get(SNAPSHOT_KEY) {
                Some(cached) => {
                    tracing::warn!("sheet fetch failed, serving cached snapshot: {}", err);
                    Ok(cached)
                }
                None => Err(err),
            },
        }
    }

    async fn fetch_fresh(&self) -> Result<Arc<Dataset>, DataRefreshError> {
        let client = self.client.as_ref().ok_or(SheetFetchError::NotConfigured)?;
        let text = client.fetch_csv().await?;
        let dataset = Dataset::from_csv(&text)?;
        tracing::info!("fetched sheet export: {} rows", dataset.len());
        Ok(Arc::new(dataset))
    }
}
