use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use timesheet::domain::{CategoryIndex, ColorCache, RateTable};
use timesheet::Dataset;
use tokio::sync::RwLock;

use crate::config::OrgConfig;
use crate::services::recompute::Debouncer;
use crate::services::sheet_source::{DataRefreshError, DataService};

/// Immutable per-process view of the organization configuration: the
/// category index, the rate table and the color cache, all built once at
/// startup and shared by reference.
#[derive(Debug)]
pub struct OrgContext {
    pub index: CategoryIndex,
    pub rates: RateTable,
    pub colors: ColorCache,
}

impl From<&OrgConfig> for OrgContext {
    fn from(config: &OrgConfig) -> Self {
        Self {
            index: CategoryIndex::new(&config.categories, &config.task_order),
            rates: RateTable::new(config.rates.clone(), config.default_rate),
            colors: ColorCache::new(&config.categories),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    org: Arc<OrgContext>,
    data_service: Arc<DataService>,
    refresh_debounce: Arc<Debouncer>,
    /// Latest committed row set. Swapped as a whole `Arc`, so a reader
    /// that cloned it keeps a consistent snapshot for the entire
    /// recomputation.
    dataset: Arc<RwLock<Arc<Dataset>>>,
    last_refresh: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(org: OrgContext, data_service: DataService, debounce_window: Duration) -> Self {
        Self {
            org: Arc::new(org),
            data_service: Arc::new(data_service),
            refresh_debounce: Arc::new(Debouncer::new(debounce_window)),
            dataset: Arc::new(RwLock::new(Arc::new(Dataset::default()))),
            last_refresh: Arc::new(RwLock::new(None)),
        }
    }

    pub fn org(&self) -> &OrgContext {
        &self.org
    }

    /// Snapshot of the latest committed dataset.
    pub async fn dataset(&self) -> Arc<Dataset> {
        self.dataset.read().await.clone()
    }

    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.read().await
    }

    pub async fn commit(&self, dataset: Arc<Dataset>) {
        *self.dataset.write().await = dataset;
        *self.last_refresh.write().await = Some(Utc::now());
    }

    /// Fetch and commit synchronously. Used for the initial load and the
    /// error-reporting path.
    pub async fn refresh_now(&self) -> Result<usize, DataRefreshError> {
        let dataset = self.data_service.load().await?;
        let rows = dataset.len();
        self.commit(dataset).await;
        Ok(rows)
    }

    /// Debounced refresh: rapid repeated triggers (manual refresh clicks,
    /// timer ticks racing a user action) collapse into one fetch, and a
    /// newer trigger cancels the pending one.
    pub async fn request_refresh(&self) {
        let state = self.clone();
        self.refresh_debounce
            .trigger(async move {
                if let Err(err) = state.refresh_now().await {
                    tracing::warn!("background refresh failed: {}", err);
                }
            })
            .await;
    }
}
