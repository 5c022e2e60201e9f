use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::app_state::AppState;

/// Periodic silent re-fetch. Failures keep the committed dataset
/// untouched; the refresh itself goes through the debouncer so a tick
/// racing a manual refresh coalesces into one fetch.
pub fn spawn(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial load already
        // happened at startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::debug!("auto-refresh tick");
            state.request_refresh().await;
        }
    })
}
