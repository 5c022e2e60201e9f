mod app_state;
mod config;
mod router;
mod routes;
mod services;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::app_state::{AppState, OrgContext};
use crate::services::sheet_source::{DataService, SheetClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = config::read_config().expect("failed to read configuration");
    let org_config = config::read_org_config(&settings.data.org_file)
        .expect("failed to read org configuration");
    let org = OrgContext::from(&org_config);

    let sheet_client = settings.data.sheet_url.as_deref().map(SheetClient::new);
    let data_service = DataService::new(
        sheet_client,
        Duration::from_secs(settings.data.cache_ttl_secs),
    );
    let state = AppState::new(
        org,
        data_service,
        Duration::from_millis(settings.data.debounce_millis),
    );

    match state.refresh_now().await {
        Ok(rows) => tracing::info!("initial load: {} rows", rows),
        Err(err) => tracing::warn!("initial load failed, starting empty: {}", err),
    }

    let _refresher = services::refresher::spawn(
        state.clone(),
        Duration::from_secs(settings.data.refresh_interval_secs),
    );

    let app = router::create(state);
    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {}", address);
    axum::serve(listener, app).await.expect("server exited");
}
