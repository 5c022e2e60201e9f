use axum::{http::Method, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes};

pub fn create(state: AppState) -> Router {
    // The rendering layer is a static browser bundle served elsewhere.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(AllowOrigin::any());

    Router::new()
        .nest(
            "/api",
            routes::dashboard::router().merge(routes::ingest::router()),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new()))
        .layer(cors)
        .with_state(state)
}
