use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

pub fn router(state: AppState, frontend_url: Option<&str>) -> Router {
    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/api/clustering-runs", get(handlers::get_clustering_runs))
        .route("/api/event-buckets", get(handlers::get_event_buckets))
        .route("/api/clusters", get(handlers::get_clusters))
        .route("/api/pages", get(handlers::get_pages))
        .with_state(state);

    match frontend_url.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        ),
        Some(Err(err)) => {
            warn!("ignoring unusable FRONTEND_URL: {err}");
            app
        }
        None => app,
    }
}
