use crate::aggregate::get_event_bucket_data;
use crate::errors::AppError;
use crate::models::{ClusterRow, EventBucketsQuery, EventBucketsResponse, PagesQuery};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::error;

pub async fn index() -> Html<&'static str> {
    Html(render_index())
}

pub async fn get_clustering_runs(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let rows = state.source.clustering_runs().await.map_err(|err| {
        error!("failed to list clustering runs: {err}");
        AppError::from(err)
    })?;

    Ok(Json(rows.into_iter().map(|row| row.clustering_run).collect()))
}

pub async fn get_event_buckets(
    State(state): State<AppState>,
    Query(query): Query<EventBucketsQuery>,
) -> Result<Json<EventBucketsResponse>, AppError> {
    let clustering_run = query.clustering_run.trim();
    if clustering_run.is_empty() {
        return Err(AppError::bad_request("clustering_run is required"));
    }

    let info = get_event_bucket_data(state.source.as_ref(), clustering_run, state.zone)
        .await
        .map_err(|err| {
            error!(clustering_run, "failed to build event buckets: {err}");
            AppError::from(err)
        })?;

    Ok(Json(EventBucketsResponse {
        info,
        with_cluster_ids: query.with_ids,
    }))
}

pub async fn get_clusters(State(state): State<AppState>) -> Result<Json<Vec<ClusterRow>>, AppError> {
    let clusters = state.source.clusters().await.map_err(|err| {
        error!("failed to list clusters: {err}");
        AppError::from(err)
    })?;

    Ok(Json(clusters))
}

pub async fn get_pages(
    State(state): State<AppState>,
    Query(query): Query<PagesQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let cluster_id = query.cluster_id.trim();
    if cluster_id.is_empty() {
        return Err(AppError::bad_request("cluster_id is required"));
    }

    let pages = state.source.pages_in_cluster(cluster_id).await.map_err(|err| {
        error!(cluster_id, "failed to list pages: {err}");
        AppError::from(err)
    })?;

    Ok(Json(pages.into_iter().map(|row| row.page_url).collect()))
}
