use crate::api::middleware::RequireToken;
use crate::api::AppState;
use crate::error::Result;
use crate::models::{CombineRequest, PlaylistSummary};
use crate::services::CombineReport;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub fn playlist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/playlists", get(list_playlists))
        .route("/playlists/combine", post(combine_playlists))
}

async fn list_playlists(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PlaylistSummary>>> {
    let playlists = state.combiner.playlists().await?;
    Ok(Json(playlists))
}

async fn combine_playlists(
    State(state): State<Arc<AppState>>,
    _: RequireToken,
    Json(req): Json<CombineRequest>,
) -> Result<Json<CombineReport>> {
    let selection = req.into_selection()?;
    tracing::info!(
        "Combining {} playlists into '{}' ({:?}, limit {:?})",
        selection.playlist_keys.len(),
        selection.name,
        selection.order,
        selection.limit
    );

    let report = state.combiner.combine(&selection).await?;
    Ok(Json(report))
}
