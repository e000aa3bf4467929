pub mod middleware;
pub mod playlists;
pub mod similar;

pub use playlists::playlist_routes;
pub use similar::similar_routes;

use crate::services::{PlaylistCombiner, SimilarArtistGenerator};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct AppState {
    pub combiner: Arc<PlaylistCombiner>,
    pub generator: Arc<SimilarArtistGenerator>,
    pub api_token: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().nest(
        "/api/v1",
        Router::new()
            .route("/health", get(health))
            .merge(playlist_routes())
            .merge(similar_routes())
            .with_state(state),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
