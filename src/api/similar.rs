use crate::api::middleware::RequireToken;
use crate::api::AppState;
use crate::error::Result;
use crate::models::GenerateRequest;
use crate::services::GenerationReport;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

pub fn similar_routes() -> Router<Arc<AppState>> {
    Router::new().route("/similar-artists", post(generate))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    _: RequireToken,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerationReport>> {
    let selection = req.into_selection()?;
    tracing::info!("Generating {:?} list for '{}'", selection.mode, selection.artist);

    let report = state.generator.generate(&selection).await?;
    tracing::info!(
        "Generated {} lines from {} similar artists",
        report.lines.len(),
        report.candidates.len()
    );
    Ok(Json(report))
}
