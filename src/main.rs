mod api;
mod config;
mod error;
mod models;
mod services;

use crate::api::AppState;
use crate::config::Config;
use crate::services::{
    LastFmClient, PlaylistCombiner, PlexClient, SimilarArtistGenerator, TextArtifacts,
};
use axum::http::{header, Method};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,plexmix=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Initialize services
    let plex = Arc::new(PlexClient::connect(&config).await?);
    let lastfm = Arc::new(LastFmClient::new(&config)?);
    let artifacts = Arc::new(TextArtifacts::new(config.output_dir.clone()));
    tracing::info!("Writing track lists to {}", artifacts.dir().display());

    let combiner = Arc::new(PlaylistCombiner::new(plex.clone()));
    let generator = Arc::new(SimilarArtistGenerator::new(
        lastfm.clone(),
        lastfm,
        plex,
        artifacts,
        config.limits.clone(),
    ));

    let app_state = Arc::new(AppState {
        combiner,
        generator,
        api_token: config.api_token.clone(),
    });

    let app = api::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
