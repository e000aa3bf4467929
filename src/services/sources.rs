//! Collaborator seams of the pipelines.
//!
//! Plex backs [`LibraryIndex`] and [`PlaylistStore`], Last.fm backs
//! [`SimilaritySource`] and [`MetadataSource`], and the text output directory
//! backs [`TrackSink`]. Tests swap in the in-memory versions from `fakes`.

use crate::error::Result;
use crate::models::{AlbumLookup, AlbumRef, PlaylistSummary, SimilarArtist, Track};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait LibraryIndex: Send + Sync {
    async fn artist_exists(&self, name: &str) -> Result<bool>;
}

#[async_trait]
pub trait SimilaritySource: Send + Sync {
    /// Related artists in the service's ranking order.
    async fn similar_artists(&self, seed: &str, limit: usize) -> Result<Vec<SimilarArtist>>;
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Raw top track titles in popularity order.
    async fn top_tracks(&self, artist: &str, limit: usize) -> Result<Vec<String>>;

    async fn top_albums(&self, artist: &str, limit: usize) -> Result<Vec<AlbumRef>>;

    async fn album_tracks(&self, lookup: &AlbumLookup) -> Result<Vec<String>>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn playlists(&self) -> Result<Vec<PlaylistSummary>>;

    async fn playlist_items(&self, key: &str) -> Result<Vec<Track>>;

    async fn create_playlist(&self, title: &str, items: &[Track]) -> Result<PlaylistSummary>;
}

#[async_trait]
pub trait TrackSink: Send + Sync {
    /// Appends lines to the named artifact, creating it when absent.
    async fn append_lines(&self, name: &str, lines: &[String]) -> Result<PathBuf>;
}
