//! Similar-artist playlist generation.
//!
//! Seeds a Last.fm similarity search with one artist, drops artists already in
//! the Plex library, and writes what to play for the rest as text lines that
//! an import shortcut can turn into a playlist:
//!
//! - `tracks`: `Artist - Track` for the top tracks of every new artist
//! - `albums`: `Album: Track` for the top albums of every new artist
//! - `radio`: one top track per new artist (twice as many artists) plus the
//!   seed's top track, shuffled together

use crate::config::GenerationLimits;
use crate::error::Result;
use crate::models::{Artist, GenerationMode, SeedSelection, SimilarArtist, TrackOrder};
use crate::services::enrichment::EnrichmentFetcher;
use crate::services::sources::{LibraryIndex, MetadataSource, SimilaritySource, TrackSink};
use crate::services::{artist_filter, ordering, similarity};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub seed: String,
    pub mode: GenerationMode,
    /// New artists that survived the library filter, in similarity order
    pub candidates: Vec<SimilarArtist>,
    pub lines: Vec<String>,
    /// Absent when nothing was written
    pub output_file: Option<PathBuf>,
}

pub struct SimilarArtistGenerator {
    similarity: Arc<dyn SimilaritySource>,
    metadata: Arc<dyn MetadataSource>,
    library: Arc<dyn LibraryIndex>,
    sink: Arc<dyn TrackSink>,
    limits: GenerationLimits,
}

impl SimilarArtistGenerator {
    pub fn new(
        similarity: Arc<dyn SimilaritySource>,
        metadata: Arc<dyn MetadataSource>,
        library: Arc<dyn LibraryIndex>,
        sink: Arc<dyn TrackSink>,
        limits: GenerationLimits,
    ) -> Self {
        Self {
            similarity,
            metadata,
            library,
            sink,
            limits,
        }
    }

    /// Artist count asked of the similarity service and kept after filtering.
    fn candidate_limit(&self, mode: GenerationMode) -> usize {
        match mode {
            GenerationMode::Radio => self.limits.similar_artists * 2,
            GenerationMode::Tracks | GenerationMode::Albums => self.limits.similar_artists,
        }
    }

    pub async fn generate(&self, selection: &SeedSelection) -> Result<GenerationReport> {
        let seed = selection.artist.as_str();
        let mode = selection.mode;
        let k = self.candidate_limit(mode);

        let similar = similarity::similar_artists(self.similarity.as_ref(), seed, k).await;
        let names = similar.iter().map(|s| Artist::new(s.name.as_str())).collect();
        let candidates = artist_filter::exclude_owned(self.library.as_ref(), names, k).await;
        info!(
            "Similar artists to {} not in library: {:?}",
            seed,
            candidates.iter().map(|a| a.name.as_str()).collect::<Vec<_>>()
        );

        let artifact = format!("{}-{}", seed, mode.artifact_suffix());
        let (lines, output_file) = match mode {
            GenerationMode::Tracks => self.emit_top_tracks(&candidates, &artifact).await?,
            GenerationMode::Albums => self.emit_top_albums(&candidates, &artifact).await?,
            GenerationMode::Radio => self.emit_radio(seed, &candidates, &artifact).await?,
        };

        Ok(GenerationReport {
            seed: seed.to_string(),
            mode,
            candidates: scored(&similar, &candidates),
            lines,
            output_file,
        })
    }

    async fn emit_top_tracks(
        &self,
        candidates: &[Artist],
        artifact: &str,
    ) -> Result<(Vec<String>, Option<PathBuf>)> {
        let fetcher = EnrichmentFetcher::new(self.metadata.as_ref(), self.limits.fetch_limit);
        let mut lines = Vec::new();
        let mut output_file = None;

        for artist in candidates {
            let tracks = fetcher
                .top_tracks(&artist.name, self.limits.tracks_per_artist)
                .await;
            info!("{}: {:?}", artist.name, tracks);

            let batch: Vec<String> = tracks
                .iter()
                .map(|track| format!("{} - {}", artist.name, track))
                .collect();
            if !batch.is_empty() {
                output_file = Some(self.sink.append_lines(artifact, &batch).await?);
                lines.extend(batch);
            }
        }

        Ok((lines, output_file))
    }

    async fn emit_top_albums(
        &self,
        candidates: &[Artist],
        artifact: &str,
    ) -> Result<(Vec<String>, Option<PathBuf>)> {
        let fetcher = EnrichmentFetcher::new(self.metadata.as_ref(), self.limits.fetch_limit);
        let mut lines = Vec::new();
        let mut output_file = None;

        for artist in candidates {
            let albums = fetcher
                .top_albums(&artist.name, self.limits.albums_per_artist)
                .await;
            info!(
                "{}: {:?}",
                artist.name,
                albums.iter().map(|a| a.name.as_str()).collect::<Vec<_>>()
            );

            let batch: Vec<String> = albums
                .iter()
                .flat_map(|album| {
                    album.tracks.iter().map(move |track| {
                        info!("{} - {}: {}", artist.name, album.name, track.title);
                        format!("{}: {}", album.name, track.title)
                    })
                })
                .collect();
            if !batch.is_empty() {
                output_file = Some(self.sink.append_lines(artifact, &batch).await?);
                lines.extend(batch);
            }
        }

        Ok((lines, output_file))
    }

    async fn emit_radio(
        &self,
        seed: &str,
        candidates: &[Artist],
        artifact: &str,
    ) -> Result<(Vec<String>, Option<PathBuf>)> {
        let fetcher = EnrichmentFetcher::new(self.metadata.as_ref(), self.limits.fetch_limit);
        let mut radio_tracks = Vec::new();

        for artist in candidates {
            let tracks = fetcher.top_tracks(&artist.name, 1).await;
            info!("{}: {:?}", artist.name, tracks);
            radio_tracks.extend(tracks.iter().map(|t| format!("{} - {}", artist.name, t)));
        }

        let seed_tracks = fetcher.top_tracks(seed, 1).await;
        info!("{}: {:?}", seed, seed_tracks);
        radio_tracks.extend(seed_tracks.iter().map(|t| format!("{} - {}", seed, t)));

        let radio_tracks = {
            let mut rng = rand::thread_rng();
            ordering::apply(radio_tracks, TrackOrder::Shuffle, None, &mut rng)
        };

        if radio_tracks.is_empty() {
            return Ok((radio_tracks, None));
        }

        let output_file = self.sink.append_lines(artifact, &radio_tracks).await?;
        Ok((radio_tracks, Some(output_file)))
    }
}

/// Similarity entries for the artists kept by the filter, in filter order.
fn scored(similar: &[SimilarArtist], kept: &[Artist]) -> Vec<SimilarArtist> {
    kept.iter()
        .filter_map(|artist| {
            similar
                .iter()
                .find(|s| Artist::new(s.name.as_str()).key() == artist.key())
                .cloned()
        })
        .collect()
}
