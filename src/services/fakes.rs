//! In-memory collaborators for pipeline tests.

use crate::error::{AppError, Result};
use crate::models::{AlbumLookup, AlbumRef, PlaylistSummary, SimilarArtist, Track};
use crate::services::sources::{
    LibraryIndex, MetadataSource, PlaylistStore, SimilaritySource, TrackSink,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeLibrary {
    owned: HashSet<String>,
    failing: HashSet<String>,
}

impl FakeLibrary {
    pub fn owning(names: &[&str]) -> Self {
        Self {
            owned: names.iter().map(|n| n.to_lowercase()).collect(),
            failing: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_lowercase());
        self
    }
}

#[async_trait]
impl LibraryIndex for FakeLibrary {
    async fn artist_exists(&self, name: &str) -> Result<bool> {
        let key = name.to_lowercase();
        if self.failing.contains(&key) {
            return Err(AppError::Plex("search failed".to_string()));
        }
        Ok(self.owned.contains(&key))
    }
}

/// Last.fm stand-in. Unknown artists answer with a transport error.
#[derive(Default)]
pub struct FakeLastFm {
    pub similar: HashMap<String, Vec<String>>,
    pub top_tracks: HashMap<String, Vec<String>>,
    pub top_albums: HashMap<String, Vec<AlbumRef>>,
    pub album_tracks: HashMap<String, Vec<String>>,
    pub lookups: Mutex<Vec<AlbumLookup>>,
    pub requested_limits: Mutex<Vec<usize>>,
}

impl FakeLastFm {
    pub fn with_similar(mut self, seed: &str, names: &[&str]) -> Self {
        self.similar
            .insert(seed.to_lowercase(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_tracks(mut self, artist: &str, titles: &[&str]) -> Self {
        self.top_tracks
            .insert(artist.to_lowercase(), titles.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_albums(mut self, artist: &str, albums: &[(&str, Option<&str>)]) -> Self {
        let refs = albums
            .iter()
            .map(|(name, mbid)| AlbumRef {
                name: name.to_string(),
                mbid: mbid.map(|m| m.to_string()),
            })
            .collect();
        self.top_albums.insert(artist.to_lowercase(), refs);
        self
    }

    /// Registers album tracks under an MBID or an `artist/album` key.
    pub fn with_album_tracks(mut self, key: &str, titles: &[&str]) -> Self {
        self.album_tracks
            .insert(key.to_lowercase(), titles.iter().map(|t| t.to_string()).collect());
        self
    }

    fn lookup_key(lookup: &AlbumLookup) -> String {
        match lookup {
            AlbumLookup::Mbid(mbid) => mbid.to_lowercase(),
            AlbumLookup::Named { artist, album } => format!("{}/{}", artist, album).to_lowercase(),
        }
    }
}

#[async_trait]
impl SimilaritySource for FakeLastFm {
    async fn similar_artists(&self, seed: &str, limit: usize) -> Result<Vec<SimilarArtist>> {
        self.requested_limits.lock().unwrap().push(limit);
        let names = self
            .similar
            .get(&seed.to_lowercase())
            .ok_or_else(|| AppError::LastFm("status 404".to_string()))?;
        Ok(names
            .iter()
            .enumerate()
            .map(|(i, name)| SimilarArtist {
                name: name.clone(),
                score: 1.0 - i as f64 / 100.0,
            })
            .collect())
    }
}

#[async_trait]
impl MetadataSource for FakeLastFm {
    async fn top_tracks(&self, artist: &str, limit: usize) -> Result<Vec<String>> {
        let tracks = self
            .top_tracks
            .get(&artist.to_lowercase())
            .ok_or_else(|| AppError::LastFm("status 500".to_string()))?;
        Ok(tracks.iter().take(limit).cloned().collect())
    }

    async fn top_albums(&self, artist: &str, limit: usize) -> Result<Vec<AlbumRef>> {
        let albums = self
            .top_albums
            .get(&artist.to_lowercase())
            .ok_or_else(|| AppError::LastFm("status 500".to_string()))?;
        Ok(albums.iter().take(limit).cloned().collect())
    }

    async fn album_tracks(&self, lookup: &AlbumLookup) -> Result<Vec<String>> {
        self.lookups.lock().unwrap().push(lookup.clone());
        self.album_tracks
            .get(&Self::lookup_key(lookup))
            .cloned()
            .ok_or_else(|| AppError::LastFm("status 500".to_string()))
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub playlists: Vec<PlaylistSummary>,
    pub items: HashMap<String, Vec<Track>>,
    pub created: Mutex<Vec<(String, Vec<Track>)>>,
    pub reject_create: Option<String>,
}

impl FakeStore {
    pub fn with_playlist(mut self, key: &str, title: &str, tracks: Vec<Track>) -> Self {
        self.playlists.push(PlaylistSummary {
            key: key.to_string(),
            title: title.to_string(),
            track_count: tracks.len(),
        });
        self.items.insert(key.to_string(), tracks);
        self
    }
}

#[async_trait]
impl PlaylistStore for FakeStore {
    async fn playlists(&self) -> Result<Vec<PlaylistSummary>> {
        Ok(self.playlists.clone())
    }

    async fn playlist_items(&self, key: &str) -> Result<Vec<Track>> {
        self.items
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::Plex(format!("playlist {} unavailable", key)))
    }

    async fn create_playlist(&self, title: &str, items: &[Track]) -> Result<PlaylistSummary> {
        if let Some(reason) = &self.reject_create {
            return Err(AppError::Plex(reason.clone()));
        }
        self.created
            .lock()
            .unwrap()
            .push((title.to_string(), items.to_vec()));
        Ok(PlaylistSummary {
            key: "new".to_string(),
            title: title.to_string(),
            track_count: items.len(),
        })
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub writes: Mutex<Vec<(String, Vec<String>)>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, lines)| lines.clone())
            .collect()
    }
}

#[async_trait]
impl TrackSink for MemorySink {
    async fn append_lines(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        self.writes
            .lock()
            .unwrap()
            .push((name.to_string(), lines.to_vec()));
        Ok(PathBuf::from(format!("{}.txt", name)))
    }
}

pub fn track(artist: &str, title: &str) -> Track {
    Track {
        id: Some(format!("{}:{}", artist, title)),
        title: title.to_string(),
        artist: artist.to_string(),
        album: None,
        last_played: None,
    }
}
