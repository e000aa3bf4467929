use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Plex `ratingKey`, needed to add the track to a playlist
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub last_played: Option<DateTime<Utc>>,
}

impl Track {
    /// Case-insensitive (artist, title) identity used for dedupe.
    pub fn identity(&self) -> (String, String) {
        (self.artist.to_lowercase(), self.title.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Normalized identity used for dedupe.
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// An album and the tracks resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub artist: String,
    pub mbid: Option<String>,
    pub tracks: Vec<Track>,
}

/// Album entry as listed by a top-albums lookup, before its tracks are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRef {
    pub name: String,
    pub mbid: Option<String>,
}

/// Key for the album track lookup: MusicBrainz id when known, names otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumLookup {
    Mbid(String),
    Named { artist: String, album: String },
}

impl AlbumLookup {
    pub fn for_album(artist: &str, album: &AlbumRef) -> Self {
        match album.mbid.as_deref().map(str::trim) {
            Some(mbid) if !mbid.is_empty() => AlbumLookup::Mbid(mbid.to_string()),
            _ => AlbumLookup::Named {
                artist: artist.to_string(),
                album: album.name.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarArtist {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub key: String,
    pub title: String,
    pub track_count: usize,
}
