use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

/// How a combined track list is ordered before the cap is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackOrder {
    #[default]
    KeepSequence,
    /// Ascending by last play date, never-played first
    LastPlayed,
    Shuffle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Top tracks of each similar artist
    Tracks,
    /// Tracks of the top albums of each similar artist
    Albums,
    /// One track per similar artist plus the seed's own top tracks, shuffled
    Radio,
}

impl GenerationMode {
    /// Suffix of the text file written for this mode.
    pub fn artifact_suffix(&self) -> &'static str {
        match self {
            GenerationMode::Tracks => "SimArtistsTracks",
            GenerationMode::Albums => "SimArtistsAlbums",
            GenerationMode::Radio => "Radio",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CombineRequest {
    #[validate(length(min = 2, message = "select at least two playlists"))]
    pub playlist_keys: Vec<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub order: TrackOrder,
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// A checked combine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSelection {
    pub playlist_keys: Vec<String>,
    pub name: String,
    pub order: TrackOrder,
    pub limit: Option<usize>,
}

impl CombineRequest {
    pub fn into_selection(self) -> crate::error::Result<CombineSelection> {
        self.validate()?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("playlist name must not be blank".to_string()));
        }

        let mut seen = HashSet::new();
        let mut playlist_keys = Vec::with_capacity(self.playlist_keys.len());
        for key in self.playlist_keys {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(AppError::Validation("playlist key must not be blank".to_string()));
            }
            if !seen.insert(key.clone()) {
                return Err(AppError::Validation(format!("playlist {} selected twice", key)));
            }
            playlist_keys.push(key);
        }

        Ok(CombineSelection {
            playlist_keys,
            name,
            order: self.order,
            limit: self.limit,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, max = 255))]
    pub artist: String,
    pub mode: GenerationMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSelection {
    pub artist: String,
    pub mode: GenerationMode,
}

impl GenerateRequest {
    pub fn into_selection(self) -> crate::error::Result<SeedSelection> {
        self.validate()?;

        let artist = self.artist.trim().to_string();
        if artist.is_empty() {
            return Err(AppError::Validation("no artist name provided".to_string()));
        }

        Ok(SeedSelection {
            artist,
            mode: self.mode,
        })
    }
}
