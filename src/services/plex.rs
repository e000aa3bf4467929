use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{PlaylistSummary, Track};
use crate::services::sources::{LibraryIndex, PlaylistStore};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Plex `type` code for artists in library searches.
const ARTIST_TYPE: &str = "8";

#[derive(Debug, Clone)]
pub struct PlexClient {
    base_url: String,
    token: String,
    machine_identifier: String,
    section_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    machine_identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SectionList {
    #[serde(rename = "Directory", default)]
    directory: Vec<PlexSection>,
}

#[derive(Debug, Deserialize)]
struct PlexSection {
    key: String,
    title: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataList<T> {
    #[serde(rename = "Metadata", default = "Vec::new")]
    metadata: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlexPlaylist {
    rating_key: String,
    title: String,
    playlist_type: Option<String>,
    leaf_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlexTrack {
    rating_key: Option<String>,
    title: Option<String>,
    /// Track-level artist, set on compilations
    original_title: Option<String>,
    grandparent_title: Option<String>,
    parent_title: Option<String>,
    last_viewed_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlexArtist {
    title: Option<String>,
}

impl From<PlexPlaylist> for PlaylistSummary {
    fn from(playlist: PlexPlaylist) -> Self {
        PlaylistSummary {
            key: playlist.rating_key,
            title: playlist.title,
            track_count: playlist.leaf_count.unwrap_or(0),
        }
    }
}

fn viewed_at(epoch_secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(epoch_secs, 0).single()
}

fn track_from_plex(item: PlexTrack) -> Option<Track> {
    let title = item.title?;
    let artist = item
        .original_title
        .or(item.grandparent_title)
        .unwrap_or_default();

    Some(Track {
        id: item.rating_key,
        title,
        artist,
        album: item.parent_title,
        last_played: item.last_viewed_at.and_then(viewed_at),
    })
}

fn snippet(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl PlexClient {
    /// Connects to the server and resolves the configured music library.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mut plex = Self {
            base_url: config.plex_url.clone(),
            token: config.plex_token.clone(),
            machine_identifier: String::new(),
            section_key: String::new(),
            client,
        };

        let info: PlexResponse<ServerInfo> = plex.get_json("/", &[]).await?;
        plex.machine_identifier = info
            .media_container
            .machine_identifier
            .ok_or_else(|| {
                AppError::Plex("Server did not report a machine identifier".to_string())
            })?;

        plex.section_key = plex.resolve_section(&config.plex_library).await?;
        tracing::info!(
            "Connected to Plex server {} (library '{}' is section {})",
            plex.machine_identifier,
            config.plex_library,
            plex.section_key
        );

        Ok(plex)
    }

    async fn resolve_section(&self, title: &str) -> Result<String> {
        let sections: PlexResponse<SectionList> = self.get_json("/library/sections", &[]).await?;

        sections
            .media_container
            .directory
            .into_iter()
            .find(|s| s.title == title && s.kind.as_deref().map_or(true, |k| k == "artist"))
            .map(|s| s.key)
            .ok_or_else(|| AppError::Config(format!("Plex music library '{}' not found", title)))
    }

    async fn send(&self, method: Method, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Plex {} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .header("X-Plex-Token", &self.token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Plex(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Plex API error: {} - {}", status, snippet(&body, 200));
            return Err(AppError::Plex(format!("API returned status: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Plex(format!("Failed to read response: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let text = self.send(Method::GET, path, query).await?;
        parse(&text)
    }
}

fn parse<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        AppError::Plex(format!(
            "Failed to parse response: {} - Response: {}",
            e,
            snippet(text, 200)
        ))
    })
}

#[async_trait]
impl LibraryIndex for PlexClient {
    async fn artist_exists(&self, name: &str) -> Result<bool> {
        let path = format!("/library/sections/{}/all", self.section_key);
        let found: PlexResponse<MetadataList<PlexArtist>> = self
            .get_json(
                &path,
                &[("type", ARTIST_TYPE.to_string()), ("title", name.to_string())],
            )
            .await?;

        let exists = found
            .media_container
            .metadata
            .iter()
            .any(|a| a.title.is_some());
        tracing::debug!("Artist '{}' in library: {}", name, exists);
        Ok(exists)
    }
}

#[async_trait]
impl PlaylistStore for PlexClient {
    async fn playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let list: PlexResponse<MetadataList<PlexPlaylist>> = self
            .get_json("/playlists", &[("playlistType", "audio".to_string())])
            .await?;

        Ok(list
            .media_container
            .metadata
            .into_iter()
            .filter(|p| p.playlist_type.as_deref().map_or(true, |t| t == "audio"))
            .map(PlaylistSummary::from)
            .collect())
    }

    async fn playlist_items(&self, key: &str) -> Result<Vec<Track>> {
        let path = format!("/playlists/{}/items", key);
        let items: PlexResponse<MetadataList<PlexTrack>> = self.get_json(&path, &[]).await?;

        Ok(items
            .media_container
            .metadata
            .into_iter()
            .filter_map(track_from_plex)
            .collect())
    }

    async fn create_playlist(&self, title: &str, items: &[Track]) -> Result<PlaylistSummary> {
        let ids: Vec<&str> = items.iter().filter_map(|t| t.id.as_deref()).collect();
        if ids.len() < items.len() {
            tracing::warn!(
                "{} tracks have no Plex id and are left out of '{}'",
                items.len() - ids.len(),
                title
            );
        }
        if ids.is_empty() {
            return Err(AppError::PlaylistStore(format!(
                "No Plex tracks to add to '{}'",
                title
            )));
        }

        let uri = format!(
            "server://{}/com.plexapp.plugins.library/library/metadata/{}",
            self.machine_identifier,
            ids.join(",")
        );
        let text = self
            .send(
                Method::POST,
                "/playlists",
                &[
                    ("type", "audio".to_string()),
                    ("title", title.to_string()),
                    ("smart", "0".to_string()),
                    ("uri", uri),
                ],
            )
            .await?;

        let created: PlexResponse<MetadataList<PlexPlaylist>> = parse(&text)?;
        created
            .media_container
            .metadata
            .into_iter()
            .next()
            .map(PlaylistSummary::from)
            .ok_or_else(|| {
                AppError::PlaylistStore(format!("Plex did not return playlist '{}'", title))
            })
    }
}
