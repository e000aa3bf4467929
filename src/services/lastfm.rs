//! Last.fm web service client.
//!
//! Every container level in the response types is optional: Last.fm omits
//! keys for unknown artists and answers some errors with status 200 and an
//! `{"error": ..}` body, and both should read as "no results".

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AlbumLookup, AlbumRef, SimilarArtist};
use crate::services::sources::{MetadataSource, SimilaritySource};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct LastFmClient {
    base_url: String,
    api_key: String,
    client: Client,
}

/// Last.fm collapses one-element lists into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct SimilarArtistsResponse {
    similarartists: Option<SimilarArtistsContainer>,
}

#[derive(Debug, Deserialize)]
struct SimilarArtistsContainer {
    artist: Option<OneOrMany<LastFmArtist>>,
}

#[derive(Debug, Deserialize)]
struct LastFmArtist {
    name: Option<String>,
    #[serde(rename = "match")]
    match_score: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    toptracks: Option<TopTracksContainer>,
}

#[derive(Debug, Deserialize)]
struct TopTracksContainer {
    track: Option<OneOrMany<NamedEntry>>,
}

#[derive(Debug, Deserialize)]
struct TopAlbumsResponse {
    topalbums: Option<TopAlbumsContainer>,
}

#[derive(Debug, Deserialize)]
struct TopAlbumsContainer {
    album: Option<OneOrMany<LastFmAlbum>>,
}

#[derive(Debug, Deserialize)]
struct LastFmAlbum {
    name: Option<String>,
    mbid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumInfoResponse {
    album: Option<AlbumInfo>,
}

#[derive(Debug, Deserialize)]
struct AlbumInfo {
    tracks: Option<AlbumTracks>,
}

#[derive(Debug, Deserialize)]
struct AlbumTracks {
    track: Option<OneOrMany<NamedEntry>>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: Option<String>,
}

fn score(value: Option<&serde_json::Value>) -> f64 {
    match value {
        Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0.0),
        Some(v) => v.as_f64().unwrap_or(0.0),
        None => 0.0,
    }
}

fn names(entries: Option<OneOrMany<NamedEntry>>) -> Vec<String> {
    entries
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|t| t.name)
        .collect()
}

impl SimilarArtistsResponse {
    fn into_artists(self) -> Vec<SimilarArtist> {
        self.similarartists
            .and_then(|s| s.artist)
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| {
                let score = score(a.match_score.as_ref());
                a.name.map(|name| SimilarArtist { name, score })
            })
            .collect()
    }
}

impl TopAlbumsResponse {
    fn into_albums(self) -> Vec<AlbumRef> {
        self.topalbums
            .and_then(|t| t.album)
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| {
                let mbid = a.mbid.filter(|m| !m.trim().is_empty());
                a.name.map(|name| AlbumRef { name, mbid })
            })
            .collect()
    }
}

impl LastFmClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.lastfm_url.clone(),
            api_key: config.lastfm_api_key.clone(),
            client,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("Last.fm {} {:?}", method, params);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("method", method),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::LastFm(format!("{} request failed: {}", method, e)))?;

        if !response.status().is_success() {
            return Err(AppError::LastFm(format!(
                "{} returned status: {}",
                method,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::LastFm(format!("Failed to parse {} response: {}", method, e)))
    }
}

#[async_trait]
impl SimilaritySource for LastFmClient {
    async fn similar_artists(&self, seed: &str, limit: usize) -> Result<Vec<SimilarArtist>> {
        let response: SimilarArtistsResponse = self
            .call(
                "artist.getsimilar",
                &[("artist", seed.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.into_artists())
    }
}

#[async_trait]
impl MetadataSource for LastFmClient {
    async fn top_tracks(&self, artist: &str, limit: usize) -> Result<Vec<String>> {
        let response: TopTracksResponse = self
            .call(
                "artist.gettoptracks",
                &[("artist", artist.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(names(response.toptracks.and_then(|t| t.track)))
    }

    async fn top_albums(&self, artist: &str, limit: usize) -> Result<Vec<AlbumRef>> {
        let response: TopAlbumsResponse = self
            .call(
                "artist.gettopalbums",
                &[("artist", artist.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.into_albums())
    }

    async fn album_tracks(&self, lookup: &AlbumLookup) -> Result<Vec<String>> {
        let params = match lookup {
            AlbumLookup::Mbid(mbid) => vec![("mbid", mbid.clone())],
            AlbumLookup::Named { artist, album } => {
                vec![("artist", artist.clone()), ("album", album.clone())]
            }
        };

        let response: AlbumInfoResponse = self.call("album.getinfo", &params).await?;
        Ok(names(
            response
                .album
                .and_then(|a| a.tracks)
                .and_then(|t| t.track),
        ))
    }
}
