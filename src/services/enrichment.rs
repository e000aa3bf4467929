use crate::models::{Album, AlbumLookup, Track};
use crate::services::sources::MetadataSource;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Looks up what to play for an artist: top tracks, or tracks of top albums.
pub struct EnrichmentFetcher<'a, M: ?Sized> {
    source: &'a M,
    fetch_limit: usize,
}

fn is_unknown(name: &str) -> bool {
    name.trim().is_empty() || name.trim().eq_ignore_ascii_case("unknown")
}

impl<'a, M> EnrichmentFetcher<'a, M>
where
    M: MetadataSource + ?Sized,
{
    pub fn new(source: &'a M, fetch_limit: usize) -> Self {
        Self { source, fetch_limit }
    }

    /// Up to `cap` distinct (case-insensitive) top track titles, popularity order.
    pub async fn top_tracks(&self, artist: &str, cap: usize) -> Vec<String> {
        if cap == 0 {
            return Vec::new();
        }

        let titles = match self.source.top_tracks(artist, self.fetch_limit.max(cap)).await {
            Ok(titles) => titles,
            Err(e) => {
                warn!("Error fetching top tracks for {}: {}", artist, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut tracks = Vec::new();
        for title in titles {
            if tracks.len() == cap {
                break;
            }
            let title = title.trim().to_string();
            if is_unknown(&title) || !seen.insert(title.to_lowercase()) {
                continue;
            }
            tracks.push(title);
        }

        debug!("{}: {:?}", artist, tracks);
        tracks
    }

    /// Up to `cap` top albums with their tracks resolved.
    ///
    /// An album whose track lookup fails or comes back empty is kept with no
    /// tracks. Titles already contributed by an earlier album are skipped.
    pub async fn top_albums(&self, artist: &str, cap: usize) -> Vec<Album> {
        if cap == 0 {
            return Vec::new();
        }

        let refs = match self.source.top_albums(artist, self.fetch_limit.max(cap)).await {
            Ok(refs) => refs,
            Err(e) => {
                warn!("Error fetching top albums for {}: {}", artist, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut albums = Vec::new();
        for album in refs.into_iter().filter(|a| !is_unknown(&a.name)) {
            if albums.len() == cap {
                break;
            }

            let lookup = AlbumLookup::for_album(artist, &album);
            let titles = match self.source.album_tracks(&lookup).await {
                Ok(titles) => titles,
                Err(e) => {
                    warn!("Error fetching tracks of {} by {}: {}", album.name, artist, e);
                    Vec::new()
                }
            };

            let tracks: Vec<Track> = titles
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !is_unknown(t))
                .map(|title| Track {
                    id: None,
                    title,
                    artist: artist.to_string(),
                    album: Some(album.name.clone()),
                    last_played: None,
                })
                .filter(|track| seen.insert(track.identity()))
                .collect();

            if tracks.is_empty() {
                match &lookup {
                    AlbumLookup::Mbid(mbid) => warn!(
                        "No tracks found for album {} by {} (MBID: {})",
                        album.name, artist, mbid
                    ),
                    AlbumLookup::Named { .. } => {
                        warn!("No tracks found for album {} by {}", album.name, artist)
                    }
                }
            }

            albums.push(Album {
                name: album.name,
                artist: artist.to_string(),
                mbid: album.mbid,
                tracks,
            });
        }

        albums
    }
}
