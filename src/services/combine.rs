use crate::error::{AppError, Result};
use crate::models::{CombineSelection, PlaylistSummary, Track, TrackOrder};
use crate::services::ordering;
use crate::services::sources::PlaylistStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CombineReport {
    pub playlist: PlaylistSummary,
    pub sources: Vec<String>,
    pub order: TrackOrder,
    pub limit: Option<usize>,
}

/// Merges existing playlists into a new one.
pub struct PlaylistCombiner {
    store: Arc<dyn PlaylistStore>,
}

impl PlaylistCombiner {
    pub fn new(store: Arc<dyn PlaylistStore>) -> Self {
        Self { store }
    }

    pub async fn playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let playlists = self.store.playlists().await?;
        if playlists.is_empty() {
            return Err(AppError::NotFound("No playlists found".to_string()));
        }
        Ok(playlists)
    }

    pub async fn combine(&self, selection: &CombineSelection) -> Result<CombineReport> {
        let existing = self.store.playlists().await?;

        if existing
            .iter()
            .any(|p| p.title.eq_ignore_ascii_case(&selection.name))
        {
            return Err(AppError::PlaylistStore(format!(
                "A playlist named '{}' already exists",
                selection.name
            )));
        }

        let mut sources = Vec::with_capacity(selection.playlist_keys.len());
        let mut all_items: Vec<Track> = Vec::new();
        for key in &selection.playlist_keys {
            let source = existing
                .iter()
                .find(|p| &p.key == key)
                .ok_or_else(|| AppError::NotFound(format!("Playlist {} not found", key)))?;

            let items = self.store.playlist_items(key).await?;
            debug!("Playlist '{}' contributes {} tracks", source.title, items.len());
            sources.push(source.title.clone());
            all_items.extend(items);
        }

        let ordered = {
            let mut rng = rand::thread_rng();
            ordering::apply(all_items, selection.order, selection.limit, &mut rng)
        };

        if selection.order == TrackOrder::LastPlayed {
            info!("Tracks sorted by last play date:");
            for (idx, item) in ordered.iter().enumerate() {
                let played = item
                    .last_played
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                info!("{}. {} - {}", idx + 1, item.title, played);
            }
        }

        if ordered.is_empty() {
            return Err(AppError::PlaylistStore(
                "The selected playlists contain no tracks".to_string(),
            ));
        }

        let playlist = match self.store.create_playlist(&selection.name, &ordered).await {
            Ok(playlist) => playlist,
            Err(e) => {
                warn!("Error creating playlist '{}': {}", selection.name, e);
                return Err(match e {
                    AppError::PlaylistStore(msg) => AppError::PlaylistStore(msg),
                    other => AppError::PlaylistStore(format!(
                        "Error creating playlist '{}': {}",
                        selection.name, other
                    )),
                });
            }
        };

        info!(
            "New playlist '{}' created with {} tracks",
            playlist.title, playlist.track_count
        );

        Ok(CombineReport {
            playlist,
            sources,
            order: selection.order,
            limit: selection.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::{track, FakeStore};

    fn selection(keys: &[&str], order: TrackOrder, limit: Option<usize>) -> CombineSelection {
        CombineSelection {
            playlist_keys: keys.iter().map(|k| k.to_string()).collect(),
            name: "Master".to_string(),
            order,
            limit,
        }
    }

    fn store() -> FakeStore {
        FakeStore::default()
            .with_playlist(
                "1",
                "Morning",
                vec![track("A", "a1"), track("A", "a2"), track("A", "a3")],
            )
            .with_playlist(
                "2",
                "Evening",
                vec![track("B", "b1"), track("B", "b2"), track("B", "b3"), track("B", "b4")],
            )
    }

    #[tokio::test]
    async fn test_keep_sequence_concatenates_in_source_order() {
        let store = Arc::new(store());
        let combiner = PlaylistCombiner::new(store.clone());

        let report = combiner
            .combine(&selection(&["1", "2"], TrackOrder::KeepSequence, None))
            .await
            .unwrap();
        assert_eq!(report.playlist.track_count, 7);
        assert_eq!(report.sources, vec!["Morning", "Evening"]);

        let created = store.created.lock().unwrap();
        let titles: Vec<&str> = created[0].1.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "a3", "b1", "b2", "b3", "b4"]);
    }

    #[tokio::test]
    async fn test_shuffle_with_cap() {
        let store = Arc::new(store());
        let combiner = PlaylistCombiner::new(store.clone());

        let report = combiner
            .combine(&selection(&["2", "1"], TrackOrder::Shuffle, Some(5)))
            .await
            .unwrap();
        assert_eq!(report.playlist.track_count, 5);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_store_error() {
        let combiner = PlaylistCombiner::new(Arc::new(store()));
        let mut request = selection(&["1", "2"], TrackOrder::KeepSequence, None);
        request.name = "morning".to_string();

        let err = combiner.combine(&request).await.unwrap_err();
        assert!(matches!(err, AppError::PlaylistStore(_)));
    }

    #[tokio::test]
    async fn test_create_failure_is_reported() {
        let mut failing = store();
        failing.reject_create = Some("transport closed".to_string());
        let combiner = PlaylistCombiner::new(Arc::new(failing));

        let err = combiner
            .combine(&selection(&["1", "2"], TrackOrder::KeepSequence, None))
            .await
            .unwrap_err();
        match err {
            AppError::PlaylistStore(msg) => assert!(msg.contains("transport closed")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_playlist_key() {
        let combiner = PlaylistCombiner::new(Arc::new(store()));
        let err = combiner
            .combine(&selection(&["1", "9"], TrackOrder::KeepSequence, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_playlists_is_not_found() {
        let combiner = PlaylistCombiner::new(Arc::new(FakeStore::default()));
        assert!(matches!(
            combiner.playlists().await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
