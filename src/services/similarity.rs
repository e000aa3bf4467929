use crate::models::SimilarArtist;
use crate::services::sources::SimilaritySource;
use tracing::{info, warn};

/// Up to `k` related artists for `seed`, in the service's ranking order.
///
/// A failed lookup yields no candidates. Short answers are returned as-is.
pub async fn similar_artists<S>(source: &S, seed: &str, k: usize) -> Vec<SimilarArtist>
where
    S: SimilaritySource + ?Sized,
{
    if k == 0 {
        return Vec::new();
    }

    let similar = match source.similar_artists(seed, k).await {
        Ok(similar) => similar,
        Err(e) => {
            warn!("Error fetching similar artists for {}: {}", seed, e);
            return Vec::new();
        }
    };

    let candidates: Vec<SimilarArtist> = similar
        .into_iter()
        .map(|s| SimilarArtist {
            name: s.name.trim().to_string(),
            score: s.score,
        })
        .filter(|s| !s.name.is_empty())
        .take(k)
        .collect();

    info!("Last.fm returned {} similar artists for {}", candidates.len(), seed);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::FakeLastFm;

    fn names(artists: &[SimilarArtist]) -> Vec<&str> {
        artists.iter().map(|a| a.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_keeps_service_order_and_caps() {
        let lastfm = FakeLastFm::default().with_similar("Seed", &["A", "B", "C", "D"]);
        let got = similar_artists(&lastfm, "Seed", 3).await;
        assert_eq!(names(&got), vec!["A", "B", "C"]);
        assert!(got.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(*lastfm.requested_limits.lock().unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn test_never_pads() {
        let lastfm = FakeLastFm::default().with_similar("Seed", &["A", ""]);
        let got = similar_artists(&lastfm, "Seed", 10).await;
        assert_eq!(names(&got), vec!["A"]);
    }

    #[tokio::test]
    async fn test_failure_means_no_candidates() {
        let lastfm = FakeLastFm::default();
        assert!(similar_artists(&lastfm, "Nobody", 5).await.is_empty());
    }
}
