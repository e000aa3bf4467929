use crate::models::Artist;
use crate::services::sources::LibraryIndex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Drops candidates the library already owns, keeping input order, at most `max`.
///
/// Case-insensitive duplicates are dropped too. A candidate whose library
/// lookup fails is skipped, since it cannot be shown to be new.
pub async fn exclude_owned<L>(library: &L, candidates: Vec<Artist>, max: usize) -> Vec<Artist>
where
    L: LibraryIndex + ?Sized,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for candidate in candidates {
        if kept.len() == max {
            break;
        }
        if !seen.insert(candidate.key()) {
            continue;
        }

        match library.artist_exists(&candidate.name).await {
            Ok(true) => debug!("Skipping {}: already in library", candidate.name),
            Ok(false) => kept.push(candidate),
            Err(e) => warn!("Skipping {}: library lookup failed: {}", candidate.name, e),
        }
    }

    kept
}
