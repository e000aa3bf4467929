use crate::models::{Track, TrackOrder};
use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};

/// Anything that can be sorted by when it was last played.
pub trait LastPlayed {
    fn last_played(&self) -> Option<DateTime<Utc>>;
}

impl LastPlayed for Track {
    fn last_played(&self) -> Option<DateTime<Utc>> {
        self.last_played
    }
}

/// Plain "Artist - Track" lines carry no play history.
impl LastPlayed for String {
    fn last_played(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Stand-in date for items that were never played, so they sort first.
pub fn never_played() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

/// Orders `items` and then keeps at most `limit` of them.
pub fn apply<T, R>(
    mut items: Vec<T>,
    order: TrackOrder,
    limit: Option<usize>,
    rng: &mut R,
) -> Vec<T>
where
    T: LastPlayed,
    R: Rng + ?Sized,
{
    match order {
        TrackOrder::KeepSequence => {}
        // sort_by_key is stable, so ties keep their source order
        TrackOrder::LastPlayed => {
            items.sort_by_key(|item| item.last_played().unwrap_or_else(never_played))
        }
        TrackOrder::Shuffle => items.shuffle(rng),
    }

    if let Some(limit) = limit {
        items.truncate(limit);
    }

    items
}
