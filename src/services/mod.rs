pub mod artist_filter;
pub mod combine;
pub mod enrichment;
pub mod lastfm;
pub mod ordering;
pub mod plex;
pub mod similar_artists;
pub mod similarity;
pub mod sources;
pub mod text_artifact;

#[cfg(test)]
pub mod fakes;

pub use combine::{CombineReport, PlaylistCombiner};
pub use lastfm::LastFmClient;
pub use plex::PlexClient;
pub use similar_artists::{GenerationReport, SimilarArtistGenerator};
pub use text_artifact::TextArtifacts;
