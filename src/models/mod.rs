pub mod selection;
pub mod track;

pub use selection::{
    CombineRequest, CombineSelection, GenerateRequest, GenerationMode, SeedSelection, TrackOrder,
};
pub use track::{Album, AlbumLookup, AlbumRef, Artist, PlaylistSummary, SimilarArtist, Track};
