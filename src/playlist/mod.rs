//! Playlist JSON: export from the legacy database, import into the catalog.

mod export;
mod import;
pub mod media;
mod models;

pub use export::export_legacy;
pub use import::import_playlist;
pub use media::{read_playlist, write_playlist};
pub use models::{
    Playlist, PlaylistArtist, PlaylistSong, PlaylistSongArtist, PlaylistStore, PlaylistTitled,
    PlaylistTotals,
};
