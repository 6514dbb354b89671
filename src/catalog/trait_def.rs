use super::models::{
    Artist, ArtistInput, CascadeOutcome, CatalogEntity, Song, SongDetails, SongInput, Store,
    StoreInput, TitledEntity, TitledInput, TitledKind,
};
use crate::store::{Page, PageWindow};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Catalog persistence. Lookups return `Ok(None)` for missing rows, mutations
/// return `Ok(false)` when the target does not exist.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Albums and games
    // =========================================================================

    fn create_titled(&self, kind: TitledKind, input: &TitledInput) -> Result<i64>;

    fn get_titled(&self, kind: TitledKind, id: i64) -> Result<Option<TitledEntity>>;

    fn update_titled(&self, kind: TitledKind, id: i64, input: &TitledInput) -> Result<bool>;

    /// Songs referencing the deleted row keep existing with the link cleared.
    fn delete_titled(&self, kind: TitledKind, id: i64) -> Result<bool>;

    /// Ordered by sorted title.
    fn list_titled(&self, kind: TitledKind, window: PageWindow) -> Result<Page<TitledEntity>>;

    fn find_titled_by_title(&self, kind: TitledKind, title: &str) -> Result<Option<i64>>;

    // =========================================================================
    // Artists
    // =========================================================================

    fn create_artist(&self, input: &ArtistInput) -> Result<i64>;

    fn get_artist(&self, id: i64) -> Result<Option<Artist>>;

    fn update_artist(&self, id: i64, input: &ArtistInput) -> Result<bool>;

    fn delete_artist(&self, id: i64) -> Result<bool>;

    /// Ordered by sorted full name.
    fn list_artists(&self, window: PageWindow) -> Result<Page<Artist>>;

    /// Exact match on all three name parts.
    fn find_artist(&self, input: &ArtistInput) -> Result<Option<i64>>;

    // =========================================================================
    // Songs
    // =========================================================================

    fn create_song(&self, input: &SongInput) -> Result<i64>;

    fn get_song(&self, id: i64) -> Result<Option<Song>>;

    /// The song with album, game, artists, active store and average rating.
    fn get_song_details(&self, id: i64) -> Result<Option<SongDetails>>;

    fn update_song(&self, id: i64, input: &SongInput) -> Result<bool>;

    fn delete_song(&self, id: i64) -> Result<bool>;

    /// Ordered by sorted title.
    fn list_songs(&self, window: PageWindow) -> Result<Page<Song>>;

    /// Links artists to a song, ignoring links that already exist.
    fn add_song_artists(&self, song_id: i64, artist_ids: &[i64]) -> Result<bool>;

    fn remove_song_artists(&self, song_id: i64, artist_ids: &[i64]) -> Result<bool>;

    // =========================================================================
    // Stores
    // =========================================================================

    fn create_store(&self, input: &StoreInput) -> Result<i64>;

    fn get_store(&self, id: i64) -> Result<Option<Store>>;

    fn update_store(&self, id: i64, input: &StoreInput) -> Result<bool>;

    fn delete_store(&self, id: i64) -> Result<bool>;

    fn list_stores(&self, window: PageWindow) -> Result<Page<Store>>;

    fn get_song_stores(&self, song_id: i64) -> Result<Vec<Store>>;

    fn add_song_stores(&self, song_id: i64, store_ids: &[i64]) -> Result<bool>;

    /// Removing the active store also clears the active pointer.
    fn remove_song_stores(&self, song_id: i64, store_ids: &[i64]) -> Result<bool>;

    /// The store must already be linked to the song.
    fn set_active_store(&self, song_id: i64, store_id: i64) -> Result<bool>;

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Enables or disables an entity and propagates the change to linked rows in a
    /// single transaction:
    /// - album/game: all their songs follow;
    /// - artist: songs where it is the only artist follow;
    /// - song: enabling also enables its album, game and artists.
    ///
    /// Returns `Ok(None)` if the entity does not exist.
    fn set_enabled(
        &self,
        entity: CatalogEntity,
        enabled: bool,
        reason: Option<&str>,
    ) -> Result<Option<CascadeOutcome>>;

    /// `None` unpublishes.
    fn set_published(&self, entity: CatalogEntity, date: Option<DateTime<Utc>>) -> Result<bool>;
}
