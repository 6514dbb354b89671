use super::eligibility::SongStanding;
use super::song_request::{HistoryEntry, SongRequest};
use crate::catalog::SongType;
use crate::store::{Page, PageWindow};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub trait RequestStore: Send + Sync {
    /// Adds a pending request.
    fn create_request(&self, profile_id: Option<i64>, song_id: i64) -> Result<SongRequest>;

    fn get_request(&self, request_id: i64) -> Result<Option<SongRequest>>;

    /// The pending request created first, skipping requests whose song was deleted.
    fn oldest_pending_request(&self) -> Result<Option<SongRequest>>;

    fn count_pending_requests(&self, profile_id: i64) -> Result<usize>;

    /// Song types of the last `limit` played requests, newest first.
    /// `None` stands for a request whose song was deleted.
    fn recent_played_song_types(&self, limit: usize) -> Result<Vec<Option<SongType>>>;

    /// Moves a pending request to queued and stores the song's next eligible
    /// time when given. Returns false if the request was not pending.
    fn mark_queued(
        &self,
        request_id: i64,
        at: DateTime<Utc>,
        next_play: Option<DateTime<Utc>>,
    ) -> Result<bool>;

    /// Moves a queued request to played, bumping the song's play count and
    /// last play time. Returns false if the request was not queued.
    fn mark_played(&self, request_id: i64, at: DateTime<Utc>) -> Result<bool>;

    /// Played requests, most recent first.
    fn list_played_requests(&self, window: PageWindow) -> Result<Page<HistoryEntry>>;

    /// Seconds of audio across available songs (jingles excluded).
    fn playlist_length(&self, now: DateTime<Utc>) -> Result<f64>;

    fn song_standing(&self, song_id: i64) -> Result<Option<SongStanding>>;

    /// Standings of every available song of type `S`.
    fn available_song_standings(&self, now: DateTime<Utc>) -> Result<Vec<SongStanding>>;

    fn available_jingle_ids(&self, now: DateTime<Utc>) -> Result<Vec<i64>>;
}
