use crate::catalog::iri::iri_to_path;
use crate::catalog::{SongDetails, SongRef, SongType};
use crate::user::BasicProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a request is in its lifecycle. It only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RequestState {
    Pending,
    Queued,
    Played,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongRequest {
    pub id: i64,
    pub profile_id: Option<i64>,
    pub song_id: Option<i64>,
    pub created: DateTime<Utc>,
    pub queued_at: Option<DateTime<Utc>>,
    pub played_at: Option<DateTime<Utc>>,
}

impl SongRequest {
    pub fn state(&self) -> RequestState {
        match (self.queued_at, self.played_at) {
            (_, Some(_)) => RequestState::Played,
            (Some(_), None) => RequestState::Queued,
            (None, None) => RequestState::Pending,
        }
    }
}

/// What the playback engine needs to play a song.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoutSong {
    pub id: i64,
    pub song_type: SongType,
    pub title: String,
    pub game: Option<String>,
    pub album: Option<String>,
    pub artists: Vec<String>,
    /// Local path for `file://` stores, the IRI otherwise.
    pub path: Option<String>,
    pub length: Option<f64>,
    pub replaygain: String,
}

impl From<&SongDetails> for PlayoutSong {
    fn from(details: &SongDetails) -> Self {
        let path = details.active_store.as_ref().map(|store| {
            iri_to_path(&store.iri)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| store.iri.clone())
        });
        PlayoutSong {
            id: details.song.id,
            song_type: details.song.song_type,
            title: details.song.title.clone(),
            game: details.game.as_ref().map(|g| g.title.clone()),
            album: details.album.as_ref().map(|a| a.title.clone()),
            artists: details.artists.iter().map(|a| a.full_name.clone()).collect(),
            path,
            length: details.length(),
            replaygain: details
                .active_store
                .as_ref()
                .map(|store| store.replaygain())
                .unwrap_or_else(|| "+0.00 dB".to_string()),
        }
    }
}

/// Response of the next-song endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub id: i64,
    pub song: PlayoutSong,
}

/// A played request as listed in the history.
#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub created_date: DateTime<Utc>,
    pub played_at: DateTime<Utc>,
    pub profile: Option<BasicProfile>,
    pub song: Option<SongRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_timestamps() {
        let now = Utc::now();
        let mut request = SongRequest {
            id: 1,
            profile_id: Some(1),
            song_id: Some(1),
            created: now,
            queued_at: None,
            played_at: None,
        };
        assert_eq!(request.state(), RequestState::Pending);
        request.queued_at = Some(now);
        assert_eq!(request.state(), RequestState::Queued);
        request.played_at = Some(now);
        assert_eq!(request.state(), RequestState::Played);
    }
}
