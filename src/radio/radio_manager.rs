//! Request admission and the next-song protocol.

use super::eligibility::{Cooldown, CooldownPolicy, SongStanding};
use super::settings::RadioSettings;
use super::song_request::{HistoryEntry, PlayoutSong, QueuedRequest, RequestState, SongRequest};
use crate::catalog::SongType;
use crate::store::{Page, PageWindow, RadioStore};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const REQUESTABLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Error)]
pub enum MakeRequestError {
    #[error("Song not found.")]
    SongNotFound,

    #[error("User is currently disabled.")]
    ProfileDisabled,

    #[error("User has reached the maximum request limit ({0}).")]
    LimitReached(i64),

    #[error("Users cannot request a jingle.")]
    JingleRequested,

    #[error("Song not available at this time.")]
    NotAvailable,

    #[error("Song is already in request queue.")]
    AlreadyQueued,

    #[error(
        "Song has been played recently and cannot be requested again until {}",
        .0.format(REQUESTABLE_DATE_FORMAT)
    )]
    PlayedRecently(DateTime<Utc>),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum NextRequestError {
    #[error("No jingles are available.")]
    NoJingles,

    #[error("No songs are available.")]
    NoSongs,

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum PlayedError {
    #[error("Song request {0} not found.")]
    NotFound(i64),

    #[error("Song request {0} has not been queued.")]
    NotQueued(i64),

    #[error("Song request {0} has already been played.")]
    AlreadyPlayed(i64),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Who is asking for a song.
#[derive(Clone, Copy, Debug)]
pub struct Requester {
    pub profile_id: i64,
    /// Staff skip the request limit, the jingle ban and the cooldown.
    pub bypass_limits: bool,
}

pub struct RadioManager {
    store: Arc<dyn RadioStore>,
}

impl RadioManager {
    pub fn new(store: Arc<dyn RadioStore>) -> Self {
        Self { store }
    }

    pub fn settings(&self) -> anyhow::Result<RadioSettings> {
        self.store.radio_settings()
    }

    fn cooldown(&self, settings: &RadioSettings, now: DateTime<Utc>) -> anyhow::Result<Cooldown> {
        let playlist_length = self.store.playlist_length(now)?;
        Ok(Cooldown::new(
            CooldownPolicy::from(settings),
            playlist_length,
            now,
        ))
    }

    pub fn make_request(
        &self,
        requester: &Requester,
        song_id: i64,
    ) -> Result<SongRequest, MakeRequestError> {
        let standing = self
            .store
            .song_standing(song_id)?
            .ok_or(MakeRequestError::SongNotFound)?;
        let profile = self
            .store
            .get_profile(requester.profile_id)?
            .with_context(|| format!("Profile {} not found", requester.profile_id))?;

        if profile.profile.status.disabled {
            return Err(MakeRequestError::ProfileDisabled);
        }

        let settings = self.settings()?;
        if !requester.bypass_limits {
            let pending = self.store.count_pending_requests(requester.profile_id)?;
            if pending as i64 >= settings.max_song_requests {
                return Err(MakeRequestError::LimitReached(settings.max_song_requests));
            }
        }

        if !requester.bypass_limits {
            match standing.song_type {
                SongType::Jingle => return Err(MakeRequestError::JingleRequested),
                SongType::Song => {
                    let cooldown = self.cooldown(&settings, Utc::now())?;
                    if !cooldown.is_requestable(&standing) {
                        return Err(Self::rejection(&cooldown, &standing));
                    }
                }
            }
        }

        let request = self
            .store
            .create_request(Some(requester.profile_id), song_id)?;
        info!(
            "Profile {} requested song {} (request {})",
            requester.profile_id, song_id, request.id
        );
        Ok(request)
    }

    fn rejection(cooldown: &Cooldown, standing: &SongStanding) -> MakeRequestError {
        if !standing.is_available(cooldown.now) {
            return MakeRequestError::NotAvailable;
        }
        if cooldown.is_playable(standing) {
            return MakeRequestError::AlreadyQueued;
        }
        match cooldown.date_when_requestable(standing, None) {
            Some(date) => MakeRequestError::PlayedRecently(date),
            None => MakeRequestError::NotAvailable,
        }
    }

    /// Picks the next request to play and marks it queued.
    ///
    /// A jingle goes first whenever none of the last `songs_per_jingle` played
    /// requests was one. Otherwise the oldest pending request wins, and with an
    /// empty queue a random requestable song is picked, or any available song
    /// when every song is cooling down.
    pub fn next_request(
        &self,
        dj_profile_id: Option<i64>,
    ) -> Result<QueuedRequest, NextRequestError> {
        let settings = self.settings()?;
        let now = Utc::now();
        let mut rng = rand::rng();

        let recent = self
            .store
            .recent_played_song_types(settings.songs_per_jingle.max(0) as usize)?;
        let jingle_due = !recent.contains(&Some(SongType::Jingle));

        let request = if jingle_due {
            let jingles = self.store.available_jingle_ids(now)?;
            let jingle_id = *jingles.choose(&mut rng).ok_or(NextRequestError::NoJingles)?;
            debug!("Jingle due, picked {}", jingle_id);
            self.store.create_request(dj_profile_id, jingle_id)?
        } else if let Some(pending) = self.store.oldest_pending_request()? {
            pending
        } else {
            let cooldown = self.cooldown(&settings, now)?;
            let standings = self.store.available_song_standings(now)?;
            let requestable = standings
                .iter()
                .filter(|s| cooldown.is_requestable(s))
                .collect::<Vec<_>>();
            let song_id = match requestable.choose(&mut rng) {
                Some(standing) => standing.song_id,
                None => {
                    debug!("No requestable song, falling back to any available one");
                    standings
                        .choose(&mut rng)
                        .map(|s| s.song_id)
                        .ok_or(NextRequestError::NoSongs)?
                }
            };
            self.store.create_request(dj_profile_id, song_id)?
        };

        let song_id = request
            .song_id
            .ok_or_else(|| anyhow!("Song request {} has no song", request.id))?;
        let queued_at = Utc::now();
        let next_play = match self.store.song_standing(song_id)? {
            Some(standing) if standing.song_type == SongType::Song => self
                .cooldown(&settings, queued_at)?
                .date_when_requestable(&standing, Some(queued_at)),
            _ => None,
        };
        if !self.store.mark_queued(request.id, queued_at, next_play)? {
            return Err(anyhow!("Song request {} was no longer pending", request.id).into());
        }

        let details = self
            .store
            .get_song_details(song_id)?
            .with_context(|| format!("Song {} not found", song_id))?;
        info!("Queued request {}: {}", request.id, details.full_title());
        Ok(QueuedRequest {
            id: request.id,
            song: PlayoutSong::from(&details),
        })
    }

    /// Marks a queued request as played.
    pub fn just_played(&self, request_id: i64) -> Result<SongRequest, PlayedError> {
        let request = self
            .store
            .get_request(request_id)?
            .ok_or(PlayedError::NotFound(request_id))?;
        match request.state() {
            RequestState::Pending => return Err(PlayedError::NotQueued(request_id)),
            RequestState::Played => return Err(PlayedError::AlreadyPlayed(request_id)),
            RequestState::Queued => {}
        }
        if !self.store.mark_played(request_id, Utc::now())? {
            return Err(PlayedError::AlreadyPlayed(request_id));
        }
        info!("Request {} played", request_id);
        self.store
            .get_request(request_id)?
            .ok_or(PlayedError::NotFound(request_id))
    }

    pub fn history(&self, window: PageWindow) -> anyhow::Result<Page<HistoryEntry>> {
        self.store.list_played_requests(window)
    }
}
