//! When a song may be played or requested again.
//!
//! A played song waits a share of the total playlist length before it can be
//! requested again. The share is the `replay_ratio` setting, nudged by the
//! song's average rating once it has enough ratings: well rated songs come
//! back sooner, badly rated ones later. Nothing here touches the database;
//! callers load a [`SongStanding`] and the playlist length first.

use super::settings::RadioSettings;
use crate::catalog::{Publishable, SongType};
use chrono::{DateTime, Duration, Utc};

/// Rounds up to two decimal places. Values already on a cent boundary are
/// kept as they are despite float noise.
pub fn ceil2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = scaled.round();
    if (scaled - rounded).abs() < 1e-9 {
        rounded / 100.0
    } else {
        scaled.ceil() / 100.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CooldownPolicy {
    pub replay_ratio: f64,
    pub min_ratings_for_variance: i64,
    pub rating_variance_ratio: f64,
}

impl From<&RadioSettings> for CooldownPolicy {
    fn from(settings: &RadioSettings) -> Self {
        CooldownPolicy {
            replay_ratio: settings.replay_ratio,
            min_ratings_for_variance: settings.min_ratings_for_variance,
            rating_variance_ratio: settings.rating_variance_ratio,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatingSummary {
    pub count: i64,
    /// Plain mean of the rating values.
    pub average: Option<f64>,
}

/// What eligibility needs to know about one song.
#[derive(Clone, Debug, PartialEq)]
pub struct SongStanding {
    pub song_id: i64,
    pub song_type: SongType,
    pub disabled: bool,
    pub publishing: Publishable,
    pub last_played: Option<DateTime<Utc>>,
    pub ratings: RatingSummary,
    /// Whether the song sits in a pending request.
    pub pending: bool,
}

impl SongStanding {
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        !self.disabled && self.publishing.is_published(now)
    }
}

/// Seconds to wait for a playlist of `playlist_length` seconds, never negative.
pub fn wait_total(playlist_length: f64, ratio: f64) -> f64 {
    ceil2((playlist_length * ratio).max(0.0))
}

/// Ratio correction from ratings, zero below the rating threshold.
/// A 1-star average adds half the variance ratio, a 5-star average removes it.
pub fn rating_adjustment(policy: &CooldownPolicy, ratings: &RatingSummary) -> f64 {
    match ratings.average {
        Some(average) if ratings.count >= policy.min_ratings_for_variance => {
            let average = ceil2(average);
            -((average - 1.0) / 4.0) * policy.rating_variance_ratio
                + 0.5 * policy.rating_variance_ratio
        }
        _ => 0.0,
    }
}

fn seconds(value: f64) -> Duration {
    Duration::milliseconds((value * 1000.0).round() as i64)
}

/// Eligibility of songs at one instant.
#[derive(Clone, Copy, Debug)]
pub struct Cooldown {
    pub policy: CooldownPolicy,
    pub playlist_length: f64,
    pub now: DateTime<Utc>,
}

impl Cooldown {
    pub fn new(policy: CooldownPolicy, playlist_length: f64, now: DateTime<Utc>) -> Self {
        Cooldown {
            policy,
            playlist_length,
            now,
        }
    }

    /// Wait in seconds for a song with the given ratings.
    pub fn wait_for(&self, ratings: &RatingSummary) -> f64 {
        let adjustment = rating_adjustment(&self.policy, ratings);
        wait_total(self.playlist_length, self.policy.replay_ratio + adjustment)
    }

    /// When the song may be requested again counting from `last_play`, or from
    /// its last play when `None` is given. A song never played is requestable
    /// now. Jingles and unavailable songs have no such date.
    pub fn date_when_requestable(
        &self,
        standing: &SongStanding,
        last_play: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        if standing.song_type != SongType::Song || !standing.is_available(self.now) {
            return None;
        }
        match last_play.or(standing.last_played) {
            Some(last) => Some(last + seconds(self.wait_for(&standing.ratings))),
            None => Some(self.now),
        }
    }

    pub fn is_playable(&self, standing: &SongStanding) -> bool {
        matches!(self.date_when_requestable(standing, None), Some(date) if date <= self.now)
    }

    pub fn is_requestable(&self, standing: &SongStanding) -> bool {
        self.is_playable(standing) && !standing.pending
    }
}
