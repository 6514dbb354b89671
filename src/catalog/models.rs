use super::behaviors::{Disableable, Publishable, Timestamps};
use super::naturalize::artist_full_name;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SongType {
    #[serde(rename = "S")]
    Song,
    #[serde(rename = "J")]
    Jingle,
}

impl SongType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            SongType::Song => "S",
            SongType::Jingle => "J",
        }
    }
}

impl FromStr for SongType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S" => Ok(SongType::Song),
            "J" => Ok(SongType::Jingle),
            _ => bail!("Unknown song type {}", s),
        }
    }
}

/// Albums and games carry the same data, a unique title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitledKind {
    Album,
    Game,
}

impl TitledKind {
    pub fn table(&self) -> &'static str {
        match self {
            TitledKind::Album => "album",
            TitledKind::Game => "game",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TitledKind::Album => "Album",
            TitledKind::Game => "Game",
        }
    }

    /// Column on `song` referencing this kind.
    pub fn song_column(&self) -> &'static str {
        match self {
            TitledKind::Album => "album_id",
            TitledKind::Game => "game_id",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TitledEntity {
    pub id: i64,
    pub title: String,
    pub sorted_title: String,
    #[serde(flatten)]
    pub status: Disableable,
    #[serde(flatten)]
    pub publishing: Publishable,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

pub type Album = TitledEntity;
pub type Game = TitledEntity;

#[derive(Clone, Debug, Serialize)]
pub struct Artist {
    pub id: i64,
    pub alias: String,
    pub first_name: String,
    pub last_name: String,
    pub sorted_full_name: String,
    #[serde(flatten)]
    pub status: Disableable,
    #[serde(flatten)]
    pub publishing: Publishable,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Artist {
    pub fn full_name(&self) -> String {
        artist_full_name(&self.alias, &self.first_name, &self.last_name)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Store {
    pub id: i64,
    pub iri: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub length: Option<f64>,
    pub track_gain: Option<f64>,
    pub track_peak: Option<f64>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Store {
    /// Gain formatted for playback engines, always signed.
    pub fn replaygain(&self) -> String {
        match self.track_gain {
            None => "+0.00 dB".to_string(),
            Some(gain) if gain > 0.0 => format!("+{:.2} dB", gain),
            Some(gain) => format!("{:.2} dB", gain),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Song {
    pub id: i64,
    pub song_type: SongType,
    pub title: String,
    pub sorted_title: String,
    pub album_id: Option<i64>,
    pub game_id: Option<i64>,
    pub num_played: i64,
    pub last_played: Option<DateTime<Utc>>,
    pub next_play: Option<DateTime<Utc>>,
    pub active_store_id: Option<i64>,
    #[serde(flatten)]
    pub status: Disableable,
    #[serde(flatten)]
    pub publishing: Publishable,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TitledRef {
    pub id: i64,
    pub title: String,
}

/// Minimal song reference embedded in listings of other entities.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SongRef {
    pub id: i64,
    pub song_type: SongType,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ArtistRef {
    pub id: i64,
    pub full_name: String,
    pub disabled: bool,
}

/// A song with its linked rows resolved.
#[derive(Clone, Debug, Serialize)]
pub struct SongDetails {
    #[serde(flatten)]
    pub song: Song,
    pub album: Option<TitledRef>,
    pub game: Option<TitledRef>,
    pub artists: Vec<ArtistRef>,
    pub active_store: Option<Store>,
    pub average_rating: Option<f64>,
}

impl SongDetails {
    /// `Game - Title [Artist, Artist]` for songs, the bare title for jingles.
    pub fn full_title(&self) -> String {
        if self.song.song_type == SongType::Jingle {
            return self.song.title.clone();
        }
        let artists = self
            .artists
            .iter()
            .filter(|a| !a.disabled)
            .map(|a| a.full_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let game = self.game.as_ref().map(|g| g.title.as_str()).unwrap_or("");
        format!("{} - {} [{}]", game, self.song.title, artists)
    }

    pub fn length(&self) -> Option<f64> {
        self.active_store.as_ref().and_then(|s| s.length)
    }
}

/// Entities with enabled/published state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogEntity {
    Album(i64),
    Artist(i64),
    Game(i64),
    Song(i64),
}

impl CatalogEntity {
    pub fn table(&self) -> &'static str {
        match self {
            CatalogEntity::Album(_) => "album",
            CatalogEntity::Artist(_) => "artist",
            CatalogEntity::Game(_) => "game",
            CatalogEntity::Song(_) => "song",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            CatalogEntity::Album(id)
            | CatalogEntity::Artist(id)
            | CatalogEntity::Game(id)
            | CatalogEntity::Song(id) => *id,
        }
    }

    pub fn from_kind(kind: TitledKind, id: i64) -> Self {
        match kind {
            TitledKind::Album => CatalogEntity::Album(id),
            TitledKind::Game => CatalogEntity::Game(id),
        }
    }
}

impl FromStr for CatalogEntity {
    type Err = anyhow::Error;

    /// Parses `kind:id`, e.g. `album:3`.
    fn from_str(s: &str) -> Result<Self> {
        let Some((kind, id)) = s.split_once(':') else {
            bail!("Expected <kind>:<id>, got {}", s);
        };
        let id: i64 = id.parse()?;
        match kind {
            "album" => Ok(CatalogEntity::Album(id)),
            "artist" => Ok(CatalogEntity::Artist(id)),
            "game" => Ok(CatalogEntity::Game(id)),
            "song" => Ok(CatalogEntity::Song(id)),
            _ => bail!("Unknown catalog kind {}", kind),
        }
    }
}

/// What `set_enabled` changed besides the target itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    pub songs: usize,
    pub albums: usize,
    pub artists: usize,
    pub games: usize,
}

// =========================================================================
// Inputs
// =========================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct TitledInput {
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArtistInput {
    pub alias: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SongInput {
    pub song_type: SongType,
    pub title: String,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub game_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct StoreInput {
    pub iri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub track_gain: Option<f64>,
    #[serde(default)]
    pub track_peak: Option<f64>,
}
