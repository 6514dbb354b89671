use crate::catalog::{artist_full_name, ArtistInput, SongType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The JSON document written by `cli-playlist export` and read by `import`
/// and `cli-s3 upload`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub albums: Vec<PlaylistTitled>,
    #[serde(default)]
    pub artists: Vec<PlaylistArtist>,
    #[serde(default)]
    pub games: Vec<PlaylistTitled>,
    #[serde(default)]
    pub songs: Vec<PlaylistSong>,
}

/// An album or a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTitled {
    pub title: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistArtist {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Artists referenced from a song carry only their names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSongArtist {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl PlaylistSongArtist {
    pub fn full_name(&self) -> String {
        artist_full_name(&self.alias, &self.first_name, &self.last_name)
    }

    pub fn as_input(&self) -> ArtistInput {
        ArtistInput {
            alias: self.alias.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistStore {
    pub path: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub filehash: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSong {
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub artists: Vec<PlaylistSongArtist>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(rename = "type")]
    pub song_type: SongType,
    pub title: String,
    pub store: PlaylistStore,
}

/// Per-kind counters printed by export and import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaylistTotals {
    pub albums: usize,
    pub artists: usize,
    pub games: usize,
    pub songs: usize,
    pub jingles: usize,
}

impl PlaylistTotals {
    pub fn count_song(&mut self, song_type: SongType) {
        match song_type {
            SongType::Song => self.songs += 1,
            SongType::Jingle => self.jingles += 1,
        }
    }

    /// One line per kind, prefixed with the action ("Exported", "Imported").
    pub fn report(&self, action: &str) -> Vec<String> {
        vec![
            format!("{} {} albums", action, self.albums),
            format!("{} {} artists", action, self.artists),
            format!("{} {} games", action, self.games),
            format!(
                "{} {} requestables ({} songs, {} jingles)",
                action,
                self.songs + self.jingles,
                self.songs,
                self.jingles
            ),
        ]
    }
}

impl fmt::Display for PlaylistTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report("Processed").join("\n"))
    }
}
