//! Reads a legacy playlist database into a [`Playlist`].

use super::media::{detect_mime, file_hash, scrub, scrub_opt};
use super::models::{
    Playlist, PlaylistArtist, PlaylistSong, PlaylistSongArtist, PlaylistStore, PlaylistTitled,
    PlaylistTotals,
};
use crate::catalog::SongType;
use anyhow::{bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

const SONGS_QUERY: &str = "SELECT
        songs.songs_id,
        games.title,
        albums.title,
        songs.enabled,
        songs.type,
        songs.title,
        songs.length,
        songs.path
    FROM songs
    LEFT JOIN games ON (songs.game = games.games_id)
    LEFT JOIN albums ON (songs.album = albums.albums_id)";

const SONG_ARTISTS_QUERY: &str = "SELECT
        ifnull(alias, ''),
        ifnull(firstname, ''),
        ifnull(lastname, '')
    FROM artists
    WHERE artists_id IN (
        SELECT artists_artists_id FROM songs_have_artists WHERE songs_songs_id = ?1
    )";

/// Legacy columns hold numbers as INTEGER, REAL or decimal TEXT.
fn number_at(row: &Row, idx: usize) -> Result<Option<f64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(t) => std::str::from_utf8(t)?.trim().parse::<f64>().ok(),
        ValueRef::Blob(_) => None,
    })
}

fn disabled_at(row: &Row, idx: usize) -> Result<bool> {
    Ok(number_at(row, idx)?.map(|v| v == 0.0).unwrap_or(true))
}

fn text_at(row: &Row, idx: usize) -> Result<Option<String>> {
    Ok(scrub_opt(row.get::<_, Option<String>>(idx)?))
}

fn read_titled(conn: &Connection, table: &str) -> Result<Vec<PlaylistTitled>> {
    let mut stmt = conn.prepare(&format!("SELECT title, enabled FROM {}", table))?;
    let mut rows = stmt.query([])?;
    let mut titled = Vec::new();
    while let Some(row) = rows.next()? {
        titled.push(PlaylistTitled {
            title: text_at(row, 0)?.unwrap_or_default(),
            disabled: disabled_at(row, 1)?,
        });
    }
    Ok(titled)
}

fn read_artists(conn: &Connection) -> Result<Vec<PlaylistArtist>> {
    let mut stmt = conn.prepare("SELECT alias, firstname, lastname, enabled FROM artists")?;
    let mut rows = stmt.query([])?;
    let mut artists = Vec::new();
    while let Some(row) = rows.next()? {
        artists.push(PlaylistArtist {
            alias: text_at(row, 0)?.unwrap_or_default(),
            first_name: text_at(row, 1)?.unwrap_or_default(),
            last_name: text_at(row, 2)?.unwrap_or_default(),
            disabled: disabled_at(row, 3)?,
        });
    }
    Ok(artists)
}

fn read_song_artists(conn: &Connection, song_id: i64) -> Result<Vec<PlaylistSongArtist>> {
    let mut stmt = conn.prepare_cached(SONG_ARTISTS_QUERY)?;
    let mut rows = stmt.query(params![song_id])?;
    let mut artists = Vec::new();
    while let Some(row) = rows.next()? {
        artists.push(PlaylistSongArtist {
            alias: scrub(&row.get::<_, String>(0)?),
            first_name: scrub(&row.get::<_, String>(1)?),
            last_name: scrub(&row.get::<_, String>(2)?),
        });
    }
    Ok(artists)
}

/// Describes the file behind a song. A missing file keeps only the legacy data.
fn inspect_store(path: String, length: Option<f64>) -> PlaylistStore {
    let file = Path::new(&path);
    let mut store = PlaylistStore {
        path: path.clone(),
        length,
        ..Default::default()
    };
    match std::fs::metadata(file) {
        Ok(meta) => store.filesize = Some(meta.len()),
        Err(err) => {
            warn!("Cannot stat {}: {}", path, err);
            return store;
        }
    }
    match detect_mime(file) {
        Ok(mime) => store.mime = mime,
        Err(err) => warn!("Cannot detect mime type of {}: {:#}", path, err),
    }
    match file_hash(file) {
        Ok(hash) => store.filehash = Some(hash),
        Err(err) => warn!("Cannot hash {}: {:#}", path, err),
    }
    store
}

fn read_songs(conn: &Connection, totals: &mut PlaylistTotals) -> Result<Vec<PlaylistSong>> {
    let mut stmt = conn.prepare(SONGS_QUERY)?;
    let mut rows = stmt.query([])?;
    let mut songs = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let type_text: String = row.get(4)?;
        let song_type = SongType::from_str(type_text.trim())
            .with_context(|| format!("Legacy song {} has an unknown type", id))?;
        let Some(path) = text_at(row, 7)? else {
            bail!("Legacy song {} has no path", id);
        };
        debug!("Exporting song {} ({})", id, path);

        songs.push(PlaylistSong {
            album: text_at(row, 2)?,
            artists: read_song_artists(conn, id)?,
            game: text_at(row, 1)?,
            disabled: disabled_at(row, 3)?,
            song_type,
            title: text_at(row, 5)?.unwrap_or_default(),
            store: inspect_store(path, number_at(row, 6)?),
        });
        totals.count_song(song_type);
    }
    Ok(songs)
}

/// Reads every album, artist, game and song of a legacy database.
pub fn export_legacy(db_path: &Path) -> Result<(Playlist, PlaylistTotals)> {
    if !db_path.is_file() {
        bail!("Legacy database not found: {}", db_path.display());
    }
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let mut totals = PlaylistTotals::default();
    let albums = read_titled(&conn, "albums")?;
    totals.albums = albums.len();
    let artists = read_artists(&conn)?;
    totals.artists = artists.len();
    let games = read_titled(&conn, "games")?;
    totals.games = games.len();
    let songs = read_songs(&conn, &mut totals)?;

    Ok((
        Playlist {
            albums,
            artists,
            games,
            songs,
        },
        totals,
    ))
}
