//! Client side of the playback loop: asks the API for the next song and
//! reports plays back, formatting songs as Liquidsoap `annotate:` URIs.

mod client;

pub use client::{DjClient, DjError};

use crate::catalog::SongType;
use crate::radio::QueuedRequest;

/// Escapes double quotes for the Liquidsoap parser.
pub fn clean_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// "A & B" for two artists, a comma-separated listing otherwise.
pub fn join_artists(artists: &[String]) -> String {
    let separator = if artists.len() == 2 { " & " } else { ", " };
    artists.join(separator)
}

pub fn beautify_artists(artists: &[String]) -> String {
    clean_quotes(&join_artists(artists))
}

pub fn annotate(queued: &QueuedRequest, radio_name: &str) -> String {
    let song = &queued.song;
    let (artist, title, game) = match song.song_type {
        SongType::Jingle => (
            radio_name.to_string(),
            "Jingle".to_string(),
            radio_name.to_string(),
        ),
        SongType::Song => (
            beautify_artists(&song.artists),
            clean_quotes(&song.title),
            clean_quotes(song.game.as_deref().unwrap_or_default()),
        ),
    };
    format!(
        "annotate:req_id=\"{}\",type=\"{}\",artist=\"{}\",title=\"{}\",game=\"{}\":{}",
        queued.id,
        song.song_type.as_db_str(),
        artist,
        title,
        game,
        song.path.as_deref().unwrap_or_default()
    )
}
