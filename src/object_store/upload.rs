use super::s3::S3Client;
use crate::catalog::SongType;
use crate::dj::join_artists;
use crate::playlist::media::file_hash;
use crate::playlist::{Playlist, PlaylistSong};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{error, info};
use unicode_normalization::UnicodeNormalization;

/// NFKC, then anything outside ASCII spelled as a backslash escape.
pub fn asciify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkc() {
        let code = c as u32;
        match code {
            0..=0x7f => out.push(c),
            0x80..=0xff => out.push_str(&format!("\\x{:02x}", code)),
            0x100..=0xffff => out.push_str(&format!("\\u{:04x}", code)),
            _ => out.push_str(&format!("\\U{:08x}", code)),
        }
    }
    out
}

/// Whole numbers keep one decimal, like "9.0".
fn length_text(length: Option<f64>) -> String {
    match length {
        Some(value) if value.fract() == 0.0 => format!("{:.1}", value),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

pub fn object_key(song: &PlaylistSong, filehash: &str) -> String {
    let prefix = match song.song_type {
        SongType::Song => "songs",
        SongType::Jingle => "jingles",
    };
    let ext = Path::new(&song.store.path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}/{}{}", prefix, filehash, ext)
}

pub fn object_metadata(song: &PlaylistSong, radio_name: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    match song.song_type {
        SongType::Song => {
            let names = song
                .artists
                .iter()
                .map(|a| a.full_name())
                .collect::<Vec<_>>();
            metadata.insert(
                "album".to_string(),
                asciify(song.album.as_deref().unwrap_or_default()),
            );
            metadata.insert("artists".to_string(), asciify(&join_artists(&names)));
            metadata.insert(
                "game".to_string(),
                asciify(song.game.as_deref().unwrap_or_default()),
            );
        }
        SongType::Jingle => {
            metadata.insert("artists".to_string(), asciify(radio_name));
        }
    }
    metadata.insert("title".to_string(), asciify(&song.title));
    metadata.insert("length".to_string(), length_text(song.store.length));
    metadata.insert("original-path".to_string(), asciify(&song.store.path));
    metadata
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadTotals {
    pub success: usize,
    pub fail: usize,
}

impl fmt::Display for UploadTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Uploads complete -- {} successful, {} failures",
            self.success, self.fail
        )
    }
}

/// Returns the new `s3://` path of the song.
async fn upload_song(
    client: &S3Client,
    bucket: &str,
    song: &PlaylistSong,
    radio_name: &str,
) -> Result<String> {
    let path = Path::new(&song.store.path);
    let filehash = match &song.store.filehash {
        Some(hash) => hash.clone(),
        None => file_hash(path)?,
    };
    let key = object_key(song, &filehash);
    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    client
        .put_object(
            bucket,
            &key,
            body,
            song.store.mime.as_deref(),
            &object_metadata(song, radio_name),
        )
        .await?;
    Ok(format!("s3://{}/{}", bucket, key))
}

/// Uploads every song file and rewrites the store paths of the successful ones.
pub async fn upload_playlist(
    client: &S3Client,
    bucket: &str,
    playlist: &mut Playlist,
    radio_name: &str,
) -> UploadTotals {
    let mut totals = UploadTotals::default();
    let progress = ProgressBar::new(playlist.songs.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        progress.set_style(style);
    }

    for song in playlist.songs.iter_mut() {
        let old_path = song.store.path.clone();
        progress.set_message(old_path.clone());
        info!("Begin upload of: {}", old_path);

        match upload_song(client, bucket, song, radio_name).await {
            Ok(new_path) => {
                info!("Successful upload of: {} to {}", old_path, new_path);
                song.store.path = new_path;
                totals.success += 1;
            }
            Err(err) => {
                error!("Upload failed for: {} -- {:#}", old_path, err);
                totals.fail += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!("{}", totals);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::{PlaylistSongArtist, PlaylistStore};

    fn song(song_type: SongType) -> PlaylistSong {
        PlaylistSong {
            album: Some("Ōkami Original Soundtrack".to_string()),
            artists: vec![
                PlaylistSongArtist {
                    first_name: "Masami".to_string(),
                    last_name: "Ueda".to_string(),
                    ..Default::default()
                },
                PlaylistSongArtist {
                    alias: "Rei".to_string(),
                    ..Default::default()
                },
            ],
            game: Some("Ōkami".to_string()),
            disabled: false,
            song_type,
            title: "The Sun Rises".to_string(),
            store: PlaylistStore {
                path: "/srv/music/sun.ogg".to_string(),
                mime: Some("audio/ogg".to_string()),
                filesize: Some(10),
                length: Some(200.0),
                filehash: Some("abc123".to_string()),
            },
        }
    }

    #[test]
    fn asciify_escapes_like_backslashreplace() {
        assert_eq!(asciify("plain"), "plain");
        assert_eq!(asciify("Pokémon"), "Pok\\xe9mon");
        assert_eq!(asciify("Ōkami"), "\\u014ckami");
        assert_eq!(asciify("🎵"), "\\U0001f3b5");
        // NFKC folds compatibility characters first.
        assert_eq!(asciify("ﬁne"), "fine");
    }

    #[test]
    fn keys_use_hash_and_extension() {
        assert_eq!(object_key(&song(SongType::Song), "abc123"), "songs/abc123.ogg");
        let mut jingle = song(SongType::Jingle);
        jingle.store.path = "/srv/jingles/id".to_string();
        assert_eq!(object_key(&jingle, "ff"), "jingles/ff");
    }

    #[test]
    fn song_metadata() {
        let metadata = object_metadata(&song(SongType::Song), "Save Point Radio");
        assert_eq!(metadata["artists"], "Masami Ueda & Rei");
        assert_eq!(metadata["game"], "\\u014ckami");
        assert_eq!(metadata["length"], "200.0");
        assert_eq!(metadata["original-path"], "/srv/music/sun.ogg");
        assert_eq!(metadata.len(), 6);
    }

    #[test]
    fn jingle_metadata_names_the_radio() {
        let metadata = object_metadata(&song(SongType::Jingle), "Save Point Radio");
        assert_eq!(metadata["artists"], "Save Point Radio");
        assert!(!metadata.contains_key("album"));
        assert_eq!(metadata.len(), 4);
    }

    #[test]
    fn summary_line() {
        let totals = UploadTotals {
            success: 3,
            fail: 1,
        };
        assert_eq!(
            totals.to_string(),
            "Uploads complete -- 3 successful, 1 failures"
        );
    }
}
