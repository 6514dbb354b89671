//! File inspection and JSON helpers shared by the playlist and S3 tools.

use super::models::Playlist;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// NFC normalization, so composed and decomposed spellings compare equal.
pub fn scrub(text: &str) -> String {
    text.nfc().collect()
}

pub fn scrub_opt(text: Option<String>) -> Option<String> {
    text.map(|t| scrub(&t))
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "wav" => "audio/x-wav",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "wma" => "audio/x-ms-wma",
        "mid" | "midi" => "audio/midi",
        _ => return None,
    };
    Some(mime)
}

/// Sniffs the magic bytes first, the extension decides when they are inconclusive.
pub fn detect_mime(path: &Path) -> Result<Option<String>> {
    let sniffed = infer::get_from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(match sniffed {
        Some(kind) if kind.mime_type() != "application/octet-stream" => {
            Some(kind.mime_type().to_string())
        }
        _ => mime_from_extension(path).map(str::to_string),
    })
}

/// Hex SHA-256 of the file contents.
pub fn file_hash(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Pretty JSON with sorted keys and 4-space indentation.
pub fn to_sorted_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    // serde_json::Map is ordered by key without the preserve_order feature.
    let value = serde_json::to_value(value)?;
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

pub fn write_playlist(path: &Path, playlist: &Playlist) -> Result<()> {
    let bytes = to_sorted_json(playlist)?;
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&bytes)?;
    Ok(())
}

pub fn read_playlist(path: &Path) -> Result<Playlist> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse playlist {}", path.display()))
}
