//! Test fixture creation for the radio database

use super::constants::*;
use anyhow::{ensure, Result};
use chrono::{Duration, Utc};
use savepoint_radio::catalog::{
    ArtistInput, CatalogEntity, CatalogStore, SongInput, SongType, StoreInput, TitledInput,
    TitledKind,
};
use savepoint_radio::store::SqliteRadioStore;
use savepoint_radio::user::{NewUser, UserManager};
use std::sync::Arc;
use tempfile::TempDir;

fn add_user(
    manager: &UserManager,
    handle: &str,
    password: &str,
    is_staff: bool,
    is_dj: bool,
) -> Result<i64> {
    let id = manager.add_user(&NewUser {
        handle: handle.to_string(),
        name: String::new(),
        email: format!("{}@example.com", handle),
        is_staff,
        is_dj,
    })?;
    manager.set_password(handle, password)?;
    Ok(id)
}

fn add_song(
    store: &SqliteRadioStore,
    song_type: SongType,
    title: &str,
    game_id: Option<i64>,
    album_id: Option<i64>,
    artists: &[i64],
) -> Result<i64> {
    let song_id = store.create_song(&SongInput {
        song_type,
        title: title.to_string(),
        album_id,
        game_id,
    })?;
    if !artists.is_empty() {
        store.add_song_artists(song_id, artists)?;
    }
    let store_id = store.create_store(&StoreInput {
        iri: format!("file:///srv/radio/{}.ogg", song_id),
        mime_type: Some("audio/ogg".to_string()),
        file_size: Some(4_000_000),
        length: Some(SONG_LENGTH_SEC),
        ..Default::default()
    })?;
    store.add_song_stores(song_id, &[store_id])?;
    store.set_active_store(song_id, store_id)?;
    Ok(song_id)
}

/// Creates a temporary radio database with four users (listener, second
/// listener, staff, DJ) and a published catalog of two songs and one jingle.
/// Returns (temp_dir, store)
pub fn create_test_store() -> Result<(TempDir, SqliteRadioStore)> {
    let dir = TempDir::new()?;
    let store = SqliteRadioStore::new(dir.path().join("radio.db"))?;

    let manager = UserManager::new(Arc::new(store.clone()));
    add_user(&manager, TEST_USER, TEST_PASS, false, false)?;
    add_user(&manager, OTHER_USER, OTHER_PASS, false, false)?;
    add_user(&manager, ADMIN_USER, ADMIN_PASS, true, false)?;
    add_user(&manager, DJ_USER, DJ_PASS, false, true)?;

    let game_id = store.create_titled(
        TitledKind::Game,
        &TitledInput {
            title: GAME_1_TITLE.to_string(),
        },
    )?;
    let album_id = store.create_titled(
        TitledKind::Album,
        &TitledInput {
            title: ALBUM_1_TITLE.to_string(),
        },
    )?;
    let artist_id = store.create_artist(&ArtistInput {
        alias: String::new(),
        first_name: "Yasunori".to_string(),
        last_name: "Mitsuda".to_string(),
    })?;
    ensure!(game_id == GAME_1_ID && album_id == ALBUM_1_ID && artist_id == ARTIST_1_ID);

    let song_1 = add_song(
        &store,
        SongType::Song,
        SONG_1_TITLE,
        Some(game_id),
        Some(album_id),
        &[artist_id],
    )?;
    let song_2 = add_song(
        &store,
        SongType::Song,
        SONG_2_TITLE,
        Some(game_id),
        Some(album_id),
        &[artist_id],
    )?;
    let jingle = add_song(&store, SongType::Jingle, JINGLE_1_TITLE, None, None, &[])?;
    ensure!(song_1 == SONG_1_ID && song_2 == SONG_2_ID && jingle == JINGLE_1_ID);

    let yesterday = Utc::now() - Duration::days(1);
    for entity in [
        CatalogEntity::Game(game_id),
        CatalogEntity::Album(album_id),
        CatalogEntity::Artist(artist_id),
        CatalogEntity::Song(song_1),
        CatalogEntity::Song(song_2),
        CatalogEntity::Song(jingle),
    ] {
        store.set_published(entity, Some(yesterday))?;
    }

    Ok((dir, store))
}
