//! Loads a [`Playlist`] into the radio catalog.

use super::models::{Playlist, PlaylistSong, PlaylistTotals};
use crate::catalog::iri::to_iri;
use crate::catalog::validation::{validate_artist, validate_song, validate_store, validate_titled};
use crate::catalog::{
    artist_full_name, ArtistInput, CatalogEntity, CatalogStore, SongInput, StoreInput, TitledInput, TitledKind,
};
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

struct Importer<'a> {
    store: &'a dyn CatalogStore,
    created: Vec<CatalogEntity>,
    totals: PlaylistTotals,
}

impl<'a> Importer<'a> {
    fn titled(&mut self, kind: TitledKind, title: &str, disabled: bool) -> Result<()> {
        let input = TitledInput {
            title: title.to_string(),
        };
        validate_titled(&input)?;
        if self.store.find_titled_by_title(kind, title)?.is_some() {
            warn!("{} '{}' already exists, skipping", kind.label(), title);
            return Ok(());
        }
        let id = self.store.create_titled(kind, &input)?;
        let entity = CatalogEntity::from_kind(kind, id);
        if disabled {
            self.store.set_enabled(entity, false, None)?;
        }
        self.created.push(entity);
        match kind {
            TitledKind::Album => self.totals.albums += 1,
            TitledKind::Game => self.totals.games += 1,
        }
        Ok(())
    }

    fn artist(&mut self, input: ArtistInput, disabled: bool) -> Result<()> {
        validate_artist(&input)?;
        if self.store.find_artist(&input)?.is_some() {
            warn!(
                "Artist '{}' already exists, skipping",
                artist_full_name(&input.alias, &input.first_name, &input.last_name)
            );
            return Ok(());
        }
        let id = self.store.create_artist(&input)?;
        let entity = CatalogEntity::Artist(id);
        if disabled {
            self.store.set_enabled(entity, false, None)?;
        }
        self.created.push(entity);
        self.totals.artists += 1;
        Ok(())
    }

    fn lookup_titled(&self, kind: TitledKind, title: Option<&str>) -> Result<Option<i64>> {
        let Some(title) = title else {
            return Ok(None);
        };
        let found = self.store.find_titled_by_title(kind, title)?;
        if found.is_none() {
            warn!("{} '{}' not found, song left without one", kind.label(), title);
        }
        Ok(found)
    }

    fn song(&mut self, song: &PlaylistSong) -> Result<()> {
        let input = SongInput {
            song_type: song.song_type,
            title: song.title.clone(),
            album_id: self.lookup_titled(TitledKind::Album, song.album.as_deref())?,
            game_id: self.lookup_titled(TitledKind::Game, song.game.as_deref())?,
        };
        validate_song(&input)?;

        let mut artist_ids = Vec::with_capacity(song.artists.len());
        for artist in &song.artists {
            match self.store.find_artist(&artist.as_input())? {
                Some(id) => artist_ids.push(id),
                None => warn!("Artist '{}' not found for '{}'", artist.full_name(), song.title),
            }
        }

        let store_input = StoreInput {
            iri: to_iri(&song.store.path)?,
            mime_type: song.store.mime.clone(),
            file_size: song.store.filesize.map(i64::try_from).transpose()?,
            length: song.store.length,
            ..Default::default()
        };
        validate_store(&store_input)?;

        let song_id = self.store.create_song(&input)?;
        if !artist_ids.is_empty() {
            self.store.add_song_artists(song_id, &artist_ids)?;
        }
        let store_id = self.store.create_store(&store_input)?;
        self.store.add_song_stores(song_id, &[store_id])?;
        self.store.set_active_store(song_id, store_id)?;
        if song.disabled {
            self.store
                .set_enabled(CatalogEntity::Song(song_id), false, None)?;
        }
        debug!("Imported song {} as {}", song.title, song_id);

        self.created.push(CatalogEntity::Song(song_id));
        self.totals.count_song(song.song_type);
        Ok(())
    }
}

/// Creates everything the playlist describes. With `publish`, every created
/// object gets today's publication date.
pub fn import_playlist(
    store: &dyn CatalogStore,
    playlist: &Playlist,
    publish: bool,
) -> Result<PlaylistTotals> {
    let mut importer = Importer {
        store,
        created: Vec::new(),
        totals: PlaylistTotals::default(),
    };

    for album in &playlist.albums {
        importer
            .titled(TitledKind::Album, &album.title, album.disabled)
            .with_context(|| format!("Failed to import album '{}'", album.title))?;
    }
    for artist in &playlist.artists {
        let input = ArtistInput {
            alias: artist.alias.clone(),
            first_name: artist.first_name.clone(),
            last_name: artist.last_name.clone(),
        };
        importer
            .artist(input, artist.disabled)
            .with_context(|| format!("Failed to import artist '{}'", artist.alias))?;
    }
    for game in &playlist.games {
        importer
            .titled(TitledKind::Game, &game.title, game.disabled)
            .with_context(|| format!("Failed to import game '{}'", game.title))?;
    }
    for song in &playlist.songs {
        importer
            .song(song)
            .with_context(|| format!("Failed to import song '{}'", song.title))?;
    }

    if publish {
        let now = Utc::now();
        for entity in &importer.created {
            store.set_published(*entity, Some(now))?;
        }
        info!("Published {} objects", importer.created.len());
    }

    Ok(importer.totals)
}
