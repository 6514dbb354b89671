use super::behaviors::{cascade_disable_reason, Disableable, Publishable, Timestamps};
use super::models::{
    Artist, ArtistInput, ArtistRef, CascadeOutcome, CatalogEntity, Song, SongDetails, SongInput,
    SongType, Store, StoreInput, TitledEntity, TitledInput, TitledKind, TitledRef,
};
use super::naturalize::{artist_full_name, naturalize};
use super::trait_def::CatalogStore;
use crate::radio::eligibility::ceil2;
use crate::sqlite_persistence::{from_db_timestamp, to_db_timestamp};
use crate::store::{in_transaction, optional_row, Page, PageWindow, SqliteRadioStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, Row};
use tracing::debug;

const TITLED_COLUMNS: &str = "id, title, sorted_title, disabled, disabled_date, disabled_reason, published_date, created, modified";
const ARTIST_COLUMNS: &str = "id, alias, first_name, last_name, sorted_full_name, disabled, disabled_date, disabled_reason, published_date, created, modified";
const SONG_COLUMNS: &str = "id, song_type, title, sorted_title, album_id, game_id, num_played, last_played, next_play, active_store_id, disabled, disabled_date, disabled_reason, published_date, created, modified";
const STORE_COLUMNS: &str =
    "id, iri, mime_type, file_size, length, track_gain, track_peak, created, modified";

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// =========================================================================
// Row mapping
// =========================================================================

/// Reads `disabled, disabled_date, disabled_reason, published_date, created, modified`
/// starting at column `start`.
fn behaviors_from_row(
    row: &Row,
    start: usize,
) -> rusqlite::Result<(Disableable, Publishable, Timestamps)> {
    let status = Disableable {
        disabled: row.get(start)?,
        disabled_date: row.get::<_, Option<i64>>(start + 1)?.map(from_db_timestamp),
        disabled_reason: row.get(start + 2)?,
    };
    let publishing = Publishable {
        published_date: row.get::<_, Option<i64>>(start + 3)?.map(from_db_timestamp),
    };
    let timestamps = Timestamps {
        created_date: from_db_timestamp(row.get(start + 4)?),
        modified_date: from_db_timestamp(row.get(start + 5)?),
    };
    Ok((status, publishing, timestamps))
}

fn titled_from_row(row: &Row) -> rusqlite::Result<TitledEntity> {
    let (status, publishing, timestamps) = behaviors_from_row(row, 3)?;
    Ok(TitledEntity {
        id: row.get(0)?,
        title: row.get(1)?,
        sorted_title: row.get(2)?,
        status,
        publishing,
        timestamps,
    })
}

fn artist_from_row(row: &Row) -> rusqlite::Result<Artist> {
    let (status, publishing, timestamps) = behaviors_from_row(row, 5)?;
    Ok(Artist {
        id: row.get(0)?,
        alias: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        sorted_full_name: row.get(4)?,
        status,
        publishing,
        timestamps,
    })
}

pub(crate) fn song_type_from_column(row: &Row, index: usize) -> rusqlite::Result<SongType> {
    row.get::<_, String>(index)?
        .parse::<SongType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, e.into()))
}

fn song_from_row(row: &Row) -> rusqlite::Result<Song> {
    let (status, publishing, timestamps) = behaviors_from_row(row, 10)?;
    Ok(Song {
        id: row.get(0)?,
        song_type: song_type_from_column(row, 1)?,
        title: row.get(2)?,
        sorted_title: row.get(3)?,
        album_id: row.get(4)?,
        game_id: row.get(5)?,
        num_played: row.get(6)?,
        last_played: row.get::<_, Option<i64>>(7)?.map(from_db_timestamp),
        next_play: row.get::<_, Option<i64>>(8)?.map(from_db_timestamp),
        active_store_id: row.get(9)?,
        status,
        publishing,
        timestamps,
    })
}

fn store_from_row(row: &Row) -> rusqlite::Result<Store> {
    Ok(Store {
        id: row.get(0)?,
        iri: row.get(1)?,
        mime_type: row.get(2)?,
        file_size: row.get(3)?,
        length: row.get(4)?,
        track_gain: row.get(5)?,
        track_peak: row.get(6)?,
        timestamps: Timestamps {
            created_date: from_db_timestamp(row.get(7)?),
            modified_date: from_db_timestamp(row.get(8)?),
        },
    })
}

// =========================================================================
// Shared queries
// =========================================================================

fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    Ok(optional_row(conn.query_row(
        &format!("SELECT 1 FROM {} WHERE id = ?1", table),
        params![id],
        |_| Ok(()),
    ))?
    .is_some())
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })?;
    Ok(count as usize)
}

fn list_page<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    order_by: &str,
    window: PageWindow,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> Result<Page<T>> {
    let total = count_rows(conn, table)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT ?1 OFFSET ?2",
        columns, table, order_by
    ))?;
    let items = stmt
        .query_map(
            params![window.limit() as i64, window.offset() as i64],
            map,
        )?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(Page { items, total })
}

/// Display label of an entity, the title or the artist's full name.
fn entity_label(conn: &Connection, entity: CatalogEntity) -> Result<Option<String>> {
    match entity {
        CatalogEntity::Artist(id) => optional_row(conn.query_row(
            "SELECT alias, first_name, last_name FROM artist WHERE id = ?1",
            params![id],
            |row| {
                Ok(artist_full_name(
                    &row.get::<_, String>(0)?,
                    &row.get::<_, String>(1)?,
                    &row.get::<_, String>(2)?,
                ))
            },
        )),
        _ => optional_row(conn.query_row(
            &format!("SELECT title FROM {} WHERE id = ?1", entity.table()),
            params![entity.id()],
            |row| row.get(0),
        )),
    }
}

/// Applies the enabled state to every row of `table` matched by `condition`,
/// returning the number of rows changed.
fn apply_status(
    conn: &Connection,
    table: &str,
    condition: &str,
    id: i64,
    enabled: bool,
    reason: &str,
    now: i64,
) -> Result<usize> {
    let changed = if enabled {
        conn.execute(
            &format!(
                "UPDATE {} SET disabled = 0, disabled_date = NULL, disabled_reason = '', modified = ?2 WHERE {}",
                table, condition
            ),
            params![id, now],
        )?
    } else {
        conn.execute(
            &format!(
                "UPDATE {} SET disabled = 1, disabled_date = ?2, disabled_reason = ?3, modified = ?2 WHERE {}",
                table, condition
            ),
            params![id, now, reason],
        )?
    };
    Ok(changed)
}

fn link_rows(
    conn: &Connection,
    link_table: &str,
    target_column: &str,
    song_id: i64,
    ids: &[i64],
) -> Result<()> {
    let sql = format!(
        "INSERT OR IGNORE INTO {} (song_id, {}) VALUES (?1, ?2)",
        link_table, target_column
    );
    for id in ids {
        conn.execute(&sql, params![song_id, id])
            .with_context(|| format!("Failed to link {} {} to song {}", target_column, id, song_id))?;
    }
    Ok(())
}

fn unlink_rows(
    conn: &Connection,
    link_table: &str,
    target_column: &str,
    song_id: i64,
    ids: &[i64],
) -> Result<()> {
    let sql = format!(
        "DELETE FROM {} WHERE song_id = ?1 AND {} = ?2",
        link_table, target_column
    );
    for id in ids {
        conn.execute(&sql, params![song_id, id])?;
    }
    Ok(())
}

fn song_details(conn: &Connection, song: Song) -> Result<SongDetails> {
    let titled_ref = |kind: TitledKind, id: Option<i64>| -> Result<Option<TitledRef>> {
        let Some(id) = id else {
            return Ok(None);
        };
        optional_row(conn.query_row(
            &format!("SELECT id, title FROM {} WHERE id = ?1", kind.table()),
            params![id],
            |row| {
                Ok(TitledRef {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            },
        ))
    };
    let album = titled_ref(TitledKind::Album, song.album_id)?;
    let game = titled_ref(TitledKind::Game, song.game_id)?;

    let mut stmt = conn.prepare(
        "SELECT a.id, a.alias, a.first_name, a.last_name, a.disabled FROM artist a
         JOIN song_artist sa ON sa.artist_id = a.id
         WHERE sa.song_id = ?1 ORDER BY a.sorted_full_name, a.id",
    )?;
    let artists = stmt
        .query_map(params![song.id], |row| {
            Ok(ArtistRef {
                id: row.get(0)?,
                full_name: artist_full_name(
                    &row.get::<_, String>(1)?,
                    &row.get::<_, String>(2)?,
                    &row.get::<_, String>(3)?,
                ),
                disabled: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let active_store = match song.active_store_id {
        Some(store_id) => optional_row(conn.query_row(
            &format!("SELECT {} FROM store WHERE id = ?1", STORE_COLUMNS),
            params![store_id],
            store_from_row,
        ))?,
        None => None,
    };

    let average_rating: Option<f64> = conn.query_row(
        "SELECT AVG(value) FROM rating WHERE song_id = ?1",
        params![song.id],
        |row| row.get(0),
    )?;

    Ok(SongDetails {
        song,
        album,
        game,
        artists,
        active_store,
        average_rating: average_rating.map(ceil2),
    })
}

impl CatalogStore for SqliteRadioStore {
    fn create_titled(&self, kind: TitledKind, input: &TitledInput) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let title = input.title.trim();
        conn.execute(
            &format!(
                "INSERT INTO {} (title, sorted_title) VALUES (?1, ?2)",
                kind.table()
            ),
            params![title, naturalize(title)],
        )
        .with_context(|| format!("Failed to create {} {}", kind.table(), title))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_titled(&self, kind: TitledKind, id: i64) -> Result<Option<TitledEntity>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM {} WHERE id = ?1", TITLED_COLUMNS, kind.table()),
            params![id],
            titled_from_row,
        ))
    }

    fn update_titled(&self, kind: TitledKind, id: i64, input: &TitledInput) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let title = input.title.trim();
        let changed = conn.execute(
            &format!(
                "UPDATE {} SET title = ?2, sorted_title = ?3, modified = ?4 WHERE id = ?1",
                kind.table()
            ),
            params![id, title, naturalize(title), to_db_timestamp(&Utc::now())],
        )?;
        Ok(changed > 0)
    }

    fn delete_titled(&self, kind: TitledKind, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
            params![id],
        )?;
        Ok(changed > 0)
    }

    fn list_titled(&self, kind: TitledKind, window: PageWindow) -> Result<Page<TitledEntity>> {
        let conn = self.conn.lock().unwrap();
        list_page(
            &conn,
            kind.table(),
            TITLED_COLUMNS,
            "sorted_title, id",
            window,
            titled_from_row,
        )
    }

    fn find_titled_by_title(&self, kind: TitledKind, title: &str) -> Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT id FROM {} WHERE title = ?1", kind.table()),
            params![title.trim()],
            |row| row.get(0),
        ))
    }

    fn create_artist(&self, input: &ArtistInput) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let full_name = artist_full_name(&input.alias, &input.first_name, &input.last_name);
        conn.execute(
            "INSERT INTO artist (alias, first_name, last_name, sorted_full_name) VALUES (?1, ?2, ?3, ?4)",
            params![
                input.alias.trim(),
                input.first_name.trim(),
                input.last_name.trim(),
                naturalize(&full_name)
            ],
        )
        .with_context(|| format!("Failed to create artist {}", full_name))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM artist WHERE id = ?1", ARTIST_COLUMNS),
            params![id],
            artist_from_row,
        ))
    }

    fn update_artist(&self, id: i64, input: &ArtistInput) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let full_name = artist_full_name(&input.alias, &input.first_name, &input.last_name);
        let changed = conn.execute(
            "UPDATE artist SET alias = ?2, first_name = ?3, last_name = ?4, sorted_full_name = ?5, modified = ?6 WHERE id = ?1",
            params![
                id,
                input.alias.trim(),
                input.first_name.trim(),
                input.last_name.trim(),
                naturalize(&full_name),
                to_db_timestamp(&Utc::now())
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_artist(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM artist WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn list_artists(&self, window: PageWindow) -> Result<Page<Artist>> {
        let conn = self.conn.lock().unwrap();
        list_page(
            &conn,
            "artist",
            ARTIST_COLUMNS,
            "sorted_full_name, id",
            window,
            artist_from_row,
        )
    }

    fn find_artist(&self, input: &ArtistInput) -> Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            "SELECT id FROM artist WHERE alias = ?1 AND first_name = ?2 AND last_name = ?3",
            params![
                input.alias.trim(),
                input.first_name.trim(),
                input.last_name.trim()
            ],
            |row| row.get(0),
        ))
    }

    fn create_song(&self, input: &SongInput) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let title = input.title.trim();
        conn.execute(
            "INSERT INTO song (song_type, title, sorted_title, album_id, game_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                input.song_type.as_db_str(),
                title,
                naturalize(title),
                input.album_id,
                input.game_id
            ],
        )
        .with_context(|| format!("Failed to create song {}", title))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM song WHERE id = ?1", SONG_COLUMNS),
            params![id],
            song_from_row,
        ))
    }

    fn get_song_details(&self, id: i64) -> Result<Option<SongDetails>> {
        let conn = self.conn.lock().unwrap();
        let song = optional_row(conn.query_row(
            &format!("SELECT {} FROM song WHERE id = ?1", SONG_COLUMNS),
            params![id],
            song_from_row,
        ))?;
        match song {
            Some(song) => Ok(Some(song_details(&conn, song)?)),
            None => Ok(None),
        }
    }

    fn update_song(&self, id: i64, input: &SongInput) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let title = input.title.trim();
        let changed = conn.execute(
            "UPDATE song SET song_type = ?2, title = ?3, sorted_title = ?4, album_id = ?5, game_id = ?6, modified = ?7 WHERE id = ?1",
            params![
                id,
                input.song_type.as_db_str(),
                title,
                naturalize(title),
                input.album_id,
                input.game_id,
                to_db_timestamp(&Utc::now())
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_song(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM song WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn list_songs(&self, window: PageWindow) -> Result<Page<Song>> {
        let conn = self.conn.lock().unwrap();
        list_page(
            &conn,
            "song",
            SONG_COLUMNS,
            "sorted_title, id",
            window,
            song_from_row,
        )
    }

    fn add_song_artists(&self, song_id: i64, artist_ids: &[i64]) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        in_transaction(&conn, |conn| {
            if !row_exists(conn, "song", song_id)? {
                return Ok(false);
            }
            link_rows(conn, "song_artist", "artist_id", song_id, artist_ids)?;
            Ok(true)
        })
    }

    fn remove_song_artists(&self, song_id: i64, artist_ids: &[i64]) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        in_transaction(&conn, |conn| {
            if !row_exists(conn, "song", song_id)? {
                return Ok(false);
            }
            unlink_rows(conn, "song_artist", "artist_id", song_id, artist_ids)?;
            Ok(true)
        })
    }

    fn create_store(&self, input: &StoreInput) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO store (iri, mime_type, file_size, length, track_gain, track_peak) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.iri,
                input.mime_type,
                input.file_size,
                input.length.map(|v| round_to(v, 2)),
                input.track_gain.map(|v| round_to(v, 2)),
                input.track_peak.map(|v| round_to(v, 6))
            ],
        )
        .with_context(|| format!("Failed to create store {}", input.iri))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_store(&self, id: i64) -> Result<Option<Store>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM store WHERE id = ?1", STORE_COLUMNS),
            params![id],
            store_from_row,
        ))
    }

    fn update_store(&self, id: i64, input: &StoreInput) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE store SET iri = ?2, mime_type = ?3, file_size = ?4, length = ?5, track_gain = ?6, track_peak = ?7, modified = ?8 WHERE id = ?1",
            params![
                id,
                input.iri,
                input.mime_type,
                input.file_size,
                input.length.map(|v| round_to(v, 2)),
                input.track_gain.map(|v| round_to(v, 2)),
                input.track_peak.map(|v| round_to(v, 6)),
                to_db_timestamp(&Utc::now())
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_store(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM store WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn list_stores(&self, window: PageWindow) -> Result<Page<Store>> {
        let conn = self.conn.lock().unwrap();
        list_page(&conn, "store", STORE_COLUMNS, "id", window, store_from_row)
    }

    fn get_song_stores(&self, song_id: i64) -> Result<Vec<Store>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.iri, s.mime_type, s.file_size, s.length, s.track_gain, s.track_peak, s.created, s.modified
             FROM store s JOIN song_store ss ON ss.store_id = s.id
             WHERE ss.song_id = ?1 ORDER BY s.id",
        )?;
        let stores = stmt
            .query_map(params![song_id], store_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stores)
    }

    fn add_song_stores(&self, song_id: i64, store_ids: &[i64]) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        in_transaction(&conn, |conn| {
            if !row_exists(conn, "song", song_id)? {
                return Ok(false);
            }
            link_rows(conn, "song_store", "store_id", song_id, store_ids)?;
            Ok(true)
        })
    }

    fn remove_song_stores(&self, song_id: i64, store_ids: &[i64]) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        in_transaction(&conn, |conn| {
            if !row_exists(conn, "song", song_id)? {
                return Ok(false);
            }
            unlink_rows(conn, "song_store", "store_id", song_id, store_ids)?;
            for store_id in store_ids {
                conn.execute(
                    "UPDATE song SET active_store_id = NULL WHERE id = ?1 AND active_store_id = ?2",
                    params![song_id, store_id],
                )?;
            }
            Ok(true)
        })
    }

    fn set_active_store(&self, song_id: i64, store_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE song SET active_store_id = ?2, modified = ?3
             WHERE id = ?1 AND EXISTS (SELECT 1 FROM song_store WHERE song_id = ?1 AND store_id = ?2)",
            params![song_id, store_id, to_db_timestamp(&Utc::now())],
        )?;
        Ok(changed > 0)
    }

    fn set_enabled(
        &self,
        entity: CatalogEntity,
        enabled: bool,
        reason: Option<&str>,
    ) -> Result<Option<CascadeOutcome>> {
        let conn = self.conn.lock().unwrap();
        let now = to_db_timestamp(&Utc::now());

        in_transaction(&conn, |conn| {
            let Some(label) = entity_label(conn, entity)? else {
                return Ok(None);
            };
            let id = entity.id();
            apply_status(
                conn,
                entity.table(),
                "id = ?1",
                id,
                enabled,
                reason.unwrap_or(""),
                now,
            )?;

            let mut outcome = CascadeOutcome::default();
            match entity {
                CatalogEntity::Album(_) | CatalogEntity::Game(_) => {
                    let kind = match entity {
                        CatalogEntity::Album(_) => TitledKind::Album,
                        _ => TitledKind::Game,
                    };
                    outcome.songs = apply_status(
                        conn,
                        "song",
                        &format!("{} = ?1", kind.song_column()),
                        id,
                        enabled,
                        &cascade_disable_reason(kind.label(), &label),
                        now,
                    )?;
                }
                CatalogEntity::Artist(_) => {
                    outcome.songs = apply_status(
                        conn,
                        "song",
                        "id IN (SELECT song_id FROM song_artist GROUP BY song_id
                                HAVING COUNT(*) = 1 AND MAX(artist_id) = ?1)",
                        id,
                        enabled,
                        &cascade_disable_reason("Artist", &label),
                        now,
                    )?;
                }
                CatalogEntity::Song(_) if enabled => {
                    outcome.albums = apply_status(
                        conn,
                        "album",
                        "disabled = 1 AND id = (SELECT album_id FROM song WHERE id = ?1)",
                        id,
                        true,
                        "",
                        now,
                    )?;
                    outcome.games = apply_status(
                        conn,
                        "game",
                        "disabled = 1 AND id = (SELECT game_id FROM song WHERE id = ?1)",
                        id,
                        true,
                        "",
                        now,
                    )?;
                    outcome.artists = apply_status(
                        conn,
                        "artist",
                        "disabled = 1 AND id IN (SELECT artist_id FROM song_artist WHERE song_id = ?1)",
                        id,
                        true,
                        "",
                        now,
                    )?;
                }
                CatalogEntity::Song(_) => {}
            }
            debug!(
                "{:?} {} ({:?})",
                entity,
                if enabled { "enabled" } else { "disabled" },
                outcome
            );
            Ok(Some(outcome))
        })
    }

    fn set_published(&self, entity: CatalogEntity, date: Option<DateTime<Utc>>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            &format!(
                "UPDATE {} SET published_date = ?2, modified = ?3 WHERE id = ?1",
                entity.table()
            ),
            params![
                entity.id(),
                date.as_ref().map(to_db_timestamp),
                to_db_timestamp(&Utc::now())
            ],
        )?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::create_tmp_store;

    fn album(store: &SqliteRadioStore, title: &str) -> i64 {
        store
            .create_titled(
                TitledKind::Album,
                &TitledInput {
                    title: title.to_string(),
                },
            )
            .unwrap()
    }

    fn song(store: &SqliteRadioStore, title: &str, album_id: Option<i64>) -> i64 {
        store
            .create_song(&SongInput {
                song_type: SongType::Song,
                title: title.to_string(),
                album_id,
                game_id: None,
            })
            .unwrap()
    }

    fn artist(store: &SqliteRadioStore, alias: &str) -> i64 {
        store
            .create_artist(&ArtistInput {
                alias: alias.to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn titled_crud_and_natural_order() {
        let (store, _temp_dir) = create_tmp_store();
        let b = album(&store, "The Best Of 10");
        album(&store, "Best of 9");
        assert!(store
            .create_titled(
                TitledKind::Album,
                &TitledInput {
                    title: "Best of 9".to_string()
                }
            )
            .is_err());

        let page = store
            .list_titled(TitledKind::Album, PageWindow::new(1, 10))
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].title, "Best of 9");
        assert_eq!(page.items[1].sorted_title, "best of 00000010");

        assert!(store
            .update_titled(
                TitledKind::Album,
                b,
                &TitledInput {
                    title: "Renamed".to_string()
                }
            )
            .unwrap());
        assert_eq!(
            store.find_titled_by_title(TitledKind::Album, "Renamed").unwrap(),
            Some(b)
        );
        assert!(store.delete_titled(TitledKind::Album, b).unwrap());
        assert!(!store.delete_titled(TitledKind::Album, b).unwrap());
        assert!(store.get_titled(TitledKind::Album, b).unwrap().is_none());
    }

    #[test]
    fn deleting_album_keeps_songs() {
        let (store, _temp_dir) = create_tmp_store();
        let album_id = album(&store, "OST");
        let song_id = song(&store, "Track", Some(album_id));
        store.delete_titled(TitledKind::Album, album_id).unwrap();
        assert_eq!(store.get_song(song_id).unwrap().unwrap().album_id, None);
    }

    #[test]
    fn song_details_resolve_links() {
        let (store, _temp_dir) = create_tmp_store();
        let album_id = album(&store, "OST");
        let song_id = song(&store, "Track", Some(album_id));
        let a = artist(&store, "Zircon");
        assert!(store.add_song_artists(song_id, &[a, a]).unwrap());
        assert!(!store.add_song_artists(999, &[a]).unwrap());

        let store_id = store
            .create_store(&StoreInput {
                iri: "file:///music/track.ogg".to_string(),
                length: Some(123.456),
                track_gain: Some(-3.14159),
                ..Default::default()
            })
            .unwrap();
        assert!(!store.set_active_store(song_id, store_id).unwrap());
        store.add_song_stores(song_id, &[store_id]).unwrap();
        assert!(store.set_active_store(song_id, store_id).unwrap());

        let details = store.get_song_details(song_id).unwrap().unwrap();
        assert_eq!(details.album.unwrap().title, "OST");
        assert_eq!(details.artists.len(), 1);
        let active = details.active_store.unwrap();
        assert_eq!(active.length, Some(123.46));
        assert_eq!(active.replaygain(), "-3.14 dB");

        store.remove_song_stores(song_id, &[store_id]).unwrap();
        let song = store.get_song(song_id).unwrap().unwrap();
        assert_eq!(song.active_store_id, None);
        assert!(store.get_song_stores(song_id).unwrap().is_empty());
    }

    #[test]
    fn disabling_album_cascades_to_songs_and_back() {
        let (store, _temp_dir) = create_tmp_store();
        let album_id = album(&store, "Chrono Trigger OST");
        let first = song(&store, "Corridors of Time", Some(album_id));
        let second = song(&store, "Frog's Theme", Some(album_id));
        let unrelated = song(&store, "Other", None);

        let outcome = store
            .set_enabled(CatalogEntity::Album(album_id), false, Some("licensing"))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.songs, 2);

        let disabled_album = store
            .get_titled(TitledKind::Album, album_id)
            .unwrap()
            .unwrap();
        assert_eq!(disabled_album.status.disabled_reason, "licensing");
        for id in [first, second] {
            let song = store.get_song(id).unwrap().unwrap();
            assert!(song.status.disabled);
            assert_eq!(
                song.status.disabled_reason,
                "Album \"Chrono Trigger OST\" was disabled."
            );
            assert!(song.status.disabled_date.is_some());
        }
        assert!(!store.get_song(unrelated).unwrap().unwrap().status.disabled);

        // Re-enabling one song brings the album back, not its siblings.
        let outcome = store
            .set_enabled(CatalogEntity::Song(first), true, None)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.albums, 1);
        assert!(store
            .get_titled(TitledKind::Album, album_id)
            .unwrap()
            .unwrap()
            .status
            .is_enabled());
        assert!(store.get_song(second).unwrap().unwrap().status.disabled);
        let first_song = store.get_song(first).unwrap().unwrap();
        assert_eq!(first_song.status.disabled_reason, "");
        assert_eq!(first_song.status.disabled_date, None);
    }

    #[test]
    fn disabling_artist_only_touches_sole_artist_songs() {
        let (store, _temp_dir) = create_tmp_store();
        let solo = song(&store, "Solo", None);
        let duet = song(&store, "Duet", None);
        let a = store
            .create_artist(&ArtistInput {
                alias: "Zircon".to_string(),
                first_name: "Andrew".to_string(),
                last_name: "Aversa".to_string(),
            })
            .unwrap();
        let b = artist(&store, "Other");
        store.add_song_artists(solo, &[a]).unwrap();
        store.add_song_artists(duet, &[a, b]).unwrap();

        let outcome = store
            .set_enabled(CatalogEntity::Artist(a), false, None)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.songs, 1);
        let solo_song = store.get_song(solo).unwrap().unwrap();
        assert!(solo_song.status.disabled);
        assert_eq!(
            solo_song.status.disabled_reason,
            "Artist \"Andrew \"Zircon\" Aversa\" was disabled."
        );
        assert!(!store.get_song(duet).unwrap().unwrap().status.disabled);
    }

    #[test]
    fn enabling_song_enables_all_links() {
        let (store, _temp_dir) = create_tmp_store();
        let game_id = store
            .create_titled(
                TitledKind::Game,
                &TitledInput {
                    title: "Mother".to_string(),
                },
            )
            .unwrap();
        let song_id = store
            .create_song(&SongInput {
                song_type: SongType::Song,
                title: "Eight Melodies".to_string(),
                album_id: None,
                game_id: Some(game_id),
            })
            .unwrap();
        let a = artist(&store, "Keiichi Suzuki");
        store.add_song_artists(song_id, &[a]).unwrap();
        store
            .set_enabled(CatalogEntity::Game(game_id), false, None)
            .unwrap();
        store
            .set_enabled(CatalogEntity::Artist(a), false, None)
            .unwrap();

        let outcome = store
            .set_enabled(CatalogEntity::Song(song_id), true, None)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.games, 1);
        assert_eq!(outcome.artists, 1);
        assert!(store.get_artist(a).unwrap().unwrap().status.is_enabled());
    }

    #[test]
    fn set_enabled_on_missing_entity() {
        let (store, _temp_dir) = create_tmp_store();
        assert!(store
            .set_enabled(CatalogEntity::Album(42), false, None)
            .unwrap()
            .is_none());
        assert!(!store
            .set_published(CatalogEntity::Song(42), Some(Utc::now()))
            .unwrap());
    }
}
