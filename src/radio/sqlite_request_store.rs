use super::eligibility::{RatingSummary, SongStanding};
use super::request_store::RequestStore;
use super::song_request::{HistoryEntry, SongRequest};
use crate::catalog::{song_type_from_column, Publishable, SongRef, SongType};
use crate::sqlite_persistence::{from_db_timestamp, to_db_timestamp, to_db_timestamp_ceil};
use crate::store::{in_transaction, optional_row, Page, PageWindow, SqliteRadioStore};
use crate::user::{BasicProfile, BasicUser};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::debug;

const REQUEST_COLUMNS: &str = "id, profile_id, song_id, created, queued_at, played_at";

const STANDING_SELECT: &str = "SELECT s.id, s.song_type, s.disabled, s.published_date, s.last_played,
        (SELECT COUNT(*) FROM rating r WHERE r.song_id = s.id),
        (SELECT AVG(r.value) FROM rating r WHERE r.song_id = s.id),
        EXISTS(SELECT 1 FROM song_request q
               WHERE q.song_id = s.id AND q.queued_at IS NULL AND q.played_at IS NULL)
     FROM song s";

// Publication dates are whole seconds, so "strictly before now" becomes
// "strictly before now rounded up".
const AVAILABLE_CONDITION: &str =
    "s.disabled = 0 AND s.published_date IS NOT NULL AND s.published_date < ?1";

fn request_from_row(row: &Row) -> rusqlite::Result<SongRequest> {
    Ok(SongRequest {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        song_id: row.get(2)?,
        created: from_db_timestamp(row.get(3)?),
        queued_at: row.get::<_, Option<i64>>(4)?.map(from_db_timestamp),
        played_at: row.get::<_, Option<i64>>(5)?.map(from_db_timestamp),
    })
}

fn standing_from_row(row: &Row) -> rusqlite::Result<SongStanding> {
    Ok(SongStanding {
        song_id: row.get(0)?,
        song_type: song_type_from_column(row, 1)?,
        disabled: row.get(2)?,
        publishing: Publishable {
            published_date: row.get::<_, Option<i64>>(3)?.map(from_db_timestamp),
        },
        last_played: row.get::<_, Option<i64>>(4)?.map(from_db_timestamp),
        ratings: RatingSummary {
            count: row.get(5)?,
            average: row.get(6)?,
        },
        pending: row.get(7)?,
    })
}

fn history_from_row(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let profile = match row.get::<_, Option<i64>>(2)? {
        Some(profile_id) => {
            let name: String = row.get(4)?;
            let handle: String = row.get(5)?;
            Some(BasicProfile {
                id: profile_id,
                user: BasicUser {
                    id: row.get(3)?,
                    name: if name.trim().is_empty() { handle } else { name },
                    is_staff: row.get(6)?,
                },
            })
        }
        None => None,
    };
    let song = match row.get::<_, Option<i64>>(7)? {
        Some(song_id) => Some(SongRef {
            id: song_id,
            song_type: song_type_from_column(row, 8)?,
            title: row.get(9)?,
        }),
        None => None,
    };
    Ok(HistoryEntry {
        created_date: from_db_timestamp(row.get(0)?),
        played_at: from_db_timestamp(row.get(1)?),
        profile,
        song,
    })
}

impl RequestStore for SqliteRadioStore {
    fn create_request(&self, profile_id: Option<i64>, song_id: i64) -> Result<SongRequest> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO song_request (profile_id, song_id, created) VALUES (?1, ?2, ?3)",
            params![profile_id, song_id, to_db_timestamp(&Utc::now())],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Created request {} for song {}", id, song_id);
        Ok(conn.query_row(
            &format!("SELECT {} FROM song_request WHERE id = ?1", REQUEST_COLUMNS),
            params![id],
            request_from_row,
        )?)
    }

    fn get_request(&self, request_id: i64) -> Result<Option<SongRequest>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM song_request WHERE id = ?1", REQUEST_COLUMNS),
            params![request_id],
            request_from_row,
        ))
    }

    fn oldest_pending_request(&self) -> Result<Option<SongRequest>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!(
                "SELECT {} FROM song_request
                 WHERE queued_at IS NULL AND played_at IS NULL AND song_id IS NOT NULL
                 ORDER BY created, id LIMIT 1",
                REQUEST_COLUMNS
            ),
            [],
            request_from_row,
        ))
    }

    fn count_pending_requests(&self, profile_id: i64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM song_request
             WHERE profile_id = ?1 AND queued_at IS NULL AND played_at IS NULL",
            params![profile_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn recent_played_song_types(&self, limit: usize) -> Result<Vec<Option<SongType>>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT s.song_type FROM song_request q LEFT JOIN song s ON s.id = q.song_id
             WHERE q.played_at IS NOT NULL
             ORDER BY q.played_at DESC, q.id DESC LIMIT ?1",
        )?;
        let types = stmt
            .query_map(params![limit as i64], |row| {
                match row.get::<_, Option<String>>(0)? {
                    Some(_) => song_type_from_column(row, 0).map(Some),
                    None => Ok(None),
                }
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(types)
    }

    fn mark_queued(
        &self,
        request_id: i64,
        at: DateTime<Utc>,
        next_play: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        in_transaction(&conn, |conn| {
            let changed = conn.execute(
                "UPDATE song_request SET queued_at = ?2
                 WHERE id = ?1 AND queued_at IS NULL AND played_at IS NULL",
                params![request_id, to_db_timestamp(&at)],
            )?;
            if changed == 0 {
                return Ok(false);
            }
            if let Some(next_play) = next_play {
                conn.execute(
                    "UPDATE song SET next_play = ?2
                     WHERE id = (SELECT song_id FROM song_request WHERE id = ?1)",
                    params![request_id, to_db_timestamp_ceil(&next_play)],
                )?;
            }
            Ok(true)
        })
    }

    fn mark_played(&self, request_id: i64, at: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let at = to_db_timestamp(&at);
        in_transaction(&conn, |conn| {
            let changed = conn.execute(
                "UPDATE song_request SET played_at = ?2
                 WHERE id = ?1 AND queued_at IS NOT NULL AND played_at IS NULL",
                params![request_id, at],
            )?;
            if changed == 0 {
                return Ok(false);
            }
            conn.execute(
                "UPDATE song SET last_played = ?2, num_played = num_played + 1
                 WHERE id = (SELECT song_id FROM song_request WHERE id = ?1)",
                params![request_id, at],
            )?;
            Ok(true)
        })
    }

    fn list_played_requests(&self, window: PageWindow) -> Result<Page<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM song_request WHERE played_at IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        let mut stmt = conn.prepare(
            "SELECT q.created, q.played_at, p.id, u.id, u.name, u.handle, u.is_staff,
                    s.id, s.song_type, s.title
             FROM song_request q
             LEFT JOIN radio_profile p ON p.id = q.profile_id
             LEFT JOIN user u ON u.id = p.user_id
             LEFT JOIN song s ON s.id = q.song_id
             WHERE q.played_at IS NOT NULL
             ORDER BY q.played_at DESC, q.id DESC
             LIMIT ?1 OFFSET ?2",
        )?;
        let items = stmt
            .query_map(
                params![window.limit() as i64, window.offset() as i64],
                history_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Page {
            items,
            total: total as usize,
        })
    }

    fn playlist_length(&self, now: DateTime<Utc>) -> Result<f64> {
        let conn = self.conn.lock().unwrap();
        let length: f64 = conn.query_row(
            &format!(
                "SELECT COALESCE(SUM(st.length), 0.0) FROM song s
                 JOIN store st ON st.id = s.active_store_id
                 WHERE s.song_type = 'S' AND {}",
                AVAILABLE_CONDITION
            ),
            params![to_db_timestamp_ceil(&now)],
            |row| row.get(0),
        )?;
        Ok(length)
    }

    fn song_standing(&self, song_id: i64) -> Result<Option<SongStanding>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("{} WHERE s.id = ?1", STANDING_SELECT),
            params![song_id],
            standing_from_row,
        ))
    }

    fn available_song_standings(&self, now: DateTime<Utc>) -> Result<Vec<SongStanding>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE s.song_type = 'S' AND {} ORDER BY s.id",
            STANDING_SELECT, AVAILABLE_CONDITION
        ))?;
        let standings = stmt
            .query_map(params![to_db_timestamp_ceil(&now)], standing_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(standings)
    }

    fn available_jingle_ids(&self, now: DateTime<Utc>) -> Result<Vec<i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT s.id FROM song s WHERE s.song_type = 'J' AND {} ORDER BY s.id",
            AVAILABLE_CONDITION
        ))?;
        let ids = stmt
            .query_map(params![to_db_timestamp_ceil(&now)], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntity, CatalogStore, SongInput, StoreInput};
    use crate::radio::RequestState;
    use crate::store::test_support::create_tmp_store;
    use crate::user::{NewUser, ProfileStore, UserStore};
    use chrono::Duration;

    fn published_song(store: &SqliteRadioStore, song_type: SongType, length: f64) -> i64 {
        let song_id = store
            .create_song(&SongInput {
                song_type,
                title: format!("{:?} {}", song_type, length),
                album_id: None,
                game_id: None,
            })
            .unwrap();
        let store_id = store
            .create_store(&StoreInput {
                iri: format!("file:///music/{}.ogg", song_id),
                length: Some(length),
                ..Default::default()
            })
            .unwrap();
        store.add_song_stores(song_id, &[store_id]).unwrap();
        store.set_active_store(song_id, store_id).unwrap();
        store
            .set_published(
                CatalogEntity::Song(song_id),
                Some(Utc::now() - Duration::days(1)),
            )
            .unwrap();
        song_id
    }

    fn profile(store: &SqliteRadioStore, handle: &str) -> i64 {
        let user_id = store
            .create_user(&NewUser {
                handle: handle.to_string(),
                ..Default::default()
            })
            .unwrap();
        store
            .get_profile_for_user(user_id)
            .unwrap()
            .unwrap()
            .profile
            .id
    }

    #[test]
    fn playlist_length_counts_available_songs_only() {
        let (store, _temp_dir) = create_tmp_store();
        published_song(&store, SongType::Song, 100.5);
        published_song(&store, SongType::Song, 200.0);
        published_song(&store, SongType::Jingle, 10.0);
        let disabled = published_song(&store, SongType::Song, 1000.0);
        store
            .set_enabled(CatalogEntity::Song(disabled), false, None)
            .unwrap();
        let unpublished = published_song(&store, SongType::Song, 1000.0);
        store
            .set_published(CatalogEntity::Song(unpublished), None)
            .unwrap();

        let length = store.playlist_length(Utc::now()).unwrap();
        assert!((length - 300.5).abs() < 1e-9);
        assert_eq!(store.available_song_standings(Utc::now()).unwrap().len(), 2);
        assert_eq!(store.available_jingle_ids(Utc::now()).unwrap().len(), 1);
    }

    #[test]
    fn request_lifecycle_updates_song_once() {
        let (store, _temp_dir) = create_tmp_store();
        let song_id = published_song(&store, SongType::Song, 100.0);
        let profile_id = profile(&store, "alice");

        let request = store.create_request(Some(profile_id), song_id).unwrap();
        assert_eq!(request.state(), RequestState::Pending);
        assert_eq!(store.count_pending_requests(profile_id).unwrap(), 1);
        assert!(store.song_standing(song_id).unwrap().unwrap().pending);
        assert!(!store.mark_played(request.id, Utc::now()).unwrap());

        let now = Utc::now();
        let next_play = now + Duration::milliseconds(75_250);
        assert!(store.mark_queued(request.id, now, Some(next_play)).unwrap());
        assert!(!store.mark_queued(request.id, now, None).unwrap());
        assert_eq!(store.count_pending_requests(profile_id).unwrap(), 0);
        let song = store.get_song(song_id).unwrap().unwrap();
        assert!(song.next_play.unwrap() >= next_play);

        assert!(store.mark_played(request.id, now).unwrap());
        assert!(!store.mark_played(request.id, now).unwrap());
        let song = store.get_song(song_id).unwrap().unwrap();
        assert_eq!(song.num_played, 1);
        assert_eq!(song.last_played.unwrap().timestamp(), now.timestamp());
        assert_eq!(
            store.get_request(request.id).unwrap().unwrap().state(),
            RequestState::Played
        );
    }

    #[test]
    fn oldest_pending_is_served_first() {
        let (store, _temp_dir) = create_tmp_store();
        let first = published_song(&store, SongType::Song, 100.0);
        let second = published_song(&store, SongType::Song, 100.0);
        let a = store.create_request(None, first).unwrap();
        store.create_request(None, second).unwrap();

        assert_eq!(store.oldest_pending_request().unwrap().unwrap().id, a.id);
        store.mark_queued(a.id, Utc::now(), None).unwrap();
        assert_eq!(
            store.oldest_pending_request().unwrap().unwrap().song_id,
            Some(second)
        );
    }

    #[test]
    fn history_lists_played_requests_newest_first() {
        let (store, _temp_dir) = create_tmp_store();
        let song = published_song(&store, SongType::Song, 100.0);
        let jingle = published_song(&store, SongType::Jingle, 5.0);
        let profile_id = profile(&store, "bob");
        let now = Utc::now();

        let first = store.create_request(Some(profile_id), song).unwrap();
        store.mark_queued(first.id, now, None).unwrap();
        store.mark_played(first.id, now - Duration::seconds(10)).unwrap();
        let second = store.create_request(None, jingle).unwrap();
        store.mark_queued(second.id, now, None).unwrap();
        store.mark_played(second.id, now).unwrap();
        store.create_request(Some(profile_id), song).unwrap();

        let history = store.list_played_requests(PageWindow::new(1, 10)).unwrap();
        assert_eq!(history.total, 2);
        assert_eq!(history.items[0].song.as_ref().unwrap().id, jingle);
        assert!(history.items[0].profile.is_none());
        assert_eq!(history.items[1].profile.as_ref().unwrap().user.name, "bob");

        assert_eq!(
            store.recent_played_song_types(1).unwrap(),
            vec![Some(SongType::Jingle)]
        );
        assert_eq!(store.recent_played_song_types(30).unwrap().len(), 2);
    }

    #[test]
    fn standing_includes_ratings() {
        let (store, _temp_dir) = create_tmp_store();
        let song_id = published_song(&store, SongType::Song, 100.0);
        for (i, value) in [5, 4].iter().enumerate() {
            let profile_id = profile(&store, &format!("fan{}", i));
            store.rate_song(profile_id, song_id, *value).unwrap();
        }
        let standing = store.song_standing(song_id).unwrap().unwrap();
        assert_eq!(standing.ratings.count, 2);
        assert_eq!(standing.ratings.average, Some(4.5));
        assert!(!standing.pending);
        assert!(store.song_standing(999).unwrap().is_none());
    }
}
