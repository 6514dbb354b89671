use super::auth::{AuthToken, AuthTokenValue, PasswordCredentials};
use super::user_models::{
    BasicProfile, BasicUser, FullProfile, NewUser, RadioProfile, Rating, RatingChange, User,
};
use super::user_store::{ProfileStore, UserAuthCredentialsStore, UserAuthTokenStore, UserStore};
use crate::catalog::{song_type_from_column, Disableable, SongRef, Timestamps};
use crate::sqlite_persistence::{from_db_timestamp, to_db_timestamp};
use crate::store::{in_transaction, optional_row, Page, PageWindow, SqliteRadioStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::debug;

const USER_COLUMNS: &str =
    "u.id, u.handle, u.name, u.email, u.is_staff, u.is_dj, u.is_active, u.created, u.last_login";
const PROFILE_COLUMNS: &str =
    "p.id, p.user_id, p.disabled, p.disabled_date, p.disabled_reason, p.created, p.modified";
const BASIC_PROFILE_COLUMNS: &str = "p.id, u.id, u.name, u.handle, u.is_staff";
const RATING_COLUMNS: &str = "r.id, r.value, r.created, r.modified, p.id, u.id, u.name, u.handle, u.is_staff, s.id, s.song_type, s.title";
const RATING_JOINS: &str = "rating r
     JOIN radio_profile p ON p.id = r.profile_id
     JOIN user u ON u.id = p.user_id
     JOIN song s ON s.id = r.song_id";
const USER_NAME_ORDER: &str =
    "CASE WHEN u.name = '' THEN u.handle ELSE u.name END COLLATE NOCASE, p.id";

fn user_from_row(row: &Row, start: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(start)?,
        handle: row.get(start + 1)?,
        name: row.get(start + 2)?,
        email: row.get(start + 3)?,
        is_staff: row.get(start + 4)?,
        is_dj: row.get(start + 5)?,
        is_active: row.get(start + 6)?,
        created: from_db_timestamp(row.get(start + 7)?),
        last_login: row.get::<_, Option<i64>>(start + 8)?.map(from_db_timestamp),
    })
}

fn full_profile_from_row(row: &Row) -> rusqlite::Result<FullProfile> {
    Ok(FullProfile {
        profile: RadioProfile {
            id: row.get(0)?,
            user_id: row.get(1)?,
            status: Disableable {
                disabled: row.get(2)?,
                disabled_date: row.get::<_, Option<i64>>(3)?.map(from_db_timestamp),
                disabled_reason: row.get(4)?,
            },
            timestamps: Timestamps {
                created_date: from_db_timestamp(row.get(5)?),
                modified_date: from_db_timestamp(row.get(6)?),
            },
        },
        user: user_from_row(row, 7)?,
    })
}

fn basic_profile_from_row(row: &Row, start: usize) -> rusqlite::Result<BasicProfile> {
    let name: String = row.get(start + 2)?;
    let handle: String = row.get(start + 3)?;
    Ok(BasicProfile {
        id: row.get(start)?,
        user: BasicUser {
            id: row.get(start + 1)?,
            name: if name.trim().is_empty() { handle } else { name },
            is_staff: row.get(start + 4)?,
        },
    })
}

fn rating_from_row(row: &Row) -> rusqlite::Result<Rating> {
    Ok(Rating {
        id: row.get(0)?,
        value: row.get(1)?,
        created_date: from_db_timestamp(row.get(2)?),
        modified_date: from_db_timestamp(row.get(3)?),
        profile: basic_profile_from_row(row, 4)?,
        song: SongRef {
            id: row.get(9)?,
            song_type: song_type_from_column(row, 10)?,
            title: row.get(11)?,
        },
    })
}

fn auth_token_from_row(row: &Row) -> rusqlite::Result<AuthToken> {
    Ok(AuthToken {
        user_id: row.get(0)?,
        value: AuthTokenValue(row.get(1)?),
        created: from_db_timestamp(row.get(2)?),
        last_used: row.get::<_, Option<i64>>(3)?.map(from_db_timestamp),
    })
}

fn query_full_profile(
    conn: &Connection,
    condition: &str,
    id: i64,
) -> Result<Option<FullProfile>> {
    optional_row(conn.query_row(
        &format!(
            "SELECT {}, {} FROM radio_profile p JOIN user u ON u.id = p.user_id WHERE {}",
            PROFILE_COLUMNS, USER_COLUMNS, condition
        ),
        params![id],
        full_profile_from_row,
    ))
}

fn count_where(conn: &Connection, from: &str, condition: &str, id: i64) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE {}", from, condition),
        params![id],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

fn query_page<T>(
    conn: &Connection,
    sql: &str,
    id: i64,
    window: PageWindow,
    map: impl FnMut(&Row) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(&format!("{} LIMIT ?2 OFFSET ?3", sql))?;
    let items = stmt
        .query_map(
            params![id, window.limit() as i64, window.offset() as i64],
            map,
        )?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(items)
}

impl UserStore for SqliteRadioStore {
    fn create_user(&self, user: &NewUser) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        in_transaction(&conn, |conn| {
            conn.execute(
                "INSERT INTO user (handle, name, email, is_staff, is_dj) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user.handle, user.name, user.email, user.is_staff, user.is_dj],
            )
            .with_context(|| format!("Failed to create user {}", user.handle))?;
            let user_id = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO radio_profile (user_id) VALUES (?1)",
                params![user_id],
            )?;
            debug!("Created user {} with id {}", user.handle, user_id);
            Ok(user_id)
        })
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM user u WHERE u.id = ?1", USER_COLUMNS),
            params![user_id],
            |row| user_from_row(row, 0),
        ))
    }

    fn get_user_by_handle(&self, handle: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            &format!("SELECT {} FROM user u WHERE u.handle = ?1", USER_COLUMNS),
            params![handle],
            |row| user_from_row(row, 0),
        ))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user u ORDER BY u.handle",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map([], |row| user_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn set_user_flags(
        &self,
        user_id: i64,
        is_staff: Option<bool>,
        is_dj: Option<bool>,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE user SET is_staff = COALESCE(?2, is_staff), is_dj = COALESCE(?3, is_dj) WHERE id = ?1",
            params![user_id, is_staff, is_dj],
        )?;
        Ok(changed > 0)
    }

    fn record_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE user SET last_login = ?2 WHERE id = ?1",
            params![user_id, to_db_timestamp(&at)],
        )?;
        Ok(())
    }
}

impl UserAuthTokenStore for SqliteRadioStore {
    fn get_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        optional_row(conn.query_row(
            "SELECT user_id, value, created, last_used FROM auth_token WHERE value = ?1",
            params![token.0],
            auth_token_from_row,
        ))
    }

    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let existing = optional_row(conn.query_row(
            "SELECT user_id, value, created, last_used FROM auth_token WHERE value = ?1",
            params![token.0],
            auth_token_from_row,
        ))?;
        if existing.is_some() {
            conn.execute("DELETE FROM auth_token WHERE value = ?1", params![token.0])?;
        }
        Ok(existing)
    }

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE auth_token SET last_used = ?2 WHERE value = ?1",
            params![token.0, to_db_timestamp(&Utc::now())],
        )?;
        Ok(())
    }

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO auth_token (user_id, value, created, last_used) VALUES (?1, ?2, ?3, ?4)",
            params![
                token.user_id,
                token.value.0,
                to_db_timestamp(&token.created),
                token.last_used.as_ref().map(to_db_timestamp)
            ],
        )
        .context("Failed to store auth token")?;
        Ok(())
    }

    fn get_user_auth_tokens(&self, user_id: i64) -> Result<Vec<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, value, created, last_used FROM auth_token WHERE user_id = ?1 ORDER BY created",
        )?;
        let tokens = stmt
            .query_map(params![user_id], auth_token_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tokens)
    }
}

impl UserAuthCredentialsStore for SqliteRadioStore {
    fn get_password_credentials(&self, user_id: i64) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = optional_row(conn.query_row(
            "SELECT user_id, salt, hash, hasher, created, last_tried, last_used
             FROM user_password_credentials WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                ))
            },
        ))?;
        let Some((user_id, salt, hash, hasher, created, last_tried, last_used)) = row else {
            return Ok(None);
        };
        Ok(Some(PasswordCredentials {
            user_id,
            salt,
            hash,
            hasher: hasher.parse()?,
            created: from_db_timestamp(created),
            last_tried: last_tried.map(from_db_timestamp),
            last_used: last_used.map(from_db_timestamp),
        }))
    }

    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO user_password_credentials
             (user_id, salt, hash, hasher, created, last_tried, last_used)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                credentials.user_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string(),
                to_db_timestamp(&credentials.created),
                credentials.last_tried.as_ref().map(to_db_timestamp),
                credentials.last_used.as_ref().map(to_db_timestamp)
            ],
        )
        .with_context(|| format!("Failed to store credentials of user {}", credentials.user_id))?;
        Ok(())
    }

    fn record_password_attempt(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
        succeeded: bool,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let at = to_db_timestamp(&at);
        if succeeded {
            conn.execute(
                "UPDATE user_password_credentials SET last_tried = ?2, last_used = ?2 WHERE user_id = ?1",
                params![user_id, at],
            )?;
        } else {
            conn.execute(
                "UPDATE user_password_credentials SET last_tried = ?2 WHERE user_id = ?1",
                params![user_id, at],
            )?;
        }
        Ok(())
    }
}

impl ProfileStore for SqliteRadioStore {
    fn get_profile(&self, profile_id: i64) -> Result<Option<FullProfile>> {
        let conn = self.conn.lock().unwrap();
        query_full_profile(&conn, "p.id = ?1", profile_id)
    }

    fn get_profile_for_user(&self, user_id: i64) -> Result<Option<FullProfile>> {
        let conn = self.conn.lock().unwrap();
        query_full_profile(&conn, "p.user_id = ?1", user_id)
    }

    fn list_profiles(&self, window: PageWindow) -> Result<Page<BasicProfile>> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM radio_profile", [], |r| r.get(0))?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM radio_profile p JOIN user u ON u.id = p.user_id ORDER BY {} LIMIT ?1 OFFSET ?2",
            BASIC_PROFILE_COLUMNS, USER_NAME_ORDER
        ))?;
        let items = stmt
            .query_map(
                params![window.limit() as i64, window.offset() as i64],
                |row| basic_profile_from_row(row, 0),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Page {
            items,
            total: total as usize,
        })
    }

    fn set_profile_enabled(&self, profile_id: i64, enabled: bool, reason: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let now = to_db_timestamp(&Utc::now());
        in_transaction(&conn, |conn| {
            let changed = if enabled {
                conn.execute(
                    "UPDATE radio_profile SET disabled = 0, disabled_date = NULL, disabled_reason = '', modified = ?2 WHERE id = ?1",
                    params![profile_id, now],
                )?
            } else {
                conn.execute(
                    "UPDATE radio_profile SET disabled = 1, disabled_date = ?2, disabled_reason = ?3, modified = ?2 WHERE id = ?1",
                    params![profile_id, now, reason],
                )?
            };
            if changed == 0 {
                return Ok(false);
            }
            conn.execute(
                "UPDATE user SET is_active = ?2 WHERE id = (SELECT user_id FROM radio_profile WHERE id = ?1)",
                params![profile_id, enabled],
            )?;
            Ok(true)
        })
    }

    fn add_favorite(&self, profile_id: i64, song_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO favorite (profile_id, song_id) VALUES (?1, ?2)",
            params![profile_id, song_id],
        )?;
        Ok(inserted > 0)
    }

    fn remove_favorite(&self, profile_id: i64, song_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM favorite WHERE profile_id = ?1 AND song_id = ?2",
            params![profile_id, song_id],
        )?;
        Ok(deleted > 0)
    }

    fn list_profile_favorites(&self, profile_id: i64, window: PageWindow) -> Result<Page<SongRef>> {
        let conn = self.conn.lock().unwrap();
        let total = count_where(&conn, "favorite", "profile_id = ?1", profile_id)?;
        let items = query_page(
            &conn,
            "SELECT s.id, s.song_type, s.title FROM favorite f JOIN song s ON s.id = f.song_id
             WHERE f.profile_id = ?1 ORDER BY s.sorted_title, s.id",
            profile_id,
            window,
            |row| {
                Ok(SongRef {
                    id: row.get(0)?,
                    song_type: song_type_from_column(row, 1)?,
                    title: row.get(2)?,
                })
            },
        )?;
        Ok(Page { items, total })
    }

    fn list_song_favorites(&self, song_id: i64, window: PageWindow) -> Result<Page<BasicProfile>> {
        let conn = self.conn.lock().unwrap();
        let total = count_where(&conn, "favorite", "song_id = ?1", song_id)?;
        let items = query_page(
            &conn,
            &format!(
                "SELECT {} FROM favorite f
                 JOIN radio_profile p ON p.id = f.profile_id
                 JOIN user u ON u.id = p.user_id
                 WHERE f.song_id = ?1 ORDER BY {}",
                BASIC_PROFILE_COLUMNS, USER_NAME_ORDER
            ),
            song_id,
            window,
            |row| basic_profile_from_row(row, 0),
        )?;
        Ok(Page { items, total })
    }

    fn rate_song(&self, profile_id: i64, song_id: i64, value: u8) -> Result<RatingChange> {
        let conn = self.conn.lock().unwrap();
        let now = to_db_timestamp(&Utc::now());
        in_transaction(&conn, |conn| {
            let updated = conn.execute(
                "UPDATE rating SET value = ?3, modified = ?4 WHERE profile_id = ?1 AND song_id = ?2",
                params![profile_id, song_id, value, now],
            )?;
            if updated > 0 {
                return Ok(RatingChange::Updated);
            }
            conn.execute(
                "INSERT INTO rating (profile_id, song_id, value, created, modified) VALUES (?1, ?2, ?3, ?4, ?4)",
                params![profile_id, song_id, value, now],
            )?;
            Ok(RatingChange::Created)
        })
    }

    fn unrate_song(&self, profile_id: i64, song_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM rating WHERE profile_id = ?1 AND song_id = ?2",
            params![profile_id, song_id],
        )?;
        Ok(deleted > 0)
    }

    fn list_profile_ratings(&self, profile_id: i64, window: PageWindow) -> Result<Page<Rating>> {
        let conn = self.conn.lock().unwrap();
        let total = count_where(&conn, "rating", "profile_id = ?1", profile_id)?;
        let items = query_page(
            &conn,
            &format!(
                "SELECT {} FROM {} WHERE r.profile_id = ?1 ORDER BY r.created DESC, r.id DESC",
                RATING_COLUMNS, RATING_JOINS
            ),
            profile_id,
            window,
            rating_from_row,
        )?;
        Ok(Page { items, total })
    }

    fn list_song_ratings(&self, song_id: i64, window: PageWindow) -> Result<Page<Rating>> {
        let conn = self.conn.lock().unwrap();
        let total = count_where(&conn, "rating", "song_id = ?1", song_id)?;
        let items = query_page(
            &conn,
            &format!(
                "SELECT {} FROM {} WHERE r.song_id = ?1 ORDER BY r.created DESC, r.id DESC",
                RATING_COLUMNS, RATING_JOINS
            ),
            song_id,
            window,
            rating_from_row,
        )?;
        Ok(Page { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogStore, SongInput, SongType};
    use crate::store::test_support::create_tmp_store;
    use crate::user::auth::RadioHasher;

    fn listener(handle: &str) -> NewUser {
        NewUser {
            handle: handle.to_string(),
            ..Default::default()
        }
    }

    fn song(store: &SqliteRadioStore, title: &str) -> i64 {
        store
            .create_song(&SongInput {
                song_type: SongType::Song,
                title: title.to_string(),
                album_id: None,
                game_id: None,
            })
            .unwrap()
    }

    #[test]
    fn creating_user_creates_profile() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("alice")).unwrap();
        assert!(store.create_user(&listener("alice")).is_err());

        let profile = store.get_profile_for_user(user_id).unwrap().unwrap();
        assert_eq!(profile.user.handle, "alice");
        assert!(profile.user.is_active);
        assert_eq!(profile.basic().user.name, "alice");
        assert!(store
            .get_profile(profile.profile.id)
            .unwrap()
            .is_some());
    }

    #[test]
    fn user_flags_and_login() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("bob")).unwrap();
        assert!(store.set_user_flags(user_id, Some(true), None).unwrap());
        let user = store.get_user(user_id).unwrap().unwrap();
        assert!(user.is_staff);
        assert!(!user.is_dj);
        assert!(!store.set_user_flags(999, Some(true), None).unwrap());

        let now = Utc::now();
        store.record_login(user_id, now).unwrap();
        let user = store.get_user_by_handle("bob").unwrap().unwrap();
        assert_eq!(user.last_login.unwrap().timestamp(), now.timestamp());
    }

    #[test]
    fn disabling_profile_deactivates_user() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("carol")).unwrap();
        let profile_id = store.get_profile_for_user(user_id).unwrap().unwrap().profile.id;

        assert!(store.set_profile_enabled(profile_id, false, "spam").unwrap());
        let profile = store.get_profile(profile_id).unwrap().unwrap();
        assert!(profile.profile.status.disabled);
        assert_eq!(profile.profile.status.disabled_reason, "spam");
        assert!(!profile.user.is_active);

        assert!(store.set_profile_enabled(profile_id, true, "").unwrap());
        assert!(store.get_user(user_id).unwrap().unwrap().is_active);
        assert!(!store.set_profile_enabled(999, true, "").unwrap());
    }

    #[test]
    fn auth_tokens_lifecycle() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("dave")).unwrap();
        let token = AuthToken {
            user_id,
            created: Utc::now(),
            last_used: None,
            value: AuthTokenValue::generate(),
        };
        store.add_user_auth_token(&token).unwrap();
        assert!(store.add_user_auth_token(&token).is_err());

        store
            .update_user_auth_token_last_used_timestamp(&token.value)
            .unwrap();
        let stored = store.get_user_auth_token(&token.value).unwrap().unwrap();
        assert!(stored.last_used.is_some());
        assert_eq!(store.get_user_auth_tokens(user_id).unwrap().len(), 1);

        assert!(store.delete_user_auth_token(&token.value).unwrap().is_some());
        assert!(store.delete_user_auth_token(&token.value).unwrap().is_none());
    }

    #[test]
    fn password_credentials_upsert() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("erin")).unwrap();
        assert!(store.get_password_credentials(user_id).unwrap().is_none());

        let credentials = PasswordCredentials {
            user_id,
            salt: "salt".to_string(),
            hash: "hash".to_string(),
            hasher: RadioHasher::Argon2,
            created: Utc::now(),
            last_tried: None,
            last_used: None,
        };
        store.set_password_credentials(&credentials).unwrap();
        store
            .set_password_credentials(&PasswordCredentials {
                hash: "other".to_string(),
                ..credentials
            })
            .unwrap();
        store
            .record_password_attempt(user_id, Utc::now(), false)
            .unwrap();

        let stored = store.get_password_credentials(user_id).unwrap().unwrap();
        assert_eq!(stored.hash, "other");
        assert!(stored.last_tried.is_some());
        assert!(stored.last_used.is_none());
    }

    #[test]
    fn favorites_toggle() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("frank")).unwrap();
        let profile_id = store.get_profile_for_user(user_id).unwrap().unwrap().profile.id;
        let song_id = song(&store, "Aquatic Ambience");

        assert!(store.add_favorite(profile_id, song_id).unwrap());
        assert!(!store.add_favorite(profile_id, song_id).unwrap());

        let favorites = store
            .list_profile_favorites(profile_id, PageWindow::new(1, 10))
            .unwrap();
        assert_eq!(favorites.total, 1);
        assert_eq!(favorites.items[0].title, "Aquatic Ambience");
        let fans = store
            .list_song_favorites(song_id, PageWindow::new(1, 10))
            .unwrap();
        assert_eq!(fans.items[0].id, profile_id);

        assert!(store.remove_favorite(profile_id, song_id).unwrap());
        assert!(!store.remove_favorite(profile_id, song_id).unwrap());
    }

    #[test]
    fn ratings_create_update_delete() {
        let (store, _temp_dir) = create_tmp_store();
        let user_id = store.create_user(&listener("gina")).unwrap();
        let profile_id = store.get_profile_for_user(user_id).unwrap().unwrap().profile.id;
        let song_id = song(&store, "Dire Dire Docks");

        assert_eq!(
            store.rate_song(profile_id, song_id, 4).unwrap(),
            RatingChange::Created
        );
        assert_eq!(
            store.rate_song(profile_id, song_id, 2).unwrap(),
            RatingChange::Updated
        );
        let ratings = store
            .list_song_ratings(song_id, PageWindow::new(1, 10))
            .unwrap();
        assert_eq!(ratings.total, 1);
        assert_eq!(ratings.items[0].value, 2);
        assert_eq!(ratings.items[0].profile.user.name, "gina");

        let details = store.get_song_details(song_id).unwrap().unwrap();
        assert_eq!(details.average_rating, Some(2.0));

        assert!(store.unrate_song(profile_id, song_id).unwrap());
        assert!(!store.unrate_song(profile_id, song_id).unwrap());
        assert_eq!(
            store
                .list_profile_ratings(profile_id, PageWindow::new(1, 10))
                .unwrap()
                .total,
            0
        );
    }
}
