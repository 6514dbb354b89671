use crate::catalog::schema::{
    ALBUM_TABLE_V_0, ARTIST_TABLE_V_0, GAME_TABLE_V_0, SONG_ARTIST_TABLE_V_0,
    SONG_STORE_TABLE_V_0, SONG_TABLE_V_0, STORE_TABLE_V_0,
};
use crate::radio::schema::{SETTING_TABLE_V_0, SONG_REQUEST_TABLE_V_0};
use crate::sqlite_persistence::VersionedSchema;
use crate::user::schema::{
    AUTH_TOKEN_TABLE_V_0, FAVORITE_TABLE_V_0, RADIO_PROFILE_TABLE_V_0, RATING_TABLE_V_0,
    USER_PASSWORD_CREDENTIALS_TABLE_V_0, USER_TABLE_V_0,
};

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE_V_0,
        AUTH_TOKEN_TABLE_V_0,
        USER_PASSWORD_CREDENTIALS_TABLE_V_0,
        RADIO_PROFILE_TABLE_V_0,
        ALBUM_TABLE_V_0,
        ARTIST_TABLE_V_0,
        GAME_TABLE_V_0,
        STORE_TABLE_V_0,
        SONG_TABLE_V_0,
        SONG_ARTIST_TABLE_V_0,
        SONG_STORE_TABLE_V_0,
        FAVORITE_TABLE_V_0,
        RATING_TABLE_V_0,
        SONG_REQUEST_TABLE_V_0,
        SETTING_TABLE_V_0,
    ],
    migration: None,
}];
