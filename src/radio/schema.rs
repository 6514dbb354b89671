use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, DEFAULT_TIMESTAMP};

/// V 0
pub const SONG_REQUEST_TABLE_V_0: Table = Table {
    name: "song_request",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "profile_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "radio_profile",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::SetNull,
            })
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "song",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::SetNull,
            })
        ),
        sqlite_column!("created", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
        sqlite_column!("queued_at", &SqlType::Integer),
        sqlite_column!("played_at", &SqlType::Integer),
    ],
    indices: &[
        ("idx_song_request_played_at", "played_at"),
        ("idx_song_request_song", "song_id"),
        ("idx_song_request_profile", "profile_id"),
    ],
    unique_constraints: &[],
};

pub const SETTING_TABLE_V_0: Table = Table {
    name: "setting",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("description", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("setting_type", &SqlType::Integer, non_null = true),
        sqlite_column!("data", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};
