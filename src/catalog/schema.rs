use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, DEFAULT_TIMESTAMP};

/// V 0
pub const ALBUM_TABLE_V_0: Table = Table {
    name: "album",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("sorted_title", &SqlType::Text, non_null = true),
        sqlite_column!("disabled", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!("disabled_date", &SqlType::Integer),
        sqlite_column!("disabled_reason", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("published_date", &SqlType::Integer),
        sqlite_column!("created", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
        sqlite_column!("modified", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[("idx_album_sorted_title", "sorted_title")],
    unique_constraints: &[],
};

pub const GAME_TABLE_V_0: Table = Table {
    name: "game",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("sorted_title", &SqlType::Text, non_null = true),
        sqlite_column!("disabled", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!("disabled_date", &SqlType::Integer),
        sqlite_column!("disabled_reason", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("published_date", &SqlType::Integer),
        sqlite_column!("created", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
        sqlite_column!("modified", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[("idx_game_sorted_title", "sorted_title")],
    unique_constraints: &[],
};

pub const ARTIST_TABLE_V_0: Table = Table {
    name: "artist",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("alias", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("first_name", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("last_name", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("sorted_full_name", &SqlType::Text, non_null = true),
        sqlite_column!("disabled", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!("disabled_date", &SqlType::Integer),
        sqlite_column!("disabled_reason", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("published_date", &SqlType::Integer),
        sqlite_column!("created", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
        sqlite_column!("modified", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[("idx_artist_sorted_full_name", "sorted_full_name")],
    unique_constraints: &[],
};

pub const STORE_TABLE_V_0: Table = Table {
    name: "store",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("iri", &SqlType::Text, non_null = true),
        sqlite_column!("mime_type", &SqlType::Text),
        sqlite_column!("file_size", &SqlType::Integer),
        sqlite_column!("length", &SqlType::Real),
        sqlite_column!("track_gain", &SqlType::Real),
        sqlite_column!("track_peak", &SqlType::Real),
        sqlite_column!("created", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
        sqlite_column!("modified", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const SONG_TABLE_V_0: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("song_type", &SqlType::Text, non_null = true, default_value = Some("'S'")),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("sorted_title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "album",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::SetNull,
            })
        ),
        sqlite_column!(
            "game_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "game",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::SetNull,
            })
        ),
        sqlite_column!("num_played", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!("last_played", &SqlType::Integer),
        sqlite_column!("next_play", &SqlType::Integer),
        sqlite_column!(
            "active_store_id",
            &SqlType::Integer,
            foreign_key = Some(&ForeignKey {
                foreign_table: "store",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::SetNull,
            })
        ),
        sqlite_column!("disabled", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!("disabled_date", &SqlType::Integer),
        sqlite_column!("disabled_reason", &SqlType::Text, non_null = true, default_value = Some("''")),
        sqlite_column!("published_date", &SqlType::Integer),
        sqlite_column!("created", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
        sqlite_column!("modified", &SqlType::Integer, non_null = true, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[
        ("idx_song_sorted_title", "sorted_title"),
        ("idx_song_album", "album_id"),
        ("idx_song_game", "game_id"),
    ],
    unique_constraints: &[],
};

pub const SONG_ARTIST_TABLE_V_0: Table = Table {
    name: "song_artist",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "song",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "artist",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_song_artist_artist", "artist_id")],
    unique_constraints: &[&["song_id", "artist_id"]],
};

pub const SONG_STORE_TABLE_V_0: Table = Table {
    name: "song_store",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "song",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "store_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "store",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[],
    unique_constraints: &[&["song_id", "store_id"]],
};
