//! Typed radio settings stored as text rows.
//!
//! The scheduling knobs live in the database so they can be tuned while the
//! server runs; every read goes through [`RadioSettings`] which falls back to
//! the defaults for missing rows.

use crate::store::{optional_row, SqliteRadioStore};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SettingType {
    Integer,
    Float,
    String,
    Bool,
}

impl SettingType {
    pub fn code(&self) -> i64 {
        match self {
            SettingType::Integer => 0,
            SettingType::Float => 1,
            SettingType::String => 2,
            SettingType::Bool => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(SettingType::Integer),
            1 => Ok(SettingType::Float),
            2 => Ok(SettingType::String),
            3 => Ok(SettingType::Bool),
            _ => bail!("Unknown setting type code {}", code),
        }
    }

    /// Checks `data` parses as this type, returning the text to store.
    /// Booleans are stored as `True`/`False`.
    pub fn normalize(&self, data: &str) -> Result<String> {
        let data = data.trim();
        match self {
            SettingType::Integer => {
                data.parse::<i64>()
                    .with_context(|| format!("{} is not an integer", data))?;
                Ok(data.to_string())
            }
            SettingType::Float => {
                data.parse::<f64>()
                    .with_context(|| format!("{} is not a number", data))?;
                Ok(data.to_string())
            }
            SettingType::String => Ok(data.to_string()),
            SettingType::Bool => match data.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok("True".to_string()),
                "false" | "0" | "no" => Ok("False".to_string()),
                _ => bail!("{} is not a boolean", data),
            },
        }
    }
}

impl FromStr for SettingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Integer" => Ok(SettingType::Integer),
            "Float" => Ok(SettingType::Float),
            "String" => Ok(SettingType::String),
            "Bool" => Ok(SettingType::Bool),
            _ => bail!("Unknown setting type {} (Integer, Float, String, Bool)", s),
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingType::Integer => "Integer",
            SettingType::Float => "Float",
            SettingType::String => "String",
            SettingType::Bool => "Bool",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

#[derive(Debug, Clone, Serialize)]
pub struct Setting {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub setting_type: SettingType,
    pub data: String,
}

impl Setting {
    pub fn value(&self) -> Result<SettingValue> {
        Ok(match self.setting_type {
            SettingType::Integer => SettingValue::Integer(
                self.data
                    .trim()
                    .parse()
                    .with_context(|| format!("Setting {} is not an integer", self.name))?,
            ),
            SettingType::Float => SettingValue::Float(
                self.data
                    .trim()
                    .parse()
                    .with_context(|| format!("Setting {} is not a number", self.name))?,
            ),
            SettingType::String => SettingValue::String(self.data.clone()),
            SettingType::Bool => SettingValue::Bool(self.data == "True"),
        })
    }
}

pub struct DefaultSetting {
    pub name: &'static str,
    pub description: &'static str,
    pub setting_type: SettingType,
    pub data: &'static str,
}

pub const DEFAULT_SETTINGS: &[DefaultSetting] = &[
    DefaultSetting {
        name: "max_song_requests",
        description: "Pending requests a listener may have at once.",
        setting_type: SettingType::Integer,
        data: "5",
    },
    DefaultSetting {
        name: "replay_ratio",
        description: "Fraction of the playlist length a song waits before it can be requested again.",
        setting_type: SettingType::Float,
        data: "0.75",
    },
    DefaultSetting {
        name: "songs_per_jingle",
        description: "Played requests between two jingles.",
        setting_type: SettingType::Integer,
        data: "30",
    },
    DefaultSetting {
        name: "min_ratings_for_variance",
        description: "Ratings a song needs before they change its replay wait.",
        setting_type: SettingType::Integer,
        data: "5",
    },
    DefaultSetting {
        name: "rating_variance_ratio",
        description: "How far ratings can move the replay ratio.",
        setting_type: SettingType::Float,
        data: "0.2",
    },
];

/// Inserts the default settings that are missing, returning how many were added.
pub fn seed_default_settings(conn: &Connection) -> Result<usize> {
    let mut inserted = 0;
    for setting in DEFAULT_SETTINGS {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO setting (name, description, setting_type, data) VALUES (?1, ?2, ?3, ?4)",
            params![
                setting.name,
                setting.description,
                setting.setting_type.code(),
                setting.data
            ],
        )?;
    }
    Ok(inserted)
}

/// The scheduling knobs, resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioSettings {
    pub max_song_requests: i64,
    pub replay_ratio: f64,
    pub songs_per_jingle: i64,
    pub min_ratings_for_variance: i64,
    pub rating_variance_ratio: f64,
}

impl Default for RadioSettings {
    fn default() -> Self {
        RadioSettings {
            max_song_requests: 5,
            replay_ratio: 0.75,
            songs_per_jingle: 30,
            min_ratings_for_variance: 5,
            rating_variance_ratio: 0.2,
        }
    }
}

impl RadioSettings {
    pub fn from_settings(settings: &[Setting]) -> Result<Self> {
        let mut resolved = RadioSettings::default();
        for setting in settings {
            match (setting.name.as_str(), setting.value()?) {
                ("max_song_requests", SettingValue::Integer(v)) => resolved.max_song_requests = v,
                ("songs_per_jingle", SettingValue::Integer(v)) => resolved.songs_per_jingle = v,
                ("min_ratings_for_variance", SettingValue::Integer(v)) => {
                    resolved.min_ratings_for_variance = v
                }
                ("replay_ratio", SettingValue::Float(v)) => resolved.replay_ratio = v,
                ("replay_ratio", SettingValue::Integer(v)) => resolved.replay_ratio = v as f64,
                ("rating_variance_ratio", SettingValue::Float(v)) => {
                    resolved.rating_variance_ratio = v
                }
                ("rating_variance_ratio", SettingValue::Integer(v)) => {
                    resolved.rating_variance_ratio = v as f64
                }
                (
                    "max_song_requests"
                    | "songs_per_jingle"
                    | "min_ratings_for_variance"
                    | "replay_ratio"
                    | "rating_variance_ratio",
                    _,
                ) => bail!(
                    "Setting {} has unexpected type {}",
                    setting.name,
                    setting.setting_type
                ),
                _ => {}
            }
        }
        Ok(resolved)
    }
}

pub trait SettingsStore: Send + Sync {
    fn list_settings(&self) -> Result<Vec<Setting>>;

    fn get_setting(&self, name: &str) -> Result<Option<Setting>>;

    /// Updates an existing setting, optionally changing its type. A new
    /// setting requires a type.
    fn set_setting(
        &self,
        name: &str,
        data: &str,
        setting_type: Option<SettingType>,
    ) -> Result<Setting>;

    fn radio_settings(&self) -> Result<RadioSettings> {
        RadioSettings::from_settings(&self.list_settings()?)
    }
}

fn setting_from_row(row: &Row) -> rusqlite::Result<(i64, String, String, i64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_setting(raw: (i64, String, String, i64, String)) -> Result<Setting> {
    let (id, name, description, code, data) = raw;
    Ok(Setting {
        id,
        name,
        description,
        setting_type: SettingType::from_code(code)?,
        data,
    })
}

fn query_setting(conn: &Connection, name: &str) -> Result<Option<Setting>> {
    optional_row(conn.query_row(
        "SELECT id, name, description, setting_type, data FROM setting WHERE name = ?1",
        params![name],
        setting_from_row,
    ))?
    .map(into_setting)
    .transpose()
}

impl SettingsStore for SqliteRadioStore {
    fn list_settings(&self) -> Result<Vec<Setting>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, name, description, setting_type, data FROM setting ORDER BY name")?;
        let rows = stmt
            .query_map([], setting_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(into_setting).collect()
    }

    fn get_setting(&self, name: &str) -> Result<Option<Setting>> {
        let conn = self.conn.lock().unwrap();
        query_setting(&conn, name)
    }

    fn set_setting(
        &self,
        name: &str,
        data: &str,
        setting_type: Option<SettingType>,
    ) -> Result<Setting> {
        let conn = self.conn.lock().unwrap();
        match query_setting(&conn, name)? {
            Some(existing) => {
                let setting_type = setting_type.unwrap_or(existing.setting_type);
                let data = setting_type.normalize(data)?;
                conn.execute(
                    "UPDATE setting SET setting_type = ?2, data = ?3 WHERE id = ?1",
                    params![existing.id, setting_type.code(), data],
                )?;
            }
            None => {
                let Some(setting_type) = setting_type else {
                    bail!("New settings need type (Integer, Float, String, Bool)");
                };
                let data = setting_type.normalize(data)?;
                conn.execute(
                    "INSERT INTO setting (name, setting_type, data) VALUES (?1, ?2, ?3)",
                    params![name, setting_type.code(), data],
                )?;
            }
        }
        query_setting(&conn, name)?.with_context(|| format!("Setting {} vanished", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::create_tmp_store;

    #[test]
    fn defaults_are_seeded_once() {
        let (store, temp_dir) = create_tmp_store();
        assert_eq!(store.list_settings().unwrap().len(), DEFAULT_SETTINGS.len());
        assert_eq!(store.radio_settings().unwrap(), RadioSettings::default());

        store.set_setting("replay_ratio", "0.5", None).unwrap();
        drop(store);
        let store = SqliteRadioStore::new(temp_dir.path().join("radio.db")).unwrap();
        assert_eq!(store.radio_settings().unwrap().replay_ratio, 0.5);
    }

    #[test]
    fn new_setting_needs_type() {
        let (store, _temp_dir) = create_tmp_store();
        let err = store.set_setting("station_motto", "Press start", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "New settings need type (Integer, Float, String, Bool)"
        );
        let setting = store
            .set_setting("station_motto", "Press start", Some(SettingType::String))
            .unwrap();
        assert_eq!(setting.value().unwrap(), SettingValue::String("Press start".to_string()));
    }

    #[test]
    fn values_are_checked_against_type() {
        let (store, _temp_dir) = create_tmp_store();
        assert!(store.set_setting("max_song_requests", "lots", None).is_err());
        let setting = store
            .set_setting("night_mode", "true", Some(SettingType::Bool))
            .unwrap();
        assert_eq!(setting.data, "True");
        assert_eq!(setting.value().unwrap(), SettingValue::Bool(true));
    }

    #[test]
    fn setting_type_codes() {
        for setting_type in [
            SettingType::Integer,
            SettingType::Float,
            SettingType::String,
            SettingType::Bool,
        ] {
            assert_eq!(SettingType::from_code(setting_type.code()).unwrap(), setting_type);
            assert_eq!(
                setting_type.to_string().parse::<SettingType>().unwrap(),
                setting_type
            );
        }
        assert!(SettingType::from_code(9).is_err());
    }

    #[test]
    fn mistyped_known_setting_is_an_error() {
        let (store, _temp_dir) = create_tmp_store();
        store
            .set_setting("songs_per_jingle", "many", Some(SettingType::String))
            .unwrap();
        assert!(store.radio_settings().is_err());
    }
}
