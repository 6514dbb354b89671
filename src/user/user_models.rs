use crate::catalog::{Disableable, SongRef, Timestamps};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_dj: bool,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub handle: String,
    pub name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_dj: bool,
}

/// Listener-facing wrapper around a user, created together with it.
#[derive(Clone, Debug, Serialize)]
pub struct RadioProfile {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub status: Disableable,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BasicUser {
    pub id: i64,
    pub name: String,
    pub is_staff: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct BasicProfile {
    pub id: i64,
    pub user: BasicUser,
}

/// What staff and the owner see.
#[derive(Clone, Debug, Serialize)]
pub struct FullProfile {
    #[serde(flatten)]
    pub profile: RadioProfile,
    pub user: User,
}

impl FullProfile {
    pub fn basic(&self) -> BasicProfile {
        BasicProfile {
            id: self.profile.id,
            user: BasicUser {
                id: self.user.id,
                name: display_name(&self.user),
                is_staff: self.user.is_staff,
            },
        }
    }
}

/// The display name, falling back to the handle.
pub fn display_name(user: &User) -> String {
    if user.name.trim().is_empty() {
        user.handle.clone()
    } else {
        user.name.clone()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Rating {
    pub id: i64,
    pub value: u8,
    pub profile: BasicProfile,
    pub song: SongRef,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingChange {
    Created,
    Updated,
}
