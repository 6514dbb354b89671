use super::auth::{AuthToken, AuthTokenValue, PasswordCredentials};
use super::user_models::{BasicProfile, FullProfile, NewUser, Rating, RatingChange, User};
use crate::catalog::SongRef;
use crate::store::{Page, PageWindow};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub trait UserAuthCredentialsStore: Send + Sync {
    /// Returns Ok(None) if the user has no password set.
    fn get_password_credentials(&self, user_id: i64) -> Result<Option<PasswordCredentials>>;

    /// Inserts or replaces the user's password credentials.
    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()>;

    /// Records a login attempt, `succeeded` also updates `last_used`.
    fn record_password_attempt(&self, user_id: i64, at: DateTime<Utc>, succeeded: bool)
        -> Result<()>;
}

pub trait UserAuthTokenStore: Send + Sync {
    /// Returns Ok(None) if the token does not exist.
    fn get_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    /// Returns the deleted token, Ok(None) if it did not exist.
    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()>;

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()>;

    fn get_user_auth_tokens(&self, user_id: i64) -> Result<Vec<AuthToken>>;
}

pub trait UserStore: Send + Sync {
    /// Creates the user and its radio profile, returning the user id.
    fn create_user(&self, user: &NewUser) -> Result<i64>;

    fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    fn get_user_by_handle(&self, handle: &str) -> Result<Option<User>>;

    fn list_users(&self) -> Result<Vec<User>>;

    /// `None` leaves a flag untouched. Returns false if the user does not exist.
    fn set_user_flags(&self, user_id: i64, is_staff: Option<bool>, is_dj: Option<bool>)
        -> Result<bool>;

    fn record_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<()>;
}

pub trait ProfileStore: Send + Sync {
    fn get_profile(&self, profile_id: i64) -> Result<Option<FullProfile>>;

    fn get_profile_for_user(&self, user_id: i64) -> Result<Option<FullProfile>>;

    /// Ordered by user name.
    fn list_profiles(&self, window: PageWindow) -> Result<Page<BasicProfile>>;

    /// Also activates or deactivates the owning user.
    fn set_profile_enabled(&self, profile_id: i64, enabled: bool, reason: &str) -> Result<bool>;

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Returns false if the song was already a favorite.
    fn add_favorite(&self, profile_id: i64, song_id: i64) -> Result<bool>;

    /// Returns false if the song was not a favorite.
    fn remove_favorite(&self, profile_id: i64, song_id: i64) -> Result<bool>;

    fn list_profile_favorites(&self, profile_id: i64, window: PageWindow) -> Result<Page<SongRef>>;

    /// Profiles that favorited the song, ordered by user name.
    fn list_song_favorites(&self, song_id: i64, window: PageWindow) -> Result<Page<BasicProfile>>;

    // =========================================================================
    // Ratings
    // =========================================================================

    /// Creates or updates the profile's rating of a song.
    fn rate_song(&self, profile_id: i64, song_id: i64, value: u8) -> Result<RatingChange>;

    /// Returns false if there was no rating to delete.
    fn unrate_song(&self, profile_id: i64, song_id: i64) -> Result<bool>;

    /// Newest first.
    fn list_profile_ratings(&self, profile_id: i64, window: PageWindow) -> Result<Page<Rating>>;

    /// Newest first.
    fn list_song_ratings(&self, song_id: i64, window: PageWindow) -> Result<Page<Rating>>;
}

pub trait FullUserStore:
    UserStore + UserAuthTokenStore + UserAuthCredentialsStore + ProfileStore
{
}

impl<T: UserStore + UserAuthTokenStore + UserAuthCredentialsStore + ProfileStore> FullUserStore
    for T
{
}
