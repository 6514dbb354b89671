pub mod auth;
pub mod permissions;
pub(crate) mod schema;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{AuthToken, AuthTokenValue, PasswordCredentials, RadioHasher};
pub use permissions::{Permission, UserRole};
pub use user_manager::UserManager;
pub use user_models::{
    display_name, BasicProfile, BasicUser, FullProfile, NewUser, RadioProfile, Rating,
    RatingChange, User,
};
pub use user_store::{
    FullUserStore, ProfileStore, UserAuthCredentialsStore, UserAuthTokenStore, UserStore,
};
