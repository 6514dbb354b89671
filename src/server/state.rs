use axum::extract::FromRef;

use crate::radio::RadioManager;
use crate::store::RadioStore;
use crate::user::UserManager;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

pub type GuardedRadioStore = Arc<dyn RadioStore>;
pub type GuardedUserManager = Arc<Mutex<UserManager>>;
/// Held for the whole next-song decision, so concurrent `/next` calls queue up.
pub type GuardedRadioManager = Arc<Mutex<RadioManager>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub store: GuardedRadioStore,
    pub user_manager: GuardedUserManager,
    pub radio_manager: GuardedRadioManager,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedRadioStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedRadioManager {
    fn from_ref(input: &ServerState) -> Self {
        input.radio_manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
