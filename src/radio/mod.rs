//! Song scheduling: cooldowns, the request queue and runtime settings.

pub mod eligibility;
mod radio_manager;
mod request_store;
pub(crate) mod schema;
mod settings;
mod song_request;
mod sqlite_request_store;

pub use eligibility::{ceil2, Cooldown, CooldownPolicy, RatingSummary, SongStanding};
pub use radio_manager::{MakeRequestError, NextRequestError, PlayedError, RadioManager, Requester};
pub use request_store::RequestStore;
pub use settings::{
    seed_default_settings, RadioSettings, Setting, SettingType, SettingValue, SettingsStore,
    DEFAULT_SETTINGS,
};
pub use song_request::{HistoryEntry, PlayoutSong, QueuedRequest, RequestState, SongRequest};
