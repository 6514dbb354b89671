mod behaviors;
pub mod iri;
mod models;
mod naturalize;
pub(crate) mod schema;
mod store;
mod trait_def;
pub mod validation;

pub use behaviors::{cascade_disable_reason, is_available, Disableable, Publishable, Timestamps};
pub use models::*;
pub use naturalize::{artist_full_name, naturalize};
pub(crate) use store::song_type_from_column;
pub use trait_def::CatalogStore;
