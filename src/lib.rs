//! Save Point Radio backend library
//!
//! The binaries in this package (server and helper CLIs) are built on these modules.

pub mod catalog;
pub mod config;
pub mod dj;
pub mod object_store;
pub mod playlist;
pub mod radio;
pub mod server;
pub mod sqlite_persistence;
pub mod store;
pub mod user;

// Re-export commonly used types for convenience
pub use server::{make_app, make_service, run_server, RequestsLoggingLevel, ServerConfig};
pub use store::{RadioStore, SqliteRadioStore};
