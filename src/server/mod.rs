pub mod config;
mod http_layers;
pub mod pagination;
mod responses;
mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, make_service, run_server};
