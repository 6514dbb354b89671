mod auth_routes;
mod catalog_routes;
mod control_routes;
mod profile_routes;

pub use auth_routes::make_auth_routes;
pub use catalog_routes::make_catalog_routes;
pub use control_routes::make_control_routes;
pub use profile_routes::make_profile_routes;
