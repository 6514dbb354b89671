use super::RequestsLoggingLevel;
use crate::config::{DEFAULT_PAGE_SIZE, DEFAULT_RADIO_NAME};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Rows per page on every paginated listing.
    pub page_size: usize,
    /// Shown by the home route and used as the jingle "artist".
    pub radio_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            page_size: DEFAULT_PAGE_SIZE,
            radio_name: DEFAULT_RADIO_NAME.to_string(),
        }
    }
}
