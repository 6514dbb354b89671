//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, catalog IDs, etc.),
//! update only this file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Regular listener handle
pub const TEST_USER: &str = "testuser";

/// Regular listener password
pub const TEST_PASS: &str = "testpass123";

/// Second listener, used for ownership checks
pub const OTHER_USER: &str = "otheruser";

pub const OTHER_PASS: &str = "otherpass123";

/// Staff user handle
pub const ADMIN_USER: &str = "admin";

pub const ADMIN_PASS: &str = "adminpass123";

/// The DJ account driving playback
pub const DJ_USER: &str = "dj";

pub const DJ_PASS: &str = "djpass123";

/// Profiles are created together with users, in this order.
pub const TEST_USER_PROFILE_ID: i64 = 1;
pub const OTHER_USER_PROFILE_ID: i64 = 2;

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Game "Chrono Trigger"
pub const GAME_1_ID: i64 = 1;

/// Album "Chrono Trigger Original Soundtrack"
pub const ALBUM_1_ID: i64 = 1;

/// Artist Yasunori Mitsuda
pub const ARTIST_1_ID: i64 = 1;

/// Song "Corridors of Time"
pub const SONG_1_ID: i64 = 1;

/// Song "Wind Scene"
pub const SONG_2_ID: i64 = 2;

/// Jingle "Station ID"
pub const JINGLE_1_ID: i64 = 3;

// ============================================================================
// Test Catalog Metadata
// ============================================================================

pub const GAME_1_TITLE: &str = "Chrono Trigger";

pub const ALBUM_1_TITLE: &str = "Chrono Trigger Original Soundtrack";

pub const SONG_1_TITLE: &str = "Corridors of Time";

pub const SONG_2_TITLE: &str = "Wind Scene";

pub const JINGLE_1_TITLE: &str = "Station ID";

/// Length of every fixture store (seconds)
pub const SONG_LENGTH_SEC: f64 = 180.0;

pub const RADIO_NAME: &str = "Test Point Radio";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Rows per page on paginated listings
pub const TEST_PAGE_SIZE: usize = 2;
