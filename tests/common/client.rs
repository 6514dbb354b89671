//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per radio endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Token returned by the last successful login
    pub token: Option<String>,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Creates a client logged in with the given credentials
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated_as(base_url: String, handle: &str, password: &str) -> Self {
        let mut client = Self::new(base_url);

        let response = client.login(handle, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Authentication of {} failed",
            handle
        );
        let body: Value = response.json().await.expect("Invalid login response");
        client.token = body["token"].as_str().map(str::to_string);

        client
    }

    /// Creates a client pre-authenticated as a regular listener
    pub async fn authenticated(base_url: String) -> Self {
        Self::authenticated_as(base_url, TEST_USER, TEST_PASS).await
    }

    /// Creates a client pre-authenticated as a staff user
    pub async fn authenticated_admin(base_url: String) -> Self {
        Self::authenticated_as(base_url, ADMIN_USER, ADMIN_PASS).await
    }

    /// Creates a client pre-authenticated as the DJ
    pub async fn authenticated_dj(base_url: String) -> Self {
        Self::authenticated_as(base_url, DJ_USER, DJ_PASS).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    async fn post(&self, path: &str, body: Value) -> Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap_or_else(|e| panic!("POST {} failed: {}", path, e))
    }

    // ========================================================================
    // Home and authentication
    // ========================================================================

    /// GET /
    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    /// POST /api/auth/login
    pub async fn login(&self, handle: &str, password: &str) -> Response {
        self.post(
            "/api/auth/login",
            json!({ "handle": handle, "password": password }),
        )
        .await
    }

    /// GET /api/auth/logout
    pub async fn logout(&self) -> Response {
        self.get("/api/auth/logout").await
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// GET /api/next
    pub async fn next(&self) -> Response {
        self.get("/api/next").await
    }

    /// POST /api/played
    pub async fn played(&self, request_id: i64) -> Response {
        self.post("/api/played", json!({ "song_request": request_id }))
            .await
    }

    /// POST /api/request
    pub async fn request_song(&self, song_id: i64) -> Response {
        self.post("/api/request", json!({ "song": song_id })).await
    }

    /// GET /api/history?page=
    pub async fn history(&self, page: Option<usize>) -> Response {
        match page {
            Some(page) => self.get(&format!("/api/history?page={}", page)).await,
            None => self.get("/api/history").await,
        }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// GET /api/songs
    pub async fn list_songs(&self, page: Option<usize>) -> Response {
        match page {
            Some(page) => self.get(&format!("/api/songs?page={}", page)).await,
            None => self.get("/api/songs").await,
        }
    }

    /// GET /api/songs/{id}
    pub async fn get_song(&self, id: i64) -> Response {
        self.get(&format!("/api/songs/{}", id)).await
    }

    /// POST /api/albums
    pub async fn create_album(&self, title: &str) -> Response {
        self.post("/api/albums", json!({ "title": title })).await
    }

    /// GET /api/games/{id}
    pub async fn get_game(&self, id: i64) -> Response {
        self.get(&format!("/api/games/{}", id)).await
    }

    /// POST /api/games/{id}/disable
    pub async fn disable_game(&self, id: i64, reason: &str) -> Response {
        self.post(
            &format!("/api/games/{}/disable", id),
            json!({ "reason": reason }),
        )
        .await
    }

    /// POST /api/songs/{id}/enable
    pub async fn enable_song(&self, id: i64) -> Response {
        self.client
            .post(self.url(&format!("/api/songs/{}/enable", id)))
            .send()
            .await
            .expect("Enable song request failed")
    }

    /// POST /api/songs/{id}/favorite
    pub async fn favorite_song(&self, id: i64) -> Response {
        self.post(&format!("/api/songs/{}/favorite", id), json!({}))
            .await
    }

    /// POST /api/songs/{id}/rate
    pub async fn rate_song(&self, id: i64, value: Value) -> Response {
        self.post(&format!("/api/songs/{}/rate", id), value).await
    }

    /// POST /api/songs/{id}/unrate
    pub async fn unrate_song(&self, id: i64) -> Response {
        self.post(&format!("/api/songs/{}/unrate", id), json!({}))
            .await
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// GET /api/profiles/{id}
    pub async fn get_profile(&self, id: i64) -> Response {
        self.get(&format!("/api/profiles/{}", id)).await
    }

    /// PATCH /api/profiles/{id}
    pub async fn patch_profile(&self, id: i64, body: Value) -> Response {
        self.client
            .patch(self.url(&format!("/api/profiles/{}", id)))
            .json(&body)
            .send()
            .await
            .expect("Patch profile request failed")
    }

    /// GET /api/profiles/{id}/favorites
    pub async fn profile_favorites(&self, id: i64) -> Response {
        self.get(&format!("/api/profiles/{}/favorites", id)).await
    }

    /// POST /api/profiles/{id}/favorite_add
    pub async fn profile_favorite_add(&self, id: i64, song_id: i64) -> Response {
        self.post(
            &format!("/api/profiles/{}/favorite_add", id),
            json!({ "song": song_id }),
        )
        .await
    }
}
