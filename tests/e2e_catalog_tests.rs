//! End-to-end tests for the catalog: listings, staff edits, cascades and listener actions.

mod common;

use common::{
    TestClient, TestServer, ALBUM_1_TITLE, GAME_1_ID, GAME_1_TITLE, JINGLE_1_TITLE, SONG_1_ID,
    SONG_1_TITLE, SONG_2_ID, SONG_2_TITLE,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_song_listing_is_paginated_by_sorted_title() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.list_songs(None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["count"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["links"]["next"], "/api/songs?page=2");
    assert!(page["links"]["previous"].is_null());
    assert_eq!(page["results"][0]["title"], SONG_1_TITLE);
    assert_eq!(page["results"][1]["title"], JINGLE_1_TITLE);

    let page: Value = client.list_songs(Some(2)).await.json().await.unwrap();
    assert_eq!(page["results"][0]["title"], SONG_2_TITLE);
    assert_eq!(page["links"]["previous"], "/api/songs");
    assert!(page["links"]["next"].is_null());

    assert_eq!(
        client.list_songs(Some(3)).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_song_details() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_song(SONG_1_ID).await;
    assert_eq!(response.status(), StatusCode::OK);
    let song: Value = response.json().await.unwrap();
    assert_eq!(song["title"], SONG_1_TITLE);
    assert_eq!(song["song_type"], "S");
    assert_eq!(song["game"]["title"], GAME_1_TITLE);
    assert_eq!(song["album"]["title"], ALBUM_1_TITLE);
    assert_eq!(song["artists"][0]["full_name"], "Yasunori Mitsuda");
    assert!(song["average_rating"].is_null());

    assert_eq!(client.get_song(777).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_staff_edits_catalog() {
    let server = TestServer::spawn().await;

    let listener = TestClient::authenticated(server.base_url.clone()).await;
    let response = listener.create_album("Secret of Mana").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Only an admin user can make changes.");

    let admin = TestClient::authenticated_admin(server.base_url.clone()).await;
    let response = admin.create_album("Secret of Mana").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let album: Value = response.json().await.unwrap();
    assert_eq!(album["title"], "Secret of Mana");
    assert_eq!(album["sorted_title"], "secret of mana");

    let response = admin.create_album("Secret of Mana").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = admin.create_album("   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disabling_game_cascades_to_songs() {
    let server = TestServer::spawn().await;
    let admin = TestClient::authenticated_admin(server.base_url.clone()).await;
    let listener = TestClient::authenticated(server.base_url.clone()).await;

    let response = admin.disable_game(GAME_1_ID, "Licensing").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Game disabled.");
    assert_eq!(body["cascade"]["songs"], 2);

    let game: Value = admin.get_game(GAME_1_ID).await.json().await.unwrap();
    assert_eq!(game["disabled"], true);
    assert_eq!(game["disabled_reason"], "Licensing");

    let song: Value = admin.get_song(SONG_2_ID).await.json().await.unwrap();
    assert_eq!(song["disabled"], true);

    let response = listener.request_song(SONG_2_ID).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Enabling a song brings its game back.
    let response = admin.enable_song(SONG_1_ID).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["cascade"]["games"], 1);

    let game: Value = admin.get_game(GAME_1_ID).await.json().await.unwrap();
    assert_eq!(game["disabled"], false);
    let song: Value = admin.get_song(SONG_2_ID).await.json().await.unwrap();
    assert_eq!(song["disabled"], true);
}

#[tokio::test]
async fn test_rating_a_song() {
    let server = TestServer::spawn().await;
    let listener = TestClient::authenticated(server.base_url.clone()).await;

    let response = listener.rate_song(SONG_1_ID, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Missing integer 'value' for song rating.");

    let response = listener.rate_song(SONG_1_ID, json!({ "value": 6 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = listener.rate_song(SONG_1_ID, json!({ "value": 4 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Rating created for song.");

    let response = listener.rate_song(SONG_1_ID, json!({ "value": 5 })).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Rating updated for song.");

    let song: Value = listener.get_song(SONG_1_ID).await.json().await.unwrap();
    assert_eq!(song["average_rating"], 5.0);

    let body: Value = listener.unrate_song(SONG_1_ID).await.json().await.unwrap();
    assert_eq!(body["detail"], "Rating deleted from song.");

    let response = listener.unrate_song(SONG_1_ID).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Cannot delete nonexistant rating.");
}

#[tokio::test]
async fn test_favorites_and_dj_restrictions() {
    let server = TestServer::spawn().await;
    let listener = TestClient::authenticated(server.base_url.clone()).await;

    let body: Value = listener
        .favorite_song(SONG_2_ID)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["detail"], "Song has been added to favorites.");

    let response = listener.favorite_song(SONG_2_ID).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Song is already a favorite.");

    let dj = TestClient::authenticated_dj(server.base_url.clone()).await;
    assert_eq!(
        dj.favorite_song(SONG_1_ID).await.status(),
        StatusCode::FORBIDDEN
    );

    let anonymous = TestClient::new(server.base_url.clone());
    assert_eq!(
        anonymous.favorite_song(SONG_1_ID).await.status(),
        StatusCode::FORBIDDEN
    );
}
