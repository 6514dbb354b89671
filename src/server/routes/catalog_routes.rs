//! Albums, games, artists, songs and stores: read by anyone, written by staff.

use super::super::pagination::Pagination;
use super::super::responses::{
    bad_request, forbidden, internal_error, json_or_not_found, not_found, ok_detail,
};
use super::super::session::Session;
use super::super::state::{GuardedRadioStore, ServerState};
use crate::catalog::validation::{
    validate_artist, validate_rating_value, validate_song, validate_store, validate_titled,
};
use crate::catalog::{
    ArtistInput, CascadeOutcome, CatalogEntity, SongDetails, SongInput, StoreInput, TitledInput,
    TitledKind,
};
use crate::store::Page;
use crate::user::{Permission, RatingChange};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

const ADMIN_ONLY: &str = "Only an admin user can make changes.";
const NOT_FOR_DJ: &str = "The DJ account cannot rate or favorite songs.";

#[derive(Deserialize, Default)]
struct DisableBody {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct PublishBody {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct SongArtistsBody {
    pub artists: Vec<i64>,
}

#[derive(Deserialize)]
struct SongStoresBody {
    pub stores: Vec<i64>,
}

#[derive(Deserialize)]
struct ActiveStoreBody {
    pub store: i64,
}

#[derive(Deserialize, Default)]
struct RateBody {
    #[serde(default)]
    pub value: Option<i64>,
}

#[derive(Serialize)]
struct LifecycleResponse {
    detail: String,
    cascade: CascadeOutcome,
}

#[derive(Serialize)]
struct PublishResponse {
    detail: String,
    published_date: DateTime<Utc>,
}

fn require_editor(session: &Session) -> Result<(), Response> {
    if session.has_permission(Permission::EditCatalog) {
        Ok(())
    } else {
        Err(forbidden(ADMIN_ONLY))
    }
}

fn created<T: Serialize>(result: anyhow::Result<Option<T>>) -> Response {
    match result {
        Ok(Some(value)) => (StatusCode::CREATED, Json(value)).into_response(),
        Ok(None) => not_found(),
        Err(err) => internal_error(err),
    }
}

fn deleted(result: anyhow::Result<bool>) -> Response {
    match result {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(),
        Err(err) => internal_error(err),
    }
}

fn entity_label(entity: CatalogEntity) -> &'static str {
    match entity {
        CatalogEntity::Album(_) => "Album",
        CatalogEntity::Artist(_) => "Artist",
        CatalogEntity::Game(_) => "Game",
        CatalogEntity::Song(_) => "Song",
    }
}

// =========================================================================
// Albums and games
// =========================================================================

async fn list_titled(kind: TitledKind, pagination: Pagination, store: GuardedRadioStore) -> Response {
    pagination.respond(store.list_titled(kind, pagination.window))
}

async fn create_titled(
    kind: TitledKind,
    session: Session,
    store: GuardedRadioStore,
    input: TitledInput,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_titled(&input) {
        return bad_request(err.to_string());
    }
    match store.find_titled_by_title(kind, &input.title) {
        Ok(Some(_)) => {
            return bad_request(format!(
                "{} with this title already exists.",
                kind.label()
            ))
        }
        Ok(None) => {}
        Err(err) => return internal_error(err),
    }
    let id = match store.create_titled(kind, &input) {
        Ok(id) => id,
        Err(err) => return internal_error(err),
    };
    info!("Created {} {} ({})", kind.label(), input.title, id);
    created(store.get_titled(kind, id))
}

async fn update_titled(
    kind: TitledKind,
    session: Session,
    store: GuardedRadioStore,
    id: i64,
    input: TitledInput,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_titled(&input) {
        return bad_request(err.to_string());
    }
    match store.find_titled_by_title(kind, &input.title) {
        Ok(Some(other)) if other != id => {
            return bad_request(format!(
                "{} with this title already exists.",
                kind.label()
            ))
        }
        Ok(_) => {}
        Err(err) => return internal_error(err),
    }
    match store.update_titled(kind, id, &input) {
        Ok(true) => json_or_not_found(store.get_titled(kind, id)),
        Ok(false) => not_found(),
        Err(err) => internal_error(err),
    }
}

fn make_titled_routes(kind: TitledKind, state: ServerState) -> Router {
    Router::new()
        .route(
            "/",
            get(
                move |pagination: Pagination, State(store): State<GuardedRadioStore>| {
                    list_titled(kind, pagination, store)
                },
            )
            .post(
                move |session: Session,
                      State(store): State<GuardedRadioStore>,
                      Json(input): Json<TitledInput>| {
                    create_titled(kind, session, store, input)
                },
            ),
        )
        .route(
            "/{id}",
            get(
                move |State(store): State<GuardedRadioStore>, Path(id): Path<i64>| async move {
                    json_or_not_found(store.get_titled(kind, id))
                },
            )
            .put(
                move |session: Session,
                      State(store): State<GuardedRadioStore>,
                      Path(id): Path<i64>,
                      Json(input): Json<TitledInput>| {
                    update_titled(kind, session, store, id, input)
                },
            )
            .delete(
                move |session: Session,
                      State(store): State<GuardedRadioStore>,
                      Path(id): Path<i64>| async move {
                    if let Err(response) = require_editor(&session) {
                        return response;
                    }
                    deleted(store.delete_titled(kind, id))
                },
            ),
        )
        .merge(make_lifecycle_routes(move |id| {
            CatalogEntity::from_kind(kind, id)
        }))
        .with_state(state)
}

// =========================================================================
// Enable, disable, publish
// =========================================================================

fn set_enabled(
    session: Session,
    store: GuardedRadioStore,
    entity: CatalogEntity,
    enabled: bool,
    reason: Option<String>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    match store.set_enabled(entity, enabled, reason.as_deref()) {
        Ok(Some(cascade)) => {
            let state = if enabled { "enabled" } else { "disabled" };
            info!("{:?} {} by user {}: {:?}", entity, state, session.user_id, cascade);
            Json(LifecycleResponse {
                detail: format!("{} {}.", entity_label(entity), state),
                cascade,
            })
            .into_response()
        }
        Ok(None) => not_found(),
        Err(err) => internal_error(err),
    }
}

fn publish(
    session: Session,
    store: GuardedRadioStore,
    entity: CatalogEntity,
    date: Option<DateTime<Utc>>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    let date = date.unwrap_or_else(Utc::now);
    match store.set_published(entity, Some(date)) {
        Ok(true) => Json(PublishResponse {
            detail: format!("{} published.", entity_label(entity)),
            published_date: date,
        })
        .into_response(),
        Ok(false) => not_found(),
        Err(err) => internal_error(err),
    }
}

fn make_lifecycle_routes(
    to_entity: impl Fn(i64) -> CatalogEntity + Clone + Send + Sync + 'static,
) -> Router<ServerState> {
    let enable_entity = to_entity.clone();
    let disable_entity = to_entity.clone();
    let publish_entity = to_entity;
    Router::new()
        .route(
            "/{id}/enable",
            post(
                move |session: Session,
                      State(store): State<GuardedRadioStore>,
                      Path(id): Path<i64>| async move {
                    set_enabled(session, store, enable_entity(id), true, None)
                },
            ),
        )
        .route(
            "/{id}/disable",
            post(
                move |session: Session,
                      State(store): State<GuardedRadioStore>,
                      Path(id): Path<i64>,
                      body: Option<Json<DisableBody>>| async move {
                    let reason = body.and_then(|Json(body)| body.reason);
                    set_enabled(session, store, disable_entity(id), false, reason)
                },
            ),
        )
        .route(
            "/{id}/publish",
            post(
                move |session: Session,
                      State(store): State<GuardedRadioStore>,
                      Path(id): Path<i64>,
                      body: Option<Json<PublishBody>>| async move {
                    let date = body.and_then(|Json(body)| body.date);
                    publish(session, store, publish_entity(id), date)
                },
            ),
        )
}

// =========================================================================
// Artists
// =========================================================================

async fn list_artists(pagination: Pagination, State(store): State<GuardedRadioStore>) -> Response {
    pagination.respond(store.list_artists(pagination.window))
}

async fn create_artist(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Json(input): Json<ArtistInput>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_artist(&input) {
        return bad_request(err.to_string());
    }
    match store.create_artist(&input) {
        Ok(id) => created(store.get_artist(id)),
        Err(err) => internal_error(err),
    }
}

async fn get_artist(State(store): State<GuardedRadioStore>, Path(id): Path<i64>) -> Response {
    json_or_not_found(store.get_artist(id))
}

async fn update_artist(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(input): Json<ArtistInput>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_artist(&input) {
        return bad_request(err.to_string());
    }
    match store.update_artist(id, &input) {
        Ok(true) => json_or_not_found(store.get_artist(id)),
        Ok(false) => not_found(),
        Err(err) => internal_error(err),
    }
}

async fn delete_artist(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    deleted(store.delete_artist(id))
}

// =========================================================================
// Stores
// =========================================================================

async fn list_stores(pagination: Pagination, State(store): State<GuardedRadioStore>) -> Response {
    pagination.respond(store.list_stores(pagination.window))
}

async fn create_store(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Json(input): Json<StoreInput>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_store(&input) {
        return bad_request(err.to_string());
    }
    match store.create_store(&input) {
        Ok(id) => created(store.get_store(id)),
        Err(err) => internal_error(err),
    }
}

async fn get_store(State(store): State<GuardedRadioStore>, Path(id): Path<i64>) -> Response {
    json_or_not_found(store.get_store(id))
}

async fn update_store(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(input): Json<StoreInput>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_store(&input) {
        return bad_request(err.to_string());
    }
    match store.update_store(id, &input) {
        Ok(true) => json_or_not_found(store.get_store(id)),
        Ok(false) => not_found(),
        Err(err) => internal_error(err),
    }
}

async fn delete_store(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    deleted(store.delete_store(id))
}

// =========================================================================
// Songs
// =========================================================================

fn require_song(store: &GuardedRadioStore, id: i64) -> Result<(), Response> {
    match store.get_song(id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found()),
        Err(err) => Err(internal_error(err)),
    }
}

async fn list_songs(pagination: Pagination, State(store): State<GuardedRadioStore>) -> Response {
    let result = store.list_songs(pagination.window).and_then(|page| {
        let mut items: Vec<SongDetails> = Vec::with_capacity(page.items.len());
        for song in page.items.iter() {
            if let Some(details) = store.get_song_details(song.id)? {
                items.push(details);
            }
        }
        Ok(Page {
            items,
            total: page.total,
        })
    });
    pagination.respond(result)
}

async fn create_song(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Json(input): Json<SongInput>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_song(&input) {
        return bad_request(err.to_string());
    }
    match store.create_song(&input) {
        Ok(id) => created(store.get_song_details(id)),
        Err(err) => internal_error(err),
    }
}

async fn get_song(State(store): State<GuardedRadioStore>, Path(id): Path<i64>) -> Response {
    json_or_not_found(store.get_song_details(id))
}

async fn update_song(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(input): Json<SongInput>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(err) = validate_song(&input) {
        return bad_request(err.to_string());
    }
    match store.update_song(id, &input) {
        Ok(true) => json_or_not_found(store.get_song_details(id)),
        Ok(false) => not_found(),
        Err(err) => internal_error(err),
    }
}

async fn delete_song(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    deleted(store.delete_song(id))
}

fn change_song_artists(
    session: Session,
    store: GuardedRadioStore,
    id: i64,
    artists: Vec<i64>,
    remove: bool,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(response) = require_song(&store, id) {
        return response;
    }
    let result = if remove {
        store.remove_song_artists(id, &artists)
    } else {
        store.add_song_artists(id, &artists)
    };
    match result {
        Ok(_) if remove => ok_detail("Artists removed from song."),
        Ok(_) => ok_detail("Artists added to song."),
        Err(err) => internal_error(err),
    }
}

async fn artists_add(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<SongArtistsBody>,
) -> Response {
    change_song_artists(session, store, id, body.artists, false)
}

async fn artists_remove(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<SongArtistsBody>,
) -> Response {
    change_song_artists(session, store, id, body.artists, true)
}

async fn get_song_stores(State(store): State<GuardedRadioStore>, Path(id): Path<i64>) -> Response {
    if let Err(response) = require_song(&store, id) {
        return response;
    }
    match store.get_song_stores(id) {
        Ok(stores) => Json(stores).into_response(),
        Err(err) => internal_error(err),
    }
}

fn change_song_stores(
    session: Session,
    store: GuardedRadioStore,
    id: i64,
    stores: Vec<i64>,
    remove: bool,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(response) = require_song(&store, id) {
        return response;
    }
    let result = if remove {
        store.remove_song_stores(id, &stores)
    } else {
        store.add_song_stores(id, &stores)
    };
    match result {
        Ok(_) if remove => ok_detail("Stores removed from song."),
        Ok(_) => ok_detail("Stores added to song."),
        Err(err) => internal_error(err),
    }
}

async fn stores_add(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<SongStoresBody>,
) -> Response {
    change_song_stores(session, store, id, body.stores, false)
}

async fn stores_remove(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<SongStoresBody>,
) -> Response {
    change_song_stores(session, store, id, body.stores, true)
}

async fn active_store(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<ActiveStoreBody>,
) -> Response {
    if let Err(response) = require_editor(&session) {
        return response;
    }
    if let Err(response) = require_song(&store, id) {
        return response;
    }
    match store.set_active_store(id, body.store) {
        Ok(true) => ok_detail("Active store set for song."),
        Ok(false) => bad_request("Store is not linked to this song."),
        Err(err) => internal_error(err),
    }
}

async fn get_song_favorites(
    pagination: Pagination,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = require_song(&store, id) {
        return response;
    }
    pagination.respond(store.list_song_favorites(id, pagination.window))
}

async fn get_song_ratings(
    pagination: Pagination,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = require_song(&store, id) {
        return response;
    }
    pagination.respond(store.list_song_ratings(id, pagination.window))
}

/// Checks shared by the listener actions on a song.
fn listener_action(session: &Session, store: &GuardedRadioStore, id: i64) -> Result<(), Response> {
    if !session.has_permission(Permission::RateAndFavorite) {
        return Err(forbidden(NOT_FOR_DJ));
    }
    require_song(store, id)
}

async fn favorite(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = listener_action(&session, &store, id) {
        return response;
    }
    match store.add_favorite(session.profile_id, id) {
        Ok(true) => ok_detail("Song has been added to favorites."),
        Ok(false) => bad_request("Song is already a favorite."),
        Err(err) => internal_error(err),
    }
}

async fn unfavorite(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = listener_action(&session, &store, id) {
        return response;
    }
    match store.remove_favorite(session.profile_id, id) {
        Ok(true) => ok_detail("Song has been removed from favorites."),
        Ok(false) => bad_request("Song is already not a favorite."),
        Err(err) => internal_error(err),
    }
}

async fn rate(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    body: Option<Json<RateBody>>,
) -> Response {
    if let Err(response) = listener_action(&session, &store, id) {
        return response;
    }
    let Some(value) = body.and_then(|Json(body)| body.value) else {
        return bad_request("Missing integer 'value' for song rating.");
    };
    let value = match validate_rating_value(value) {
        Ok(value) => value,
        Err(err) => return bad_request(err.to_string()),
    };
    match store.rate_song(session.profile_id, id, value) {
        Ok(RatingChange::Created) => ok_detail("Rating created for song."),
        Ok(RatingChange::Updated) => ok_detail("Rating updated for song."),
        Err(err) => internal_error(err),
    }
}

async fn unrate(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = listener_action(&session, &store, id) {
        return response;
    }
    match store.unrate_song(session.profile_id, id) {
        Ok(true) => ok_detail("Rating deleted from song."),
        Ok(false) => bad_request("Cannot delete nonexistant rating."),
        Err(err) => internal_error(err),
    }
}

pub fn make_catalog_routes(state: ServerState) -> Router {
    let artist_routes = Router::new()
        .route("/", get(list_artists).post(create_artist))
        .route(
            "/{id}",
            get(get_artist).put(update_artist).delete(delete_artist),
        )
        .merge(make_lifecycle_routes(CatalogEntity::Artist))
        .with_state(state.clone());

    let store_routes = Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/{id}", get(get_store).put(update_store).delete(delete_store))
        .with_state(state.clone());

    let song_routes = Router::new()
        .route("/", get(list_songs).post(create_song))
        .route("/{id}", get(get_song).put(update_song).delete(delete_song))
        .route("/{id}/artists_add", post(artists_add))
        .route("/{id}/artists_remove", post(artists_remove))
        .route("/{id}/stores", get(get_song_stores))
        .route("/{id}/stores_add", post(stores_add))
        .route("/{id}/stores_remove", post(stores_remove))
        .route("/{id}/active_store", post(active_store))
        .route("/{id}/favorites", get(get_song_favorites))
        .route("/{id}/ratings", get(get_song_ratings))
        .route("/{id}/favorite", post(favorite))
        .route("/{id}/unfavorite", post(unfavorite))
        .route("/{id}/rate", post(rate))
        .route("/{id}/unrate", post(unrate))
        .merge(make_lifecycle_routes(CatalogEntity::Song))
        .with_state(state.clone());

    Router::new()
        .nest("/albums", make_titled_routes(TitledKind::Album, state.clone()))
        .nest("/games", make_titled_routes(TitledKind::Game, state))
        .nest("/artists", artist_routes)
        .nest("/stores", store_routes)
        .nest("/songs", song_routes)
}
