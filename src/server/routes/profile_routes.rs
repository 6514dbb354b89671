use super::super::pagination::Pagination;
use super::super::responses::{forbidden, internal_error, not_found, ok_detail};
use super::super::session::Session;
use super::super::state::{GuardedRadioStore, ServerState};
use crate::user::{FullProfile, Permission};

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

const ADMIN_OR_OWNER: &str = "Only an admin user or the owner can change this object.";

#[derive(Deserialize)]
struct ProfilePatchBody {
    pub disabled: Option<bool>,
    #[serde(default)]
    pub disabled_reason: String,
}

#[derive(Deserialize)]
struct FavoriteSongBody {
    pub song: i64,
}

/// Staff and the owner may change a profile, the DJ account never does.
fn can_change(session: &Session, profile: &FullProfile) -> bool {
    !session.is_dj()
        && (session.has_permission(Permission::ManageProfiles)
            || session.user_id == profile.user.id)
}

fn load_profile(store: &GuardedRadioStore, id: i64) -> Result<FullProfile, Response> {
    match store.get_profile(id) {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(not_found()),
        Err(err) => Err(internal_error(err)),
    }
}

async fn list_profiles(pagination: Pagination, State(store): State<GuardedRadioStore>) -> Response {
    pagination.respond(store.list_profiles(pagination.window))
}

async fn get_profile(
    session: Option<Session>,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    let profile = match load_profile(&store, id) {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    let full_view = session
        .map(|s| s.is_staff || s.user_id == profile.user.id)
        .unwrap_or(false);
    if full_view {
        Json(profile).into_response()
    } else {
        Json(profile.basic()).into_response()
    }
}

async fn patch_profile(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<ProfilePatchBody>,
) -> Response {
    let profile = match load_profile(&store, id) {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    if !can_change(&session, &profile) {
        return forbidden(ADMIN_OR_OWNER);
    }
    if let Some(disabled) = body.disabled {
        if let Err(err) = store.set_profile_enabled(id, !disabled, &body.disabled_reason) {
            return internal_error(err);
        }
        info!(
            "Profile {} {} by user {}",
            id,
            if disabled { "disabled" } else { "enabled" },
            session.user_id
        );
    }
    match load_profile(&store, id) {
        Ok(profile) => Json(profile).into_response(),
        Err(response) => response,
    }
}

async fn get_profile_ratings(
    pagination: Pagination,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = load_profile(&store, id) {
        return response;
    }
    pagination.respond(store.list_profile_ratings(id, pagination.window))
}

async fn get_profile_favorites(
    pagination: Pagination,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = load_profile(&store, id) {
        return response;
    }
    pagination.respond(store.list_profile_favorites(id, pagination.window))
}

fn change_favorite(
    session: Session,
    store: GuardedRadioStore,
    id: i64,
    song_id: i64,
    remove: bool,
) -> Response {
    let profile = match load_profile(&store, id) {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    if !can_change(&session, &profile) {
        return forbidden(ADMIN_OR_OWNER);
    }
    match store.get_song(song_id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(),
        Err(err) => return internal_error(err),
    }
    let result = if remove {
        store.remove_favorite(id, song_id)
    } else {
        store.add_favorite(id, song_id)
    };
    match result {
        Ok(_) if remove => ok_detail("Song removed from favorites."),
        Ok(_) => ok_detail("Song added to favorites."),
        Err(err) => internal_error(err),
    }
}

async fn favorite_add(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<FavoriteSongBody>,
) -> Response {
    change_favorite(session, store, id, body.song, false)
}

async fn favorite_remove(
    session: Session,
    State(store): State<GuardedRadioStore>,
    Path(id): Path<i64>,
    Json(body): Json<FavoriteSongBody>,
) -> Response {
    change_favorite(session, store, id, body.song, true)
}

pub fn make_profile_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_profiles))
        .route("/{id}", get(get_profile).patch(patch_profile))
        .route("/{id}/ratings", get(get_profile_ratings))
        .route("/{id}/favorites", get(get_profile_favorites))
        .route("/{id}/favorite_add", post(favorite_add))
        .route("/{id}/favorite_remove", post(favorite_remove))
        .with_state(state)
}
