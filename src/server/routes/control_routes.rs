//! The DJ's playback loop and listener requests.

use super::super::pagination::Pagination;
use super::super::responses::{bad_request, detail, forbidden, internal_error, not_found};
use super::super::session::Session;
use super::super::state::{GuardedRadioManager, ServerState};
use crate::radio::{MakeRequestError, NextRequestError, PlayedError, Requester};
use crate::user::Permission;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

const DJ_ONLY: &str = "Only the DJ can request the next song.";

#[derive(Deserialize, Serialize)]
struct JustPlayedBody {
    song_request: i64,
}

#[derive(Deserialize, Serialize)]
struct MakeRequestBody {
    song: i64,
}

async fn next_request(
    session: Session,
    State(radio_manager): State<GuardedRadioManager>,
) -> Response {
    if !session.has_permission(Permission::ControlPlayback) {
        return forbidden(DJ_ONLY);
    }
    match radio_manager
        .lock()
        .unwrap()
        .next_request(Some(session.profile_id))
    {
        Ok(queued) => Json(queued).into_response(),
        Err(NextRequestError::Store(err)) => internal_error(err),
        Err(err) => {
            warn!("Cannot pick the next song: {}", err);
            detail(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}

async fn just_played(
    session: Session,
    State(radio_manager): State<GuardedRadioManager>,
    Json(body): Json<JustPlayedBody>,
) -> Response {
    if !session.has_permission(Permission::ControlPlayback) {
        return forbidden(DJ_ONLY);
    }
    match radio_manager.lock().unwrap().just_played(body.song_request) {
        Ok(_) => Json(body).into_response(),
        Err(PlayedError::NotFound(_)) => not_found(),
        Err(PlayedError::Store(err)) => internal_error(err),
        Err(err) => bad_request(err.to_string()),
    }
}

async fn make_request(
    session: Session,
    State(radio_manager): State<GuardedRadioManager>,
    Json(body): Json<MakeRequestBody>,
) -> Response {
    if !session.has_permission(Permission::RequestSongs) {
        return forbidden("You do not have permission to request songs.");
    }
    let requester = Requester {
        profile_id: session.profile_id,
        bypass_limits: session.has_permission(Permission::BypassRequestLimits),
    };
    match radio_manager
        .lock()
        .unwrap()
        .make_request(&requester, body.song)
    {
        Ok(_) => Json(body).into_response(),
        Err(MakeRequestError::SongNotFound) => not_found(),
        Err(MakeRequestError::Store(err)) => internal_error(err),
        Err(err) => bad_request(err.to_string()),
    }
}

async fn history(
    pagination: Pagination,
    State(radio_manager): State<GuardedRadioManager>,
) -> Response {
    let result = radio_manager.lock().unwrap().history(pagination.window);
    pagination.respond(result)
}

pub fn make_control_routes(state: ServerState) -> Router {
    Router::new()
        .route("/next", get(next_request))
        .route("/played", post(just_played))
        .route("/request", post(make_request))
        .route("/history", get(history))
        .with_state(state)
}
