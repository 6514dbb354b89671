use super::super::responses::{bad_request, forbidden, internal_error};
use super::super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::super::state::{GuardedUserManager, ServerState};
use crate::user::auth::AuthTokenValue;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Deserialize)]
struct LoginBody {
    pub handle: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginSuccessResponse {
    token: String,
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<LoginBody>,
) -> Response {
    debug!("login() called for {}", body.handle);
    let locked_manager = user_manager.lock().unwrap();
    let auth_token = match locked_manager.login(&body.handle, &body.password) {
        Ok(Some(token)) => token,
        Ok(None) => return forbidden("Unable to log in with provided credentials."),
        Err(err) => return internal_error(err),
    };
    info!("User {} logged in", body.handle);

    let cookie_value = match HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly",
        COOKIE_SESSION_TOKEN_KEY, auth_token.value.0
    )) {
        Ok(value) => value,
        Err(err) => return internal_error(err),
    };
    let body = LoginSuccessResponse {
        token: auth_token.value.0,
    };
    (
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie_value)],
        Json(body),
    )
        .into_response()
}

async fn logout(State(user_manager): State<GuardedUserManager>, session: Session) -> Response {
    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.delete_auth_token(session.user_id, &AuthTokenValue(session.token)) {
        Ok(()) => {
            let cookie_value = Cookie::build(Cookie::new(COOKIE_SESSION_TOKEN_KEY, ""))
                .path("/")
                .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1)) // Expire it in the past
                .same_site(SameSite::Lax)
                .build();
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie_value.to_string())],
            )
                .into_response()
        }
        Err(err) => bad_request(err.to_string()),
    }
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
        .with_state(state)
}
