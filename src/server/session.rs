use super::responses::detail;
use super::state::ServerState;
use crate::user::auth::AuthTokenValue;
use crate::user::{Permission, UserRole};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Session {
    pub user_id: i64,
    pub profile_id: i64,
    pub token: String,
    pub role: UserRole,
    pub is_staff: bool,
    pub permissions: Vec<Permission>,
}

impl Session {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_dj(&self) -> bool {
        self.role == UserRole::Dj
    }
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";
const HEADER_TOKEN_PREFIX: &str = "Token ";

#[derive(Debug)]
pub enum SessionExtractionError {
    AccessDenied,
    InternalError,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SessionExtractionError::AccessDenied => detail(
                StatusCode::FORBIDDEN,
                "Authentication credentials were not provided.",
            ),
            SessionExtractionError::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

async fn extract_session_token_from_cookies(
    parts: &mut Parts,
    ctx: &ServerState,
) -> Option<String> {
    CookieJar::from_request_parts(parts, ctx)
        .await
        .ok()?
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

/// Accepts both the raw token and `Token <value>`.
fn extract_session_token_from_headers(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?;
    let value = String::from_utf8_lossy(raw.as_bytes()).trim().to_string();
    let value = value
        .strip_prefix(HEADER_TOKEN_PREFIX)
        .map(|v| v.trim().to_string())
        .unwrap_or(value);
    Some(value).filter(|v| !v.is_empty())
}

async fn extract_session_from_request_parts(
    parts: &mut Parts,
    ctx: &ServerState,
) -> Result<Option<Session>, SessionExtractionError> {
    let token = match extract_session_token_from_cookies(parts, ctx)
        .await
        .or_else(|| extract_session_token_from_headers(parts))
    {
        None => {
            debug!("No token in cookies nor headers.");
            return Ok(None);
        }
        Some(x) => x,
    };

    let user_manager = ctx.user_manager.lock().unwrap();
    let auth_token_value = AuthTokenValue(token);
    let auth_token = match user_manager.get_auth_token(&auth_token_value) {
        Ok(Some(token)) => token,
        Ok(None) => {
            debug!("Auth token not found in database");
            return Ok(None);
        }
        Err(e) => {
            warn!("Failed to get auth token from database: {}", e);
            return Err(SessionExtractionError::InternalError);
        }
    };

    if let Err(e) = user_manager.touch_auth_token(&auth_token_value) {
        debug!("Failed to update auth token last_used timestamp: {}", e);
    }

    let user = match user_manager.get_user(auth_token.user_id) {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(None),
        Err(e) => {
            warn!("Failed to load user {}: {}", auth_token.user_id, e);
            return Err(SessionExtractionError::InternalError);
        }
    };
    if !user.is_active {
        debug!("Rejecting token of inactive user {}", user.handle);
        return Ok(None);
    }

    let profile = match user_manager.get_profile_for_user(user.id) {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            warn!("User {} has no radio profile", user.id);
            return Ok(None);
        }
        Err(e) => {
            warn!("Failed to load profile of user {}: {}", user.id, e);
            return Err(SessionExtractionError::InternalError);
        }
    };

    let role = UserRole::from_flags(user.is_staff, user.is_dj);
    Ok(Some(Session {
        user_id: user.id,
        profile_id: profile.profile.id,
        token: auth_token.value.0,
        role,
        is_staff: user.is_staff,
        permissions: UserRole::permissions_for(user.is_staff, user.is_dj),
    }))
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx)
            .await?
            .ok_or(SessionExtractionError::AccessDenied)
    }
}

impl OptionalFromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx).await
    }
}
