use anyhow::Result;
use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::radio::RadioManager;
use crate::store::RadioStore;
use crate::user::UserManager;

use axum::{
    extract::{Request, State},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tracing::info;

use super::routes::{
    make_auth_routes, make_catalog_routes, make_control_routes, make_profile_routes,
};
use super::session::Session;
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub radio_name: String,
    pub uptime: String,
    pub hash: String,
    pub session_token: Option<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(session: Option<Session>, State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        radio_name: state.config.radio_name.clone(),
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        session_token: session.map(|s| s.token),
    };
    Json(stats)
}

impl ServerState {
    fn new<S: RadioStore + 'static>(config: ServerConfig, store: Arc<S>) -> ServerState {
        let user_manager = UserManager::new(store.clone());
        let radio_manager = RadioManager::new(store.clone());
        ServerState {
            config,
            start_time: Instant::now(),
            store,
            user_manager: Arc::new(Mutex::new(user_manager)),
            radio_manager: Arc::new(Mutex::new(radio_manager)),
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app<S: RadioStore + 'static>(config: ServerConfig, store: Arc<S>) -> Result<Router> {
    let state = ServerState::new(config, store);

    let api_routes: Router = Router::new()
        .nest("/auth", make_auth_routes(state.clone()))
        .nest("/profiles", make_profile_routes(state.clone()))
        .merge(make_control_routes(state.clone()))
        .merge(make_catalog_routes(state.clone()));

    let app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

/// Wraps the app so `/api/songs/` and `/api/songs` reach the same route.
pub fn make_service(app: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app)
}

pub async fn run_server<S: RadioStore + 'static>(config: ServerConfig, store: Arc<S>) -> Result<()> {
    let port = config.port;
    let app = make_app(config, store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    let service = make_service(app);
    Ok(axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(service),
    )
    .await?)
}
