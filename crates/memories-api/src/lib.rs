pub mod albums;
pub mod auth;
pub mod error;
pub mod memories;
pub mod middleware;
pub mod responses;
pub mod upload;
pub mod urls;
pub mod users;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::services::ServeDir;
use tracing::error;

use memories_media::storage::PUBLIC_PREFIX;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_auth;

/// Full HTTP surface: public auth and static media, everything else behind a bearer token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/health", get(health))
        .nest_service(
            &format!("/{PUBLIC_PREFIX}"),
            ServeDir::new(state.media.dir()),
        )
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/me/avatar", post(users::upload_avatar))
        .route("/albums", get(albums::list_albums).post(albums::create_album))
        .route("/albums/{album_id}", get(albums::get_album).put(albums::update_album))
        .route("/albums/{album_id}/cover", post(albums::upload_cover))
        .route("/albums/{album_id}/memories", get(memories::list_memories))
        .route("/upload", post(upload::upload_memory))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run blocking work (SQLite, password hashing) off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!("blocking task failed: {}", e))
        })?
        .map_err(ApiError::Internal)
}
