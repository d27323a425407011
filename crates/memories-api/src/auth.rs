use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{info, warn};
use uuid::Uuid;

use memories_db::Database;
use memories_db::password::verify_password;
use memories_media::MediaStore;
use memories_types::api::{LoginRequest, LoginResponse};

use crate::blocking;
use crate::error::ApiError;
use crate::urls::UrlResolver;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub media: MediaStore,
    pub urls: UrlResolver,
    /// Request body limit for the multipart routes.
    pub max_upload_bytes: usize,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    let username = req.username.clone();
    let db = state.clone();
    let issued = blocking(move || {
        let Some(user) = db.db.get_user_by_username(&req.username)? else {
            return Ok(None);
        };
        if !verify_password(&req.password, &user.password)? {
            return Ok(None);
        }

        let token = new_token();
        db.db.create_token(&token, user.id)?;
        Ok(Some(LoginResponse {
            token,
            user_id: user.id,
        }))
    })
    .await?;

    match issued {
        Some(response) => {
            info!("Issued token for user {}", response.user_id);
            Ok(Json(response))
        }
        None => {
            warn!("Failed login for '{}'", username);
            Err(ApiError::InvalidCredentials)
        }
    }
}

/// Opaque 32-char hex token.
fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}
