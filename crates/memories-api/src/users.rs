use axum::{
    Extension, Json,
    extract::{Multipart, State},
};

use memories_types::api::{UpdateUserRequest, UserResponse};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::responses::user_response;
use crate::upload::{discard_file, read_single_file, store_file};

/// GET /me
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(user_response(user.0, &state.urls))
}

/// PUT /me: fields that are absent or null keep their current value.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let db = state.clone();
    let user_id = user.id();
    let row = blocking(move || {
        db.db.update_user(
            user_id,
            req.name.as_deref(),
            req.birthday,
            req.avatar_url.as_deref(),
        )
    })
    .await?;

    Ok(Json(user_response(row, &state.urls)))
}

/// POST /me/avatar: multipart `file`; stored like any upload and set as the avatar.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<UserResponse>, ApiError> {
    let file = read_single_file(multipart).await?;
    let stored = store_file(&state, file).await?;

    let db = state.clone();
    let user_id = user.id();
    let avatar_url = stored.public_path();
    match blocking(move || db.db.update_user(user_id, None, None, Some(&avatar_url))).await {
        Ok(row) => Ok(Json(user_response(row, &state.urls))),
        Err(e) => {
            discard_file(&state, stored).await;
            Err(e)
        }
    }
}
