use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use memories_db::PageRequest;
use memories_types::api::{
    AlbumResponse, CreateAlbumRequest, PageQuery, Paginated, UpdateAlbumRequest,
};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::responses::{album_response, paginated};
use crate::upload::{discard_file, read_single_file, store_file};

/// GET /albums?page=&page_size=
pub async fn list_albums(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Paginated<AlbumResponse>>, ApiError> {
    let request = PageRequest::new(query.page, query.page_size)?;
    let scope = user.scope();

    let db = state.clone();
    let page = blocking(move || db.db.list_albums(scope, request)).await?;

    let page = page.map(|row| album_response(row, &state.urls));
    Ok(Json(paginated(page, request)))
}

pub async fn create_album(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateAlbumRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::InvalidArgument("title must not be empty".into()));
    }

    let scope = user.scope();
    let db = state.clone();
    let album = blocking(move || {
        db.db
            .create_album(scope, &req.title, req.cover_image_url.as_deref())
    })
    .await?;

    info!("User {} created album {}", user.id(), album.id);
    Ok((StatusCode::CREATED, Json(album_response(album, &state.urls))))
}

pub async fn get_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AlbumResponse>, ApiError> {
    let scope = user.scope();
    let db = state.clone();
    let album = blocking(move || db.db.find_album(scope, album_id))
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    Ok(Json(album_response(album, &state.urls)))
}

pub async fn update_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateAlbumRequest>,
) -> Result<Json<AlbumResponse>, ApiError> {
    if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::InvalidArgument("title must not be empty".into()));
    }

    let scope = user.scope();
    let db = state.clone();
    let album = blocking(move || {
        db.db.update_album(
            scope,
            album_id,
            req.title.as_deref(),
            req.cover_image_url.as_deref(),
        )
    })
    .await?
    .ok_or(ApiError::NotFound("Album"))?;

    Ok(Json(album_response(album, &state.urls)))
}

/// POST /albums/{album_id}/cover: multipart `file`, stored and set as the cover.
pub async fn upload_cover(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<AlbumResponse>, ApiError> {
    let scope = user.scope();

    let db = state.clone();
    if blocking(move || db.db.find_album(scope, album_id)).await?.is_none() {
        return Err(ApiError::NotFound("Album"));
    }

    let file = read_single_file(multipart).await?;
    let stored = store_file(&state, file).await?;

    let db = state.clone();
    let cover = stored.public_path();
    let updated = blocking(move || db.db.update_album(scope, album_id, None, Some(&cover))).await;

    match updated {
        Ok(Some(album)) => Ok(Json(album_response(album, &state.urls))),
        Ok(None) => {
            discard_file(&state, stored).await;
            Err(ApiError::NotFound("Album"))
        }
        Err(e) => {
            discard_file(&state, stored).await;
            Err(e)
        }
    }
}
