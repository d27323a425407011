use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;
use tracing::{error, info, warn};

use memories_media::StoredMedia;

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::responses::memory_response;

/// A file part of a multipart request.
#[derive(Debug)]
pub struct FilePart {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Fields of the memory upload form. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub album_id: Option<String>,
    pub title: Option<String>,
    pub image_remote_url: Option<String>,
    pub file: Option<FilePart>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                "file" => form.file = read_file(field).await?,
                "album_id" => form.album_id = Some(field.text().await?),
                "title" => form.title = Some(field.text().await?),
                "image_remote_url" => form.image_remote_url = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(form)
    }

    fn album_id(&self) -> Result<i64, ApiError> {
        let raw = self
            .album_id
            .as_deref()
            .ok_or_else(|| ApiError::InvalidArgument("album_id is required".into()))?;
        raw.trim()
            .parse()
            .map_err(|_| ApiError::InvalidArgument("album_id must be an integer".into()))
    }
}

/// `None` for the empty part browsers send when no file was chosen.
async fn read_file(field: axum::extract::multipart::Field<'_>) -> Result<Option<FilePart>, ApiError> {
    let file_name = field.file_name().map(str::to_owned);
    let bytes = field.bytes().await?;
    if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
        return Ok(None);
    }
    Ok(Some(FilePart { file_name, bytes }))
}

/// Reads a form whose only meaningful field is a required `file`.
pub async fn read_single_file(multipart: Multipart) -> Result<FilePart, ApiError> {
    UploadForm::read(multipart)
        .await?
        .file
        .ok_or_else(|| ApiError::InvalidArgument("file is required".into()))
}

/// Persist an uploaded file and its thumbnail on a blocking thread.
pub async fn store_file(state: &AppState, file: FilePart) -> Result<StoredMedia, ApiError> {
    let media = state.media.clone();
    let stored = tokio::task::spawn_blocking(move || {
        media.store(file.file_name.as_deref(), &file.bytes)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow::anyhow!("media task failed: {}", e))
    })??;
    Ok(stored)
}

/// Undo a [`store_file`] whose database write did not go through.
pub async fn discard_file(state: &AppState, stored: StoredMedia) {
    warn!("Discarding upload {} after failed save", stored.file_name);
    let media = state.media.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || media.remove(&stored)).await {
        error!("spawn_blocking join error: {}", e);
    }
}

/// POST /upload: multipart `album_id`, `title`, optional `image_remote_url` and `file`.
pub async fn upload_memory(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = UploadForm::read(multipart).await?;
    let album_id = form.album_id()?;
    let title = form
        .title
        .clone()
        .ok_or_else(|| ApiError::InvalidArgument("title is required".into()))?;
    let image_remote_url = form.image_remote_url.clone().filter(|url| !url.is_empty());
    let scope = user.scope();

    // Ownership is checked before anything touches the disk.
    let db = state.clone();
    if blocking(move || db.db.find_album(scope, album_id)).await?.is_none() {
        return Err(ApiError::NotFound("Album"));
    }

    let stored = match form.file {
        Some(file) => Some(store_file(&state, file).await?),
        None => None,
    };

    let db = state.clone();
    let local_uri = stored.as_ref().map(StoredMedia::public_path);
    let created = blocking(move || {
        db.db.create_memory(
            scope,
            album_id,
            &title,
            local_uri.as_deref(),
            image_remote_url.as_deref(),
        )
    })
    .await;

    let memory = match created {
        Ok(Some(memory)) => memory,
        Ok(None) => {
            if let Some(stored) = stored {
                discard_file(&state, stored).await;
            }
            return Err(ApiError::NotFound("Album"));
        }
        Err(e) => {
            if let Some(stored) = stored {
                discard_file(&state, stored).await;
            }
            return Err(e);
        }
    };

    info!("User {} added memory {} to album {}", user.id(), memory.id, album_id);
    Ok((StatusCode::CREATED, Json(memory_response(memory, &state.urls))))
}
