use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use memories_db::PageRequest;
use memories_types::api::{MemoryResponse, PageQuery, Paginated};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::responses::{memory_response, paginated};

/// GET /albums/{album_id}/memories?page=&page_size=
pub async fn list_memories(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    Query(query): Query<PageQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Paginated<MemoryResponse>>, ApiError> {
    let request = PageRequest::new(query.page, query.page_size)?;
    let scope = user.scope();

    let db = state.clone();
    let page = blocking(move || db.db.list_memories(scope, album_id, request))
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    let page = page.map(|row| memory_response(row, &state.urls));
    Ok(Json(paginated(page, request)))
}
