//! Row to response conversion. Media paths are resolved to URLs here.

use memories_db::Page;
use memories_db::PageRequest;
use memories_db::models::{AlbumRow, MemoryRow, UserRow};
use memories_types::api::{AlbumResponse, MemoryResponse, Paginated, UserResponse};

use crate::urls::UrlResolver;

pub fn user_response(row: UserRow, urls: &UrlResolver) -> UserResponse {
    UserResponse {
        id: row.id,
        username: row.username,
        name: row.name,
        birthday: row.birthday,
        avatar_url: urls.resolve_opt(row.avatar_url),
    }
}

pub fn album_response(row: AlbumRow, urls: &UrlResolver) -> AlbumResponse {
    AlbumResponse {
        id: row.id,
        title: row.title,
        cover_image_url: urls.resolve_opt(row.cover_image_url),
        created_at: row.created_at,
    }
}

pub fn memory_response(row: MemoryRow, urls: &UrlResolver) -> MemoryResponse {
    MemoryResponse {
        id: row.id,
        album_id: row.album_id,
        title: row.title,
        image_local_uri: urls.resolve_opt(row.image_local_uri),
        image_remote_url: urls.resolve_opt(row.image_remote_url),
        created_at: row.created_at,
    }
}

pub fn paginated<T>(page: Page<T>, request: PageRequest) -> Paginated<T> {
    Paginated {
        items: page.items,
        page: request.page(),
        page_size: request.page_size(),
        total: page.total,
    }
}
