//! Database row types: these map directly to SQLite rows.
//! Distinct from memories-types API models to keep the DB layer independent.

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Argon2 PHC string.
    pub password: String,
    pub birthday: Option<NaiveDate>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AlbumRow {
    pub id: i64,
    pub title: String,
    pub cover_image_url: Option<String>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MemoryRow {
    pub id: i64,
    pub album_id: i64,
    pub title: String,
    pub image_local_uri: Option<String>,
    pub image_remote_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
