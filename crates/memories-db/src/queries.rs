use crate::models::{AlbumRow, MemoryRow, UserRow};
use crate::pagination::{Page, PageRequest};
use crate::scope::OwnerScope;
use crate::Database;
use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use rusqlite::types::Type;

const USER_COLUMNS: &str = "id, username, name, password, birthday, avatar_url";
pub(crate) const ALBUM_COLUMNS: &str = "id, title, cover_image_url, owner_id, created_at";
const MEMORY_COLUMNS: &str =
    "id, album_id, title, image_local_uri, image_remote_url, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, name: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, name, password) VALUES (?1, ?2, ?3)",
                (username, name, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
            Ok(conn.query_row(&sql, [username], user_from_row).optional()?)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?))
    }

    /// Applies only the fields that are `Some`.
    pub fn update_user(
        &self,
        id: i64,
        name: Option<&str>,
        birthday: Option<NaiveDate>,
        avatar_url: Option<&str>,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users
                 SET name = COALESCE(?2, name),
                     birthday = COALESCE(?3, birthday),
                     avatar_url = COALESCE(?4, avatar_url)
                 WHERE id = ?1",
                rusqlite::params![id, name, birthday, avatar_url],
            )?;
            query_user_by_id(conn, id)?.ok_or_else(|| anyhow!("User not found: {}", id))
        })
    }

    // -- Tokens --

    pub fn create_token(&self, token: &str, user_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tokens (token, user_id, created_at) VALUES (?1, ?2, ?3)",
                (token, user_id, now_timestamp()),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_token(&self, token: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT u.id, u.username, u.name, u.password, u.birthday, u.avatar_url
                     FROM tokens t
                     JOIN users u ON u.id = t.user_id
                     WHERE t.token = ?1",
                    [token],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Albums --

    pub fn create_album(
        &self,
        scope: OwnerScope,
        title: &str,
        cover_image_url: Option<&str>,
    ) -> Result<AlbumRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO albums (title, cover_image_url, owner_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![title, cover_image_url, scope.owner_id(), now_timestamp()],
            )?;
            let id = conn.last_insert_rowid();
            scope
                .album(conn, id)?
                .ok_or_else(|| anyhow!("Album {} vanished after insert", id))
        })
    }

    pub fn find_album(&self, scope: OwnerScope, album_id: i64) -> Result<Option<AlbumRow>> {
        self.with_conn(|conn| scope.album(conn, album_id))
    }

    /// Applies only the fields that are `Some`. `None` if the album is not in scope.
    pub fn update_album(
        &self,
        scope: OwnerScope,
        album_id: i64,
        title: Option<&str>,
        cover_image_url: Option<&str>,
    ) -> Result<Option<AlbumRow>> {
        self.with_conn(|conn| {
            if scope.album(conn, album_id)?.is_none() {
                return Ok(None);
            }
            conn.execute(
                "UPDATE albums
                 SET title = COALESCE(?2, title),
                     cover_image_url = COALESCE(?3, cover_image_url)
                 WHERE id = ?1",
                rusqlite::params![album_id, title, cover_image_url],
            )?;
            scope.album(conn, album_id)
        })
    }

    pub fn list_albums(&self, scope: OwnerScope, page: PageRequest) -> Result<Page<AlbumRow>> {
        self.with_conn(|conn| {
            let total = scope.count_albums(conn)?;
            let items = scope.albums(conn, page)?;
            Ok(Page { items, total })
        })
    }

    // -- Memories --

    /// `None` if the album is not in scope.
    pub fn create_memory(
        &self,
        scope: OwnerScope,
        album_id: i64,
        title: &str,
        image_local_uri: Option<&str>,
        image_remote_url: Option<&str>,
    ) -> Result<Option<MemoryRow>> {
        self.with_conn(|conn| {
            if scope.album(conn, album_id)?.is_none() {
                return Ok(None);
            }
            conn.execute(
                "INSERT INTO memories (album_id, title, image_local_uri, image_remote_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![album_id, title, image_local_uri, image_remote_url, now_timestamp()],
            )?;
            let sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1");
            let row = conn.query_row(&sql, [conn.last_insert_rowid()], memory_from_row)?;
            Ok(Some(row))
        })
    }

    /// Newest first. `None` if the album is not in scope.
    pub fn list_memories(
        &self,
        scope: OwnerScope,
        album_id: i64,
        page: PageRequest,
    ) -> Result<Option<Page<MemoryRow>>> {
        self.with_conn(|conn| {
            if scope.album(conn, album_id)?.is_none() {
                return Ok(None);
            }

            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM memories WHERE album_id = ?1",
                [album_id],
                |r| r.get(0),
            )?;

            let sql = format!(
                "SELECT {MEMORY_COLUMNS} FROM memories
                 WHERE album_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map((album_id, page.page_size(), page.offset()), memory_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Some(Page { items, total }))
        })
    }
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], user_from_row).optional()?)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        password: row.get(3)?,
        birthday: row.get(4)?,
        avatar_url: row.get(5)?,
    })
}

pub(crate) fn album_from_row(row: &Row<'_>) -> rusqlite::Result<AlbumRow> {
    Ok(AlbumRow {
        id: row.get(0)?,
        title: row.get(1)?,
        cover_image_url: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    })
}

fn memory_from_row(row: &Row<'_>) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        album_id: row.get(1)?,
        title: row.get(2)?,
        image_local_uri: row.get(3)?,
        image_remote_url: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
    })
}

/// Fixed-width RFC 3339 with microseconds, so text order matches time order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
