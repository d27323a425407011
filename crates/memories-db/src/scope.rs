use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::AlbumRow;
use crate::pagination::PageRequest;
use crate::queries::{ALBUM_COLUMNS, album_from_row};

/// Restricts `albums` rows to the scope's owner. The owner id is always bound as `?1`.
const OWNED_BY: &str = "owner_id = ?1";

/// Owner-scoped access to albums and everything beneath them.
///
/// Every album read, update, listing, memory listing and memory insert goes
/// through this type, so they all share the one ownership predicate. An album
/// owned by someone else is indistinguishable from one that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    owner_id: i64,
}

impl OwnerScope {
    pub fn new(owner_id: i64) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub(crate) fn album(&self, conn: &Connection, album_id: i64) -> Result<Option<AlbumRow>> {
        let sql = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE {OWNED_BY} AND id = ?2");
        let row = conn
            .query_row(&sql, (self.owner_id, album_id), album_from_row)
            .optional()?;
        Ok(row)
    }

    pub(crate) fn count_albums(&self, conn: &Connection) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM albums WHERE {OWNED_BY}");
        Ok(conn.query_row(&sql, [self.owner_id], |r| r.get(0))?)
    }

    /// Newest first. `id` breaks ties between rows created in the same instant.
    pub(crate) fn albums(&self, conn: &Connection, page: PageRequest) -> Result<Vec<AlbumRow>> {
        let sql = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums
             WHERE {OWNED_BY}
             ORDER BY created_at DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map((self.owner_id, page.page_size(), page.offset()), album_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
