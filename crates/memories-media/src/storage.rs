use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::MediaError;
use crate::thumbnail::{self, MAX_DIMENSION};

/// URL path segment the upload directory is served under. Recorded paths
/// start with it so they stay valid wherever the directory lives on disk.
pub const PUBLIC_PREFIX: &str = "uploads";

pub const THUMBNAIL_PREFIX: &str = "thumb_";

const FALLBACK_NAME: &str = "upload";

/// Manages the on-disk upload directory.
///
/// Each upload is stored flat as `{dir}/{YYYYMMDDHHMMSS}_{original name}` with
/// its thumbnail at `{dir}/thumb_{stored name}`. Names only have second
/// granularity; a same-named upload within the same second is refused with
/// [`MediaError::NameTaken`] and never touches the existing files.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

/// An original and its thumbnail as written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub file_name: String,
    pub original: PathBuf,
    pub thumbnail: PathBuf,
}

impl StoredMedia {
    /// Relative path recorded in the database, e.g. `uploads/20250101120000_a.jpg`.
    pub fn public_path(&self) -> String {
        format!("{}/{}", PUBLIC_PREFIX, self.file_name)
    }
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!("Upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the original bytes and a thumbnail next to it.
    ///
    /// Blocking. If the bytes cannot be turned into a thumbnail the original
    /// is removed again before the error is returned.
    pub fn store(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<StoredMedia, MediaError> {
        self.store_at(Utc::now(), original_name, bytes)
    }

    fn store_at(
        &self,
        now: DateTime<Utc>,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError> {
        let file_name = stored_file_name(now, original_name);
        let original = self.dir.join(&file_name);
        let thumbnail = self.dir.join(format!("{THUMBNAIL_PREFIX}{file_name}"));

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&original) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!("Upload name {} already taken", file_name);
                return Err(MediaError::NameTaken(file_name));
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = file.write_all(bytes) {
            drop(file);
            remove_quietly(&original);
            return Err(e.into());
        }
        drop(file);

        if let Err(e) = thumbnail::write_thumbnail(bytes, &thumbnail, MAX_DIMENSION) {
            remove_quietly(&original);
            return Err(e);
        }

        info!("Stored upload {} ({} bytes)", file_name, bytes.len());
        Ok(StoredMedia {
            file_name,
            original,
            thumbnail,
        })
    }

    /// Best-effort removal of a stored original and its thumbnail.
    pub fn remove(&self, media: &StoredMedia) {
        remove_quietly(&media.original);
        remove_quietly(&media.thumbnail);
    }
}

/// `{UTC second timestamp}_{final component of the client's file name}`.
pub fn stored_file_name(now: DateTime<Utc>, original_name: Option<&str>) -> String {
    let base = original_name
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_NAME);
    format!("{}_{}", now.format("%Y%m%d%H%M%S"), base)
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}
