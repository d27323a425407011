//! Media intake: persists uploaded images under a timestamped name and
//! derives a bounded thumbnail next to each original.

pub mod error;
pub mod storage;
pub mod thumbnail;

pub use error::MediaError;
pub use storage::{MediaStore, StoredMedia};
