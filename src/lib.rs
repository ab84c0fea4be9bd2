//! Photo gallery core.
//!
//! Imports externally picked images, persists references to them,
//! hydrates them back into an ordered in-memory list, and deletes them
//! one at a time or all at once. Rendering, gestures, and the platform
//! picker live outside this crate; the presentation layer consumes the
//! [`GalleryEvents`] notifications and the [`Gallery`] list.

pub mod error;
pub mod import;
pub mod loader;
pub mod state;

pub use error::GalleryError;
pub use import::{Importer, PickedItem};
pub use state::data::{FileInfo, ImageEntity};
pub use state::gallery::{Gallery, GalleryEvents};
pub use state::store::{MemoryPathStore, PathStore, SqlitePathStore};
