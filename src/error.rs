use thiserror::Error;

/// Errors surfaced by the gallery core.
///
/// Almost every I/O failure in this crate is absorbed where it happens:
/// the affected item is dropped and logged. The variants here are the
/// exceptions a caller must see.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A delete was requested for a position that does not exist.
    /// Indicates the presentation layer and the list are out of sync.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The durable path store could not be opened.
    #[error("path store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The store directory could not be created.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
