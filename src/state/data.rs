/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the storage layer and the presentation layer.

use image::DynamicImage;

/// A single image in the gallery
#[derive(Debug, Clone)]
pub struct ImageEntity {
    /// Decoded bitmap content
    pub image: DynamicImage,
    /// Path identifier of the backing file; the dedup and deletion key.
    /// `None` only before an imported image has its temp copy written.
    pub path: Option<String>,
    /// File name for display (e.g., "IMG_0001.png"), empty if unknown
    pub name: String,
    /// Human-readable file size (e.g., "1.2 MB"), empty if unknown
    pub size: String,
    /// Creation time as "yyyy-MM-dd HH:mm:ss" local time, empty if unknown
    pub created: String,
}

/// Display metadata computed from file-system attributes.
/// Every field defaults to empty when the attributes are unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileInfo {
    pub name: String,
    pub size: String,
    pub created: String,
}

impl ImageEntity {
    /// Create an entity with empty metadata, to be enriched once it has
    /// a backing file
    pub fn new(image: DynamicImage, path: Option<String>) -> Self {
        ImageEntity {
            image,
            path,
            name: String::new(),
            size: String::new(),
            created: String::new(),
        }
    }

    /// Apply the canonical metadata bundle
    pub fn set_file_info(&mut self, info: FileInfo) {
        self.name = info.name;
        self.size = info.size;
        self.created = info.created;
    }
}
