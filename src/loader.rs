/// Image hydration and file metadata
///
/// This module turns a stored path identifier back into a displayable
/// gallery entity and computes the human-readable metadata shown next
/// to it. Unreadable or undecodable files come back as `None`, never as
/// errors; the caller drops them.

use chrono::{DateTime, Local};
use log::{debug, warn};
use std::path::Path;
use tokio::task;

use crate::state::data::{FileInfo, ImageEntity};

/// Display format for file creation times
const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load and decode the image behind a path identifier.
///
/// The returned entity carries empty metadata fields; callers enrich it
/// with [`file_info`] once. Returns `None` if the file is missing,
/// unreadable, or not a decodable image.
pub async fn load(identifier: &str) -> Option<ImageEntity> {
    let bytes = match tokio::fs::read(identifier).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("cannot read {}: {}", identifier, e);
            return None;
        }
    };

    // Spawn blocking because decoding is CPU-intensive
    let decoded = task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

    match decoded {
        Ok(Ok(image)) => Some(ImageEntity::new(image, Some(identifier.to_string()))),
        Ok(Err(e)) => {
            warn!("failed to decode {}: {}", identifier, e);
            None
        }
        Err(e) => {
            warn!("decode task join error for {}: {}", identifier, e);
            None
        }
    }
}

/// Compute display metadata for a path identifier.
///
/// Every field falls back to an empty string when the file attributes
/// cannot be read.
pub async fn file_info(identifier: &str) -> FileInfo {
    let metadata = match tokio::fs::metadata(identifier).await {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("cannot stat {}: {}", identifier, e);
            return FileInfo::default();
        }
    };

    let name = Path::new(identifier)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    // Creation time is not available on every filesystem
    let created = metadata
        .created()
        .map(|time| DateTime::<Local>::from(time).format(CREATED_FORMAT).to_string())
        .unwrap_or_default();

    FileInfo {
        name,
        size: format_size(metadata.len()),
        created,
    }
}

/// Format a byte count for display (e.g., "1.2 MB")
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::path::PathBuf;

    fn write_test_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbImage::new(4, 4).save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load("/nonexistent/image.png").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_load_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"this is not an image").unwrap();

        let result = load(&path.to_string_lossy()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_load_leaves_metadata_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "pic.png");

        let entity = load(&path.to_string_lossy()).await.unwrap();

        assert_eq!(entity.path.as_deref(), Some(&*path.to_string_lossy()));
        assert!(entity.name.is_empty());
        assert!(entity.size.is_empty());
        assert!(entity.created.is_empty());
    }

    #[tokio::test]
    async fn test_file_info_reads_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "pic.png");

        let info = file_info(&path.to_string_lossy()).await;

        assert_eq!(info.name, "pic.png");
        assert!(info.size.ends_with(" B"));
        // Creation time is filesystem-dependent; when present it must
        // use the display format
        if !info.created.is_empty() {
            chrono::NaiveDateTime::parse_from_str(&info.created, CREATED_FORMAT).unwrap();
        }
    }

    #[tokio::test]
    async fn test_file_info_missing_file_is_all_empty() {
        let info = file_info("/nonexistent/image.png").await;
        assert_eq!(info, FileInfo::default());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_258_291), "1.2 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
