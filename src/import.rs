/// Batch import of externally picked images
///
/// Every picked item runs an independent async chain: capability check,
/// decode, temp-copy write, metadata. A join barrier waits for all
/// chains to settle (success or drop) before the batch merges into the
/// gallery exactly once. There is no cancellation path once a batch is
/// submitted.

use image::{DynamicImage, ImageFormat};
use log::{debug, info, warn};
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task;
use uuid::Uuid;

use crate::loader;
use crate::state::data::ImageEntity;
use crate::state::gallery::Gallery;

/// One item handed over by the system picker: an opaque payload that
/// may or may not be a loadable image.
#[derive(Debug, Clone)]
pub struct PickedItem {
    pub data: Vec<u8>,
}

impl PickedItem {
    pub fn new(data: Vec<u8>) -> Self {
        PickedItem { data }
    }

    /// Cheap header sniff; the capability check that runs before any
    /// decode work is spent on the item
    pub fn can_load_image(&self) -> bool {
        image::guess_format(&self.data).is_ok()
    }
}

/// Materializes picker batches into gallery entities.
pub struct Importer {
    temp_dir: PathBuf,
}

impl Importer {
    /// Import into the system temp directory
    pub fn new() -> Self {
        Self::with_temp_dir(std::env::temp_dir())
    }

    /// Import into an explicit directory (tests, app-managed scratch)
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Importer {
            temp_dir: temp_dir.into(),
        }
    }

    /// Run one import batch and merge the result into the gallery.
    ///
    /// Items that are not images are skipped up front; items that fail
    /// to decode or to persist are dropped with a log line only. The
    /// merge happens once, strictly after every chain has reported, and
    /// appends in pick order. Returns the number of images merged.
    pub async fn import(&self, picks: Vec<PickedItem>, gallery: &mut Gallery) -> usize {
        let mut chains = Vec::new();

        for pick in picks {
            if !pick.can_load_image() {
                debug!("skipping picked item that is not a loadable image");
                continue;
            }

            let destination = self.temp_dir.join(format!("{}.png", Uuid::new_v4()));
            chains.push(task::spawn(import_one(pick.data, destination)));
        }

        let pending = chains.len();
        debug!("import batch: {} chains in flight", pending);

        // The barrier: every chain reports back, success or drop,
        // before anything merges
        let mut batch = Vec::new();
        for chain in chains {
            match chain.await {
                Ok(Some(entity)) => batch.push(entity),
                Ok(None) => {}
                Err(e) => warn!("import chain panicked: {}", e),
            }
        }

        let merged = batch.len();
        info!("✅ Import complete: {} of {} items merged", merged, pending);

        gallery.merge_imported(batch);
        merged
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

/// One item's chain: decode, re-encode as PNG, write the temp copy,
/// read back its metadata. Any failure drops the item.
async fn import_one(data: Vec<u8>, destination: PathBuf) -> Option<ImageEntity> {
    let decoded = task::spawn_blocking(move || decode_to_png(&data)).await;

    let (image, png) = match decoded {
        Ok(Some(result)) => result,
        Ok(None) => return None, // already logged
        Err(e) => {
            warn!("decode task join error: {}", e);
            return None;
        }
    };

    if let Err(e) = tokio::fs::write(&destination, &png).await {
        warn!("failed to write temp copy {}: {}", destination.display(), e);
        return None;
    }

    let identifier = destination.to_string_lossy().to_string();
    let info = loader::file_info(&identifier).await;

    let mut entity = ImageEntity::new(image, Some(identifier));
    entity.set_file_info(info);
    Some(entity)
}

/// Decode a picked payload and re-encode it as PNG, so the stored copy
/// is always decodable on the next load
fn decode_to_png(data: &[u8]) -> Option<(DynamicImage, Vec<u8>)> {
    let image = match image::load_from_memory(data) {
        Ok(image) => image,
        Err(e) => {
            warn!("failed to decode picked image: {}", e);
            return None;
        }
    };

    let mut png = Vec::new();
    if let Err(e) = image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png) {
        warn!("failed to encode temp copy: {}", e);
        return None;
    }

    Some((image, png))
}
