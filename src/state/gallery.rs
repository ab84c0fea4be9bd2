use log::{debug, info, warn};
use std::collections::HashSet;

use crate::error::GalleryError;
use crate::loader;
use crate::state::data::ImageEntity;
use crate::state::store::PathStore;

/// Notifications from the gallery to the presentation layer.
///
/// All methods are fire-and-forget with no-op defaults; a consumer
/// implements the ones it renders.
pub trait GalleryEvents {
    /// The list was rebuilt from the path store
    fn list_loaded(&self) {}

    /// The list mutated in place; the grid should refresh
    fn reload_needed(&self) {}

    /// The list crossed between empty and non-empty
    fn empty_state_changed(&self, empty: bool) {
        let _ = empty;
    }

    /// Long-running work started (show the activity indicator)
    fn activity_started(&self) {}

    /// Long-running work finished
    fn activity_stopped(&self) {}
}

/// Events sink that ignores everything; the default until a consumer
/// attaches its own
struct NoEvents;

impl GalleryEvents for NoEvents {}

/// The single owner of the in-memory image list.
///
/// Reconciles the list against the injected [`PathStore`] on load,
/// applies deletions to both the list and the store, and receives
/// import batches as one atomic append. All mutation happens through
/// `&mut self` on the caller's context; nothing here is shared across
/// threads.
pub struct Gallery {
    store: Box<dyn PathStore>,
    events: Box<dyn GalleryEvents>,
    images: Vec<ImageEntity>,
    /// Last notified emptiness, so transitions fire exactly once
    empty: bool,
}

impl Gallery {
    pub fn new(store: Box<dyn PathStore>) -> Self {
        Gallery {
            store,
            events: Box::new(NoEvents),
            images: Vec::new(),
            empty: true,
        }
    }

    /// Attach the presentation-layer events sink
    pub fn set_events(&mut self, events: Box<dyn GalleryEvents>) {
        self.events = events;
    }

    /// Current list, insertion-ordered
    pub fn images(&self) -> &[ImageEntity] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Rebuild the list from the path store.
    ///
    /// Identifiers whose backing file cannot be read or decoded are
    /// dropped from the list but stay in the store; only explicit
    /// deletes mutate the store.
    pub async fn load(&mut self) -> &[ImageEntity] {
        self.events.activity_started();

        let identifiers = self.store.list_identifiers();
        let total = identifiers.len();
        let mut images = Vec::with_capacity(total);
        let mut seen = HashSet::new();

        for identifier in identifiers {
            // A well-behaved store never repeats itself; guard anyway so
            // one identifier maps to at most one entry
            if !seen.insert(identifier.clone()) {
                debug!("duplicate identifier in store: {}", identifier);
                continue;
            }

            match loader::load(&identifier).await {
                Some(mut entity) => {
                    entity.set_file_info(loader::file_info(&identifier).await);
                    images.push(entity);
                }
                None => debug!("dropping unreadable image: {}", identifier),
            }
        }

        info!("loaded {} of {} stored images", images.len(), total);
        self.images = images;

        self.events.list_loaded();
        self.notify_empty_state();
        self.events.activity_stopped();

        &self.images
    }

    /// Remove the entry at `index` from the list and its identifier
    /// from the store. Returns the removed entity.
    ///
    /// An out-of-range index is a presentation/state desync and fails
    /// loudly instead of being swallowed.
    pub fn delete(&mut self, index: usize) -> Result<ImageEntity, GalleryError> {
        if index >= self.images.len() {
            return Err(GalleryError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }

        let removed = self.images.remove(index);
        if let Some(path) = &removed.path {
            self.store.remove_identifiers(std::slice::from_ref(path));
        }

        self.events.reload_needed();
        self.notify_empty_state();

        Ok(removed)
    }

    /// Empty the list and clear the store
    pub fn delete_all(&mut self) {
        self.images.clear();
        self.store.clear();

        self.events.reload_needed();
        self.notify_empty_state();
    }

    /// Append a completed import batch and persist its identifiers.
    ///
    /// Called exactly once per batch, after every item chain has
    /// settled. Entities whose identifier is already present are
    /// skipped, so no duplicate survives the merge.
    pub fn merge_imported(&mut self, batch: Vec<ImageEntity>) {
        let mut present: HashSet<String> =
            self.images.iter().filter_map(|e| e.path.clone()).collect();
        let mut added = Vec::new();

        for entity in batch {
            match &entity.path {
                Some(path) if present.contains(path) => {
                    debug!("skipping duplicate import: {}", path);
                }
                Some(path) => {
                    present.insert(path.clone());
                    added.push(path.clone());
                    self.images.push(entity);
                }
                None => warn!("imported entity has no identifier, skipping"),
            }
        }

        self.store.add_identifiers(&added);

        self.events.reload_needed();
        self.notify_empty_state();
    }

    /// Fire `empty_state_changed` on transitions only. Recomputed after
    /// every mutation; length changes that keep the emptiness state
    /// stay silent.
    fn notify_empty_state(&mut self) {
        let empty = self.images.is_empty();
        if empty != self.empty {
            self.empty = empty;
            self.events.empty_state_changed(empty);
        }
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("images", &self.images.len())
            .field("empty", &self.empty)
            .finish()
    }
}
