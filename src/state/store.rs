use log::{debug, info, warn};
use rusqlite::{Connection, ErrorCode, Result as SqlResult};
use std::path::PathBuf;

use crate::error::GalleryError;

/// Durable, ordered storage of image path identifiers.
///
/// The gallery never reaches a process-wide store directly; it talks to
/// this trait, so a fake can be substituted in tests.
///
/// All methods are best-effort: when the backing store is unavailable
/// the call logs and becomes a no-op (listing returns an empty
/// sequence).
pub trait PathStore {
    /// All stored identifiers, in store order
    fn list_identifiers(&self) -> Vec<String>;

    /// Append the identifiers not already present, preserving
    /// first-seen order. Duplicates within `new` collapse too.
    fn add_identifiers(&mut self, new: &[String]);

    /// Remove every matching identifier. Absent entries are ignored.
    fn remove_identifiers(&mut self, to_remove: &[String]);

    /// Remove all identifiers
    fn clear(&mut self);
}

/// Path store backed by a single-table SQLite database.
pub struct SqlitePathStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SqlitePathStore {
    /// Open the store at its default location in the user's data directory:
    /// - Linux: ~/.local/share/photo-gallery/gallery.db
    /// - macOS: ~/Library/Application Support/photo-gallery/gallery.db
    /// - Windows: %APPDATA%\photo-gallery\gallery.db
    pub fn open_default() -> Result<Self, GalleryError> {
        Self::open(Self::default_db_path())
    }

    /// Open (or create) the store at an explicit location
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, GalleryError> {
        let db_path = db_path.into();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        let store = SqlitePathStore { conn, db_path };
        store.init_schema()?;

        info!("📁 Path store initialized at: {}", store.db_path.display());

        Ok(store)
    }

    /// Get the path where the database should be stored
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("photo-gallery");
        path.push("gallery.db");
        path
    }

    /// Initialize the database schema.
    /// The autoincrement id provides insertion order; the UNIQUE
    /// constraint enforces identifier dedup.
    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS paths (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                path    TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    fn try_list(&self) -> SqlResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT path FROM paths ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut paths = Vec::new();
        for path in rows {
            paths.push(path?);
        }

        Ok(paths)
    }
}

impl PathStore for SqlitePathStore {
    fn list_identifiers(&self) -> Vec<String> {
        match self.try_list() {
            Ok(paths) => paths,
            Err(e) => {
                warn!("path store list failed: {}", e);
                Vec::new()
            }
        }
    }

    fn add_identifiers(&mut self, new: &[String]) {
        for path in new {
            // Let the UNIQUE constraint reject duplicates
            let result = self
                .conn
                .execute("INSERT INTO paths (path) VALUES (?1)", [path.as_str()]);

            match result {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    debug!("skipping duplicate identifier: {}", path);
                }
                Err(e) => warn!("path store insert failed for {}: {}", path, e),
            }
        }
    }

    fn remove_identifiers(&mut self, to_remove: &[String]) {
        for path in to_remove {
            if let Err(e) = self
                .conn
                .execute("DELETE FROM paths WHERE path = ?1", [path.as_str()])
            {
                warn!("path store delete failed for {}: {}", path, e);
            }
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.conn.execute("DELETE FROM paths", []) {
            warn!("path store clear failed: {}", e);
        }
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for SqlitePathStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePathStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// In-memory path store with the same contract as the durable one.
/// Nothing survives the process; meant for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryPathStore {
    paths: Vec<String>,
}

impl MemoryPathStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathStore for MemoryPathStore {
    fn list_identifiers(&self) -> Vec<String> {
        self.paths.clone()
    }

    fn add_identifiers(&mut self, new: &[String]) {
        for path in new {
            if !self.paths.contains(path) {
                self.paths.push(path.clone());
            }
        }
    }

    fn remove_identifiers(&mut self, to_remove: &[String]) {
        self.paths.retain(|p| !to_remove.contains(p));
    }

    fn clear(&mut self) {
        self.paths.clear();
    }
}

/// Test-only store handle: the test keeps one clone for inspection
/// after the gallery takes ownership of the other.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedMemoryStore(pub(crate) std::rc::Rc<std::cell::RefCell<MemoryPathStore>>);

#[cfg(test)]
impl PathStore for SharedMemoryStore {
    fn list_identifiers(&self) -> Vec<String> {
        self.0.borrow().list_identifiers()
    }

    fn add_identifiers(&mut self, new: &[String]) {
        self.0.borrow_mut().add_identifiers(new);
    }

    fn remove_identifiers(&mut self, to_remove: &[String]) {
        self.0.borrow_mut().remove_identifiers(to_remove);
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }
}
