//! Local persistence for the learning engine.
//!
//! Everything lives under one state directory:
//!
//! ```text
//! <root>/
//!   seen.json        # Dedup store: sorted JSON array of item ids
//!   cycles.sqlite    # Append-only cycle log, keyed by cycle number
//!   stop             # Present = continuous mode should stop between cycles
//! ```
//!
//! At most one orchestrator may run against a given root at a time.
//! Nothing here enforces that; it is a deployment constraint.

mod cycles;
mod seen;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

// Trait must be in scope for `.write_all()` on File.
use io::Write;

pub use seen::{read_ids, set_aside, write_ids};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cycle not found: {0}")]
    CycleNotFound(u64),

    #[error("cycle already recorded: {0}")]
    CycleAlreadyRecorded(u64),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("refusing to overwrite unreadable file: {}", .0.display())]
    Unreadable(PathBuf),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// File-based storage rooted at the state directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.lookout/state/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".lookout").join("state"))
    }

    /// Path of the dedup store file.
    pub fn seen_path(&self) -> PathBuf {
        self.root.join("seen.json")
    }

    /// Path of the stop-signal file checked between continuous cycles.
    pub fn stop_path(&self) -> PathBuf {
        self.root.join("stop")
    }

    fn cycles_db_path(&self) -> PathBuf {
        self.root.join("cycles.sqlite")
    }
}

/// Replaces `path` with `bytes` without ever leaving a truncated file.
///
/// Writes a sibling `.tmp` file, syncs it, then renames it over the
/// target. On failure the temp file is removed and the target is left
/// untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
