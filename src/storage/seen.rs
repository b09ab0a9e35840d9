//! Dedup store file: a sorted JSON array of item ids.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use jiff::Timestamp;

use super::{Result, write_atomic};

/// Reads the id set from `path`.
///
/// A missing file is a valid empty set: the first run has no history.
pub fn read_ids(path: &Path) -> Result<HashSet<String>> {
    let json = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e.into()),
    };
    let ids: Vec<String> = serde_json::from_str(&json)?;
    Ok(ids.into_iter().collect())
}

/// Writes the id set to `path` atomically, sorted for stable output.
pub fn write_ids(path: &Path, ids: &HashSet<String>) -> Result<()> {
    let mut sorted: Vec<&String> = ids.iter().collect();
    sorted.sort();
    let json = serde_json::to_string(&sorted)?;
    write_atomic(path, json.as_bytes())?;
    Ok(())
}

/// Renames an unreadable file to `<name>.corrupt-<unix seconds>` so a later
/// write cannot replace it. Returns the new path.
pub fn set_aside(path: &Path) -> io::Result<PathBuf> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", Timestamp::now().as_second()));
    let target = path.with_file_name(name);
    fs::rename(path, &target)?;
    Ok(target)
}
