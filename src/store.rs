//! Collection files: JSON arrays of records, newest first.
//!
//! Every write is a load → append → sort → store pass scoped to one process.
//! Records already in the file are carried as raw JSON so unknown keys and
//! key order survive; only the new record goes through the typed model.
//! Two processes appending to the same file at once can lose a record; no
//! locking is done.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{BlogPost, Dated, Presentation};

/// Read a collection file. A missing file is an error.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<T> = serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read a collection file, treating a missing file as an empty collection.
pub fn load_or_empty<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("{} does not exist, starting empty", path.display());
        return Ok(Vec::new());
    }
    load(path)
}

/// Stable sort of raw records by their `date` key as `T` parses it, newest
/// first. Records with a missing or unparseable date go last.
pub fn sort_newest_first<T: Dated>(records: &mut [Value]) {
    records.sort_by_cached_key(|r| Reverse(r.get("date").and_then(Value::as_str).and_then(T::parse_date)));
}

/// Overwrite `path` with two-space-indented JSON and a trailing newline.
pub fn store<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(records).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');
    fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Push `record` onto the raw collection and re-sort by `T`'s date parser.
fn append<T>(path: &Path, mut records: Vec<Value>, record: &T) -> Result<()>
where
    T: Dated + Serialize,
{
    let record = serde_json::to_value(record).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    records.push(record);
    sort_newest_first::<T>(&mut records);
    store(path, &records)
}

/// Append a post to the blog collection. The file must already exist.
pub fn add_blog_post(path: &Path, post: &BlogPost) -> Result<()> {
    let posts: Vec<Value> = load(path)?;
    append(path, posts, post)
}

/// `<dir>/<year>.json` for the presentation's event year.
pub fn presentation_file(dir: &Path, presentation: &Presentation) -> PathBuf {
    dir.join(format!("{}.json", presentation.year()))
}

/// Append a presentation to its year file, creating the file (and directory)
/// if needed. Returns the path written.
pub fn add_presentation(dir: &Path, presentation: &Presentation) -> Result<PathBuf> {
    let path = presentation_file(dir, presentation);
    let existing: Vec<Value> = load_or_empty(&path)?;
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    append(&path, existing, presentation)?;
    Ok(path)
}

/// Year files present in the presentations directory, newest year first.
pub fn presentation_years(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut years: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let stem = name.strip_suffix(".json")?;
            (stem.len() == 4 && stem.bytes().all(|b| b.is_ascii_digit()))
                .then(|| stem.to_string())
        })
        .collect();
    years.sort_by(|a, b| b.cmp(a));
    Ok(years)
}
