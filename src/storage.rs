//! Persistence gateway for whole-file JSON stores.
//!
//! A store is a JSON object keyed by identifier. It is read in full, mutated in
//! memory and written back in full after every change. There is no temp file,
//! no rename and no lock: two processes sharing a file race, and the last
//! writer wins.

use crate::error::{DeskError, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Raw text backing for one store.
pub trait Storage {
    /// Returns the stored text, or `None` if nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replaces the stored text.
    fn write(&mut self, contents: &str) -> Result<()>;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}

/// A store backed by a single file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A store held in memory. Counts writes so callers can assert on persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    /// Creates an empty storage, equivalent to a missing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryStorage {
            contents: Some(contents.into()),
            writes: 0,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        self.contents = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Loads a full record mapping from `storage`.
///
/// A missing backing, or text that is not a JSON object, yields an empty map.
/// The next write then replaces whatever was there, so the malformed case is
/// logged at warn level.
///
/// A well-formed object holding a record that fails to deserialize is an
/// error ([`DeskError::InvalidRecord`]) rather than an empty store, so one bad
/// value never wipes the rest of the file.
pub fn load_records<T, S>(storage: &S) -> Result<BTreeMap<String, T>>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let text = match storage.read()? {
        Some(text) => text,
        None => {
            warn!("{} not found, starting with an empty store", storage.describe());
            return Ok(BTreeMap::new());
        }
    };

    let raw: BTreeMap<String, Value> = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                "{} is malformed ({}), treating it as an empty store",
                storage.describe(),
                e
            );
            return Ok(BTreeMap::new());
        }
    };

    raw.into_iter()
        .map(|(id, value)| match serde_json::from_value(value) {
            Ok(record) => Ok((id, record)),
            Err(e) => {
                warn!("{}: record '{}' is invalid: {}", storage.describe(), id, e);
                Err(DeskError::InvalidRecord {
                    id,
                    reason: e.to_string(),
                })
            }
        })
        .collect()
}

/// Serializes `records` and overwrites `storage` with the result.
pub fn save_records<T, S>(storage: &mut S, records: &BTreeMap<String, T>) -> Result<()>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let text = to_pretty_json(records)?;
    storage.write(&text)?;
    debug!("Saved {} records to {}", records.len(), storage.describe());
    Ok(())
}

/// Pretty-prints `value` with 4-space indentation and no trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    let text = String::from_utf8(buf).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
    Ok(text)
}
