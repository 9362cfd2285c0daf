use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::{KeyValueStore, StoreError};

/// Storage file name inside the origin directory
const STORAGE_FILE: &str = "storage.json";

/// Staging file, renamed over `STORAGE_FILE` once fully written
const STAGING_FILE: &str = "storage.json.tmp";

/// Key/value map persisted as a JSON object on disk.
///
/// Every operation reads the file fresh, so two stores pointed at the same
/// directory see each other's writes (the "reload" case).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Entries to start a write from. A corrupt file is dropped so writes
    /// can replace it; the flag says whether that happened.
    fn read_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StoreError> {
        match self.read_all() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "Discarding corrupt storage file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path();
        let staging = self.dir.join(STAGING_FILE);

        let contents = serde_json::to_string_pretty(entries)?;
        {
            let mut file = File::create(&staging)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        // A crash before this point leaves the previous file intact
        std::fs::rename(&staging, &path)?;

        debug!(path = %path.display(), entries = entries.len(), "Storage written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let (mut entries, _) = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let (mut entries, discarded) = self.read_for_write()?;
        if entries.remove(key).is_some() || discarded {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
