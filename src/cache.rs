//! Single-slot, expiring snapshot cache.
//!
//! A snapshot is `{written_at, value}` encoded with postcard and stored under
//! one key. Readers get the value back only while it is fresh; anything that
//! fails to decode or has expired is a miss.

use crate::config::CacheConfig;
use crate::errors::{CacheError, CacheResult};
use chrono::{DateTime, Utc};
use schema::SpeciesRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Raw byte storage for snapshots.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Option<Vec<u8>>;
    /// Replace the bytes under `key`. Readers never observe a partial write.
    fn write(&mut self, key: &str, bytes: &[u8]) -> CacheResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> CacheResult<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.snapshot", key))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(key)).ok()
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> CacheResult<()> {
        let io_error = |source| CacheError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.directory).map_err(io_error)?;

        // Write beside the target, then rename over it
        let target = self.path_for(key);
        let staging = target.with_extension("snapshot.tmp");
        fs::write(&staging, bytes).map_err(io_error)?;
        fs::rename(&staging, &target).map_err(io_error)
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    written_at_ms: i64,
    value: T,
}

/// Typed, expiring view over a [`SnapshotStore`].
pub struct Cache<S: SnapshotStore> {
    store: S,
}

impl<S: SnapshotStore> Cache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        self.get_at(key, max_age, Utc::now())
    }

    pub fn get_at<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Option<T> {
        let bytes = self.store.read(key)?;
        let envelope: Envelope<T> = match postcard::from_bytes(&bytes) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::debug!("Ignoring unreadable snapshot {}: {}", key, err);
                return None;
            }
        };

        let age_ms = now.timestamp_millis() - envelope.written_at_ms;
        if age_ms < 0 {
            tracing::debug!("Snapshot {} is dated {} ms in the future", key, -age_ms);
            return None;
        }
        if age_ms > max_age.as_millis() as i64 {
            tracing::debug!("Snapshot {} expired ({} ms old)", key, age_ms);
            return None;
        }
        Some(envelope.value)
    }

    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> CacheResult<()> {
        self.put_at(key, value, Utc::now())
    }

    pub fn put_at<T: Serialize>(&mut self, key: &str, value: &T, now: DateTime<Utc>) -> CacheResult<()> {
        let envelope = Envelope {
            written_at_ms: now.timestamp_millis(),
            value,
        };
        let bytes = postcard::to_allocvec(&envelope)?;
        self.store.write(key, &bytes)
    }
}

/// The species list snapshot, under the configured versioned key.
pub struct SpeciesCache<S: SnapshotStore> {
    cache: Cache<S>,
    key: String,
    max_age: Duration,
}

impl<S: SnapshotStore> SpeciesCache<S> {
    pub fn new(store: S, config: &CacheConfig) -> Self {
        Self {
            cache: Cache::new(store),
            key: config.key.clone(),
            max_age: config.max_age(),
        }
    }

    /// The cached list when a fresh, non-empty snapshot exists.
    pub fn load(&self) -> Option<Vec<SpeciesRecord>> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Vec<SpeciesRecord>> {
        self.cache
            .get_at::<Vec<SpeciesRecord>>(&self.key, self.max_age, now)
            .filter(|species| !species.is_empty())
    }

    pub fn store(&mut self, species: &[SpeciesRecord]) -> CacheResult<()> {
        self.store_at(species, Utc::now())
    }

    pub fn store_at(&mut self, species: &[SpeciesRecord], now: DateTime<Utc>) -> CacheResult<()> {
        self.cache.put_at(&self.key, &species, now)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn inner(&self) -> &Cache<S> {
        &self.cache
    }
}
