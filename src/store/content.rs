//! Content-addressed artifact store
//!
//! Directory-backed store keyed by derived cache keys. Index records live
//! under `index/` (one JSON file per key hash) and point at payloads under
//! `content/`, addressed by the SHA-256 of their bytes. Deleting an entry
//! only drops its index record; the orphaned payload is reclaimed by the
//! next integrity sweep.
//!
//! A store that cannot create its root directory degrades to disabled
//! mode, where every operation is a no-op or pass-through. The system must
//! stay usable without a cache.

use crate::error::{BadgerError, BadgerResult};
use crate::store::gc::GcClock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, warn};

/// Process-wide counter keeping concurrent writes on distinct temp files.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Store configuration, immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Root directory for the backing store. `None` disables caching.
    pub root: Option<PathBuf>,
}

/// Index record for a single cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    /// The derived cache key this record belongs to.
    key: String,
    /// Hex SHA-256 of the payload, which is also its content address.
    integrity: String,
    /// Payload size in bytes.
    size: u64,
    /// When the entry was written.
    inserted_at: DateTime<Utc>,
}

/// What an integrity sweep reclaimed.
///
/// Callers only rely on the report's presence to know a sweep ran; the
/// counts are diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Index records examined.
    pub entries_examined: usize,
    /// Index records dropped (missing or corrupt content).
    pub entries_reclaimed: usize,
    /// Content files removed (unreferenced or corrupt).
    pub content_reclaimed: usize,
    /// Bytes freed by removed content files.
    pub bytes_reclaimed: u64,
}

/// Content-addressed artifact store.
pub struct ContentStore {
    root: Option<PathBuf>,
    clock: GcClock,
}

fn hash_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl ContentStore {
    /// Open a store from config.
    ///
    /// A missing root, or a root that cannot be created, yields a disabled
    /// store rather than an error.
    pub async fn open(config: &StoreConfig) -> Self {
        let Some(root) = config.root.clone() else {
            return Self::disabled();
        };

        for dir in [root.clone(), root.join("index"), root.join("content")] {
            if let Err(e) = fs::create_dir_all(&dir).await {
                warn!(path = %dir.display(), error = %e, "cache root unusable, caching disabled");
                return Self::disabled();
            }
        }

        debug!(path = %root.display(), "cache store opened");
        Self {
            root: Some(root),
            clock: GcClock::new(),
        }
    }

    /// Create a store with caching disabled.
    pub fn disabled() -> Self {
        Self {
            root: None,
            clock: GcClock::new(),
        }
    }

    /// Whether this store is actually backed by a directory.
    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    fn index_path(root: &Path, key: &str) -> PathBuf {
        root.join("index").join(hash_hex(key.as_bytes()))
    }

    fn content_path(root: &Path, integrity: &str) -> PathBuf {
        // Two-char shard to keep directory fanout sane.
        let (shard, rest) = integrity.split_at(2);
        root.join("content").join(shard).join(rest)
    }

    async fn read_record(&self, root: &Path, key: &str) -> Option<EntryRecord> {
        let raw = fs::read(Self::index_path(root, key)).await.ok()?;
        serde_json::from_slice(&raw).ok()
    }

    /// Whether an entry exists for `key`.
    ///
    /// Never fails: backend errors (unreadable index, corrupt record) are
    /// reported as "not present", since a miss is always a safe degrade.
    pub async fn exists(&self, key: &str) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        self.read_record(root, key).await.is_some()
    }

    /// Read the payload for `key`.
    ///
    /// Assumes `exists(key)` was already true. An entry that vanished or no
    /// longer matches its recorded hash is the reportable race condition;
    /// callers should log it and treat it as a miss.
    pub async fn read(&self, key: &str) -> BadgerResult<Vec<u8>> {
        let Some(root) = &self.root else {
            return Err(BadgerError::EntryVanished {
                key: key.to_string(),
            });
        };

        let record = self
            .read_record(root, key)
            .await
            .ok_or_else(|| BadgerError::EntryVanished {
                key: key.to_string(),
            })?;

        let data = fs::read(Self::content_path(root, &record.integrity))
            .await
            .map_err(|_| BadgerError::EntryVanished {
                key: key.to_string(),
            })?;

        if hash_hex(&data) != record.integrity {
            return Err(BadgerError::EntryCorrupt {
                key: key.to_string(),
                reason: "payload does not match recorded integrity".to_string(),
            });
        }

        Ok(data)
    }

    /// Write `data` under `key`, returning what was written.
    ///
    /// Disabled mode is a pure pass-through. A put for an existing key is a
    /// logical overwrite: the index record is replaced and the old payload
    /// becomes sweepable garbage.
    pub async fn write(&self, key: &str, data: Vec<u8>) -> BadgerResult<Vec<u8>> {
        let Some(root) = &self.root else {
            return Ok(data);
        };

        let integrity = hash_hex(&data);
        let content_path = Self::content_path(root, &integrity);

        if let Some(parent) = content_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BadgerError::io("creating content shard dir", e))?;
        }

        // Temp file + rename so concurrent writers of the same payload
        // never expose a partial file. The temp name must be unique per
        // write: same-key writes race legitimately and last-write-wins.
        let tmp = content_path.with_extension(format!(
            "tmp-{}-{}",
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed),
        ));
        fs::write(&tmp, &data)
            .await
            .map_err(|e| BadgerError::io("writing cache payload", e))?;
        if let Err(e) = fs::rename(&tmp, &content_path).await {
            // Content-addressed: if the destination exists it already
            // holds exactly these bytes, so losing the rename race is a
            // success.
            if fs::metadata(&content_path).await.is_err() {
                return Err(BadgerError::io("publishing cache payload", e));
            }
            let _ = fs::remove_file(&tmp).await;
        }

        let record = EntryRecord {
            key: key.to_string(),
            integrity,
            size: data.len() as u64,
            inserted_at: Utc::now(),
        };
        fs::write(Self::index_path(root, key), serde_json::to_vec(&record)?)
            .await
            .map_err(|e| BadgerError::io("writing cache index record", e))?;

        debug!(key, size = record.size, "cache entry written");
        Ok(data)
    }

    /// Remove every entry and payload.
    pub async fn delete_all(&self) -> BadgerResult<()> {
        let Some(root) = &self.root else {
            return Ok(());
        };

        for dir in [root.join("index"), root.join("content")] {
            if fs::metadata(&dir).await.is_ok() {
                fs::remove_dir_all(&dir)
                    .await
                    .map_err(|e| BadgerError::io("clearing cache", e))?;
            }
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| BadgerError::io("recreating cache dir", e))?;
        }

        debug!("cache cleared");
        Ok(())
    }

    /// Remove the entry for `key`, then run an integrity sweep if one is
    /// due.
    ///
    /// Only the index record is removed here; the payload lingers as an
    /// orphan until a sweep reclaims it.
    pub async fn delete_one(&self, key: &str) -> BadgerResult<()> {
        let Some(root) = &self.root else {
            return Ok(());
        };

        match fs::remove_file(Self::index_path(root, key)).await {
            Ok(()) => debug!(key, "cache entry deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(BadgerError::io("deleting cache index record", e)),
        }

        if self.clock.sweep_due(Utc::now()) {
            self.verify().await?;
        }

        Ok(())
    }

    /// Full integrity sweep: drop index records whose payload is missing or
    /// corrupt, then remove payloads no record references.
    ///
    /// Safe to run concurrently with itself; the worst case is duplicate
    /// work. Returns `None` when the store is disabled.
    pub async fn verify(&self) -> BadgerResult<Option<SweepReport>> {
        let Some(root) = &self.root else {
            return Ok(None);
        };

        let mut report = SweepReport::default();
        let mut live = HashSet::new();

        let index_dir = root.join("index");
        let mut entries = fs::read_dir(&index_dir)
            .await
            .map_err(|e| BadgerError::io("reading cache index", e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BadgerError::io("iterating cache index", e))?
        {
            report.entries_examined += 1;
            let record: Option<EntryRecord> = match fs::read(entry.path()).await {
                Ok(raw) => serde_json::from_slice(&raw).ok(),
                Err(_) => None,
            };

            let keep = match &record {
                Some(r) => match fs::read(Self::content_path(root, &r.integrity)).await {
                    Ok(data) => hash_hex(&data) == r.integrity,
                    Err(_) => false,
                },
                None => false,
            };

            if keep {
                live.insert(record.map(|r| r.integrity).unwrap_or_default());
            } else {
                report.entries_reclaimed += 1;
                if let Err(e) = fs::remove_file(entry.path()).await {
                    warn!(error = %e, "failed to drop stale index record");
                }
            }
        }

        // Second pass: reclaim unreferenced payloads.
        let content_dir = root.join("content");
        let mut shards = fs::read_dir(&content_dir)
            .await
            .map_err(|e| BadgerError::io("reading cache content", e))?;
        while let Some(shard) = shards
            .next_entry()
            .await
            .map_err(|e| BadgerError::io("iterating cache content", e))?
        {
            let shard_name = shard.file_name().to_string_lossy().into_owned();
            let Ok(mut files) = fs::read_dir(shard.path()).await else {
                continue;
            };
            while let Ok(Some(file)) = files.next_entry().await {
                let integrity = format!("{}{}", shard_name, file.file_name().to_string_lossy());
                if live.contains(&integrity) {
                    continue;
                }
                let size = fs::metadata(file.path()).await.map(|m| m.len()).unwrap_or(0);
                if fs::remove_file(file.path()).await.is_ok() {
                    report.content_reclaimed += 1;
                    report.bytes_reclaimed += size;
                }
            }
        }

        self.clock.mark_swept(Utc::now());
        debug!(
            examined = report.entries_examined,
            entries = report.entries_reclaimed,
            content = report.content_reclaimed,
            bytes = report.bytes_reclaimed,
            "cache sweep complete"
        );
        Ok(Some(report))
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> &GcClock {
        &self.clock
    }
}
