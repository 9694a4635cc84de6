//! Usage counter store.
//!
//! Counts how many screening sessions were run. The counter is reached
//! through the [`UsageStore`] trait: subscribe to count changes, and
//! increment at most once per [`Session`].
//!
//! [`FileUsageStore`] keeps the record as a small JSON file, serializing
//! writers with an exclusive lock on a sibling `.lock` file and replacing
//! the record atomically.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Callback invoked with the current total
pub type UsageCallback = Box<dyn Fn(u64) + Send + Sync>;

/// Access to the shared usage counter
pub trait UsageStore {
    /// Read the current total
    fn current(&self) -> Result<u64>;

    /// Register a callback.
    ///
    /// The callback runs immediately with the current total and again after
    /// every change this store observes. Dropping the returned
    /// [`Subscription`] detaches it.
    fn subscribe(&self, on_change: UsageCallback) -> Subscription;

    /// Increment the counter unless this session already did.
    ///
    /// Returns whether an increment happened.
    fn increment_once_per_session(&self, session: &mut Session) -> Result<bool>;
}

/// In-memory session flags, discarded when the session ends
#[derive(Clone, Debug)]
pub struct Session {
    id: Uuid,
    flags: HashSet<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            flags: HashSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    pub fn set(&mut self, key: &str) {
        self.flags.insert(key.to_string());
    }
}

/// Persisted counter record
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageRecord {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

type SharedCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    last_seen: Option<u64>,
    entries: Vec<(u64, SharedCallback)>,
}

impl Listeners {
    /// Record `total` and return the callbacks to run once the lock is released
    fn observe(&mut self, total: u64) -> Vec<SharedCallback> {
        self.last_seen = Some(total);
        self.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }
}

/// Callbacks may subscribe or drop their own Subscription, so none run under the lock
fn notify(callbacks: Vec<SharedCallback>, total: u64) {
    for callback in callbacks {
        callback(total);
    }
}

fn lock_listeners(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    match listeners.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Handle for a registered callback
#[must_use = "dropping a Subscription detaches its callback"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Detach the callback
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock_listeners(&listeners)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// JSON-file backed usage counter
pub struct FileUsageStore {
    path: PathBuf,
    session_key: String,
    listeners: Arc<Mutex<Listeners>>,
}

impl FileUsageStore {
    /// Create a store for the record at `path`.
    ///
    /// `session_key` is the session flag that marks the counter as
    /// already incremented.
    pub fn new(path: impl Into<PathBuf>, session_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            session_key: session_key.into(),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the record and notify subscribers if another process changed it
    pub fn poll(&self) -> Result<u64> {
        let total = self.current()?;
        let callbacks = {
            let mut listeners = lock_listeners(&self.listeners);
            if listeners.last_seen == Some(total) {
                return Ok(total);
            }
            listeners.observe(total)
        };
        tracing::debug!("Usage counter changed externally to {}", total);
        notify(callbacks, total);
        Ok(total)
    }

    /// Read the full record (zero record if absent or unreadable)
    pub fn load_record(&self) -> Result<UsageRecord> {
        if !self.path.exists() {
            return Ok(UsageRecord::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<UsageRecord>(&contents) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse usage record {:?}: {}. Treating as zero.",
                    self.path,
                    e
                );
                Ok(UsageRecord::default())
            }
        }
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn parent_dir(&self) -> Result<&Path> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent),
            Some(_) => Ok(Path::new(".")),
            None => Err(Error::Usage(format!(
                "usage record path {:?} has no parent directory",
                self.path
            ))),
        }
    }

    /// Load, bump and atomically replace the record under an exclusive lock
    fn increment(&self) -> Result<u64> {
        let parent = self.parent_dir()?;
        std::fs::create_dir_all(parent)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock_file.lock_exclusive()?;

        let mut record = self.load_record()?;
        record.total += 1;
        record.updated_at = Some(Utc::now());

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&record)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        lock_file.unlock()?;

        tracing::info!("Usage counter incremented to {}", record.total);
        Ok(record.total)
    }
}

impl UsageStore for FileUsageStore {
    fn current(&self) -> Result<u64> {
        Ok(self.load_record()?.total)
    }

    fn subscribe(&self, on_change: UsageCallback) -> Subscription {
        let total = match self.current() {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!("Unable to read usage counter: {}. Reporting zero.", e);
                0
            }
        };
        on_change(total);

        let mut listeners = lock_listeners(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.last_seen = Some(total);
        listeners.entries.push((id, Arc::from(on_change)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    fn increment_once_per_session(&self, session: &mut Session) -> Result<bool> {
        if session.is_set(&self.session_key) {
            tracing::debug!("Session {} already counted", session.id());
            return Ok(false);
        }
        session.set(&self.session_key);

        let total = self.increment()?;
        let callbacks = lock_listeners(&self.listeners).observe(total);
        notify(callbacks, total);
        Ok(true)
    }
}
