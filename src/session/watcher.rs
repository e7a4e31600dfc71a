// Cross-process session watcher.
// Polls the session file so a login or logout in another fitlog process reaches this one.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;

use super::storage::read_text;
use super::store::StorageEvent;

/// Produces a `StorageEvent` whenever the watched file's contents differ from
/// what this process last saw or wrote.
#[derive(Debug)]
pub struct StorageWatcher {
    key: String,
    path: PathBuf,
    interval: Duration,
    last_poll: Option<Instant>,
    known: Option<String>,
}

impl StorageWatcher {
    /// Start watching `path`; its current contents are the baseline.
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>, interval: Duration) -> Self {
        let path = path.into();
        let known = read_text(&path).ok().flatten();
        Self {
            key: key.into(),
            path,
            interval,
            last_poll: None,
            known,
        }
    }

    /// Adopt the file's current contents as the baseline. Call after this process
    /// writes the session so its own change is not reported back.
    pub fn resync(&mut self) {
        self.known = read_text(&self.path).ok().flatten();
    }

    /// Whether enough time has passed since the last poll.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_poll
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Check the file now.
    pub fn poll(&mut self) -> Result<Option<StorageEvent>> {
        self.last_poll = Some(Instant::now());
        let contents = read_text(&self.path)?;
        if contents == self.known {
            return Ok(None);
        }

        debug!(path = %self.path.display(), removed = contents.is_none(), "session file changed");
        self.known = contents.clone();
        Ok(Some(StorageEvent {
            key: self.key.clone(),
            new_value: contents,
        }))
    }

    /// Check the file if the poll interval has elapsed.
    pub fn poll_if_due(&mut self, now: Instant) -> Result<Option<StorageEvent>> {
        if !self.is_due(now) {
            return Ok(None);
        }
        self.poll()
    }
}
