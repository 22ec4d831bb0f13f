//! Submitted-command history with an Up/Down browsing cursor.
//!
//! The full list is stored as a JSON array of strings under [`HISTORY_KEY`]
//! and rewritten on every append. Entries are only ever added: if the stored
//! list could not be read at startup, nothing is written until it can be, and
//! new entries are then appended after the stored ones.

use crate::{KvStore, StoreError};

/// Storage key holding the serialized history list.
pub const HISTORY_KEY: &str = "cmd_history";

/// Result of stepping the cursor toward newer entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newer<'a> {
    /// The cursor was not browsing; nothing changed.
    NotBrowsing,
    /// The cursor moved to a newer entry.
    Entry(&'a str),
    /// The cursor walked past the newest entry and stopped browsing.
    PastNewest,
}

pub struct History<S> {
    store: S,
    entries: Vec<String>,
    /// `None` while not browsing; otherwise always `< entries.len()`.
    cursor: Option<usize>,
    /// The stored list exists but could not be read; `entries` holds only
    /// lines added since. Writing now would drop the stored ones.
    unsynced: bool,
}

impl<S: KvStore> History<S> {
    /// Load persisted history. A missing, unreadable or malformed value
    /// yields an empty history.
    pub fn load(store: S) -> Self {
        let (entries, unsynced) = match read_entries(&store) {
            Ok(entries) => (entries, false),
            Err(e) => {
                log::warn!("starting with empty history: {e}");
                (Vec::new(), true)
            }
        };
        log::debug!("loaded {} history entries", entries.len());

        Self {
            store,
            entries,
            cursor: None,
            unsynced,
        }
    }

    /// Record a submitted line. Blank lines are ignored and return `false`.
    ///
    /// Persistence is best-effort: a failed write is logged and the entry
    /// stays in memory.
    pub fn append(&mut self, cmd: &str) -> bool {
        if cmd.trim().is_empty() {
            return false;
        }
        self.entries.push(cmd.to_string());
        if let Err(e) = self.persist() {
            log::warn!("failed to persist history: {e}");
        }
        true
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if self.unsynced {
            let mut stored = read_entries(&self.store)?;
            log::info!("stored history readable again, keeping {} entries", stored.len());
            stored.append(&mut self.entries);
            self.entries = stored;
            self.cursor = None;
            self.unsynced = false;
        }
        let encoded = serde_json::to_string(&self.entries)?;
        self.store.set(HISTORY_KEY, &encoded)
    }

    /// Step toward older entries. The first step lands on the newest entry;
    /// later steps stop at the oldest.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            None => self.entries.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.cursor = Some(idx);
        Some(&self.entries[idx])
    }

    /// Step toward newer entries while browsing.
    pub fn newer(&mut self) -> Newer<'_> {
        match self.cursor {
            None => Newer::NotBrowsing,
            Some(idx) if idx + 1 < self.entries.len() => {
                self.cursor = Some(idx + 1);
                Newer::Entry(&self.entries[idx + 1])
            }
            Some(_) => {
                self.cursor = None;
                Newer::PastNewest
            }
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn read_entries<S: KvStore>(store: &S) -> Result<Vec<String>, StoreError> {
    match store.get(HISTORY_KEY)? {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            key: HISTORY_KEY.to_string(),
            source,
        }),
    }
}
