//! Serial checker sessions
//!
//! A session holds a snapshot of the serial ledger plus the preview cursor.
//! The snapshot is built on the first action and on every `check`; `next`
//! and `show-list` reuse whatever snapshot the session already has. Entries
//! are replaced whole, never mutated in place, so a reader always sees a
//! snapshot and cursor that belong together.

use crate::error::ToolsError;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use ipam_engine::{advance, build_ledger, list_view, preview, wrap_index, ListRow, Serial, SerialLedger, TagGrammar, TOTAL_SERIALS};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// What the operator asked the serial checker to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerialAction {
    /// Rebuild the ledger and show the current preview
    Check,
    /// Move the preview cursor forward
    Next,
    /// Show every serial around the range in use
    ShowList,
}

/// Ledger derived from one read of the inventory
#[derive(Debug, Clone)]
pub struct SerialSnapshot {
    pub ledger: SerialLedger,
    pub available: Vec<Serial>,
    pub built_at: DateTime<Utc>,
}

impl SerialSnapshot {
    /// Scan `names` with `grammar`
    pub fn build<I, S>(names: I, grammar: &TagGrammar) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ledger = build_ledger(names, grammar);
        let available = ledger.available();
        Self {
            ledger,
            available,
            built_at: Utc::now(),
        }
    }
}

/// Lifecycle of one session
#[derive(Debug, Clone)]
#[allow(dead_code, reason = "only observed from tests in this binary")]
pub enum SessionState {
    /// Nothing read yet
    Uninitialized,
    /// Snapshot in place
    Built {
        snapshot: Arc<SerialSnapshot>,
        index: usize,
    },
}

#[derive(Debug, Clone)]
struct SessionEntry {
    snapshot: Option<Arc<SerialSnapshot>>,
    index: usize,
}

/// What one action produced
#[derive(Debug, Clone, Serialize)]
pub struct SerialView {
    pub action: SerialAction,
    /// First issuable serial, `None` when exhausted
    pub next_number: String,
    /// Serial under the cursor
    pub preview_number: String,
    /// Cursor after wrapping
    pub index: usize,
    pub available_count: usize,
    pub taken_count: usize,
    pub total_count: usize,
    pub lowest_taken: Serial,
    pub highest_taken: Serial,
    pub built_at: DateTime<Utc>,
    /// Present for `show-list` only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<ListRow>>,
}

/// Keyed store of serial sessions
#[derive(Debug)]
pub struct SessionStore {
    window: u16,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    /// `window` is how far past the highest serial `show-list` reaches
    pub fn new(window: u16) -> Self {
        Self {
            window,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session with its cursor at `index`
    pub async fn open(&self, index: usize) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, SessionEntry { snapshot: None, index });
        id
    }

    /// Current state of a session; unknown IDs are uninitialized
    #[allow(dead_code, reason = "only observed from tests in this binary")]
    pub async fn state(&self, id: Uuid) -> SessionState {
        match self.sessions.read().await.get(&id) {
            Some(SessionEntry { snapshot: Some(snapshot), index }) => SessionState::Built {
                snapshot: Arc::clone(snapshot),
                index: *index,
            },
            _ => SessionState::Uninitialized,
        }
    }

    /// Forget a session
    pub async fn close(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }

    /// Run `action` on session `id`
    ///
    /// `load` is awaited only when a snapshot has to be built. No lock is
    /// held while it runs. The cursor is read and moved under one write lock,
    /// so concurrent actions on a session apply one after the other.
    pub async fn apply<F, Fut>(&self, id: Uuid, action: SerialAction, load: F) -> Result<SerialView, ToolsError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SerialSnapshot, ToolsError>>,
    {
        let existing = self.sessions.read().await.get(&id).and_then(|entry| entry.snapshot.clone());

        let (snapshot, rebuilt) = match existing {
            Some(snapshot) if action != SerialAction::Check => (snapshot, false),
            _ => {
                debug!("Building serial snapshot for session {}", id);
                (Arc::new(load().await?), true)
            }
        };

        let mut sessions = self.sessions.write().await;
        let current = sessions.get(&id);
        // A check that finished while we waited may have replaced the snapshot
        let snapshot = match current.and_then(|entry| entry.snapshot.as_ref()) {
            Some(latest) if !rebuilt => Arc::clone(latest),
            _ => snapshot,
        };
        let index = current.map_or(0, |entry| entry.index);

        let index = match action {
            SerialAction::Next => advance(index),
            SerialAction::Check | SerialAction::ShowList => index,
        };
        let index = wrap_index(snapshot.available.len(), index);

        sessions.insert(
            id,
            SessionEntry {
                snapshot: Some(Arc::clone(&snapshot)),
                index,
            },
        );
        drop(sessions);

        let list = (action == SerialAction::ShowList).then(|| list_view(&snapshot.ledger, self.window));
        Ok(SerialView {
            action,
            next_number: preview(&snapshot.available, 0),
            preview_number: preview(&snapshot.available, index),
            index,
            available_count: snapshot.available.len(),
            taken_count: snapshot.ledger.taken_count(),
            total_count: TOTAL_SERIALS,
            lowest_taken: snapshot.ledger.lowest_taken,
            highest_taken: snapshot.ledger.highest_taken,
            built_at: snapshot.built_at,
            list,
        })
    }
}
