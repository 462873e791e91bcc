#[cfg(feature = "desktop")]
pub mod commands;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{bail, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::events::{self, EventSink, HISTORY_CHANGED};
use crate::models::{HistoryItem, VideoResult};

pub const PROGRESS_COMPLETE: f64 = 100.0;
/// Ticks stop here; only [`VideoStore::complete_progress`] reaches 100.
pub const TICK_PROGRESS_CAP: f64 = 99.0;

/// In-progress flag and percentage of the running identification session.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationSnapshot {
    pub in_progress: bool,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryChangedEvent {
    pub len: usize,
}

#[derive(Default)]
struct StoreInner {
    history: Vec<HistoryItem>,
    current: Option<VideoResult>,
    in_progress: bool,
    progress: f64,
}

/// Shared video state: identification history, the displayed result and the
/// progress of the one session that may be running. Lives for the process only.
#[derive(Clone, Default)]
pub struct VideoStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl VideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prepends the result to the history. Duplicates are kept.
    pub fn record_result(&self, result: VideoResult) -> HistoryItem {
        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            timestamp: result.identified_at,
            video_result: result,
        };
        self.write().history.insert(0, item.clone());
        item
    }

    pub fn clear_history(&self) {
        self.write().history.clear();
    }

    /// Newest first.
    pub fn history(&self) -> Vec<HistoryItem> {
        self.read().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.read().history.len()
    }

    /// Case-insensitive match on title, director and genre. An empty query
    /// returns the whole history.
    pub fn search_history(&self, query: &str) -> Vec<HistoryItem> {
        let needle = query.trim().to_lowercase();
        self.read()
            .history
            .iter()
            .filter(|item| {
                if needle.is_empty() {
                    return true;
                }
                let video = &item.video_result;
                [&video.title, &video.director, &video.genre]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub(crate) fn publish_history(&self, sink: &dyn EventSink) {
        events::emit(
            sink,
            HISTORY_CHANGED,
            &HistoryChangedEvent {
                len: self.history_len(),
            },
        );
    }

    pub fn set_current(&self, result: Option<VideoResult>) {
        self.write().current = result;
    }

    pub fn current(&self) -> Option<VideoResult> {
        self.read().current.clone()
    }

    pub fn snapshot(&self) -> IdentificationSnapshot {
        let guard = self.read();
        IdentificationSnapshot {
            in_progress: guard.in_progress,
            progress: guard.progress,
        }
    }

    pub fn is_identifying(&self) -> bool {
        self.read().in_progress
    }

    /// Opens a session at 0%. Only one session may be open at a time.
    pub fn begin_session(&self) -> Result<()> {
        let mut guard = self.write();
        if guard.in_progress {
            bail!("identification already in progress");
        }
        guard.in_progress = true;
        guard.progress = 0.0;
        Ok(())
    }

    /// Adds `delta` to the progress, capped at [`TICK_PROGRESS_CAP`]. Negative
    /// deltas and calls outside a session leave the value untouched.
    pub fn advance_progress(&self, delta: f64) -> f64 {
        let mut guard = self.write();
        if guard.in_progress
            && delta.is_finite()
            && delta > 0.0
            && guard.progress < TICK_PROGRESS_CAP
        {
            guard.progress = (guard.progress + delta).min(TICK_PROGRESS_CAP);
        }
        guard.progress
    }

    pub fn complete_progress(&self) {
        let mut guard = self.write();
        if guard.in_progress {
            guard.progress = PROGRESS_COMPLETE;
        }
    }

    pub fn end_session(&self) {
        let mut guard = self.write();
        guard.in_progress = false;
        guard.progress = 0.0;
    }
}
