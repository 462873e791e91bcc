//! Turning a recording into a movie.
//!
//! [`Identifier`] is the seam a real matching backend would plug into;
//! [`MockIdentifier`] draws from a fixed catalog instead. The
//! [`IdentificationController`] owns the session lifecycle around either.

mod catalog;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod simulator;

pub use catalog::CATALOG;
pub use controller::{IdentificationController, IdentificationOutcome};
pub use simulator::{MockIdentifier, SimulatorConfig};

use std::future::Future;

use thiserror::Error;

use crate::events::{self, SharedSink, IDENTIFICATION_PROGRESS};
use crate::models::{CapturePayload, Source, VideoResult};
use crate::store::VideoStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentificationError {
    #[error("Video not found in database")]
    NoMatch,
}

pub trait Identifier: Send + Sync + 'static {
    /// Resolves `payload` to a movie, reporting progress along the way.
    fn identify(
        &self,
        payload: &CapturePayload,
        source: Source,
        progress: ProgressReporter,
    ) -> impl Future<Output = Result<VideoResult, IdentificationError>> + Send;
}

/// Writes session progress into the store and mirrors it to the webview.
#[derive(Clone)]
pub struct ProgressReporter {
    store: VideoStore,
    sink: SharedSink,
}

impl ProgressReporter {
    pub fn new(store: VideoStore, sink: SharedSink) -> Self {
        Self { store, sink }
    }

    /// Returns the progress after the increment.
    pub fn advance(&self, delta: f64) -> f64 {
        let before = self.store.snapshot().progress;
        let after = self.store.advance_progress(delta);
        if after > before {
            self.publish();
        }
        after
    }

    pub fn complete(&self) {
        self.store.complete_progress();
        self.publish();
    }

    fn publish(&self) {
        events::emit(
            self.sink.as_ref(),
            IDENTIFICATION_PROGRESS,
            &self.store.snapshot(),
        );
    }
}
