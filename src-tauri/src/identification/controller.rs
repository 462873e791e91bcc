use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Result};
use log::{info, warn};
use serde::Serialize;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;

use crate::events::{
    self, SharedSink, IDENTIFICATION_CANCELLED, IDENTIFICATION_COMPLETED, IDENTIFICATION_FAILED,
    IDENTIFICATION_STATE_CHANGED,
};
use crate::models::{CapturePayload, HistoryItem, Source, VideoResult};
use crate::navigation::{NavEvent, Navigator, Route};
use crate::store::{IdentificationSnapshot, VideoStore};

use super::{IdentificationError, Identifier, ProgressReporter};

pub const DEFAULT_RESULTS_GRACE_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum IdentificationOutcome {
    Identified { result: VideoResult },
    NoMatch,
    Cancelled,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct IdentificationCompletedEvent {
    result: VideoResult,
    history_item: HistoryItem,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct IdentificationFailedEvent {
    source: Source,
    reason: String,
}

/// Resets the session when the identification future finishes or is dropped.
struct SessionGuard {
    store: VideoStore,
    sink: SharedSink,
    slot: Arc<Mutex<Option<CancellationToken>>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.store.end_session();
        events::emit(
            self.sink.as_ref(),
            IDENTIFICATION_STATE_CHANGED,
            &self.store.snapshot(),
        );
    }
}

/// Runs identification sessions against an [`Identifier`] and routes the
/// processing screen to whatever it found.
pub struct IdentificationController<I> {
    identifier: Arc<I>,
    store: VideoStore,
    navigator: Navigator,
    sink: SharedSink,
    cancel_token: Arc<Mutex<Option<CancellationToken>>>,
    results_grace: Duration,
}

impl<I> Clone for IdentificationController<I> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            store: self.store.clone(),
            navigator: self.navigator.clone(),
            sink: self.sink.clone(),
            cancel_token: self.cancel_token.clone(),
            results_grace: self.results_grace,
        }
    }
}

impl<I: Identifier> IdentificationController<I> {
    pub fn new(identifier: I, store: VideoStore, navigator: Navigator, sink: SharedSink) -> Self {
        Self {
            identifier: Arc::new(identifier),
            store,
            navigator,
            sink,
            cancel_token: Arc::new(Mutex::new(None)),
            results_grace: Duration::from_millis(DEFAULT_RESULTS_GRACE_MS),
        }
    }

    /// Pause between reaching 100% and leaving the processing screen.
    pub fn with_results_grace(mut self, grace: Duration) -> Self {
        self.results_grace = grace;
        self
    }

    pub fn snapshot(&self) -> IdentificationSnapshot {
        self.store.snapshot()
    }

    /// Runs one session to completion. Fails when the processing screen is
    /// not showing or another session is already running; a missing match is
    /// a normal outcome. Leaving the processing screen mid-session cancels it.
    pub async fn identify(
        &self,
        payload: CapturePayload,
        source: Source,
    ) -> Result<IdentificationOutcome> {
        if !self.on_processing_screen() {
            bail!(
                "cannot identify from the {} screen",
                self.navigator.current()
            );
        }
        self.store.begin_session()?;

        let token = CancellationToken::new();
        *self
            .cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        let _guard = SessionGuard {
            store: self.store.clone(),
            sink: self.sink.clone(),
            slot: self.cancel_token.clone(),
        };
        events::emit(
            self.sink.as_ref(),
            IDENTIFICATION_STATE_CHANGED,
            &self.store.snapshot(),
        );

        let reporter = ProgressReporter::new(self.store.clone(), self.sink.clone());
        let verdict = tokio::select! {
            verdict = self.identifier.identify(&payload, source, reporter.clone()) => verdict,
            _ = token.cancelled() => return Ok(self.cancelled(&payload)),
        };
        reporter.complete();

        tokio::select! {
            _ = time::sleep(self.results_grace) => {}
            _ = token.cancelled() => return Ok(self.cancelled(&payload)),
        }
        if !self.on_processing_screen() {
            return Ok(self.cancelled(&payload));
        }

        match verdict {
            Ok(result) => Ok(self.finish_identified(result)),
            Err(err) => Ok(self.finish_unmatched(source, err)),
        }
    }

    /// Stops the running session, if any.
    pub fn cancel(&self) -> bool {
        match self
            .cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn on_processing_screen(&self) -> bool {
        matches!(self.navigator.current(), Route::Processing { .. })
    }

    fn finish_identified(&self, result: VideoResult) -> IdentificationOutcome {
        let history_item = self.store.record_result(result.clone());
        self.store.set_current(Some(result.clone()));
        info!("Identified \"{}\" ({})", result.title, history_item.id);

        if let Err(err) = self.navigator.apply(NavEvent::Identified {
            result: result.clone(),
        }) {
            warn!("Identification finished off the processing screen: {err:#}");
        }

        events::emit(
            self.sink.as_ref(),
            IDENTIFICATION_COMPLETED,
            &IdentificationCompletedEvent {
                result: result.clone(),
                history_item,
            },
        );
        self.store.publish_history(self.sink.as_ref());

        IdentificationOutcome::Identified { result }
    }

    fn finish_unmatched(&self, source: Source, err: IdentificationError) -> IdentificationOutcome {
        warn!("Video identification failed: {err}");

        if let Err(nav_err) = self.navigator.apply(NavEvent::NoMatch { source }) {
            warn!("Identification finished off the processing screen: {nav_err:#}");
        }

        events::emit(
            self.sink.as_ref(),
            IDENTIFICATION_FAILED,
            &IdentificationFailedEvent {
                source,
                reason: err.to_string(),
            },
        );

        IdentificationOutcome::NoMatch
    }

    fn cancelled(&self, payload: &CapturePayload) -> IdentificationOutcome {
        info!("Identification of recording {} cancelled", payload.id);
        events::emit(
            self.sink.as_ref(),
            IDENTIFICATION_CANCELLED,
            &self.store.snapshot(),
        );
        IdentificationOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::{
        testing::RecordingSink, HISTORY_CHANGED, IDENTIFICATION_PROGRESS, ROUTE_CHANGED,
    };
    use crate::identification::{MockIdentifier, SimulatorConfig};

    fn controller(
        failure_rate: f64,
    ) -> (
        IdentificationController<MockIdentifier>,
        VideoStore,
        Navigator,
        Arc<RecordingSink>,
    ) {
        let sink = Arc::new(RecordingSink::default());
        let store = VideoStore::new();
        let navigator = Navigator::new(sink.clone());
        let identifier = MockIdentifier::with_seed(
            SimulatorConfig {
                failure_rate,
                ..SimulatorConfig::default()
            },
            9,
        );
        let controller =
            IdentificationController::new(identifier, store.clone(), navigator.clone(), sink.clone());
        (controller, store, navigator, sink)
    }

    fn enter_processing(navigator: &Navigator) {
        navigator.apply(NavEvent::OpenCapture).unwrap();
        navigator
            .apply(NavEvent::RecordingFinished {
                source: Source::Camera,
            })
            .unwrap();
    }

    fn payload() -> CapturePayload {
        CapturePayload::screen_recording(None)
    }

    #[tokio::test(start_paused = true)]
    async fn success_records_history_and_shows_results() {
        let (controller, store, navigator, sink) = controller(0.0);
        enter_processing(&navigator);

        let outcome = controller.identify(payload(), Source::Camera).await.unwrap();
        let result = match outcome {
            IdentificationOutcome::Identified { result } => result,
            other => panic!("expected a match, got {other:?}"),
        };

        assert_eq!(result.source, Source::Camera);
        assert_eq!(store.history()[0].video_result, result);
        assert_eq!(store.current(), Some(result.clone()));
        assert_eq!(navigator.current(), Route::results_for(&result).unwrap());
        assert_eq!(
            store.snapshot(),
            IdentificationSnapshot {
                in_progress: false,
                progress: 0.0
            }
        );
        assert_eq!(sink.named(IDENTIFICATION_COMPLETED).len(), 1);
        assert_eq!(sink.named(HISTORY_CHANGED)[0]["len"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_match_routes_to_retry_screen_without_history() {
        let (controller, store, navigator, sink) = controller(1.0);
        enter_processing(&navigator);

        let outcome = controller.identify(payload(), Source::Camera).await.unwrap();

        assert_eq!(outcome, IdentificationOutcome::NoMatch);
        assert!(store.history().is_empty());
        assert!(store.current().is_none());
        assert_eq!(navigator.current(), Route::NoMatch { source: Source::Camera });
        assert_eq!(
            sink.named(IDENTIFICATION_FAILED)[0]["reason"],
            "Video not found in database"
        );
        assert!(!store.is_identifying());
    }

    #[tokio::test(start_paused = true)]
    async fn session_is_in_progress_until_resolution() {
        let (controller, store, navigator, sink) = controller(0.0);
        enter_processing(&navigator);

        let running = tokio::spawn({
            let controller = controller.clone();
            async move { controller.identify(payload(), Source::Camera).await }
        });

        for _ in 0..8 {
            time::sleep(Duration::from_millis(400)).await;
            if running.is_finished() {
                break;
            }
            assert!(store.is_identifying());
        }
        running.await.unwrap().unwrap();
        assert!(!store.is_identifying());

        let states: Vec<bool> = sink
            .named(IDENTIFICATION_STATE_CHANGED)
            .iter()
            .map(|event| event["inProgress"].as_bool().unwrap())
            .collect();
        assert_eq!(states, vec![true, false]);

        let progress: Vec<f64> = sink
            .named(IDENTIFICATION_PROGRESS)
            .iter()
            .map(|event| event["progress"].as_f64().unwrap())
            .collect();
        assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(progress.last().copied(), Some(100.0));
        assert_eq!(progress.iter().filter(|value| **value == 100.0).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_session_is_rejected_while_one_runs() {
        let (controller, store, navigator, _) = controller(0.0);
        enter_processing(&navigator);

        let running = tokio::spawn({
            let controller = controller.clone();
            async move { controller.identify(payload(), Source::Camera).await }
        });
        time::sleep(Duration::from_millis(100)).await;

        let err = controller
            .identify(payload(), Source::Screen)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already in progress"));

        running.await.unwrap().unwrap();
        assert_eq!(store.history_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_resets_the_session_and_stays_on_processing() {
        let (controller, store, navigator, sink) = controller(0.0);
        enter_processing(&navigator);
        let routes_before = sink.named(ROUTE_CHANGED).len();

        let running = tokio::spawn({
            let controller = controller.clone();
            async move { controller.identify(payload(), Source::Camera).await }
        });
        time::sleep(Duration::from_millis(1200)).await;
        assert!(store.is_identifying());

        assert!(controller.cancel());
        let outcome = running.await.unwrap().unwrap();

        assert_eq!(outcome, IdentificationOutcome::Cancelled);
        assert!(!store.is_identifying());
        assert_eq!(store.snapshot().progress, 0.0);
        assert!(store.history().is_empty());
        assert_eq!(sink.named(ROUTE_CHANGED).len(), routes_before);
        assert!(!controller.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_call_still_resets_the_session() {
        let (controller, store, navigator, _) = controller(0.0);
        enter_processing(&navigator);

        let call = controller.identify(payload(), Source::Screen);
        let timed_out = time::timeout(Duration::from_millis(700), call).await;

        assert!(timed_out.is_err());
        assert!(!store.is_identifying());
        controller.identify(payload(), Source::Screen).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn refuses_to_run_off_the_processing_screen() {
        let (controller, store, navigator, sink) = controller(0.0);

        let err = controller
            .identify(payload(), Source::Camera)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("home"));
        assert!(!store.is_identifying());
        assert!(store.history().is_empty());
        assert!(sink.named(IDENTIFICATION_STATE_CHANGED).is_empty());
        assert_eq!(navigator.current(), Route::Home);
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_processing_mid_session_discards_the_verdict() {
        let (controller, store, navigator, sink) = controller(0.0);
        enter_processing(&navigator);

        let running = tokio::spawn({
            let controller = controller.clone();
            async move { controller.identify(payload(), Source::Camera).await }
        });
        time::sleep(Duration::from_millis(1200)).await;
        navigator.apply(NavEvent::Back).unwrap();

        let outcome = running.await.unwrap().unwrap();
        assert_eq!(outcome, IdentificationOutcome::Cancelled);
        assert!(store.history().is_empty());
        assert!(store.current().is_none());
        assert!(!store.is_identifying());
        assert!(sink.named(IDENTIFICATION_COMPLETED).is_empty());
        assert_eq!(navigator.current(), Route::Home);
    }
}
