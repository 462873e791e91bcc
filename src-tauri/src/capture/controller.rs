use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{
    sync::Mutex,
    time::{self, Duration, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::events::{self, SharedSink, CAPTURE_STATE_CHANGED, CAPTURE_TICK, RECORDING_FINISHED};
use crate::models::CapturePayload;
use crate::navigation::{NavEvent, Navigator, Route};

use super::{
    camera::Camera, CaptureError, CaptureState, CaptureStatus, PermissionStatus, StopReason,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
    pub max_duration_secs: u64,
    /// Pause between the end of a recording and the processing screen.
    pub handoff_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 15,
            handoff_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshot {
    pub state: CaptureState,
    pub remaining_secs: u64,
    pub permission: PermissionStatus,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct CaptureTickEvent {
    elapsed_secs: u64,
    remaining_secs: u64,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct RecordingFinishedEvent {
    payload: CapturePayload,
    reason: StopReason,
}

/// Drives the record button: one clip at a time, capped at the configured
/// length, handed to the processing screen exactly once.
#[derive(Clone)]
pub struct CaptureController {
    state: Arc<Mutex<CaptureState>>,
    camera: Arc<dyn Camera>,
    navigator: Navigator,
    sink: SharedSink,
    ticker_token: Arc<Mutex<Option<CancellationToken>>>,
    last_recording: Arc<Mutex<Option<CapturePayload>>>,
    config: CaptureConfig,
}

impl CaptureController {
    pub fn new(
        camera: Arc<dyn Camera>,
        navigator: Navigator,
        sink: SharedSink,
        config: CaptureConfig,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState::new(config.max_duration_secs))),
            camera,
            navigator,
            sink,
            ticker_token: Arc::new(Mutex::new(None)),
            last_recording: Arc::new(Mutex::new(None)),
            config,
        }
    }

    pub async fn get_snapshot(&self) -> CaptureSnapshot {
        let state = self.state.lock().await.clone();
        CaptureSnapshot {
            remaining_secs: state.remaining_secs(),
            permission: self.camera.permission(),
            state,
        }
    }

    pub async fn check_permission(&self) -> PermissionStatus {
        self.camera.permission()
    }

    /// Asks again after a denial.
    pub async fn request_permission(&self) -> PermissionStatus {
        let permission = self.camera.request_permission();
        log_info!("Camera permission is now {:?}", permission);
        self.emit_state_changed().await;
        permission
    }

    pub async fn start_recording(&self) -> Result<CaptureSnapshot> {
        let permission = self.camera.permission();
        if permission != PermissionStatus::Granted {
            return Err(CaptureError::PermissionDenied(permission).into());
        }

        {
            let mut state = self.state.lock().await;
            if state.is_recording() {
                bail!("recording already in progress");
            }
            let max_duration = Duration::from_secs(self.config.max_duration_secs);
            let recording_id = self
                .camera
                .start_recording(state.facing, max_duration)
                .context("failed to start recording")?;
            state.begin_recording(recording_id, Utc::now());
        }
        self.last_recording.lock().await.take();

        self.spawn_ticker().await;
        self.emit_state_changed().await;

        Ok(self.get_snapshot().await)
    }

    /// Manual stop. Returns the clip, or `None` if nothing was recording.
    pub async fn stop_recording(&self) -> Result<Option<CapturePayload>> {
        self.finish_recording(StopReason::Manual).await
    }

    /// Leaves the capture screen, discarding any clip in progress or still
    /// waiting to be handed off.
    pub async fn close(&self) -> Result<Route> {
        let route = self.navigator.current();
        if route != Route::Capture {
            return Ok(route);
        }

        let previous = {
            let mut state = self.state.lock().await;
            let status = state.status;
            state.reset();
            status
        };

        match previous {
            CaptureStatus::Recording => {
                self.cancel_ticker().await;
                self.camera.discard_recording();
                log_info!("Recording discarded on close");
            }
            CaptureStatus::HandedOff => {
                self.last_recording.lock().await.take();
                log_info!("Finished recording discarded before hand-off");
            }
            CaptureStatus::Idle => {}
        }
        self.emit_state_changed().await;

        self.navigator.apply(NavEvent::Back)
    }

    pub async fn toggle_facing(&self) -> Result<CaptureSnapshot> {
        {
            let mut state = self.state.lock().await;
            if state.is_recording() {
                bail!("cannot switch cameras while recording");
            }
            state.facing = state.facing.flipped();
        }
        self.emit_state_changed().await;
        Ok(self.get_snapshot().await)
    }

    /// The most recent finished clip, for the identification step.
    pub async fn take_recording(&self) -> Option<CapturePayload> {
        self.last_recording.lock().await.take()
    }

    async fn finish_recording(&self, reason: StopReason) -> Result<Option<CapturePayload>> {
        {
            let mut state = self.state.lock().await;
            if !state.hand_off() {
                return Ok(None);
            }
        }
        self.cancel_ticker().await;

        let payload = self
            .camera
            .stop_recording()
            .context("failed to stop recording")?;
        log_info!(
            "Recording {} finished ({:?}, {}s)",
            payload.id,
            reason,
            payload.duration_secs
        );
        *self.last_recording.lock().await = Some(payload.clone());

        self.emit_state_changed().await;
        events::emit(
            self.sink.as_ref(),
            RECORDING_FINISHED,
            &RecordingFinishedEvent {
                payload: payload.clone(),
                reason,
            },
        );

        time::sleep(Duration::from_millis(self.config.handoff_delay_ms)).await;

        if self.state.lock().await.status == CaptureStatus::HandedOff {
            if let Err(err) = self.navigator.apply(NavEvent::RecordingFinished {
                source: payload.source,
            }) {
                log_warn!("Recording finished off the capture screen: {err:#}");
            }
        }

        Ok(Some(payload))
    }

    async fn spawn_ticker(&self) {
        let token = CancellationToken::new();
        {
            let mut guard = self.ticker_token.lock().await;
            if let Some(previous) = guard.replace(token.clone()) {
                previous.cancel();
            }
        }

        let controller = self.clone();
        tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let (elapsed_secs, remaining_secs, recording) = {
                            let mut state = controller.state.lock().await;
                            let elapsed = state.tick();
                            (elapsed, state.remaining_secs(), state.is_recording())
                        };
                        if !recording {
                            break;
                        }

                        events::emit(
                            controller.sink.as_ref(),
                            CAPTURE_TICK,
                            &CaptureTickEvent { elapsed_secs, remaining_secs },
                        );

                        if remaining_secs == 0 {
                            log_info!("Recording reached {}s cap", elapsed_secs);
                            if let Err(err) = controller.finish_recording(StopReason::MaxDuration).await {
                                log_error!("Failed to finish capped recording: {err:#}");
                            }
                            break;
                        }
                    }
                }
            }
        });
    }

    async fn cancel_ticker(&self) {
        if let Some(token) = self.ticker_token.lock().await.take() {
            token.cancel();
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.get_snapshot().await;
        events::emit(self.sink.as_ref(), CAPTURE_STATE_CHANGED, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SimulatedCamera;
    use crate::events::{testing::RecordingSink, ROUTE_CHANGED};
    use crate::models::{CameraFacing, Source};

    fn controller(camera: SimulatedCamera) -> (CaptureController, Navigator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let navigator = Navigator::new(sink.clone());
        navigator.apply(NavEvent::OpenCapture).unwrap();
        let controller = CaptureController::new(
            Arc::new(camera),
            navigator.clone(),
            sink.clone(),
            CaptureConfig::default(),
        );
        (controller, navigator, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn cap_stops_recording_and_hands_off_once() {
        let (capture, navigator, sink) = controller(SimulatedCamera::granted());
        capture.start_recording().await.unwrap();

        time::sleep(Duration::from_secs(20)).await;

        assert_eq!(navigator.current(), Route::Processing { source: Source::Camera });
        assert_eq!(sink.named(RECORDING_FINISHED).len(), 1);
        assert_eq!(sink.named(RECORDING_FINISHED)[0]["reason"], "maxDuration");
        assert_eq!(sink.named(ROUTE_CHANGED).len(), 2);

        let ticks = sink.named(CAPTURE_TICK);
        assert_eq!(ticks.len(), 15);
        assert_eq!(ticks.last().unwrap()["remainingSecs"], 0);

        let snapshot = capture.get_snapshot().await;
        assert_eq!(snapshot.state.status, CaptureStatus::HandedOff);
        assert_eq!(snapshot.state.elapsed_secs, 15);

        let payload = capture.take_recording().await.unwrap();
        assert_eq!(payload.duration_secs, 15);
        assert_eq!(payload.source, Source::Camera);
        assert!(capture.take_recording().await.is_none());

        assert!(capture.stop_recording().await.unwrap().is_none());
        assert_eq!(sink.named(ROUTE_CHANGED).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_stop_hands_off_after_delay() {
        let (capture, navigator, sink) = controller(SimulatedCamera::granted());
        capture.start_recording().await.unwrap();
        time::sleep(Duration::from_millis(4500)).await;

        let started = time::Instant::now();
        let payload = capture.stop_recording().await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(payload.duration_secs, 4);
        assert_eq!(navigator.current(), Route::Processing { source: Source::Camera });

        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(sink.named(CAPTURE_TICK).len(), 4);
        assert_eq!(sink.named(RECORDING_FINISHED).len(), 1);
        assert_eq!(sink.named(RECORDING_FINISHED)[0]["reason"], "manual");
    }

    #[tokio::test(start_paused = true)]
    async fn close_while_recording_discards_and_goes_back() {
        let (capture, navigator, sink) = controller(SimulatedCamera::granted());
        capture.start_recording().await.unwrap();
        time::sleep(Duration::from_secs(3)).await;

        let route = capture.close().await.unwrap();
        assert_eq!(route, Route::Home);

        time::sleep(Duration::from_secs(20)).await;
        assert!(sink.named(RECORDING_FINISHED).is_empty());
        assert!(capture.take_recording().await.is_none());
        assert_eq!(navigator.current(), Route::Home);
        assert_eq!(capture.get_snapshot().await.state.status, CaptureStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn denied_permission_blocks_until_granted() {
        let camera = SimulatedCamera::new(PermissionStatus::Denied, true);
        let (capture, _, _) = controller(camera);

        let err = capture.start_recording().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::PermissionDenied(PermissionStatus::Denied))
        ));

        assert_eq!(capture.request_permission().await, PermissionStatus::Granted);
        capture.start_recording().await.unwrap();
        assert!(capture.start_recording().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn facing_toggles_only_when_idle() {
        let (capture, _, _) = controller(SimulatedCamera::granted());
        let snapshot = capture.toggle_facing().await.unwrap();
        assert_eq!(snapshot.state.facing, CameraFacing::Front);

        capture.start_recording().await.unwrap();
        assert!(capture.toggle_facing().await.is_err());

        let payload = capture.stop_recording().await.unwrap().unwrap();
        assert_eq!(payload.facing, Some(CameraFacing::Front));
    }

    #[tokio::test(start_paused = true)]
    async fn close_during_hand_off_drops_the_clip() {
        let (capture, navigator, sink) = controller(SimulatedCamera::granted());
        capture.start_recording().await.unwrap();
        time::sleep(Duration::from_secs(3)).await;

        let stopping = tokio::spawn({
            let capture = capture.clone();
            async move { capture.stop_recording().await }
        });
        time::sleep(Duration::from_millis(300)).await;
        assert_eq!(capture.close().await.unwrap(), Route::Home);

        assert!(stopping.await.unwrap().unwrap().is_some());
        assert!(capture.take_recording().await.is_none());
        assert_eq!(navigator.current(), Route::Home);
        assert_eq!(sink.named(ROUTE_CHANGED).len(), 2);
        assert_eq!(capture.get_snapshot().await.state.status, CaptureStatus::Idle);
    }
}
