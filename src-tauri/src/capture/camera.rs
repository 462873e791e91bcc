use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::{CameraFacing, CapturePayload, Source};

use super::PermissionStatus;

/// Exclusive access to a camera and microphone for one clip at a time.
pub trait Camera: Send + Sync + 'static {
    fn permission(&self) -> PermissionStatus;
    fn request_permission(&self) -> PermissionStatus;
    fn start_recording(&self, facing: CameraFacing, max_duration: Duration) -> Result<String>;
    fn stop_recording(&self) -> Result<CapturePayload>;
    fn discard_recording(&self);
}

struct ActiveRecording {
    id: String,
    facing: CameraFacing,
    recorded_at: DateTime<Utc>,
    started: Instant,
    max_duration: Duration,
}

/// Camera that records nothing: it only keeps track of what a clip would be.
pub struct SimulatedCamera {
    permission: Mutex<PermissionStatus>,
    grant_on_request: bool,
    active: Mutex<Option<ActiveRecording>>,
}

impl SimulatedCamera {
    pub fn new(permission: PermissionStatus, grant_on_request: bool) -> Self {
        Self {
            permission: Mutex::new(permission),
            grant_on_request,
            active: Mutex::new(None),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, true)
    }
}

impl Camera for SimulatedCamera {
    fn permission(&self) -> PermissionStatus {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_permission(&self) -> PermissionStatus {
        let mut permission = self.permission.lock().unwrap_or_else(PoisonError::into_inner);
        *permission = if self.grant_on_request {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        *permission
    }

    fn start_recording(&self, facing: CameraFacing, max_duration: Duration) -> Result<String> {
        if self.permission() != PermissionStatus::Granted {
            bail!("camera permission not granted");
        }
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.is_some() {
            bail!("camera is already recording");
        }
        let id = Uuid::new_v4().to_string();
        *active = Some(ActiveRecording {
            id: id.clone(),
            facing,
            recorded_at: Utc::now(),
            started: Instant::now(),
            max_duration,
        });
        Ok(id)
    }

    fn stop_recording(&self) -> Result<CapturePayload> {
        let recording = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| anyhow!("camera is not recording"))?;

        let duration = recording.started.elapsed().min(recording.max_duration);
        Ok(CapturePayload {
            uri: Some(format!("memory://recordings/{}.mp4", recording.id)),
            id: recording.id,
            source: Source::Camera,
            facing: Some(recording.facing),
            duration_secs: duration.as_secs(),
            recorded_at: recording.recorded_at,
        })
    }

    fn discard_recording(&self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
