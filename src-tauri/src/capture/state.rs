use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CameraFacing;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStatus {
    #[default]
    Idle,
    Recording,
    /// The clip has been handed to the processing screen.
    HandedOff,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Undetermined,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    Manual,
    MaxDuration,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureState {
    pub status: CaptureStatus,
    pub facing: CameraFacing,
    pub recording_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_secs: u64,
    pub max_duration_secs: u64,
}

impl CaptureState {
    pub fn new(max_duration_secs: u64) -> Self {
        Self {
            status: CaptureStatus::Idle,
            facing: CameraFacing::default(),
            recording_id: None,
            started_at: None,
            elapsed_secs: 0,
            max_duration_secs,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        match self.status {
            CaptureStatus::Recording => self.max_duration_secs.saturating_sub(self.elapsed_secs),
            CaptureStatus::Idle | CaptureStatus::HandedOff => 0,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.status == CaptureStatus::Recording
    }

    pub fn begin_recording(&mut self, recording_id: String, started_at: DateTime<Utc>) {
        self.status = CaptureStatus::Recording;
        self.recording_id = Some(recording_id);
        self.started_at = Some(started_at);
        self.elapsed_secs = 0;
    }

    /// Counts one second and returns the new elapsed time.
    pub fn tick(&mut self) -> u64 {
        if self.is_recording() {
            self.elapsed_secs = (self.elapsed_secs + 1).min(self.max_duration_secs);
        }
        self.elapsed_secs
    }

    /// Leaves `Recording` exactly once. Returns false if it was not recording.
    pub fn hand_off(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.status = CaptureStatus::HandedOff;
        true
    }

    /// Back to idle, keeping the camera facing.
    pub fn reset(&mut self) {
        *self = Self {
            facing: self.facing,
            ..Self::new(self.max_duration_secs)
        };
    }
}
