use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Source;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CameraFacing {
    #[default]
    Back,
    Front,
}

impl CameraFacing {
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }
}

/// Opaque handle to a finished recording. Identification never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapturePayload {
    pub id: String,
    pub source: Source,
    pub facing: Option<CameraFacing>,
    pub duration_secs: u64,
    pub recorded_at: DateTime<Utc>,
    pub uri: Option<String>,
}

impl CapturePayload {
    pub fn screen_recording(uri: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: Source::Screen,
            facing: None,
            duration_secs: 0,
            recorded_at: Utc::now(),
            uri,
        }
    }
}
