use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Source, VideoResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Route {
    Home,
    Capture,
    Processing {
        source: Source,
    },
    /// Carries the result string-encoded, the way it travels as a route parameter.
    #[serde(rename_all = "camelCase")]
    Results {
        video_result: String,
    },
    History,
    NoMatch {
        source: Source,
    },
}

impl Route {
    pub fn results_for(result: &VideoResult) -> Result<Self> {
        Ok(Route::Results {
            video_result: result.to_route_param()?,
        })
    }

    /// The result shown by a `Results` route.
    pub fn video_result(&self) -> Option<Result<VideoResult>> {
        match self {
            Route::Results { video_result } => Some(VideoResult::from_route_param(video_result)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Capture => "capture",
            Route::Processing { .. } => "processing",
            Route::Results { .. } => "results",
            Route::History => "history",
            Route::NoMatch { .. } => "noMatch",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Screen transitions. Each one is only valid from specific routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavEvent {
    OpenCapture,
    OpenHistory,
    RecordingFinished { source: Source },
    SubmitScreenRecording,
    Identified { result: VideoResult },
    NoMatch { source: Source },
    OpenHistoryItem { result: VideoResult },
    StartIdentifying,
    Retry,
    Back,
}

impl NavEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::OpenCapture => "openCapture",
            NavEvent::OpenHistory => "openHistory",
            NavEvent::RecordingFinished { .. } => "recordingFinished",
            NavEvent::SubmitScreenRecording => "submitScreenRecording",
            NavEvent::Identified { .. } => "identified",
            NavEvent::NoMatch { .. } => "noMatch",
            NavEvent::OpenHistoryItem { .. } => "openHistoryItem",
            NavEvent::StartIdentifying => "startIdentifying",
            NavEvent::Retry => "retry",
            NavEvent::Back => "back",
        }
    }

    /// Hand-offs driven by the capture and identification controllers. The
    /// webview cannot send these directly.
    pub fn is_hand_off(&self) -> bool {
        matches!(
            self,
            NavEvent::RecordingFinished { .. }
                | NavEvent::SubmitScreenRecording
                | NavEvent::Identified { .. }
                | NavEvent::NoMatch { .. }
        )
    }
}
