pub mod camera;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod state;

pub use camera::{Camera, SimulatedCamera};
pub use controller::{CaptureConfig, CaptureController, CaptureSnapshot};
pub use state::{CaptureState, CaptureStatus, PermissionStatus, StopReason};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera permission is required (currently {0:?})")]
    PermissionDenied(PermissionStatus),
}
