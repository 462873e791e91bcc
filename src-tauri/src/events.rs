//! Outbound events for the webview.
//!
//! Controllers publish through an [`EventSink`] so they can run without a
//! Tauri runtime; the desktop build hands them its `AppHandle`.

use std::sync::Arc;

use log::error;
use serde::Serialize;
use serde_json::Value;

pub const ROUTE_CHANGED: &str = "route-changed";
pub const THEME_CHANGED: &str = "theme-changed";
pub const HISTORY_CHANGED: &str = "history-changed";
pub const IDENTIFICATION_STATE_CHANGED: &str = "identification-state-changed";
pub const IDENTIFICATION_PROGRESS: &str = "identification-progress";
pub const IDENTIFICATION_COMPLETED: &str = "identification-completed";
pub const IDENTIFICATION_FAILED: &str = "identification-failed";
pub const IDENTIFICATION_CANCELLED: &str = "identification-cancelled";
pub const CAPTURE_STATE_CHANGED: &str = "capture-state-changed";
pub const CAPTURE_TICK: &str = "capture-tick";
pub const RECORDING_FINISHED: &str = "recording-finished";

pub trait EventSink: Send + Sync + 'static {
    fn publish(&self, event: &str, payload: Value);
}

pub type SharedSink = Arc<dyn EventSink>;

pub(crate) fn emit<T: Serialize>(sink: &dyn EventSink, event: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => sink.publish(event, value),
        Err(err) => error!("Failed to serialize {event} payload: {err}"),
    }
}

#[cfg(feature = "desktop")]
impl EventSink for tauri::AppHandle {
    fn publish(&self, event: &str, payload: Value) {
        use tauri::Emitter;

        if let Err(err) = self.emit(event, payload) {
            error!("Failed to emit {event}: {err}");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use serde_json::Value;

    use super::EventSink;

    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingSink {
        pub fn named(&self, event: &str) -> Vec<Value> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, payload)| payload.clone())
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn publish(&self, event: &str, payload: Value) {
            self.events
                .lock()
                .unwrap()
                .push((event.to_string(), payload));
        }
    }
}
