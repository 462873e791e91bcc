//! Screen stack shared by every controller.
//!
//! `Home` is always the root. Hand-offs that should not be revisited with
//! back-navigation (capture → processing → results) replace the top route
//! instead of pushing.

#[cfg(feature = "desktop")]
pub mod commands;
mod route;

pub use route::{NavEvent, Route};

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{bail, Result};
use log::debug;
use serde::Serialize;

use crate::events::{self, SharedSink, ROUTE_CHANGED};
use crate::models::Source;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteChangedEvent {
    pub route: Route,
    pub depth: usize,
}

#[derive(Clone)]
pub struct Navigator {
    stack: Arc<RwLock<Vec<Route>>>,
    sink: SharedSink,
}

impl Navigator {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            stack: Arc::new(RwLock::new(vec![Route::Home])),
            sink,
        }
    }

    pub fn current(&self) -> Route {
        let stack = self.stack.read().unwrap_or_else(PoisonError::into_inner);
        stack.last().cloned().unwrap_or(Route::Home)
    }

    pub fn stack(&self) -> Vec<Route> {
        self.stack
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `event` to the current route. Events that make no sense for the
    /// current route are rejected, so a repeated hand-off cannot fire twice.
    pub fn apply(&self, event: NavEvent) -> Result<Route> {
        let changed = {
            let mut stack = self.stack.write().unwrap_or_else(PoisonError::into_inner);
            let current = stack.last().cloned().unwrap_or(Route::Home);
            let event_name = event.name();

            match (&current, event) {
                (Route::Home, NavEvent::OpenCapture) => stack.push(Route::Capture),
                (Route::Home, NavEvent::OpenHistory) => stack.push(Route::History),
                (Route::Home, NavEvent::SubmitScreenRecording) => stack.push(Route::Processing {
                    source: Source::Screen,
                }),
                (Route::Capture, NavEvent::RecordingFinished { source }) => {
                    replace_top(&mut stack, Route::Processing { source })
                }
                (Route::Processing { .. }, NavEvent::Identified { result }) => {
                    replace_top(&mut stack, Route::results_for(&result)?)
                }
                (Route::Processing { .. }, NavEvent::NoMatch { source }) => {
                    replace_top(&mut stack, Route::NoMatch { source })
                }
                (Route::History, NavEvent::OpenHistoryItem { result }) => {
                    stack.push(Route::results_for(&result)?)
                }
                (Route::History, NavEvent::StartIdentifying) => stack.truncate(1),
                (Route::NoMatch { .. }, NavEvent::Retry) => replace_top(&mut stack, Route::Capture),
                (_, NavEvent::Back) => {
                    if stack.len() <= 1 {
                        return Ok(current);
                    }
                    stack.pop();
                }
                (_, _) => bail!("cannot {event_name} from the {current} screen"),
            }

            debug!("route {current} -> {event_name}");
            RouteChangedEvent {
                route: stack.last().cloned().unwrap_or(Route::Home),
                depth: stack.len(),
            }
        };

        events::emit(self.sink.as_ref(), ROUTE_CHANGED, &changed);
        Ok(changed.route)
    }
}

fn replace_top(stack: &mut Vec<Route>, route: Route) {
    if stack.len() > 1 {
        stack.pop();
    }
    stack.push(route);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::testing::RecordingSink;
    use crate::models::sample_result;

    fn navigator() -> (Navigator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (Navigator::new(sink.clone()), sink)
    }

    #[test]
    fn capture_flow_replaces_screens_until_results() {
        let (nav, _) = navigator();
        nav.apply(NavEvent::OpenCapture).unwrap();
        nav.apply(NavEvent::RecordingFinished {
            source: Source::Camera,
        })
        .unwrap();
        assert_eq!(nav.stack(), vec![Route::Home, Route::Processing { source: Source::Camera }]);

        let result = sample_result("1", "The Matrix");
        let route = nav
            .apply(NavEvent::Identified {
                result: result.clone(),
            })
            .unwrap();
        assert_eq!(route.video_result().unwrap().unwrap(), result);

        assert_eq!(nav.apply(NavEvent::Back).unwrap(), Route::Home);
    }

    #[test]
    fn recording_finished_only_fires_once() {
        let (nav, sink) = navigator();
        nav.apply(NavEvent::OpenCapture).unwrap();
        let finished = NavEvent::RecordingFinished {
            source: Source::Camera,
        };
        nav.apply(finished.clone()).unwrap();

        let err = nav.apply(finished).unwrap_err();
        assert!(err.to_string().contains("processing"));
        assert_eq!(sink.named(ROUTE_CHANGED).len(), 2);
    }

    #[test]
    fn history_results_back_returns_to_history() {
        let (nav, _) = navigator();
        nav.apply(NavEvent::OpenHistory).unwrap();
        nav.apply(NavEvent::OpenHistoryItem {
            result: sample_result("2", "Inception"),
        })
        .unwrap();
        assert_eq!(nav.current().name(), "results");

        assert_eq!(nav.apply(NavEvent::Back).unwrap(), Route::History);
        assert_eq!(nav.apply(NavEvent::StartIdentifying).unwrap(), Route::Home);
    }

    #[test]
    fn back_never_leaves_home() {
        let (nav, sink) = navigator();
        assert_eq!(nav.apply(NavEvent::Back).unwrap(), Route::Home);
        assert_eq!(nav.stack(), vec![Route::Home]);
        assert!(sink.named(ROUTE_CHANGED).is_empty());
    }

    #[test]
    fn no_match_offers_retry_through_capture() {
        let (nav, _) = navigator();
        nav.apply(NavEvent::SubmitScreenRecording).unwrap();
        nav.apply(NavEvent::NoMatch {
            source: Source::Screen,
        })
        .unwrap();
        assert_eq!(nav.current(), Route::NoMatch { source: Source::Screen });

        assert_eq!(nav.apply(NavEvent::Retry).unwrap(), Route::Capture);
        assert_eq!(nav.stack().len(), 2);
    }

    #[test]
    fn events_from_the_wrong_screen_are_rejected() {
        let (nav, _) = navigator();
        assert!(nav
            .apply(NavEvent::Identified {
                result: sample_result("1", "The Matrix"),
            })
            .is_err());
        assert!(nav.apply(NavEvent::Retry).is_err());
        assert_eq!(nav.current(), Route::Home);
    }

    #[test]
    fn route_serializes_with_screen_tag() {
        let value = serde_json::to_value(Route::Processing {
            source: Source::Screen,
        })
        .unwrap();
        assert_eq!(value["screen"], "processing");
        assert_eq!(value["source"], "screen");

        let results = Route::results_for(&sample_result("1", "The Matrix")).unwrap();
        let value = serde_json::to_value(&results).unwrap();
        assert!(value["videoResult"].is_string());
    }
}
