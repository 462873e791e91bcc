pub mod capture;
pub mod config;
pub mod events;
pub mod identification;
pub mod models;
pub mod navigation;
pub mod store;
pub mod theme;
pub mod utils;

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::time::Duration;

use capture::{Camera, CaptureController, CaptureSnapshot};
use config::AppConfig;
use events::SharedSink;
use identification::{IdentificationController, MockIdentifier};
use models::VideoResult;
use navigation::{NavEvent, Navigator, Route};
use store::{IdentificationSnapshot, VideoStore};
use theme::{ThemeSnapshot, ThemeStore};

/// Everything the screens share, created once at startup.
pub struct AppState {
    pub sink: SharedSink,
    pub store: VideoStore,
    pub theme: ThemeStore,
    pub navigator: Navigator,
    pub capture: CaptureController,
    pub identification: IdentificationController<MockIdentifier>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub route: Route,
    pub theme: ThemeSnapshot,
    pub identification: IdentificationSnapshot,
    pub capture: CaptureSnapshot,
    pub current: Option<VideoResult>,
    pub history_len: usize,
}

impl AppState {
    pub fn new(config: &AppConfig, camera: Arc<dyn Camera>, sink: SharedSink) -> Self {
        let store = VideoStore::new();
        let navigator = Navigator::new(sink.clone());
        let theme = ThemeStore::new(config.theme, sink.clone());
        let capture = CaptureController::new(
            camera,
            navigator.clone(),
            sink.clone(),
            config.capture.clone(),
        );
        let identification = IdentificationController::new(
            MockIdentifier::new(config.simulator.clone()),
            store.clone(),
            navigator.clone(),
            sink.clone(),
        )
        .with_results_grace(Duration::from_millis(config.results_grace_ms));

        Self {
            sink,
            store,
            theme,
            navigator,
            capture,
            identification,
        }
    }

    /// Applies a screen event sent by the webview. Hand-offs belong to the
    /// controllers and are refused; `Back` goes through [`AppState::go_back`].
    pub async fn navigate(&self, event: NavEvent) -> Result<Route> {
        if event.is_hand_off() {
            bail!("{} is not a user navigation", event.name());
        }
        match event {
            NavEvent::Back => self.go_back().await,
            event => self.navigator.apply(event),
        }
    }

    /// Back button. Leaving a screen also stops the timers that screen owns.
    pub async fn go_back(&self) -> Result<Route> {
        match self.navigator.current() {
            Route::Capture => self.capture.close().await,
            Route::Processing { .. } => {
                self.identification.cancel();
                self.capture.take_recording().await;
                self.navigator.apply(NavEvent::Back)
            }
            _ => self.navigator.apply(NavEvent::Back),
        }
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            route: self.navigator.current(),
            theme: self.theme.snapshot(),
            identification: self.store.snapshot(),
            capture: self.capture.get_snapshot().await,
            current: self.store.current(),
            history_len: self.store.history_len(),
        }
    }
}

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use log::info;
    use tauri::{Manager, State};

    use crate::{
        capture::{
            commands::{
                check_camera_permission, close_capture, get_capture_state,
                request_camera_permission, start_recording, stop_recording, toggle_camera_facing,
            },
            SimulatedCamera,
        },
        config::{self, AppConfig, CONFIG_FILE_NAME},
        identification::commands::{
            cancel_identification, get_identification_state, identify_recording,
            identify_screen_recording,
        },
        navigation::commands::{get_route, go_back, navigate},
        store::commands::{
            clear_history, decode_route_result, get_current_result, get_history,
            search_history, set_current_result,
        },
        theme::commands::{get_theme, set_theme_mode, toggle_theme},
        utils::logging,
        AppSnapshot, AppState,
    };

    #[tauri::command]
    async fn get_app_snapshot(state: State<'_, AppState>) -> Result<AppSnapshot, String> {
        Ok(state.snapshot().await)
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        logging::init(config::debug_enabled());

        info!("Moovy starting up...");

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let config_dir = app
                        .path()
                        .app_config_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    let config = AppConfig::load(&config_dir.join(CONFIG_FILE_NAME))?;

                    let sink = Arc::new(app.handle().clone());
                    let camera = Arc::new(SimulatedCamera::granted());
                    app.manage(AppState::new(&config, camera, sink));

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .invoke_handler(tauri::generate_handler![
                get_app_snapshot,
                get_route,
                navigate,
                go_back,
                get_history,
                search_history,
                clear_history,
                get_current_result,
                set_current_result,
                decode_route_result,
                get_identification_state,
                identify_recording,
                identify_screen_recording,
                cancel_identification,
                get_capture_state,
                check_camera_permission,
                request_camera_permission,
                start_recording,
                stop_recording,
                close_capture,
                toggle_camera_facing,
                get_theme,
                set_theme_mode,
                toggle_theme,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "desktop")]
pub use desktop::run;
