use tauri::State;

use crate::{
    identification::IdentificationOutcome,
    models::{CapturePayload, Source},
    navigation::NavEvent,
    store::IdentificationSnapshot,
    AppState,
};

#[tauri::command]
pub fn get_identification_state(state: State<'_, AppState>) -> IdentificationSnapshot {
    state.identification.snapshot()
}

/// Identifies the clip the capture screen just handed off.
#[tauri::command]
pub async fn identify_recording(
    state: State<'_, AppState>,
) -> Result<IdentificationOutcome, String> {
    let payload = state
        .capture
        .take_recording()
        .await
        .ok_or_else(|| "no finished recording to identify".to_string())?;
    let source = payload.source;

    let controller = state.identification.clone();
    controller
        .identify(payload, source)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn identify_screen_recording(
    state: State<'_, AppState>,
    uri: Option<String>,
) -> Result<IdentificationOutcome, String> {
    state
        .navigator
        .apply(NavEvent::SubmitScreenRecording)
        .map_err(|e| e.to_string())?;

    let controller = state.identification.clone();
    controller
        .identify(CapturePayload::screen_recording(uri), Source::Screen)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cancel_identification(state: State<'_, AppState>) -> bool {
    state.identification.cancel()
}
