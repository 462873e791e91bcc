use tauri::State;

use crate::{
    capture::{CaptureController, CaptureSnapshot, PermissionStatus},
    models::CapturePayload,
    navigation::Route,
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> CaptureController {
    state.capture.clone()
}

#[tauri::command]
pub async fn get_capture_state(state: State<'_, AppState>) -> Result<CaptureSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_snapshot().await)
}

#[tauri::command]
pub async fn check_camera_permission(
    state: State<'_, AppState>,
) -> Result<PermissionStatus, String> {
    let controller = controller_from_state(&state);
    Ok(controller.check_permission().await)
}

#[tauri::command]
pub async fn request_camera_permission(
    state: State<'_, AppState>,
) -> Result<PermissionStatus, String> {
    let controller = controller_from_state(&state);
    Ok(controller.request_permission().await)
}

#[tauri::command]
pub async fn start_recording(state: State<'_, AppState>) -> Result<CaptureSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.start_recording().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_recording(
    state: State<'_, AppState>,
) -> Result<Option<CapturePayload>, String> {
    let controller = controller_from_state(&state);
    controller.stop_recording().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn close_capture(state: State<'_, AppState>) -> Result<Route, String> {
    let controller = controller_from_state(&state);
    controller.close().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn toggle_camera_facing(state: State<'_, AppState>) -> Result<CaptureSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.toggle_facing().await.map_err(|e| e.to_string())
}
