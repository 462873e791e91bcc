use tauri::State;

use crate::{
    models::{HistoryItem, VideoResult},
    AppState,
};

#[tauri::command]
pub fn get_history(state: State<'_, AppState>) -> Vec<HistoryItem> {
    state.store.history()
}

#[tauri::command]
pub fn search_history(state: State<'_, AppState>, query: String) -> Vec<HistoryItem> {
    state.store.search_history(&query)
}

#[tauri::command]
pub fn clear_history(state: State<'_, AppState>) {
    state.store.clear_history();
    state.store.publish_history(state.sink.as_ref());
}

#[tauri::command]
pub fn get_current_result(state: State<'_, AppState>) -> Option<VideoResult> {
    state.store.current()
}

#[tauri::command]
pub fn set_current_result(state: State<'_, AppState>, result: Option<VideoResult>) {
    state.store.set_current(result);
}

/// Decodes the `videoResult` parameter of a results route.
#[tauri::command]
pub fn decode_route_result(video_result: String) -> Result<VideoResult, String> {
    VideoResult::from_route_param(&video_result).map_err(|e| format!("{e:#}"))
}
