use tauri::State;

use crate::{
    navigation::{NavEvent, Route},
    AppState,
};

#[tauri::command]
pub fn get_route(state: State<'_, AppState>) -> Route {
    state.navigator.current()
}

#[tauri::command]
pub async fn navigate(state: State<'_, AppState>, event: NavEvent) -> Result<Route, String> {
    state.navigate(event).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn go_back(state: State<'_, AppState>) -> Result<Route, String> {
    state.go_back().await.map_err(|e| e.to_string())
}
