use tauri::State;

use crate::{
    theme::{ThemeMode, ThemeSnapshot},
    AppState,
};

#[tauri::command]
pub fn get_theme(state: State<'_, AppState>) -> ThemeSnapshot {
    state.theme.snapshot()
}

#[tauri::command]
pub fn set_theme_mode(state: State<'_, AppState>, mode: ThemeMode) -> ThemeSnapshot {
    state.theme.set_mode(mode)
}

#[tauri::command]
pub fn toggle_theme(state: State<'_, AppState>) -> ThemeSnapshot {
    state.theme.toggle()
}
