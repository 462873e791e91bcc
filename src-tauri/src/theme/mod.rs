#[cfg(feature = "desktop")]
pub mod commands;
mod palette;

pub use palette::ThemeColors;

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::events::{self, SharedSink, THEME_CHANGED};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn colors(&self) -> ThemeColors {
        match self {
            ThemeMode::Light => palette::LIGHT,
            ThemeMode::Dark => palette::DARK,
        }
    }

    /// Status bar content style: light glyphs on the dark theme.
    pub fn status_bar_style(&self) -> &'static str {
        match self {
            ThemeMode::Light => "dark",
            ThemeMode::Dark => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    pub mode: ThemeMode,
    pub colors: ThemeColors,
    pub status_bar_style: &'static str,
}

impl From<ThemeMode> for ThemeSnapshot {
    fn from(mode: ThemeMode) -> Self {
        Self {
            mode,
            colors: mode.colors(),
            status_bar_style: mode.status_bar_style(),
        }
    }
}

#[derive(Clone)]
pub struct ThemeStore {
    mode: Arc<RwLock<ThemeMode>>,
    sink: SharedSink,
}

impl ThemeStore {
    pub fn new(mode: ThemeMode, sink: SharedSink) -> Self {
        Self {
            mode: Arc::new(RwLock::new(mode)),
            sink,
        }
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot::from(*self.mode.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn set_mode(&self, mode: ThemeMode) -> ThemeSnapshot {
        {
            let mut guard = self.mode.write().unwrap_or_else(PoisonError::into_inner);
            if *guard == mode {
                return ThemeSnapshot::from(mode);
            }
            *guard = mode;
        }
        let snapshot = ThemeSnapshot::from(mode);
        events::emit(self.sink.as_ref(), THEME_CHANGED, &snapshot);
        snapshot
    }

    pub fn toggle(&self) -> ThemeSnapshot {
        let next = {
            let mut guard = self.mode.write().unwrap_or_else(PoisonError::into_inner);
            *guard = guard.toggled();
            *guard
        };
        let snapshot = ThemeSnapshot::from(next);
        events::emit(self.sink.as_ref(), THEME_CHANGED, &snapshot);
        snapshot
    }
}
