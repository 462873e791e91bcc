use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: &'static str,
    pub background_gradient: [&'static str; 2],
    pub surface: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub text_muted: &'static str,
    pub primary: &'static str,
    pub overlay_light: &'static str,
    pub error: &'static str,
    pub success: &'static str,
}

pub const DARK: ThemeColors = ThemeColors {
    background: "#0b0b14",
    background_gradient: ["#0b0b14", "#1b1533"],
    surface: "#1c1c2b",
    text: "#ffffff",
    text_secondary: "#b3b3c6",
    text_muted: "#6e6e85",
    primary: "#6c5ce7",
    overlay_light: "rgba(255, 255, 255, 0.1)",
    error: "#ff6b6b",
    success: "#2ecc71",
};

pub const LIGHT: ThemeColors = ThemeColors {
    background: "#f7f7fb",
    background_gradient: ["#ffffff", "#ebe8fb"],
    surface: "#ffffff",
    text: "#12121c",
    text_secondary: "#4a4a5e",
    text_muted: "#8c8ca1",
    primary: "#5a4bd8",
    overlay_light: "rgba(0, 0, 0, 0.06)",
    error: "#d63031",
    success: "#27ae60",
};
