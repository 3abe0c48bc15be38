//! Colors of the active theme (yamls/themes.yaml)
use calc_base::config::active_theme;
use ratatui::style::Color;

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb(c[0], c[1], c[2])
}

pub fn accent() -> Color {
    rgb(active_theme().colors.accent)
}
pub fn success() -> Color {
    rgb(active_theme().colors.success)
}
pub fn warning() -> Color {
    rgb(active_theme().colors.warning)
}
pub fn error() -> Color {
    rgb(active_theme().colors.error)
}
pub fn text() -> Color {
    rgb(active_theme().colors.text)
}
pub fn text_muted() -> Color {
    rgb(active_theme().colors.text_muted)
}
pub fn bg_base() -> Color {
    rgb(active_theme().colors.bg_base)
}
pub fn bg_surface() -> Color {
    rgb(active_theme().colors.bg_surface)
}
pub fn border() -> Color {
    rgb(active_theme().colors.border)
}
