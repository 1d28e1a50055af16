// Icon glyphs, all covered by egui's bundled emoji fonts

pub const MAP: &str = "🗺";
pub const NOTES: &str = "🗒";
pub const SUN: &str = "☀";
pub const MOON: &str = "🌙";
pub const PIN: &str = "📍";
pub const REFRESH: &str = "🔄";
pub const INFO: &str = "ℹ";
pub const ADD: &str = "➕";
pub const EDIT: &str = "✏";
pub const DELETE: &str = "🗑";
pub const IMAGE: &str = "🖼";
pub const CLOSE: &str = "❌";

pub fn icon_text(icon: &str) -> egui::RichText {
    egui::RichText::new(icon).size(16.0)
}

pub fn icon_sized(icon: &str, size: f32) -> egui::RichText {
    egui::RichText::new(icon).size(size)
}

pub fn icon_with_text(icon: &str, text: &str) -> String {
    format!("{} {}", icon, text)
}

// Tab-style toggle with an icon; filled when selected
pub fn tab_button_with_icon(
    ui: &mut egui::Ui,
    icon: &str,
    text: &str,
    is_selected: bool,
) -> egui::Response {
    ui.selectable_label(is_selected, icon_with_text(icon, text))
}

// Button with an icon label that can be disabled
pub fn button_with_icon(
    ui: &mut egui::Ui,
    icon: &str,
    text: &str,
    enabled: bool,
) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(icon_with_text(icon, text)))
}
