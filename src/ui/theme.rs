use eframe::egui;

pub fn configure_visuals(dark: bool) -> egui::Visuals {
    if dark { dark_visuals() } else { light_visuals() }
}

fn dark_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();

    // Customize colors
    visuals.window_fill = egui::Color32::from_rgb(31, 41, 55); // gray-800
    visuals.panel_fill = egui::Color32::from_rgb(17, 24, 39); // gray-900
    visuals.faint_bg_color = egui::Color32::from_rgb(55, 65, 81);

    // Button colors
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(55, 65, 81);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(75, 85, 99);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(96, 106, 120);

    // Text colors
    visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::WHITE;
    visuals.widgets.inactive.fg_stroke.color = egui::Color32::WHITE;
    visuals.widgets.hovered.fg_stroke.color = egui::Color32::WHITE;
    visuals.widgets.active.fg_stroke.color = egui::Color32::WHITE;

    // Accent color (selected tab, text selection)
    visuals.selection.bg_fill = egui::Color32::from_rgb(59, 130, 246);
    visuals.selection.stroke.color = egui::Color32::WHITE;

    visuals.widgets.inactive.bg_stroke.color = egui::Color32::from_rgb(75, 85, 99);
    visuals.widgets.hovered.bg_stroke.color = egui::Color32::from_rgb(107, 114, 128);

    visuals
}

fn light_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();

    visuals.window_fill = egui::Color32::WHITE;
    visuals.panel_fill = egui::Color32::WHITE;
    visuals.faint_bg_color = egui::Color32::from_rgb(243, 244, 246); // gray-100

    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(243, 244, 246);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(229, 231, 235);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(209, 213, 219);

    visuals.selection.bg_fill = egui::Color32::from_rgb(37, 99, 235);
    visuals.selection.stroke.color = egui::Color32::WHITE;

    visuals.widgets.inactive.bg_stroke.color = egui::Color32::from_rgb(209, 213, 219);

    visuals
}

/// Red banner colors for inline error text.
pub fn error_colors(dark: bool) -> (egui::Color32, egui::Color32) {
    if dark {
        (
            egui::Color32::from_rgb(69, 26, 26),
            egui::Color32::from_rgb(254, 202, 202),
        )
    } else {
        (
            egui::Color32::from_rgb(254, 226, 226),
            egui::Color32::from_rgb(153, 27, 27),
        )
    }
}
