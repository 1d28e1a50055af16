use crate::app::MapNotesApp;
use crate::icons;
use crate::ui::theme;

use eframe::egui;

impl MapNotesApp {
    pub fn render_map_tab(&mut self, ui: &mut egui::Ui) {
        let dark = self.shell.is_dark();

        ui.horizontal(|ui| {
            ui.label(icons::icon_sized(icons::PIN, 20.0));
            ui.heading("Your Location");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = self.location.can_refresh();
                let response = icons::button_with_icon(ui, icons::REFRESH, "Refresh", enabled)
                    .on_hover_text("Update your current location");
                if response.clicked() {
                    self.location.refresh();
                }
                if self.location.is_loading() {
                    ui.spinner();
                }
            });
        });

        ui.separator();

        if let Some(message) = self.location.error_message() {
            let (fill, text) = theme::error_colors(dark);
            egui::Frame::new()
                .fill(fill)
                .corner_radius(6.0)
                .inner_margin(egui::Margin::same(10))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.colored_label(text, icons::INFO);
                        ui.colored_label(text, message);
                    });
                });
            ui.add_space(6.0);
        }

        if let Some(location) = self.location.location() {
            egui::Grid::new("location_readout")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.strong("Latitude:");
                    ui.label(location.latitude_text());
                    ui.end_row();

                    ui.strong("Longitude:");
                    ui.label(location.longitude_text());
                    ui.end_row();

                    if let Some(updated) = self.location.last_updated() {
                        ui.strong("Last Updated:");
                        ui.label(updated.format("%H:%M:%S").to_string());
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
        }

        self.location.renderer_mut().show(ui, dark);
    }
}
