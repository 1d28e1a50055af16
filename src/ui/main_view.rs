use crate::app::MapNotesApp;
use crate::icons;
use crate::models::ActiveTab;

use eframe::egui;

impl MapNotesApp {
    pub fn render_ui(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("MapNotes");
                ui.separator();

                // Tab buttons
                self.render_tab_button(ui, ActiveTab::Map, icons::MAP, "Location Map");
                self.render_tab_button(ui, ActiveTab::Notes, icons::NOTES, "Notes");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if self.shell.is_dark() {
                        icons::SUN
                    } else {
                        icons::MOON
                    };
                    if ui
                        .button(icons::icon_text(icon))
                        .on_hover_text("Toggle theme")
                        .clicked()
                    {
                        self.shell.toggle_theme();
                    }
                });
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.shell.active_tab() {
            ActiveTab::Map => self.render_map_tab(ui),
            ActiveTab::Notes => self.render_notes_tab(ui),
        });

        // The form belongs to the notes tab and is hidden with it.
        if self.shell.active_tab() == ActiveTab::Notes {
            self.render_note_form(ctx);
        }
    }

    fn render_tab_button(&mut self, ui: &mut egui::Ui, tab: ActiveTab, icon: &str, text: &str) {
        let is_selected = self.shell.active_tab() == tab;

        let response = icons::tab_button_with_icon(ui, icon, text, is_selected);

        if response.clicked() {
            self.shell.select_tab(tab);
        }
    }
}
