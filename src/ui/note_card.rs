use crate::app::MapNotesApp;
use crate::icons;
use crate::models::Note;

use chrono::Local;
use eframe::egui;

const IMAGE_HEIGHT: f32 = 192.0;

pub enum CardAction {
    Edit(i64),
    Delete(i64),
}

impl MapNotesApp {
    pub fn render_note_card(&mut self, ui: &mut egui::Ui, note: &Note) -> Option<CardAction> {
        let mut action = None;

        ui.group(|ui| {
            ui.set_width(ui.available_width());

            // Image, or a placeholder of the same height
            let texture = note
                .has_image()
                .then(|| self.image_texture(ui.ctx(), &note.image))
                .flatten();
            match texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::from_texture(egui::load::SizedTexture::from_handle(&texture))
                            .max_height(IMAGE_HEIGHT)
                            .max_width(ui.available_width()),
                    );
                }
                None => {
                    ui.allocate_ui(egui::vec2(ui.available_width(), IMAGE_HEIGHT / 2.0), |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.label(icons::icon_sized(icons::IMAGE, 48.0).weak());
                        });
                    });
                }
            }

            ui.add(egui::Label::new(egui::RichText::new(&note.title).size(18.0).strong()).wrap());
            ui.add(egui::Label::new(&note.description).wrap());

            ui.separator();

            // Dates and buttons
            ui.horizontal(|ui| {
                ui.small(format!(
                    "Created: {}",
                    note.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ));
                if note.updated_at != note.created_at {
                    ui.small(format!(
                        "Edited: {}",
                        note.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(icons::icon_text(icons::DELETE))
                        .on_hover_text("Delete")
                        .clicked()
                    {
                        action = Some(CardAction::Delete(note.id));
                    }
                    if ui
                        .button(icons::icon_text(icons::EDIT))
                        .on_hover_text("Edit")
                        .clicked()
                    {
                        action = Some(CardAction::Edit(note.id));
                    }
                });
            });
        });

        action
    }
}
