use crate::app::MapNotesApp;
use crate::editor::FormMode;
use crate::icons;
use crate::models::Note;
use crate::ui::note_card::CardAction;
use crate::ui::theme;

use eframe::egui;
use log::info;

#[derive(Default)]
struct FormActions {
    pick_image: bool,
    clear_image: bool,
    cancel: bool,
    submit: bool,
}

impl MapNotesApp {
    pub fn render_notes_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("My Notes");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if icons::button_with_icon(ui, icons::ADD, "Add Note", !self.form.is_open())
                    .clicked()
                {
                    self.form.open_create();
                }
            });
        });

        ui.separator();

        if let Some(error) = self.notes.last_save_error() {
            let (_, text) = theme::error_colors(self.shell.is_dark());
            ui.colored_label(text, format!("Notes could not be saved: {}", error));
        }

        if self.notes.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(icons::icon_sized(icons::IMAGE, 64.0).weak());
                ui.label("No notes available. Click \"Add Note\" to get started!");
            });
            return;
        }

        let mut action = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            let notes: Vec<Note> = self.notes.notes().to_vec();
            for note in &notes {
                if let Some(clicked) = self.render_note_card(ui, note) {
                    action = Some(clicked);
                }
                ui.add_space(8.0);
            }
        });

        match action {
            Some(CardAction::Edit(id)) => {
                if let Some(note) = self.notes.get(id).cloned() {
                    self.form.open_edit(&note);
                }
            }
            Some(CardAction::Delete(id)) => {
                if self.notes.delete(id) {
                    info!("event=note_delete module=ui status=ok id={}", id);
                }
                self.prune_textures();
            }
            None => {}
        }
    }

    pub fn render_note_form(&mut self, ctx: &egui::Context) {
        if !self.form.is_open() {
            return;
        }

        let heading = match self.form.mode() {
            FormMode::Editing(_) => "Edit Note",
            _ => "Create New Note",
        };
        let submit_label = match self.form.mode() {
            FormMode::Editing(_) => "Save Changes",
            _ => "Create Note",
        };
        let dark = self.shell.is_dark();
        let preview = self
            .form
            .image()
            .map(str::to_owned)
            .and_then(|url| self.image_texture(ctx, &url));

        let mut actions = FormActions::default();
        egui::Modal::new(egui::Id::new("note_form")).show(ctx, |ui| {
            ui.set_width(460.0);

            ui.horizontal(|ui| {
                ui.heading(heading);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(icons::icon_text(icons::CLOSE)).clicked() {
                        actions.cancel = true;
                    }
                });
            });
            ui.add_space(8.0);

            ui.add(
                egui::TextEdit::singleline(&mut self.form.title)
                    .hint_text("Note Title")
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::multiline(&mut self.form.description)
                    .hint_text("Note Description")
                    .desired_rows(6)
                    .desired_width(f32::INFINITY),
            );

            let image_label = if self.form.image().is_some() {
                "Change Image"
            } else {
                "Upload Image"
            };
            if ui
                .add_sized(
                    [ui.available_width(), 28.0],
                    egui::Button::new(icons::icon_with_text(icons::IMAGE, image_label)),
                )
                .clicked()
            {
                actions.pick_image = true;
            }

            if let Some(texture) = &preview {
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                        .max_height(192.0)
                        .max_width(ui.available_width()),
                );
                if ui.small_button("Remove image").clicked() {
                    actions.clear_image = true;
                }
            }

            if let Some(status) = self.form.status() {
                let (_, text) = theme::error_colors(dark);
                ui.colored_label(text, status);
            }

            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(submit_label).clicked() {
                    actions.submit = true;
                }
                if ui.button("Cancel").clicked() {
                    actions.cancel = true;
                }
            });
        });

        // Only Escape dismisses; backdrop clicks leave the form open.
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            actions.cancel = true;
        }

        if actions.clear_image {
            self.form.clear_image();
        }
        if actions.pick_image {
            self.pick_image();
        }
        if actions.submit {
            // Validation failures stay in the form as a status line.
            let _ = self.form.submit(&mut self.notes);
        } else if actions.cancel {
            self.form.cancel();
        }

        if !self.form.is_open() {
            self.prune_textures();
        }
    }
}
