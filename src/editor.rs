//! Create/edit form state for the notes tab.

use log::{info, warn};

use crate::database::KeyValueStore;
use crate::error::{ImageError, ValidationError};
use crate::models::{Note, NoteDraft};
use crate::notes::NoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Creating,
    Editing(i64),
}

#[derive(Debug, Default)]
pub struct NoteForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    image: Option<String>,
    status: Option<String>,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Non-blocking feedback line (image failures, validation).
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn open_create(&mut self) {
        self.reset();
        self.mode = FormMode::Creating;
    }

    pub fn open_edit(&mut self, note: &Note) {
        self.reset();
        self.mode = FormMode::Editing(note.id);
        self.title = note.title.clone();
        self.description = note.description.clone();
        self.image = note.has_image().then(|| note.image.clone());
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Applies the outcome of an image conversion. Failures keep the current image.
    pub fn attach_image(&mut self, result: Result<String, ImageError>) {
        match result {
            Ok(data_url) => {
                self.image = Some(data_url);
                self.status = None;
            }
            Err(e) => {
                warn!("event=image_attach module=editor status=error error={}", e);
                self.status = Some(e.user_message().to_string());
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn validate(&self) -> Result<NoteDraft, ValidationError> {
        if self.mode == FormMode::Closed {
            return Err(ValidationError::FormClosed);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        Ok(NoteDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        })
    }

    /// Applies the form to `notes` and closes it. Returns the affected note id.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        notes: &mut NoteStore<S>,
    ) -> Result<i64, ValidationError> {
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.status = Some(capitalize(&e.to_string()));
                return Err(e);
            }
        };

        let id = match self.mode {
            FormMode::Editing(id) => {
                if !notes.edit(id, draft) {
                    warn!("event=note_submit module=editor status=stale id={}", id);
                    let e = ValidationError::NoteMissing(id);
                    self.status = Some(capitalize(&e.to_string()));
                    return Err(e);
                }
                id
            }
            _ => notes.create(draft),
        };

        info!("event=note_submit module=editor status=ok id={}", id);
        self.reset();
        Ok(id)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    #[test]
    fn closed_form_cannot_validate() {
        let form = NoteForm::new();
        assert_eq!(form.validate(), Err(ValidationError::FormClosed));
    }

    #[test]
    fn whitespace_title_is_missing() {
        let mut form = NoteForm::new();
        form.open_create();
        form.title = "   ".into();
        form.description = "body".into();
        assert_eq!(form.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn failed_attachment_keeps_prior_image() {
        let mut form = NoteForm::new();
        form.open_create();
        form.attach_image(Ok("data:image/png;base64,AAAA".into()));
        form.attach_image(Err(ImageError::UnsupportedFormat));

        assert_eq!(form.image(), Some("data:image/png;base64,AAAA"));
        assert_eq!(form.status(), Some("Error processing image. Please try again."));
    }

    #[test]
    fn successful_attachment_clears_status() {
        let mut form = NoteForm::new();
        form.open_create();
        form.attach_image(Err(ImageError::MalformedDataUrl));
        form.attach_image(Ok("data:image/gif;base64,R0lG".into()));
        assert!(form.status().is_none());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("title is required"), "Title is required");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn editing_a_deleted_note_keeps_the_form_open() {
        let mut notes = NoteStore::load(MemoryStore::new());
        let id = notes.create(NoteDraft {
            title: "gone".into(),
            description: "soon".into(),
            image: None,
        });
        let note = notes.get(id).cloned().unwrap();

        let mut form = NoteForm::new();
        form.open_edit(&note);
        assert!(notes.delete(id));
        form.title = "edited".into();

        assert_eq!(form.submit(&mut notes), Err(ValidationError::NoteMissing(id)));
        assert_eq!(form.mode(), FormMode::Editing(id));
        assert_eq!(form.title, "edited");
        assert_eq!(form.status(), Some("This note no longer exists"));
        assert!(notes.is_empty());
    }
}
