mod main_view;
mod map_view;
mod note_card;
mod notes_view;
pub mod theme;
