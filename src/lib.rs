pub mod app;
pub mod database;
pub mod editor;
pub mod error;
pub mod icons;
pub mod image_data;
pub mod location;
pub mod logging;
pub mod models;
pub mod notes;
pub mod shell;
pub mod ui;
