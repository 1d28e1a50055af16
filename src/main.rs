use eframe::egui;
use log::warn;
use std::path::PathBuf;

use mapnotes::app::{self, MapNotesApp};
use mapnotes::error::AppError;
use mapnotes::logging::init_logging;

fn main() -> Result<(), AppError> {
    let (data_dir, data_dir_error) = match app::data_dir() {
        Ok(dir) => (dir, None),
        Err(e) => (PathBuf::from("."), Some(e)),
    };
    let (config, config_problems) = MapNotesApp::load_config(&data_dir.join("config.yaml"));

    if let Err(e) = init_logging(&config.log_level, &data_dir.join("logs")) {
        eprintln!("Logging disabled: {}", e);
    }
    if let Some(e) = data_dir_error {
        warn!("event=data_dir module=app status=error error={} fallback=cwd", e);
    }
    for problem in &config_problems {
        warn!("event=config_load module=app status=error error={} fallback=defaults", problem);
    }

    let app = MapNotesApp::new(config, &data_dir);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 480.0])
            .with_title("MapNotes"),
        ..Default::default()
    };

    eframe::run_native("MapNotes", options, Box::new(|_cc| Ok(Box::new(app))))?;
    Ok(())
}
