use eframe::egui;
use log::{error, info, warn};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::database::{KeyValueStore, MemoryStore, SqliteStore};
use crate::editor::NoteForm;
use crate::error::ConfigError;
use crate::image_data;
use crate::location::map::TileMapRenderer;
use crate::location::{LocationModule, MapSettings, provider};
use crate::models::Config;
use crate::notes::NoteStore;
use crate::shell::{Shell, SystemThemeWatcher, detect_system_dark};

pub const APP_DIR_NAME: &str = "mapnotes";

pub struct MapNotesApp {
    pub config: Config,
    pub shell: Shell,
    pub notes: NoteStore<Box<dyn KeyValueStore>>,
    pub form: NoteForm,
    pub location: LocationModule<TileMapRenderer>,
    theme_watcher: SystemThemeWatcher,
    textures: HashMap<u64, Option<egui::TextureHandle>>,
}

/// `<platform data dir>/mapnotes`, created on demand.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME);
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

impl MapNotesApp {
    pub fn new(config: Config, data_dir: &Path) -> Self {
        Self::with_system_theme(config, data_dir, detect_system_dark().unwrap_or(false))
    }

    fn with_system_theme(config: Config, data_dir: &Path, system_dark: bool) -> Self {
        let store = Self::open_store(&data_dir.join("mapnotes.db"));
        let shell = Shell::new(system_dark);

        let mut location = LocationModule::new(
            TileMapRenderer::new(),
            provider::from_source(&config.location_source),
            MapSettings::from_config(&config),
        );
        location.mount(shell.is_dark());

        Self {
            theme_watcher: SystemThemeWatcher::new(Duration::from_secs(
                config.theme_poll_seconds.max(1),
            )),
            config,
            shell,
            notes: NoteStore::load(store),
            form: NoteForm::new(),
            location,
            textures: HashMap::new(),
        }
    }

    fn open_store(db_path: &Path) -> Box<dyn KeyValueStore> {
        match SqliteStore::open(db_path) {
            Ok(store) => {
                info!(
                    "event=store_open module=app status=ok path={}",
                    db_path.display()
                );
                Box::new(store)
            }
            Err(e) => {
                error!(
                    "event=store_open module=app status=error error={} fallback=memory",
                    e
                );
                Box::new(MemoryStore::new())
            }
        }
    }

    /// Reads the config, replacing a missing or malformed file with defaults.
    ///
    /// Runs before logging starts, so problems are returned for the caller to log.
    pub fn load_config(config_path: &Path) -> (Config, Vec<ConfigError>) {
        let mut problems = Vec::new();

        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match serde_yaml::from_str(&content) {
                    Ok(config) => return (config, problems),
                    Err(e) => problems.push(ConfigError::Parse(e)),
                },
                Err(e) => problems.push(ConfigError::Read(e)),
            }
        }

        let default_config = Config::default();
        if let Err(e) = Self::save_config(config_path, &default_config) {
            problems.push(e);
        }
        (default_config, problems)
    }

    pub fn save_config(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(config).map_err(ConfigError::Serialize)?;
        fs::write(config_path, yaml).map_err(ConfigError::Write)
    }

    /// Opens the file picker and attaches the chosen image to the open form.
    pub fn pick_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Choose an image")
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file()
        else {
            return;
        };

        let result = image_data::encode_file(&path, self.config.max_image_bytes);
        self.form.attach_image(result);
    }

    /// Texture for a stored data URL; decoding happens once per distinct image.
    pub fn image_texture(&mut self, ctx: &egui::Context, data_url: &str) -> Option<egui::TextureHandle> {
        let key = texture_key(data_url);
        if let Some(cached) = self.textures.get(&key) {
            return cached.clone();
        }

        let texture = match image_data::decode_data_url(data_url).and_then(|img| img.to_rgba()) {
            Ok(rgba) => {
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                Some(ctx.load_texture(format!("note-image-{key}"), color, egui::TextureOptions::LINEAR))
            }
            Err(e) => {
                warn!("event=image_texture module=app status=error error={}", e);
                None
            }
        };
        self.textures.insert(key, texture.clone());
        texture
    }

    /// Drops textures no longer referenced by any note or the open form.
    pub fn prune_textures(&mut self) {
        let mut live: Vec<u64> = self
            .notes
            .notes()
            .iter()
            .filter(|note| note.has_image())
            .map(|note| texture_key(&note.image))
            .collect();
        if let Some(image) = self.form.image() {
            live.push(texture_key(image));
        }
        self.textures.retain(|key, _| live.contains(key));
    }
}

fn texture_key(data_url: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    data_url.hash(&mut hasher);
    hasher.finish()
}

impl eframe::App for MapNotesApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if let Some(dark) = self.theme_watcher.poll(Instant::now()) {
            self.shell.set_system_dark(dark);
        }

        let dark = self.shell.is_dark();
        self.location.set_dark(dark);
        ctx.set_visuals(crate::ui::theme::configure_visuals(dark));

        self.location.poll();
        if self.location.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        self.render_ui(ctx, frame);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.location.unmount();
    }
}

#[cfg(test)]
pub(crate) fn test_app(data_dir: &Path) -> MapNotesApp {
    let config = Config {
        location_source: crate::models::LocationSource::None,
        ..Config::default()
    };
    MapNotesApp::with_system_theme(config, data_dir, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_written_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let (config, problems) = MapNotesApp::load_config(&path);

        assert!(problems.is_empty());
        assert_eq!(config.focus_zoom, Config::default().focus_zoom);
        let written: Config = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.log_level, "info");
    }

    #[test]
    fn malformed_config_is_reported_and_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "focus_zoom: [unclosed").unwrap();

        let (config, problems) = MapNotesApp::load_config(&path);

        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], ConfigError::Parse(_)));
        assert_eq!(config.focus_zoom, Config::default().focus_zoom);
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(serde_yaml::from_str::<Config>(&rewritten).is_ok());
    }

    #[test]
    fn existing_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "focus_zoom: 12\nlog_level: debug\n").unwrap();

        let (config, problems) = MapNotesApp::load_config(&path);

        assert!(problems.is_empty());
        assert_eq!(config.focus_zoom, 12);
        assert_eq!(config.log_level, "debug");
    }
}
