//! Error types shared across the application.

use thiserror::Error;

/// Failures of the persistent key/value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store rejected write for key `{0}`")]
    WriteRejected(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures while turning a picked file into an attachable image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("could not read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is not a supported image")]
    UnsupportedFormat,

    #[error("image data is corrupt: {0}")]
    Decode(String),

    #[error("image is too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("malformed data URL")]
    MalformedDataUrl,
}

impl ImageError {
    /// Short text for the inline status line in the note form.
    pub fn user_message(&self) -> &'static str {
        match self {
            ImageError::TooLarge { .. } => "Image is too large. Please pick a smaller file.",
            _ => "Error processing image. Please try again.",
        }
    }
}

/// Failures of a one-shot position request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("no position source is available")]
    Unsupported,

    #[error("position request failed: {0}")]
    Unavailable(String),
}

impl PositionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PositionError::Unsupported => "Geolocation is not supported on this system",
            PositionError::Unavailable(_) => "Unable to retrieve your location",
        }
    }
}

/// Required-field checks on the note form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("description is required")]
    MissingDescription,

    #[error("no note form is open")]
    FormClosed,

    #[error("this note no longer exists")]
    NoteMissing(i64),
}

/// Problems reading or writing `config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("error parsing config file: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("error serializing config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("error writing config file: {0}")]
    Write(#[source] std::io::Error),
}

/// Top-level startup failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("gui: {0}")]
    Gui(#[from] eframe::Error),
}
