use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub location_source: LocationSource,
    pub location_timeout_ms: u64,
    pub initial_zoom: u8,
    pub focus_zoom: u8,
    pub pan_duration_ms: u64,
    pub max_image_bytes: usize,
    pub theme_poll_seconds: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location_source: LocationSource::default(),
            location_timeout_ms: 5000,
            initial_zoom: 2,
            focus_zoom: 15,
            pan_duration_ms: 1000,
            max_image_bytes: 10 * 1024 * 1024,
            theme_poll_seconds: 2,
            log_level: String::from("info"),
        }
    }
}

/// Where position readings come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LocationSource {
    Gpsd { host: String, port: u16 },
    Fixed { latitude: f64, longitude: f64 },
    None,
}

impl Default for LocationSource {
    fn default() -> Self {
        LocationSource::Gpsd {
            host: String::from("127.0.0.1"),
            port: 2947,
        }
    }
}

/// A user-authored note as persisted in the key/value store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "image_or_empty")]
    pub image: String, // data URL, empty when the note has no image
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

// Older records may carry `null` for the image.
fn image_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields collected by the editing form, validated before they reach the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteDraft {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const ORIGIN: Location = Location {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude_text(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    pub fn longitude_text(&self) -> String {
        format!("{:.6}", self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Map,
    Notes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_uses_camel_case_keys() {
        let now = Utc::now();
        let note = Note {
            id: 7,
            title: "A".into(),
            description: "line one\nline two".into(),
            image: String::new(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["description"], "line one\nline two");
    }

    #[test]
    fn null_or_missing_image_reads_as_empty() {
        let with_null = r#"{"id":1,"title":"t","description":"d","image":null,
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#;
        let missing = r#"{"id":2,"title":"t","description":"d",
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#;

        let a: Note = serde_json::from_str(with_null).unwrap();
        let b: Note = serde_json::from_str(missing).unwrap();
        assert!(!a.has_image());
        assert!(!b.has_image());
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: Config = serde_yaml::from_str("focus_zoom: 12\n").unwrap();
        assert_eq!(config.focus_zoom, 12);
        assert_eq!(config.location_timeout_ms, 5000);
        assert_eq!(config.location_source, LocationSource::default());
    }

    #[test]
    fn location_source_is_tagged_by_kind() {
        let config: Config =
            serde_yaml::from_str("location_source:\n  kind: fixed\n  latitude: 1.5\n  longitude: -2.0\n")
                .unwrap();
        assert_eq!(
            config.location_source,
            LocationSource::Fixed {
                latitude: 1.5,
                longitude: -2.0
            }
        );
    }

    #[test]
    fn coordinates_format_to_six_places() {
        let loc = Location::new(51.5, -0.1275);
        assert_eq!(loc.latitude_text(), "51.500000");
        assert_eq!(loc.longitude_text(), "-0.127500");
    }
}
