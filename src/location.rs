//! Location acquisition and map marker sync.
//!
//! One position request may be in flight at a time; it runs on a worker
//! thread and its result is picked up by [`LocationModule::poll`] on the UI
//! thread. Failures never clear the last known reading or the marker.

pub mod map;
pub mod provider;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::error::PositionError;
use crate::models::{Config, Location};
use map::{MapRenderer, MapView, TileSource};
use provider::{PositionOptions, PositionProvider};

pub type Reading = Result<Location, PositionError>;

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub initial_zoom: u8,
    pub focus_zoom: u8,
    pub pan_duration: Duration,
    pub request: PositionOptions,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MapSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_zoom: config.initial_zoom,
            focus_zoom: config.focus_zoom,
            pan_duration: Duration::from_millis(config.pan_duration_ms),
            request: PositionOptions {
                timeout: Duration::from_millis(config.location_timeout_ms),
                ..PositionOptions::default()
            },
        }
    }
}

pub struct LocationModule<R: MapRenderer> {
    renderer: R,
    provider: Option<Arc<dyn PositionProvider>>,
    settings: MapSettings,

    location: Option<Location>,
    last_updated: Option<DateTime<Local>>,
    error: Option<PositionError>,
    loading: bool,
    pending: Option<Receiver<Reading>>,

    mounted: bool,
    marker_placed: bool,
    dark: bool,
}

impl<R: MapRenderer> LocationModule<R> {
    pub fn new(
        renderer: R,
        provider: Option<Arc<dyn PositionProvider>>,
        settings: MapSettings,
    ) -> Self {
        Self {
            renderer,
            provider,
            settings,
            location: None,
            last_updated: None,
            error: None,
            loading: false,
            pending: None,
            mounted: false,
            marker_placed: false,
            dark: false,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn error(&self) -> Option<&PositionError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(PositionError::user_message)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The refresh control is disabled while a request is outstanding.
    pub fn can_refresh(&self) -> bool {
        self.mounted && self.pending.is_none()
    }

    /// Creates the map and issues the first position request.
    pub fn mount(&mut self, dark: bool) {
        if self.mounted {
            return;
        }
        self.dark = dark;
        self.renderer.create(
            MapView {
                center: Location::ORIGIN,
                zoom: self.settings.initial_zoom,
            },
            TileSource::for_theme(dark),
        );
        self.mounted = true;
        self.marker_placed = false;
        info!("event=map_mount module=location status=ok dark={}", dark);

        self.refresh();
    }

    /// Tears the map down; the reading is discarded with it.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if self.marker_placed {
            self.renderer.remove_marker();
        }
        self.renderer.remove_tile_layer();
        self.renderer.destroy();

        self.mounted = false;
        self.marker_placed = false;
        self.pending = None;
        self.loading = false;
        self.location = None;
        self.last_updated = None;
        self.error = None;
        info!("event=map_unmount module=location status=ok");
    }

    /// Starts a one-shot request. Returns `false` when one is already pending.
    pub fn refresh(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        if self.pending.is_some() {
            debug!("event=location_refresh module=location status=ignored reason=pending");
            return false;
        }

        self.loading = true;
        self.error = None;

        let Some(provider) = self.provider.clone() else {
            self.apply_reading(Err(PositionError::Unsupported));
            return true;
        };

        let (tx, rx) = mpsc::channel();
        let options = self.settings.request.clone();
        let spawned = thread::Builder::new()
            .name("position-request".to_string())
            .spawn(move || {
                let _ = tx.send(provider.current_position(&options));
            });

        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => self.apply_reading(Err(PositionError::Unavailable(e.to_string()))),
        }
        true
    }

    /// Picks up a finished request without blocking. Returns `true` if one was applied.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_ref() else {
            return false;
        };

        let reading = match rx.try_recv() {
            Ok(reading) => reading,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(PositionError::Unavailable(
                "position worker exited without an answer".to_string(),
            )),
        };
        self.pending = None;
        self.apply_reading(reading);
        true
    }

    pub fn apply_reading(&mut self, reading: Reading) {
        self.loading = false;

        match reading {
            Ok(location) => {
                self.location = Some(location);
                self.last_updated = Some(Local::now());
                self.error = None;
                info!(
                    "event=location_update module=location status=ok lat={:.6} lon={:.6}",
                    location.latitude, location.longitude
                );

                if self.mounted {
                    self.renderer.set_view(
                        MapView {
                            center: location,
                            zoom: self.settings.focus_zoom,
                        },
                        Some(self.settings.pan_duration),
                    );
                    if self.marker_placed {
                        self.renderer.move_marker(location);
                    } else {
                        self.renderer.add_marker(location);
                        self.marker_placed = true;
                    }
                }
            }
            Err(e) => {
                warn!("event=location_update module=location status=error error={}", e);
                self.error = Some(e);
            }
        }
    }

    /// Swaps the tile layer when the effective theme changes.
    pub fn set_dark(&mut self, dark: bool) {
        if self.dark == dark {
            return;
        }
        self.dark = dark;
        if self.mounted {
            self.renderer.remove_tile_layer();
            self.renderer.set_tile_layer(TileSource::for_theme(dark));
            debug!("event=tile_swap module=location status=ok dark={}", dark);
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    #[cfg(test)]
    fn wait_for_reading(&mut self, timeout: Duration) -> bool {
        let Some(rx) = self.pending.take() else {
            return false;
        };
        match rx.recv_timeout(timeout) {
            Ok(reading) => {
                self.apply_reading(reading);
                true
            }
            Err(_) => {
                self.pending = Some(rx);
                false
            }
        }
    }
}
