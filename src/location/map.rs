//! Map rendering seam and the walkers-backed slippy map.

use eframe::egui;
use egui::emath::easing;
use log::warn;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use walkers::sources::Attribution;
use walkers::{HttpTiles, Map, MapMemory, Plugin, Position, Projector, TileId, Tiles};

use crate::models::Location;

const SUBDOMAINS: [char; 3] = ['a', 'b', 'c'];

/// URL template and attribution of one tile set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub attribution_url: &'static str,
    pub max_zoom: u8,
}

impl TileSource {
    pub const LIGHT: TileSource = TileSource {
        url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: "© OpenStreetMap contributors",
        attribution_url: "https://www.openstreetmap.org/copyright",
        max_zoom: 19,
    };

    pub const DARK: TileSource = TileSource {
        url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
        attribution: "© OpenStreetMap contributors © CARTO",
        attribution_url: "https://carto.com/attributions",
        max_zoom: 19,
    };

    pub fn for_theme(dark: bool) -> Self {
        if dark { Self::DARK } else { Self::LIGHT }
    }

    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        let subdomain = SUBDOMAINS[((x + y) % SUBDOMAINS.len() as u32) as usize];
        self.url_template
            .replace("{s}", &subdomain.to_string())
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl walkers::sources::TileSource for TileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.tile_url(tile_id.zoom, tile_id.x, tile_id.y)
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: self.attribution,
            url: self.attribution_url,
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Location,
    pub zoom: u8,
}

/// Operations the location module performs on its map.
pub trait MapRenderer {
    fn create(&mut self, view: MapView, tiles: TileSource);
    fn set_tile_layer(&mut self, tiles: TileSource);
    fn remove_tile_layer(&mut self);
    fn set_view(&mut self, view: MapView, transition: Option<Duration>);
    fn add_marker(&mut self, at: Location);
    fn move_marker(&mut self, at: Location);
    fn remove_marker(&mut self);
    fn destroy(&mut self);
}

fn to_position(location: Location) -> Position {
    walkers::lat_lon(location.latitude, location.longitude)
}

fn to_location(position: Position) -> Location {
    Location::new(position.y(), position.x())
}

#[derive(Debug, Clone, Copy)]
struct Pan {
    from: MapView,
    to: MapView,
    started: Instant,
    duration: Duration,
}

impl Pan {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    // Center and fractional zoom at `now`.
    fn at(&self, now: Instant) -> (Location, f64) {
        let t = f64::from(easing::cubic_out(self.progress(now)));
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        let center = Location::new(
            lerp(self.from.center.latitude, self.to.center.latitude),
            lerp(self.from.center.longitude, self.to.center.longitude),
        );
        (center, lerp(f64::from(self.from.zoom), f64::from(self.to.zoom)))
    }
}

/// Pulsing dot drawn over the tiles at the user's position.
struct PositionMarker {
    position: Position,
}

impl Plugin for PositionMarker {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let screen = projector.project(self.position);
        let pos = egui::pos2(screen.x, screen.y);
        let pulse = (ui.input(|i| i.time) % 1.5 / 1.5) as f32;

        let painter = ui.painter();
        painter.circle_filled(
            pos,
            8.0 + 10.0 * pulse,
            egui::Color32::from_rgba_unmultiplied(59, 130, 246, ((1.0 - pulse) * 120.0) as u8),
        );
        painter.circle(
            pos,
            8.0,
            egui::Color32::from_rgb(37, 99, 235),
            egui::Stroke::new(2.0, egui::Color32::WHITE),
        );
    }
}

/// Interactive tile map backed by `walkers`.
///
/// One `HttpTiles` is kept per tile source and built lazily on first draw, so
/// switching themes back and forth reuses downloaded tiles. The shared
/// [`MapMemory`] holds center and zoom across layer swaps.
#[derive(Default)]
pub struct TileMapRenderer {
    memory: Option<MapMemory>,
    layer: Option<TileSource>,
    tiles: HashMap<&'static str, HttpTiles>,
    marker: Option<Location>,
    pan: Option<Pan>,
}

impl TileMapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_created(&self) -> bool {
        self.memory.is_some()
    }

    pub fn tile_source(&self) -> Option<TileSource> {
        self.layer
    }

    pub fn marker(&self) -> Option<Location> {
        self.marker
    }

    /// Current center and rounded zoom, including user drags and pans in progress.
    pub fn view(&self) -> Option<MapView> {
        let memory = self.memory.as_ref()?;
        Some(MapView {
            center: memory.detached().map(to_location)?,
            zoom: memory.zoom().round() as u8,
        })
    }

    pub fn is_animating(&self) -> bool {
        self.pan.is_some()
    }

    /// Steps a pending pan to `now`.
    pub fn advance(&mut self, now: Instant) {
        let Some(pan) = self.pan else {
            return;
        };
        let (center, zoom) = pan.at(now);
        self.apply(center, zoom);
        if pan.progress(now) >= 1.0 {
            self.pan = None;
        }
    }

    fn apply(&mut self, center: Location, zoom: f64) {
        let max_zoom = self.layer.map_or(TileSource::LIGHT.max_zoom, |layer| layer.max_zoom);
        let Some(memory) = self.memory.as_mut() else {
            return;
        };
        memory.center_at(to_position(center));
        if let Err(e) = memory.set_zoom(zoom.clamp(0.0, f64::from(max_zoom))) {
            warn!("event=map_zoom module=map status=error error={} zoom={}", e, zoom);
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, dark: bool) -> egui::Response {
        self.advance(Instant::now());

        let Self {
            memory,
            layer,
            tiles,
            marker,
            pan,
        } = self;
        let Some(memory) = memory.as_mut() else {
            let (_, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
            return response;
        };

        let marker = *marker;
        let my_position = marker
            .map(to_position)
            .or_else(|| memory.detached())
            .unwrap_or_else(|| to_position(Location::ORIGIN));

        let ctx = ui.ctx().clone();
        let tiles: Option<&mut dyn Tiles> = match *layer {
            Some(source) => Some(
                tiles
                    .entry(source.url_template)
                    .or_insert_with(|| HttpTiles::new(source, ctx.clone()))
                    as &mut dyn Tiles,
            ),
            None => None,
        };

        let mut map = Map::new(tiles, memory, my_position)
            .zoom_with_ctrl(false)
            .double_click_to_zoom(true);
        if let Some(at) = marker {
            map = map.with_plugin(PositionMarker {
                position: to_position(at),
            });
        }
        let response = ui.add(map);

        // Manual navigation wins over a programmatic pan.
        let scrolled = ui.input(|i| i.zoom_delta() != 1.0 || i.smooth_scroll_delta != egui::Vec2::ZERO);
        if response.dragged() || (response.hovered() && scrolled) {
            *pan = None;
        }

        if let Some(source) = layer {
            let color = if dark {
                egui::Color32::from_white_alpha(180)
            } else {
                egui::Color32::from_black_alpha(170)
            };
            ui.painter().text(
                response.rect.right_bottom() - egui::vec2(6.0, 4.0),
                egui::Align2::RIGHT_BOTTOM,
                source.attribution,
                egui::FontId::proportional(11.0),
                color,
            );
        }

        if pan.is_some() || marker.is_some() {
            ctx.request_repaint();
        }
        response
    }
}

impl MapRenderer for TileMapRenderer {
    fn create(&mut self, view: MapView, tiles: TileSource) {
        *self = Self {
            memory: Some(MapMemory::default()),
            layer: Some(tiles),
            ..Self::default()
        };
        self.apply(view.center, f64::from(view.zoom));
    }

    fn set_tile_layer(&mut self, tiles: TileSource) {
        if self.is_created() {
            self.layer = Some(tiles);
        }
    }

    fn remove_tile_layer(&mut self) {
        self.layer = None;
    }

    fn set_view(&mut self, view: MapView, transition: Option<Duration>) {
        let Some(from) = self.view() else {
            return;
        };
        match transition {
            Some(duration) if !duration.is_zero() => {
                self.pan = Some(Pan {
                    from,
                    to: view,
                    started: Instant::now(),
                    duration,
                });
            }
            _ => {
                self.pan = None;
                self.apply(view.center, f64::from(view.zoom));
            }
        }
    }

    fn add_marker(&mut self, at: Location) {
        if self.is_created() {
            self.marker = Some(at);
        }
    }

    fn move_marker(&mut self, at: Location) {
        self.add_marker(at);
    }

    fn remove_marker(&mut self) {
        self.marker = None;
    }

    fn destroy(&mut self) {
        *self = Self::default();
    }
}
