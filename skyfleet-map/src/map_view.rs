use macroquad::prelude::{Vec2, vec2};
use skyfleet_core::GeoPoint;
use std::f64::consts::PI;

pub const TILE_SIZE_PX: f64 = 256.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 19.0;
const MAX_LATITUDE: f64 = 85.051_128_78;
const MIN_GRID_SPACING_PX: f64 = 80.0;
const GRID_STEPS_DEG: [f64; 13] = [
    10.0, 5.0, 2.0, 1.0, 0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005, 0.002, 0.001,
];

/// Web-Mercator camera over the map area of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: GeoPoint,
    zoom: f64,
}

impl MapView {
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center: clamp_point(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Recenters without touching the zoom level.
    pub fn center_on(&mut self, point: GeoPoint) {
        self.center = clamp_point(point);
    }

    /// Projects a point into viewport pixels; `viewport` is the size of the
    /// map area and its origin is the area's top-left corner.
    pub fn geo_to_screen(&self, point: GeoPoint, viewport: Vec2) -> Vec2 {
        let (cx, cy) = project(self.center, self.zoom);
        let (px, py) = project(point, self.zoom);
        vec2(
            (px - cx + viewport.x as f64 / 2.0) as f32,
            (py - cy + viewport.y as f64 / 2.0) as f32,
        )
    }

    pub fn screen_to_geo(&self, screen: Vec2, viewport: Vec2) -> GeoPoint {
        let (cx, cy) = project(self.center, self.zoom);
        let wx = cx + screen.x as f64 - viewport.x as f64 / 2.0;
        let wy = cy + screen.y as f64 - viewport.y as f64 / 2.0;
        unproject(wx, wy, self.zoom)
    }

    /// Moves the map so the content follows a drag of `delta` pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        let (cx, cy) = project(self.center, self.zoom);
        self.center = clamp_point(unproject(
            cx - delta.x as f64,
            cy - delta.y as f64,
            self.zoom,
        ));
    }

    /// Changes zoom by `delta` levels, keeping the point under `anchor`
    /// fixed on screen.
    pub fn zoom_at(&mut self, anchor: Vec2, viewport: Vec2, delta: f64) {
        let target = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        if target == self.zoom {
            return;
        }
        let anchored = self.screen_to_geo(anchor, viewport);
        self.zoom = target;
        let drift = self.geo_to_screen(anchored, viewport) - anchor;
        self.pan_by(-drift);
    }

    /// Degree spacing of the background grid for the current zoom.
    pub fn graticule_step(&self) -> f64 {
        let px_per_degree = world_size(self.zoom) / 360.0;
        GRID_STEPS_DEG
            .iter()
            .copied()
            .take_while(|step| step * px_per_degree >= MIN_GRID_SPACING_PX)
            .last()
            .unwrap_or(GRID_STEPS_DEG[0])
    }

    /// Geographic bounds of the viewport as (south-west, north-east).
    pub fn visible_bounds(&self, viewport: Vec2) -> (GeoPoint, GeoPoint) {
        let north_west = self.screen_to_geo(vec2(0.0, 0.0), viewport);
        let south_east = self.screen_to_geo(viewport, viewport);
        (
            GeoPoint::new(south_east.latitude, north_west.longitude),
            GeoPoint::new(north_west.latitude, south_east.longitude),
        )
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE_PX * 2f64.powf(zoom)
}

fn clamp_point(point: GeoPoint) -> GeoPoint {
    GeoPoint::new(
        point.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        point.longitude.clamp(-180.0, 180.0),
    )
}

fn project(point: GeoPoint, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let latitude = point.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.longitude + 180.0) / 360.0 * size;
    let y = (1.0 - (latitude.tan() + 1.0 / latitude.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

fn unproject(x: f64, y: f64, zoom: f64) -> GeoPoint {
    let size = world_size(zoom);
    let longitude = x / size * 360.0 - 180.0;
    let latitude = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    GeoPoint::new(latitude, longitude)
}
