use macroquad::prelude::*;
use skyfleet_core::{FleetRegistry, GeoPoint};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::drone::{DroneDrawConfig, draw_label, draw_marker, draw_trail, popup_text, thin_polyline};
use crate::map_view::MapView;
use crate::palette::{DroneColors, hex_name};
use crate::settings::TrackerSettings;
use crate::sidebar::{ROW_HEIGHT, SidebarHit, SidebarLayout};
use crate::toast::{ToastLevel, Toasts};

pub mod drone;
pub mod map_view;
pub mod palette;
pub mod settings;
pub mod sidebar;
pub mod toast;

pub const WINDOW_TITLE: &str = "Drone Package Tracker";
pub const WINDOW_WIDTH: i32 = 1000;
pub const WINDOW_HEIGHT: i32 = 600;

const MAP_BACKGROUND: Color = Color::from_rgba(236, 239, 241, 255);
const GRID_COLOR: Color = Color::from_rgba(200, 206, 212, 255);
const GRID_LABEL_COLOR: Color = Color::from_rgba(120, 130, 140, 255);
const PANEL_COLOR: Color = Color::from_rgba(38, 50, 56, 255);
const ROW_SELECTED_COLOR: Color = Color::from_rgba(69, 90, 100, 255);
const BUTTON_COLOR: Color = Color::from_rgba(84, 110, 122, 255);
const BUTTON_DISABLED_COLOR: Color = Color::from_rgba(60, 72, 78, 255);
const WARNING_COLOR: Color = Color::from_rgba(198, 40, 40, 255);
const MARKER_HIT_RADIUS_PX: f32 = 10.0;
const TRAIL_MIN_SPACING_PX: f32 = 1.5;
const WHEEL_ZOOM_STEP: f64 = 0.25;
const KEY_ZOOM_STEP: f64 = 1.0;
const CONFIRM_WIDTH: f32 = 320.0;
const CONFIRM_HEIGHT: f32 = 110.0;

/// Where an interaction should be routed after hit testing.
#[derive(Debug, Clone, PartialEq)]
enum MapClick {
    Marker(String),
    Empty(GeoPoint),
}

/// The tracker window: owns the fleet and every piece of display-only state
/// keyed by drone id.
pub struct TrackerApp {
    fleet: FleetRegistry,
    map: MapView,
    colors: DroneColors,
    labels: HashMap<String, String>,
    depleted: HashSet<String>,
    selected: Option<String>,
    pending_removal: Option<String>,
    toasts: Toasts,
    drone_draw: DroneDrawConfig,
    poll_interval: f64,
    poll_accumulator: f64,
    polls: u64,
    last_right_drag_pos: Option<Vec2>,
}

impl TrackerApp {
    pub fn new(settings: &TrackerSettings) -> Self {
        let config = settings.simulation.clone();
        let fleet = match settings.seed {
            Some(seed) => FleetRegistry::with_seed_and_config(seed, config),
            None => FleetRegistry::with_config(config),
        };

        Self {
            fleet,
            map: MapView::new(settings.map_center, settings.map_zoom),
            colors: DroneColors::new(),
            labels: HashMap::new(),
            depleted: HashSet::new(),
            selected: None,
            pending_removal: None,
            toasts: Toasts::new(),
            drone_draw: DroneDrawConfig::default(),
            poll_interval: settings.poll_interval_secs,
            poll_accumulator: 0.0,
            polls: 0,
            last_right_drag_pos: None,
        }
    }

    pub fn fleet(&self) -> &FleetRegistry {
        &self.fleet
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn pending_removal(&self) -> Option<&str> {
        self.pending_removal.as_deref()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Adds a drone under a fresh id, at `initial` or at a random spawn.
    pub fn add_drone(&mut self, initial: Option<GeoPoint>, now: f64) -> String {
        let id = self.fleet.next_id();
        self.fleet.add(id.clone(), initial);
        let color = self.colors.assign(&id);

        if let Some(drone) = self.fleet.get(&id) {
            self.labels.insert(id.clone(), popup_text(&id, drone.battery()));
            info!(
                drone = %id,
                color = %hex_name(color),
                latitude = drone.position().latitude,
                longitude = drone.position().longitude,
                "drone added"
            );
        }
        self.toasts.push(format!("{id} added"), ToastLevel::Info, now);
        id
    }

    /// Asks for confirmation before removing the selected drone.
    pub fn request_removal(&mut self, now: f64) {
        match &self.selected {
            Some(id) => {
                debug!(drone = %id, "removal requested");
                self.pending_removal = Some(id.clone());
            }
            None => self
                .toasts
                .push("Select a drone to remove", ToastLevel::Warning, now),
        }
    }

    pub fn confirm_removal(&mut self, now: f64) {
        if let Some(id) = self.pending_removal.take() {
            self.remove_drone(&id, now);
        }
    }

    pub fn cancel_removal(&mut self) {
        if let Some(id) = self.pending_removal.take() {
            debug!(drone = %id, "removal cancelled");
        }
    }

    fn remove_drone(&mut self, id: &str, now: f64) {
        if !self.fleet.remove(id) {
            return;
        }
        self.colors.release(id);
        self.labels.remove(id);
        self.depleted.remove(id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        info!(drone = id, "drone removed");
        self.toasts.push(format!("{id} removed"), ToastLevel::Info, now);
    }

    /// Selects a drone and centres the map on it, keeping the zoom.
    pub fn select(&mut self, id: &str) {
        let Some(drone) = self.fleet.get(id) else {
            return;
        };
        self.map.center_on(drone.position());
        self.selected = Some(id.to_owned());
        info!(drone = id, "centred on drone");
    }

    pub fn select_index(&mut self, index: usize) {
        let id = self.fleet.ids().nth(index).map(str::to_owned);
        if let Some(id) = id {
            self.select(&id);
        }
    }

    /// Pulls one telemetry sample per drone and refreshes popups.
    pub fn poll(&mut self, now: f64) {
        let snapshot = self.fleet.snapshot_all();
        self.polls += 1;

        for (id, telemetry) in snapshot.iter() {
            self.labels.insert(id.to_owned(), popup_text(id, telemetry.battery));
            if telemetry.battery <= 0.0 && self.depleted.insert(id.to_owned()) {
                warn!(drone = id, "battery empty, drone keeps reporting");
                self.toasts
                    .push(format!("{id} battery depleted"), ToastLevel::Warning, now);
            }
        }
        debug!(poll = self.polls, drones = snapshot.len(), "telemetry polled");
    }

    /// Consumes elapsed time in whole poll intervals.
    pub fn advance_clock(&mut self, elapsed: f64, now: f64) {
        self.poll_accumulator += elapsed;
        while self.poll_accumulator >= self.poll_interval {
            self.poll(now);
            self.poll_accumulator -= self.poll_interval;
        }
        self.toasts.expire(now);
    }

    fn classify_map_click(&self, local: Vec2, viewport: Vec2) -> MapClick {
        let hit = self
            .fleet
            .iter()
            .map(|(id, drone)| {
                let screen = self.map.geo_to_screen(drone.position(), viewport);
                (id, screen.distance(local))
            })
            .filter(|(_, distance)| *distance <= MARKER_HIT_RADIUS_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match hit {
            Some((id, _)) => MapClick::Marker(id.to_owned()),
            None => MapClick::Empty(self.map.screen_to_geo(local, viewport)),
        }
    }

    /// Left click on the map selects a marker, or drops a new drone there.
    fn click_map(&mut self, local: Vec2, viewport: Vec2, now: f64) {
        match self.classify_map_click(local, viewport) {
            MapClick::Marker(id) => self.select(&id),
            MapClick::Empty(point) => {
                let id = self.add_drone(Some(point), now);
                self.selected = Some(id);
            }
        }
    }

    fn click_sidebar(&mut self, hit: SidebarHit, now: f64) {
        match hit {
            SidebarHit::Drone(index) => self.select_index(index),
            SidebarHit::AddButton => {
                info!("ui action: add drone");
                self.add_drone(None, now);
            }
            SidebarHit::RemoveButton => {
                info!("ui action: remove drone");
                self.request_removal(now);
            }
            SidebarHit::Panel => {}
        }
    }

    fn handle_input(&mut self, now: f64) {
        let layout = SidebarLayout::new(screen_height());
        let (origin, viewport) = map_area();
        let mouse = Vec2::from(mouse_position());

        if let Some(id) = self.pending_removal.clone() {
            let (_, yes, no) = confirm_rects(origin, viewport);
            let clicked = is_mouse_button_pressed(MouseButton::Left);
            if is_key_pressed(KeyCode::Y)
                || is_key_pressed(KeyCode::Enter)
                || (clicked && yes.contains(mouse))
            {
                info!(drone = %id, "removal confirmed");
                self.confirm_removal(now);
            } else if is_key_pressed(KeyCode::N)
                || is_key_pressed(KeyCode::Escape)
                || (clicked && no.contains(mouse))
            {
                self.cancel_removal();
            }
            return;
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            match layout.hit_test(mouse, self.fleet.len()) {
                Some(hit) => self.click_sidebar(hit, now),
                None => self.click_map(mouse - origin, viewport, now),
            }
        }

        if is_key_pressed(KeyCode::A) {
            self.add_drone(None, now);
        }
        if is_key_pressed(KeyCode::Delete) || is_key_pressed(KeyCode::Backspace) {
            self.request_removal(now);
        }
        if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
            self.map.zoom_at(viewport / 2.0, viewport, KEY_ZOOM_STEP);
        }
        if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
            self.map.zoom_at(viewport / 2.0, viewport, -KEY_ZOOM_STEP);
        }

        let (_, wheel_y) = mouse_wheel();
        if wheel_y != 0.0 && mouse.x >= origin.x {
            self.map
                .zoom_at(mouse - origin, viewport, wheel_y.signum() as f64 * WHEEL_ZOOM_STEP);
        }

        if is_mouse_button_down(MouseButton::Right) {
            if let Some(last) = self.last_right_drag_pos {
                self.map.pan_by(mouse - last);
            }
            self.last_right_drag_pos = Some(mouse);
        } else {
            self.last_right_drag_pos = None;
        }
    }

    fn render(&self, now: f64) {
        clear_background(MAP_BACKGROUND);
        let (origin, viewport) = map_area();

        self.draw_graticule(origin, viewport);
        self.draw_drones(origin, viewport);
        self.draw_sidebar();
        self.draw_status(origin, viewport);
        self.draw_toasts(origin, viewport, now);
        if let Some(id) = &self.pending_removal {
            draw_confirm(origin, viewport, id);
        }
    }

    fn draw_graticule(&self, origin: Vec2, viewport: Vec2) {
        let step = self.map.graticule_step();
        let (south_west, north_east) = self.map.visible_bounds(viewport);

        let first_lat = (south_west.latitude / step).floor() as i64;
        let last_lat = (north_east.latitude / step).ceil() as i64;
        for n in first_lat..=last_lat {
            let latitude = n as f64 * step;
            let y = origin.y
                + self
                    .map
                    .geo_to_screen(GeoPoint::new(latitude, north_east.longitude), viewport)
                    .y;
            draw_line(origin.x, y, origin.x + viewport.x, y, 1.0, GRID_COLOR);
            draw_text(
                &format_degrees(latitude, step),
                origin.x + 4.0,
                y - 3.0,
                14.0,
                GRID_LABEL_COLOR,
            );
        }

        let first_lon = (south_west.longitude / step).floor() as i64;
        let last_lon = (north_east.longitude / step).ceil() as i64;
        for n in first_lon..=last_lon {
            let longitude = n as f64 * step;
            let x = origin.x
                + self
                    .map
                    .geo_to_screen(GeoPoint::new(south_west.latitude, longitude), viewport)
                    .x;
            draw_line(x, origin.y, x, origin.y + viewport.y, 1.0, GRID_COLOR);
            draw_text(
                &format_degrees(longitude, step),
                x + 3.0,
                origin.y + viewport.y - 4.0,
                14.0,
                GRID_LABEL_COLOR,
            );
        }
    }

    fn draw_drones(&self, origin: Vec2, viewport: Vec2) {
        for (id, drone) in self.fleet.iter() {
            let color = self.colors.color_of(id);
            let trail: Vec<Vec2> = drone
                .trail()
                .iter()
                .map(|point| origin + self.map.geo_to_screen(*point, viewport))
                .collect();
            draw_trail(
                &thin_polyline(&trail, TRAIL_MIN_SPACING_PX),
                color,
                &self.drone_draw,
            );

            let center = origin + self.map.geo_to_screen(drone.position(), viewport);
            let selected = self.selected.as_deref() == Some(id);
            draw_marker(center, color, selected, &self.drone_draw);

            let label = self
                .labels
                .get(id)
                .cloned()
                .unwrap_or_else(|| popup_text(id, drone.battery()));
            draw_label(center, &label, &self.drone_draw);
        }
    }

    fn draw_sidebar(&self) {
        let layout = SidebarLayout::new(screen_height());
        let panel = layout.panel;
        draw_rectangle(panel.x, panel.y, panel.w, panel.h, PANEL_COLOR);

        for (index, id) in self.fleet.ids().take(layout.visible_rows()).enumerate() {
            let row = layout.row_rect(index);
            if self.selected.as_deref() == Some(id) {
                draw_rectangle(row.x, row.y, row.w, row.h, ROW_SELECTED_COLOR);
            }
            draw_circle(
                row.x + 10.0,
                row.y + ROW_HEIGHT / 2.0,
                5.0,
                self.colors.color_of(id),
            );
            draw_text(id, row.x + 24.0, row.y + ROW_HEIGHT * 0.7, 20.0, WHITE);
        }

        draw_button(layout.add_button, "Add Drone", true);
        draw_button(layout.remove_button, "Remove Drone", self.selected.is_some());
    }

    fn draw_status(&self, origin: Vec2, viewport: Vec2) {
        let status = format!(
            "drones: {}  zoom: {:.2}  polls: {}",
            self.fleet.len(),
            self.map.zoom(),
            self.polls
        );
        let dims = measure_text(&status, None, 16, 1.0);
        draw_text(
            &status,
            origin.x + viewport.x - dims.width - 8.0,
            origin.y + 18.0,
            16.0,
            DARKGRAY,
        );
    }

    fn draw_toasts(&self, origin: Vec2, viewport: Vec2, now: f64) {
        let width = 260.0;
        let height = 30.0;
        let x = origin.x + viewport.x - width - 10.0;
        for (index, toast) in self.toasts.iter().enumerate() {
            let y = origin.y + 30.0 + index as f32 * (height + 6.0);
            let alpha = toast.opacity(now);
            let background = match toast.level {
                ToastLevel::Info => Color::new(0.15, 0.2, 0.22, 0.9 * alpha),
                ToastLevel::Warning => Color::new(0.78, 0.16, 0.16, 0.9 * alpha),
            };
            draw_rectangle(x, y, width, height, background);
            draw_text(
                &toast.message,
                x + 10.0,
                y + height * 0.68,
                18.0,
                Color::new(1.0, 1.0, 1.0, alpha),
            );
        }
    }
}

fn map_area() -> (Vec2, Vec2) {
    let origin = vec2(sidebar::SIDEBAR_WIDTH, 0.0);
    let viewport = vec2(
        (screen_width() - sidebar::SIDEBAR_WIDTH).max(1.0),
        screen_height().max(1.0),
    );
    (origin, viewport)
}

fn confirm_rects(origin: Vec2, viewport: Vec2) -> (Rect, Rect, Rect) {
    let center = origin + viewport / 2.0;
    let panel = Rect::new(
        center.x - CONFIRM_WIDTH / 2.0,
        center.y - CONFIRM_HEIGHT / 2.0,
        CONFIRM_WIDTH,
        CONFIRM_HEIGHT,
    );
    let button_w = 110.0;
    let button_h = 32.0;
    let button_y = panel.bottom() - button_h - 12.0;
    let yes = Rect::new(center.x - button_w - 8.0, button_y, button_w, button_h);
    let no = Rect::new(center.x + 8.0, button_y, button_w, button_h);
    (panel, yes, no)
}

fn draw_confirm(origin: Vec2, viewport: Vec2, id: &str) {
    draw_rectangle(
        origin.x,
        origin.y,
        viewport.x,
        viewport.y,
        Color::new(0.0, 0.0, 0.0, 0.35),
    );
    let (panel, yes, no) = confirm_rects(origin, viewport);
    draw_rectangle(panel.x, panel.y, panel.w, panel.h, WHITE);
    draw_rectangle_lines(panel.x, panel.y, panel.w, panel.h, 2.0, PANEL_COLOR);
    draw_text(
        &format!("Remove {id}?"),
        panel.x + 16.0,
        panel.y + 32.0,
        24.0,
        BLACK,
    );
    draw_rectangle(yes.x, yes.y, yes.w, yes.h, WARNING_COLOR);
    draw_text("Yes (Y)", yes.x + 18.0, yes.y + 22.0, 20.0, WHITE);
    draw_rectangle(no.x, no.y, no.w, no.h, BUTTON_COLOR);
    draw_text("No (N)", no.x + 22.0, no.y + 22.0, 20.0, WHITE);
}

fn draw_button(rect: Rect, label: &str, enabled: bool) {
    let fill = if enabled {
        BUTTON_COLOR
    } else {
        BUTTON_DISABLED_COLOR
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
    let dims = measure_text(label, None, 20, 1.0);
    draw_text(
        label,
        rect.x + (rect.w - dims.width) / 2.0,
        rect.y + rect.h * 0.65,
        20.0,
        if enabled { WHITE } else { GRAY },
    );
}

/// Grid label for a line at `value` degrees, with as many decimals as the
/// grid step needs.
fn format_degrees(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10() - 1e-9).ceil() as usize
    };
    format!("{value:.decimals$}")
}

pub async fn run(settings: TrackerSettings) {
    let mut app = TrackerApp::new(&settings);
    info!(
        poll_interval_secs = settings.poll_interval_secs,
        seeded = settings.seed.is_some(),
        "tracker started"
    );

    loop {
        let now = get_time();
        app.handle_input(now);
        // Telemetry arrives on a fixed cadence regardless of frame rate.
        app.advance_clock(get_frame_time() as f64, now);
        app.render(now);

        next_frame().await;
    }
}
