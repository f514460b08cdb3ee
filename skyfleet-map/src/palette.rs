use macroquad::prelude::{BLUE, Color};
use std::collections::HashMap;

pub const FALLBACK_COLOR: Color = BLUE;

const PALETTE: [Color; 8] = [
    Color::from_rgba(230, 57, 70, 255),
    Color::from_rgba(42, 157, 143, 255),
    Color::from_rgba(244, 162, 97, 255),
    Color::from_rgba(69, 123, 157, 255),
    Color::from_rgba(155, 93, 229, 255),
    Color::from_rgba(233, 196, 106, 255),
    Color::from_rgba(0, 180, 216, 255),
    Color::from_rgba(214, 40, 160, 255),
];

/// Display colour per drone id. Colours cycle through a fixed palette in
/// assignment order and are never shared by two live drones while the
/// palette has room.
#[derive(Debug, Default)]
pub struct DroneColors {
    assigned: HashMap<String, Color>,
    next_slot: usize,
}

impl DroneColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, id: &str) -> Color {
        if let Some(color) = self.assigned.get(id) {
            return *color;
        }

        let free = (0..PALETTE.len())
            .map(|offset| (self.next_slot + offset) % PALETTE.len())
            .find(|slot| !self.assigned.values().any(|used| *used == PALETTE[*slot]));
        let slot = free.unwrap_or(self.next_slot % PALETTE.len());
        self.next_slot = slot + 1;

        let color = PALETTE[slot];
        self.assigned.insert(id.to_owned(), color);
        color
    }

    pub fn release(&mut self, id: &str) {
        self.assigned.remove(id);
    }

    pub fn color_of(&self, id: &str) -> Color {
        self.assigned.get(id).copied().unwrap_or(FALLBACK_COLOR)
    }
}

/// Lowercase `#rrggbb` rendering, as shown in the drone list.
pub fn hex_name(color: Color) -> String {
    let [r, g, b, _] = color_bytes(color);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn color_bytes(color: Color) -> [u8; 4] {
    [color.r, color.g, color.b, color.a].map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_stable_per_id() {
        let mut colors = DroneColors::new();
        let first = colors.assign("Drone_1");
        assert_eq!(colors.assign("Drone_1"), first);
        assert_eq!(colors.color_of("Drone_1"), first);
    }

    #[test]
    fn live_drones_get_distinct_colors() {
        let mut colors = DroneColors::new();
        let assigned: Vec<Color> = (1..=PALETTE.len())
            .map(|n| colors.assign(&format!("Drone_{n}")))
            .collect();

        for (i, a) in assigned.iter().enumerate() {
            for b in &assigned[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn released_color_is_reused() {
        let mut colors = DroneColors::new();
        for n in 1..=PALETTE.len() {
            colors.assign(&format!("Drone_{n}"));
        }
        let freed = colors.color_of("Drone_3");
        colors.release("Drone_3");

        assert_eq!(colors.assign("Drone_9"), freed);
    }

    #[test]
    fn unknown_id_falls_back_to_blue() {
        let colors = DroneColors::new();
        assert_eq!(colors.color_of("Drone_404"), FALLBACK_COLOR);
    }

    #[test]
    fn formats_hex_name() {
        assert_eq!(hex_name(Color::from_rgba(230, 57, 70, 255)), "#e63946");
    }
}
