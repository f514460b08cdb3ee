use macroquad::prelude::*;

#[derive(Debug, Clone)]
pub struct DroneDrawConfig {
    pub radius_px: f32,
    pub stroke_px: f32,
    pub selected_ring_px: f32, // extra radius of the selection halo
    pub trail_thickness_px: f32,
    pub label_font_size: f32,
    pub label_offset: Vec2,
    pub stroke_color: Color,
    pub label_color: Color,
    pub label_background: Color,
}

impl Default for DroneDrawConfig {
    fn default() -> Self {
        Self {
            radius_px: 6.0,
            stroke_px: 2.0,
            selected_ring_px: 5.0,
            trail_thickness_px: 2.5,
            label_font_size: 18.0,
            label_offset: vec2(10.0, -10.0),
            stroke_color: WHITE,
            label_color: BLACK,
            label_background: Color::from_rgba(255, 255, 255, 210),
        }
    }
}

/// Popup text shown beside each marker.
pub fn popup_text(id: &str, battery: f64) -> String {
    format!("{id}: Battery {battery:.1}%")
}

/// Drops consecutive points closer than `min_spacing` pixels so long trails
/// stay cheap to draw at low zoom. The last point is always kept.
pub fn thin_polyline(points: &[Vec2], min_spacing: f32) -> Vec<Vec2> {
    let mut kept: Vec<Vec2> = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let is_last = index + 1 == points.len();
        match kept.last() {
            Some(previous) if !is_last && previous.distance(*point) < min_spacing => {}
            _ => kept.push(*point),
        }
    }
    kept
}

pub fn draw_trail(points: &[Vec2], color: Color, config: &DroneDrawConfig) {
    for segment in points.windows(2) {
        draw_line(
            segment[0].x,
            segment[0].y,
            segment[1].x,
            segment[1].y,
            config.trail_thickness_px,
            color,
        );
    }
}

pub fn draw_marker(center: Vec2, color: Color, selected: bool, config: &DroneDrawConfig) {
    if selected {
        draw_circle_lines(
            center.x,
            center.y,
            config.radius_px + config.selected_ring_px,
            config.stroke_px,
            color,
        );
    }
    // Stroke + fill, like a leaflet circle marker.
    draw_circle(
        center.x,
        center.y,
        config.radius_px + config.stroke_px,
        config.stroke_color,
    );
    draw_circle(center.x, center.y, config.radius_px, color);
}

pub fn draw_label(anchor: Vec2, text: &str, config: &DroneDrawConfig) {
    let font_size = config.label_font_size as u16;
    let dims = measure_text(text, None, font_size, 1.0);
    let origin = anchor + config.label_offset;
    draw_rectangle(
        origin.x - 3.0,
        origin.y - dims.offset_y - 3.0,
        dims.width + 6.0,
        dims.height + 6.0,
        config.label_background,
    );
    draw_text(text, origin.x, origin.y, config.label_font_size, config.label_color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_uses_one_decimal() {
        assert_eq!(popup_text("Drone_1", 99.9654), "Drone_1: Battery 100.0%");
        assert_eq!(popup_text("Drone_2", 42.04), "Drone_2: Battery 42.0%");
        assert_eq!(popup_text("Drone_3", 0.0), "Drone_3: Battery 0.0%");
    }

    #[test]
    fn thinning_keeps_endpoints() {
        let points = vec![
            vec2(0.0, 0.0),
            vec2(0.5, 0.0),
            vec2(1.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.2, 0.0),
        ];
        let thinned = thin_polyline(&points, 2.0);
        assert_eq!(thinned, vec![vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.2, 0.0)]);
    }

    #[test]
    fn thinning_handles_short_inputs() {
        assert!(thin_polyline(&[], 2.0).is_empty());
        assert_eq!(thin_polyline(&[vec2(1.0, 1.0)], 2.0), vec![vec2(1.0, 1.0)]);
    }
}
