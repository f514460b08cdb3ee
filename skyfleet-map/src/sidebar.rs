use macroquad::prelude::{Rect, Vec2};

pub const SIDEBAR_WIDTH: f32 = 220.0;
pub const SIDEBAR_PADDING: f32 = 10.0;
pub const ROW_HEIGHT: f32 = 26.0;
pub const BUTTON_HEIGHT: f32 = 34.0;
const BUTTON_GAP: f32 = 8.0;

/// What a click inside the side panel landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarHit {
    Drone(usize),
    AddButton,
    RemoveButton,
    Panel,
}

/// Geometry of the drone list and its buttons for a given window height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebarLayout {
    pub panel: Rect,
    pub list: Rect,
    pub add_button: Rect,
    pub remove_button: Rect,
}

impl SidebarLayout {
    pub fn new(screen_height: f32) -> Self {
        let inner_width = SIDEBAR_WIDTH - 2.0 * SIDEBAR_PADDING;
        let remove_y = screen_height - SIDEBAR_PADDING - BUTTON_HEIGHT;
        let add_y = remove_y - BUTTON_GAP - BUTTON_HEIGHT;
        let list_height = (add_y - BUTTON_GAP - SIDEBAR_PADDING).max(0.0);

        Self {
            panel: Rect::new(0.0, 0.0, SIDEBAR_WIDTH, screen_height),
            list: Rect::new(SIDEBAR_PADDING, SIDEBAR_PADDING, inner_width, list_height),
            add_button: Rect::new(SIDEBAR_PADDING, add_y, inner_width, BUTTON_HEIGHT),
            remove_button: Rect::new(SIDEBAR_PADDING, remove_y, inner_width, BUTTON_HEIGHT),
        }
    }

    /// Rows that fit in the list area.
    pub fn visible_rows(&self) -> usize {
        (self.list.h / ROW_HEIGHT).floor() as usize
    }

    pub fn row_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.list.x,
            self.list.y + index as f32 * ROW_HEIGHT,
            self.list.w,
            ROW_HEIGHT,
        )
    }

    pub fn hit_test(&self, point: Vec2, drone_count: usize) -> Option<SidebarHit> {
        if !self.panel.contains(point) {
            return None;
        }
        if self.add_button.contains(point) {
            return Some(SidebarHit::AddButton);
        }
        if self.remove_button.contains(point) {
            return Some(SidebarHit::RemoveButton);
        }
        if self.list.contains(point) {
            let row = ((point.y - self.list.y) / ROW_HEIGHT).floor() as usize;
            if row < drone_count.min(self.visible_rows()) {
                return Some(SidebarHit::Drone(row));
            }
        }
        Some(SidebarHit::Panel)
    }
}
