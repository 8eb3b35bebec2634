use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(45, 49, 58);
pub(super) const HOVER_RING: Color32 = Color32::from_rgb(255, 255, 0);
pub(super) const SELECTED_RING: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const SEARCH_RING: Color32 = Color32::from_rgb(103, 196, 255);

/// Opacity left to points outside the current selection.
pub(super) const GREYOUT_OPACITY: f32 = 0.1;

pub(super) fn rgba_color(rgba: &[f32]) -> Color32 {
    let channel = |index: usize, fallback: f32| {
        (rgba.get(index).copied().unwrap_or(fallback).clamp(0.0, 1.0) * 255.0).round() as u8
    };
    Color32::from_rgba_unmultiplied(channel(0, 1.0), channel(1, 1.0), channel(2, 1.0), channel(3, 1.0))
}

pub(super) fn dim_color(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (64.0 * zoom.clamp(0.6, 1.8)).max(24.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(70, 78, 92, 60));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Segment-vs-rect test, so a link crossing the viewport stays drawn even
/// when both of its endpoints are off-screen.
pub(super) fn link_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;
    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    let rect = rect.expand(padding);
    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    (0..4).any(|side| segments_cross(start, end, corners[side], corners[(side + 1) % 4]))
}

fn segments_cross(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn orientation(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    if a1.x.max(a2.x) < b1.x.min(b2.x)
        || b1.x.max(b2.x) < a1.x.min(a2.x)
        || a1.y.max(a2.y) < b1.y.min(b2.y)
        || b1.y.max(b2.y) < a1.y.min(a2.y)
    {
        return false;
    }

    let d1 = orientation(a1, a2, b1);
    let d2 = orientation(a1, a2, b2);
    let d3 = orientation(b1, b2, a1);
    let d4 = orientation(b1, b2, a2);

    ((d1 <= 0.0 && d2 >= 0.0) || (d1 >= 0.0 && d2 <= 0.0))
        && ((d3 <= 0.0 && d4 >= 0.0) || (d3 >= 0.0 && d4 <= 0.0))
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn screen_radius(size: f32, zoom: f32) -> f32 {
    (size * 0.6 * zoom.powf(0.5)).clamp(1.5, 42.0)
}
