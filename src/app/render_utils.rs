use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, vec2};

pub(super) const MIN_ZOOM: f32 = 0.1;
pub(super) const MAX_ZOOM: f32 = 3.0;
pub(super) const FIT_PADDING: f32 = 200.0;
pub(super) const FIT_MAX_ZOOM: f32 = 2.0;

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Pan/zoom that frames the given world-space box, padded per axis and
/// capped so a tiny neighborhood is never magnified past `max_zoom`.
pub(super) fn fit_viewport(
    min: Vec2,
    max: Vec2,
    view: Vec2,
    padding: f32,
    max_zoom: f32,
) -> (Vec2, f32) {
    let padded = (max - min) + vec2(padding, padding);
    let zoom = (view.x / padded.x)
        .min(view.y / padded.y)
        .min(max_zoom)
        .clamp(MIN_ZOOM, MAX_ZOOM);
    let mid = (min + max) * 0.5;
    (-mid * zoom, zoom)
}

pub(super) fn ease_smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub(super) fn fade(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(249, 250, 251));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let grid_stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(209, 213, 219, 90));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            grid_stroke,
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            grid_stroke,
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn draw_label(
    painter: &Painter,
    position: Pos2,
    text: &str,
    font_size: f32,
    color: Color32,
    bold: bool,
) {
    let font = FontId::proportional(font_size);
    if bold {
        painter.text(
            position + vec2(0.35, 0.0),
            Align2::LEFT_CENTER,
            text,
            font.clone(),
            color,
        );
    }
    painter.text(position, Align2::LEFT_CENTER, text, font, color);
}
