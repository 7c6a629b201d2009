use egui::{pos2, vec2, CornerRadius, Rect, Response, Sense, Shape, Stroke, Ui};

use super::theme::colors::theme_colors;
use super::theme::tokens::*;

/// Glyphs for the transport buttons, painted rather than taken from a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportIcon {
    Play,
    Pause,
    Loop,
}

/// Map a pointer x-coordinate on the track to a value in `[0, max]`.
pub fn scrub_value(pointer_x: f32, track: Rect, max: f64) -> f64 {
    if track.width() <= 0.0 || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    let t = ((pointer_x - track.left()) / track.width()).clamp(0.0, 1.0);
    t as f64 * max
}

/// Square button painting a transport glyph. `active` draws it in the accent color.
pub fn icon_button(ui: &mut Ui, icon: TransportIcon, active: bool) -> Response {
    let tc = theme_colors(ui.ctx());
    let size = MIN_INTERACT_HEIGHT;
    let (rect, response) = ui.allocate_exact_size(vec2(size, size), Sense::click());

    let visuals = ui.style().interact(&response);
    ui.painter()
        .rect_filled(rect, CornerRadius::same(WIDGET_ROUNDING), visuals.bg_fill);

    let color = if active { tc.accent } else { tc.text_primary };
    let c = rect.center();
    let half = size * 0.25;
    let painter = ui.painter();
    match icon {
        TransportIcon::Play => {
            painter.add(Shape::convex_polygon(
                vec![
                    pos2(c.x - half * 0.7, c.y - half),
                    pos2(c.x + half, c.y),
                    pos2(c.x - half * 0.7, c.y + half),
                ],
                color,
                Stroke::NONE,
            ));
        }
        TransportIcon::Pause => {
            let bar = vec2(half * 0.55, half * 2.0);
            for dx in [-half * 0.5, half * 0.5] {
                painter.rect_filled(
                    Rect::from_center_size(pos2(c.x + dx, c.y), bar),
                    CornerRadius::same(1),
                    color,
                );
            }
        }
        TransportIcon::Loop => {
            let stroke = Stroke::new(1.5, color);
            painter.circle_stroke(c, half, stroke);
            // arrowhead on the right side, pointing down
            painter.add(Shape::convex_polygon(
                vec![
                    pos2(c.x + half - 3.0, c.y - 1.0),
                    pos2(c.x + half + 3.0, c.y - 1.0),
                    pos2(c.x + half, c.y + 3.0),
                ],
                color,
                Stroke::NONE,
            ));
        }
    }

    response
}

/// Scrubber track with a progress fill and a thumb.
/// Returns `(value, max)` while the user clicks or drags it.
pub fn scrubber(ui: &mut Ui, fill_percent: f32, width: f32, max: f64) -> Option<(f64, f64)> {
    let tc = theme_colors(ui.ctx());
    let (rect, response) = ui.allocate_exact_size(
        vec2(width.max(THUMB_RADIUS * 4.0), MIN_INTERACT_HEIGHT),
        Sense::click_and_drag(),
    );
    let track = Rect::from_center_size(
        rect.center(),
        vec2(rect.width() - THUMB_RADIUS * 2.0, TRACK_HEIGHT),
    );

    let painter = ui.painter();
    let radius = CornerRadius::same((TRACK_HEIGHT / 2.0) as u8);
    painter.rect_filled(track, radius, tc.track_bg);

    let fill = fill_percent.clamp(0.0, 100.0) / 100.0;
    let fill_x = track.left() + track.width() * fill;
    painter.rect_filled(
        Rect::from_min_max(track.min, pos2(fill_x, track.max.y)),
        radius,
        tc.track_fill,
    );
    let thumb_color = if response.hovered() || response.dragged() {
        tc.handle_fill
    } else {
        tc.text_secondary
    };
    painter.circle_filled(pos2(fill_x, track.center().y), THUMB_RADIUS, thumb_color);

    if response.clicked() || response.dragged() {
        let pointer = response.interact_pointer_pos()?;
        return Some((scrub_value(pointer.x, track, max), max));
    }
    None
}
