use egui::{pos2, Id, LayerId, Order, Pos2, Shape, Stroke};
use glam::Vec2;

use super::theme::colors::theme_colors;
use super::theme::tokens::{HANDLE_DRAW_RADIUS, OUTLINE_WIDTH};
use crate::overlay::ObjectGeometry;
use crate::stage::gesture::rotate_handle_position;

fn to_pos(v: Vec2) -> Pos2 {
    pos2(v.x, v.y)
}

/// Outline and transform handles around the selected object.
/// Painted below every egui area so the control bar stays on top.
pub fn draw_selection(ctx: &egui::Context, geometry: &ObjectGeometry) {
    let tc = theme_colors(ctx);
    let painter = ctx.layer_painter(LayerId::new(Order::Background, Id::new("stage-chrome")));
    let stroke = Stroke::new(OUTLINE_WIDTH, tc.selection);

    let corners = geometry.corners().map(to_pos);
    painter.add(Shape::closed_line(corners.to_vec(), stroke));

    let top_mid = to_pos((geometry.corners()[0] + geometry.corners()[1]) * 0.5);
    let rotate = to_pos(rotate_handle_position(geometry));
    painter.line_segment([top_mid, rotate], stroke);

    for p in corners.into_iter().chain(std::iter::once(rotate)) {
        painter.circle(p, HANDLE_DRAW_RADIUS, tc.handle_fill, stroke);
    }
}
