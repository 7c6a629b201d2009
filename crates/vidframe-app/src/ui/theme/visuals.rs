use egui::{CornerRadius, Stroke, Visuals};

use super::tokens::{Palette, PANEL_ROUNDING, WIDGET_ROUNDING};

/// Build egui visuals on top of egui's own dark or light base.
pub fn build(palette: &Palette, dark: bool) -> Visuals {
    let mut v = if dark { Visuals::dark() } else { Visuals::light() };

    v.panel_fill = palette.panel;
    v.window_fill = palette.panel;
    v.extreme_bg_color = palette.canvas;
    v.faint_bg_color = palette.faint;

    v.override_text_color = Some(palette.text_primary);
    v.selection.bg_fill = palette.accent.gamma_multiply(palette.selection_alpha);
    v.selection.stroke = Stroke::new(1.0, palette.accent);

    let rounding = CornerRadius::same(WIDGET_ROUNDING);
    let widgets = [
        (&mut v.widgets.noninteractive, palette.panel, palette.text_secondary, Stroke::new(0.5, palette.separator)),
        (&mut v.widgets.inactive, palette.widget_bg, palette.text_primary, Stroke::new(0.5, palette.separator)),
        (&mut v.widgets.hovered, palette.widget_bg_hover, palette.text_primary, Stroke::new(1.0, palette.accent)),
        (&mut v.widgets.active, palette.widget_bg_active, palette.text_primary, Stroke::new(1.0, palette.accent)),
        (&mut v.widgets.open, palette.widget_bg_active, palette.text_primary, Stroke::new(1.0, palette.accent)),
    ];
    for (w, bg, fg, border) in widgets {
        w.bg_fill = bg;
        w.weak_bg_fill = bg;
        w.fg_stroke = Stroke::new(1.0, fg);
        w.bg_stroke = border;
        w.corner_radius = rounding;
    }

    v.window_corner_radius = CornerRadius::same(PANEL_ROUNDING);
    v.window_stroke = Stroke::new(1.0, palette.separator);

    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::tokens::{DARK, LIGHT};

    #[test]
    fn palettes_pick_matching_base() {
        assert!(build(&DARK, true).dark_mode);
        assert!(!build(&LIGHT, false).dark_mode);
        assert_eq!(build(&DARK, true).widgets.hovered.bg_stroke.color, DARK.accent);
    }
}
