use egui::Color32;

/// Runtime color set for the stage chrome and control bar.
/// Stored in egui temp data, read via `theme_colors(ctx)`.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub canvas: Color32,
    pub bar_bg: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub track_bg: Color32,
    pub track_fill: Color32,
    pub selection: Color32,
    pub handle_fill: Color32,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            canvas: Color32::from_rgb(0x12, 0x12, 0x12),
            bar_bg: Color32::from_rgba_premultiplied(0x22, 0x22, 0x22, 0xE6),
            text_primary: Color32::from_rgb(0xE8, 0xE8, 0xE8),
            text_secondary: Color32::from_rgb(0xA0, 0xA0, 0xA0),
            accent: Color32::from_rgb(0x44, 0x88, 0xFF),
            error: Color32::from_rgb(0xE0, 0x60, 0x60),
            track_bg: Color32::from_rgb(0x3A, 0x3A, 0x3A),
            track_fill: Color32::from_rgb(0x44, 0x88, 0xFF),
            selection: Color32::from_rgb(0x4D, 0xA8, 0xDA),
            handle_fill: Color32::from_rgb(0xF0, 0xF0, 0xF0),
        }
    }

    pub fn light() -> Self {
        Self {
            canvas: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            bar_bg: Color32::from_rgba_premultiplied(0xF0, 0xF0, 0xF0, 0xEE),
            text_primary: Color32::from_rgb(0x1A, 0x1A, 0x1A),
            text_secondary: Color32::from_rgb(0x5A, 0x5A, 0x5A),
            accent: Color32::from_rgb(0x09, 0x69, 0xA8),
            error: Color32::from_rgb(0xC0, 0x30, 0x30),
            track_bg: Color32::from_rgb(0xD5, 0xD5, 0xD5),
            track_fill: Color32::from_rgb(0x09, 0x69, 0xA8),
            selection: Color32::from_rgb(0x09, 0x69, 0xA8),
            handle_fill: Color32::WHITE,
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            canvas: Color32::BLACK,
            bar_bg: Color32::from_rgb(0x0A, 0x0A, 0x0A),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(0xCC, 0xCC, 0xCC),
            accent: Color32::from_rgb(0x55, 0xAA, 0xFF),
            error: Color32::from_rgb(0xFF, 0x44, 0x44),
            track_bg: Color32::from_rgb(0x55, 0x55, 0x55),
            track_fill: Color32::from_rgb(0x55, 0xAA, 0xFF),
            selection: Color32::from_rgb(0xFF, 0xCC, 0x00),
            handle_fill: Color32::WHITE,
        }
    }

    /// Canvas color as a wgpu clear color, linearized for an sRGB surface.
    pub fn canvas_clear(&self) -> wgpu::Color {
        let [r, g, b, _] = egui::Rgba::from(self.canvas).to_array();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

const THEME_COLORS_ID: &str = "vidframe_theme_colors";

/// Store theme colors in egui temp data.
pub fn set_theme_colors(ctx: &egui::Context, colors: ThemeColors) {
    ctx.data_mut(|d| d.insert_temp(egui::Id::new(THEME_COLORS_ID), colors));
}

/// Read theme colors from egui temp data (fallback: dark).
pub fn theme_colors(ctx: &egui::Context) -> ThemeColors {
    ctx.data(|d| d.get_temp(egui::Id::new(THEME_COLORS_ID)))
        .unwrap_or_else(ThemeColors::dark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_roundtrip_through_egui_temp_data() {
        let ctx = egui::Context::default();
        assert_eq!(theme_colors(&ctx).canvas, ThemeColors::dark().canvas);
        set_theme_colors(&ctx, ThemeColors::light());
        assert_eq!(theme_colors(&ctx).canvas, ThemeColors::light().canvas);
    }

    #[test]
    fn clear_color_is_linear_and_opaque() {
        let c = ThemeColors::light().canvas_clear();
        assert_eq!(c.a, 1.0);
        // 0xF5 in sRGB is ~0.91 linear
        assert!(c.r > 0.85 && c.r < 0.95);
    }
}
