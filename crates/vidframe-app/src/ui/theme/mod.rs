pub mod colors;
pub mod tokens;
pub mod visuals;

use clap::ValueEnum;
use egui::Visuals;
use serde::{Deserialize, Serialize};

use colors::ThemeColors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
pub enum ThemeMode {
    /// Follow the OS preference.
    #[default]
    System,
    Dark,
    Light,
    #[value(alias = "high_contrast")]
    HighContrast,
}

impl ThemeMode {
    pub const ALL: &[ThemeMode] = &[
        ThemeMode::System,
        ThemeMode::Dark,
        ThemeMode::Light,
        ThemeMode::HighContrast,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::System => "System",
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
            ThemeMode::HighContrast => "High Contrast",
        }
    }

    /// Concrete mode, asking the OS when set to `System`.
    pub fn resolve(&self) -> ThemeMode {
        match self {
            ThemeMode::System => match dark_light::detect() {
                Ok(dark_light::Mode::Light) => ThemeMode::Light,
                Ok(_) => ThemeMode::Dark,
                Err(e) => {
                    log::debug!("System theme detection failed: {e}");
                    ThemeMode::Dark
                }
            },
            other => *other,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self.resolve() {
            ThemeMode::Light => visuals::build(&tokens::LIGHT, false),
            ThemeMode::HighContrast => high_contrast_visuals(),
            _ => visuals::build(&tokens::DARK, true),
        }
    }

    pub fn colors(&self) -> ThemeColors {
        match self.resolve() {
            ThemeMode::Light => ThemeColors::light(),
            ThemeMode::HighContrast => ThemeColors::high_contrast(),
            _ => ThemeColors::dark(),
        }
    }

    pub fn toggle(&self) -> Self {
        match self.resolve() {
            ThemeMode::Dark => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }
}

fn high_contrast_visuals() -> Visuals {
    use egui::{Color32, Stroke};

    let mut v = visuals::build(&tokens::DARK, true);

    v.panel_fill = Color32::from_rgb(0x0A, 0x0A, 0x0A);
    v.window_fill = Color32::from_rgb(0x0A, 0x0A, 0x0A);
    v.extreme_bg_color = Color32::BLACK;
    v.override_text_color = Some(Color32::WHITE);

    v.widgets.inactive.bg_fill = Color32::from_rgb(0x1A, 0x1A, 0x1A);
    v.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    v.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(0x66, 0x66, 0x66));

    v.widgets.hovered.bg_fill = Color32::from_rgb(0x28, 0x28, 0x28);
    v.widgets.hovered.fg_stroke = Stroke::new(1.5, Color32::WHITE);
    v.widgets.hovered.bg_stroke = Stroke::new(2.0, Color32::from_rgb(0x55, 0xAA, 0xFF));

    v.widgets.active.bg_fill = Color32::from_rgb(0x33, 0x33, 0x33);
    v.widgets.active.fg_stroke = Stroke::new(1.5, Color32::WHITE);
    v.widgets.active.bg_stroke = Stroke::new(2.0, Color32::from_rgb(0x55, 0xAA, 0xFF));

    v
}
