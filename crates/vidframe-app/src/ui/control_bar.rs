use egui::{pos2, Align2, Area, CornerRadius, Frame, Id, Margin, Order, RichText};

use super::theme::colors::theme_colors;
use super::theme::tokens::*;
use super::widgets::{icon_button, scrubber, TransportIcon};
use crate::overlay::{ControlBarStyle, TransportIntent};

const TRANSPORT_INTENT_ID: &str = "transport_intent";

/// Read-only snapshot the control bar renders from.
pub struct ControlBarView<'a> {
    pub style: &'a ControlBarStyle,
    pub is_playing: bool,
    pub looping: bool,
    pub fill_percent: f32,
    pub current_label: &'a str,
    pub duration_label: &'a str,
    pub duration: f64,
}

/// Queue an intent for the app to apply after the frame.
pub fn post_intent(ctx: &egui::Context, intent: TransportIntent) {
    ctx.data_mut(|d| d.insert_temp(Id::new(TRANSPORT_INTENT_ID), intent));
}

pub fn take_intent(ctx: &egui::Context) -> Option<TransportIntent> {
    let id = Id::new(TRANSPORT_INTENT_ID);
    ctx.data_mut(|d| {
        let intent = d.get_temp::<TransportIntent>(id);
        d.remove::<TransportIntent>(id);
        intent
    })
}

/// Draw the floating bar at the projected layout. Nothing is drawn while hidden.
pub fn draw_control_bar(ctx: &egui::Context, view: &ControlBarView<'_>) {
    let Some(layout) = view.style.layout else {
        return;
    };
    if !view.style.is_shown() {
        return;
    }
    let tc = theme_colors(ctx);

    Area::new(Id::new("vidframe-control-bar"))
        .order(Order::Foreground)
        .fixed_pos(pos2(layout.left, layout.top))
        .constrain(false)
        .show(ctx, |ui| {
            Frame {
                fill: tc.bar_bg,
                corner_radius: CornerRadius::same(BAR_ROUNDING),
                inner_margin: Margin::same(BAR_PADDING),
                ..Default::default()
            }
            .show(ui, |ui| {
                let inner_width = layout.width - 2.0 * BAR_PADDING as f32;
                ui.set_width(inner_width);
                ui.set_height(BAR_HEIGHT - 2.0 * BAR_PADDING as f32);
                ui.horizontal_centered(|ui| {
                    let icon = if view.is_playing {
                        TransportIcon::Pause
                    } else {
                        TransportIcon::Play
                    };
                    if icon_button(ui, icon, false)
                        .on_hover_text(if view.is_playing { "Pause" } else { "Play" })
                        .clicked()
                    {
                        post_intent(ui.ctx(), TransportIntent::TogglePlayPause);
                    }
                    if icon_button(ui, TransportIcon::Loop, view.looping)
                        .on_hover_text("Loop")
                        .clicked()
                    {
                        post_intent(ui.ctx(), TransportIntent::ToggleLoop);
                    }

                    time_label(ui, view.current_label);
                    let spacing = ui.spacing().item_spacing.x;
                    let track_width = ui.available_width() - TIME_LABEL_WIDTH - spacing;
                    if let Some((value, max)) =
                        scrubber(ui, view.fill_percent, track_width, view.duration)
                    {
                        post_intent(ui.ctx(), TransportIntent::Scrub { value, max });
                    }
                    time_label(ui, view.duration_label);
                });
            });
        });
}

fn time_label(ui: &mut egui::Ui, text: &str) {
    let tc = theme_colors(ui.ctx());
    ui.add_sized(
        [TIME_LABEL_WIDTH, MIN_INTERACT_HEIGHT],
        egui::Label::new(
            RichText::new(text)
                .monospace()
                .size(MONO_SIZE)
                .color(tc.text_primary),
        ),
    );
}

/// Bottom-left status: file name or load error, plus key hints.
pub fn draw_status_line(ctx: &egui::Context, file_name: Option<&str>, error: Option<&str>) {
    let tc = theme_colors(ctx);
    Area::new(Id::new("vidframe-status"))
        .order(Order::Background)
        .anchor(Align2::LEFT_BOTTOM, [8.0, -6.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(error) = error {
                    ui.label(RichText::new(error).size(SMALL_SIZE).color(tc.error));
                } else if let Some(name) = file_name {
                    ui.label(RichText::new(name).size(SMALL_SIZE).color(tc.text_primary));
                }
                ui.label(
                    RichText::new("O open  Space play  L loop  C layout  T theme  F fullscreen  Esc quit")
                        .size(SMALL_SIZE)
                        .color(tc.text_secondary),
                );
            });
        });
}

/// Centered hint shown before anything is loaded.
pub fn draw_empty_hint(ctx: &egui::Context) {
    let tc = theme_colors(ctx);
    Area::new(Id::new("vidframe-empty"))
        .order(Order::Background)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Press O to open a video or GIF")
                    .size(BODY_SIZE)
                    .color(tc.text_secondary),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::geometry::ControlBarLayout;
    use crate::overlay::Visibility;

    fn style(visibility: Visibility) -> ControlBarStyle {
        ControlBarStyle {
            layout: Some(ControlBarLayout {
                width: 400.0,
                left: 100.0,
                top: 100.0,
            }),
            visibility,
        }
    }

    fn frame(time: f64, events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            time: Some(time),
            events,
            ..Default::default()
        }
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Click the first bar button across three frames and return what it posted.
    fn click_play_button(visibility: Visibility) -> Option<TransportIntent> {
        let ctx = egui::Context::default();
        let style = style(visibility);
        let view = ControlBarView {
            style: &style,
            is_playing: false,
            looping: false,
            fill_percent: 0.0,
            current_label: "00:00:00",
            duration_label: "00:00:10",
            duration: 10.0,
        };
        // first button sits just inside the bar's padding
        let target = pos2(
            100.0 + BAR_PADDING as f32 + MIN_INTERACT_HEIGHT / 2.0,
            100.0 + BAR_PADDING as f32 + MIN_INTERACT_HEIGHT / 2.0,
        );
        let inputs = [
            frame(0.0, vec![]),
            frame(0.1, vec![egui::Event::PointerMoved(target), button(target, true)]),
            frame(0.2, vec![button(target, false)]),
        ];
        for input in inputs {
            let _ = ctx.run(input, |ctx| draw_control_bar(ctx, &view));
        }
        take_intent(&ctx)
    }

    #[test]
    fn clicking_play_posts_toggle_intent() {
        assert_eq!(
            click_play_button(Visibility::Visible),
            Some(TransportIntent::TogglePlayPause)
        );
    }

    #[test]
    fn hidden_bar_posts_nothing() {
        assert_eq!(click_play_button(Visibility::Hidden), None);
    }

    #[test]
    fn intents_are_taken_once() {
        let ctx = egui::Context::default();
        assert!(take_intent(&ctx).is_none());
        post_intent(&ctx, TransportIntent::ToggleLoop);
        assert_eq!(take_intent(&ctx), Some(TransportIntent::ToggleLoop));
        assert!(take_intent(&ctx).is_none());
    }

    #[test]
    fn later_intent_replaces_earlier() {
        let ctx = egui::Context::default();
        post_intent(&ctx, TransportIntent::TogglePlayPause);
        post_intent(
            &ctx,
            TransportIntent::Scrub {
                value: 3.0,
                max: 6.0,
            },
        );
        assert_eq!(
            take_intent(&ctx),
            Some(TransportIntent::Scrub {
                value: 3.0,
                max: 6.0
            })
        );
    }
}
