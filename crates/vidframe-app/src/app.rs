use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use glam::Vec2;
use winit::window::Window;

use crate::gpu::GpuContext;
use crate::media::VideoElement;
use crate::overlay::{
    Canvas, FrameScheduler, LayoutMode, ObjectGeometry, OverlayConfig, PlaybackElement, VideoOverlay,
};
use crate::settings::SettingsConfig;
use crate::stage::{ObjectRenderer, Stage};
use crate::ui::control_bar::{self, ControlBarView};
use crate::ui::stage_chrome;
use crate::ui::theme::colors::theme_colors;
use crate::ui::EguiOverlay;

/// Intrinsic size assumed until the real one is known.
const PLACEHOLDER_SIZE: Vec2 = Vec2::new(1280.0, 720.0);
/// Fraction of the viewport width a freshly opened object covers.
const INITIAL_COVERAGE: f32 = 0.5;

pub type HostOverlay = VideoOverlay<VideoElement, Stage>;

/// Maps frame requests onto winit redraws.
pub struct WindowScheduler {
    window: Arc<Window>,
    pending: bool,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: false,
        }
    }

    /// Consume the pending request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.window.request_redraw();
    }
}

/// Centered placement covering part of the viewport.
pub fn initial_geometry(viewport: Vec2) -> ObjectGeometry {
    let scale = (viewport.x * INITIAL_COVERAGE / PLACEHOLDER_SIZE.x).max(0.05);
    let size = PLACEHOLDER_SIZE * scale;
    let top_left = (viewport - size) * 0.5;
    ObjectGeometry {
        left: top_left.x,
        top: top_left.y,
        width: PLACEHOLDER_SIZE.x,
        height: PLACEHOLDER_SIZE.y,
        scale_x: scale,
        scale_y: scale,
        angle: 0.0,
    }
}

pub struct App {
    pub gpu: GpuContext,
    pub window: Arc<Window>,
    pub egui_overlay: EguiOverlay,
    pub object_renderer: ObjectRenderer,
    pub overlay: Option<HostOverlay>,
    pub scheduler: WindowScheduler,
    pub settings: SettingsConfig,
    pub file_name: Option<String>,
    pub status_error: Option<String>,
    pub quit_requested: bool,
    pub shift_held: bool,
    pointer: Vec2,
    last_frame: Instant,
}

impl App {
    pub fn new(window: Arc<Window>, settings: SettingsConfig) -> Result<Self> {
        let gpu = GpuContext::new(window.clone())?;
        let egui_overlay = EguiOverlay::new(&gpu.device, gpu.format, &window, settings.theme);
        let object_renderer = ObjectRenderer::new(&gpu.device, &gpu.queue, gpu.format);
        let scheduler = WindowScheduler::new(window.clone());

        Ok(Self {
            gpu,
            window,
            egui_overlay,
            object_renderer,
            overlay: None,
            scheduler,
            settings,
            file_name: None,
            status_error: None,
            quit_requested: false,
            shift_held: false,
            pointer: Vec2::ZERO,
            last_frame: Instant::now(),
        })
    }

    /// Surface size in logical points.
    pub fn viewport(&self) -> Vec2 {
        let (w, h) = self.gpu.size();
        Vec2::new(w as f32, h as f32) / self.window.scale_factor() as f32
    }

    /// Replace the current video with `path`.
    pub fn open_file(&mut self, path: &Path) {
        self.close_overlay();

        let element = match VideoElement::open(path) {
            Ok(element) => element,
            Err(e) => {
                log::warn!("Cannot open {}: {e}", path.display());
                self.status_error = Some(e.to_string());
                return;
            }
        };

        let config = OverlayConfig {
            layout: self.settings.layout,
            muted: self.settings.muted,
            looping: self.settings.loop_by_default,
            initial_geometry: initial_geometry(self.viewport()),
        };
        self.overlay = Some(VideoOverlay::setup(
            element,
            Stage::new(),
            &config,
            &mut self.scheduler,
        ));
        self.file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        self.status_error = None;
        self.settings.last_file = Some(PathBuf::from(path));
    }

    fn close_overlay(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.teardown();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.egui_overlay
            .resize(width, height, self.window.scale_factor() as f32);
    }

    pub fn toggle_play_pause(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.toggle_play_pause();
        }
    }

    pub fn toggle_loop(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.toggle_loop();
        }
    }

    /// Flip between the raw and centered bar placement.
    pub fn toggle_layout(&mut self) {
        let mut config = self.settings.layout;
        config.mode = match config.mode {
            LayoutMode::Raw => LayoutMode::Centered,
            LayoutMode::Centered => LayoutMode::Raw,
        };
        self.settings.layout = config;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_layout_config(config);
        }
        log::info!("Control bar layout: {}", config.mode.display_name());
    }

    /// Pointer position arrives in physical pixels.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let scale = self.window.scale_factor();
        self.pointer = Vec2::new((x / scale) as f32, (y / scale) as f32);
        let snap = self.shift_held;
        if let Some(overlay) = self.overlay.as_mut() {
            let stage = overlay.canvas_mut();
            if stage.is_dragging() {
                stage.pointer_move(self.pointer, snap);
            }
        }
    }

    pub fn pointer_pressed(&mut self) {
        if self.egui_overlay.wants_mouse() {
            return;
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.canvas_mut().pointer_down(self.pointer);
        }
    }

    pub fn pointer_released(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.canvas_mut().pointer_up();
        }
    }

    /// Advance playback and run the frame task if one is scheduled.
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };

        overlay.playback_mut().advance(dt);
        overlay.pump_events();
        if self.scheduler.take_pending() {
            overlay.tick(&mut self.scheduler);
        }
        if let Some(error) = overlay.load_error() {
            self.status_error = Some(error.to_string());
        }

        if let Some(id) = overlay.object() {
            if let Some(frame) = overlay.canvas_mut().take_new_source(id) {
                self.object_renderer
                    .upload_frame(&self.gpu.device, &self.gpu.queue, &frame);
            }
        }
        if overlay.canvas_mut().take_repaint() {
            self.window.request_redraw();
        }
    }

    /// Build the egui frame and apply whatever the control bar posted.
    pub fn draw_ui(&mut self) {
        self.egui_overlay.begin_frame(&self.window);
        let ctx = self.egui_overlay.context();

        match self.overlay.as_ref() {
            Some(overlay) => {
                let geometry = overlay
                    .object()
                    .and_then(|id| overlay.canvas().geometry(id));
                if let Some(geometry) = geometry.as_ref() {
                    if overlay.canvas().selected().is_some() {
                        stage_chrome::draw_selection(&ctx, geometry);
                    }
                }
                control_bar::draw_control_bar(
                    &ctx,
                    &ControlBarView {
                        style: overlay.control_bar_style(),
                        is_playing: overlay.is_playing(),
                        looping: overlay.looping(),
                        fill_percent: overlay.fill_percent(),
                        current_label: overlay.current_time_label(),
                        duration_label: overlay.duration_label(),
                        duration: overlay.playback().duration(),
                    },
                );
            }
            None => control_bar::draw_empty_hint(&ctx),
        }
        control_bar::draw_status_line(
            &ctx,
            self.file_name.as_deref(),
            self.status_error.as_deref(),
        );

        self.egui_overlay.end_frame(&self.window);

        if let Some(intent) = control_bar::take_intent(&ctx) {
            log::debug!("control bar intent: {intent:?}");
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.apply_intent(intent);
            }
        }
    }

    pub fn render(&mut self) -> Result<()> {
        let output = self.gpu.acquire_frame()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vidframe-encoder"),
            });

        let geometry = self
            .overlay
            .as_ref()
            .and_then(|o| o.object().and_then(|id| o.canvas().geometry(id)));
        let background = theme_colors(&self.egui_overlay.context()).canvas_clear();
        self.object_renderer.render(
            &self.gpu.queue,
            &mut encoder,
            &surface_view,
            geometry.as_ref(),
            self.viewport(),
            background,
        );

        // egui on top
        self.egui_overlay
            .render(&self.gpu.device, &self.gpu.queue, &mut encoder, &surface_view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Stop the frame task, release the stage and persist settings.
    pub fn shutdown(&mut self) {
        self.close_overlay();
        self.settings.theme = self.egui_overlay.theme;
        self.settings.save();
        log::info!("Shut down");
    }
}
