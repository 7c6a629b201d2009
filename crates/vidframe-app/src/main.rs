mod app;
mod gpu;
mod media;
mod overlay;
mod settings;
mod stage;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::Receiver;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use app::App;
use overlay::LayoutMode;
use settings::SettingsConfig;
use ui::theme::ThemeMode;

/// Video overlay with a floating transport bar.
///
/// Flags override the saved settings for this session only.
#[derive(Debug, Parser)]
#[command(name = "vidframe", version, about)]
struct CliArgs {
    /// Control bar placement formula
    #[arg(long, value_enum, ignore_case = true)]
    layout: Option<LayoutMode>,

    /// Start muted
    #[arg(long)]
    muted: bool,

    /// Loop playback
    #[arg(long = "loop")]
    looping: bool,

    /// Color theme
    #[arg(long, value_enum, ignore_case = true)]
    theme: Option<ThemeMode>,

    /// Video or GIF to open at startup
    file: Option<PathBuf>,
}

impl CliArgs {
    fn apply(&self, settings: &mut SettingsConfig) {
        if let Some(mode) = self.layout {
            settings.layout.mode = mode;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if self.muted {
            settings.muted = true;
        }
        if self.looping {
            settings.loop_by_default = true;
        }
    }
}

struct VidframeApp {
    app: Option<App>,
    window: Option<Arc<Window>>,
    cli: CliArgs,
    file_dialog_rx: Option<Receiver<PathBuf>>,
}

impl VidframeApp {
    fn new(cli: CliArgs) -> Self {
        Self {
            app: None,
            window: None,
            cli,
            file_dialog_rx: None,
        }
    }

    fn open_file_dialog(&mut self) {
        if self.file_dialog_rx.is_some() {
            return;
        }
        let (tx, rx) = crossbeam_channel::bounded(1);
        let spawned = std::thread::Builder::new()
            .name("file-dialog".into())
            .spawn(move || {
                let picked = rfd::FileDialog::new()
                    .add_filter("Video & GIF", &media::dialog_extensions())
                    .pick_file();
                if let Some(path) = picked {
                    let _ = tx.send(path);
                }
            });
        match spawned {
            Ok(_) => self.file_dialog_rx = Some(rx),
            Err(e) => log::error!("Failed to spawn file dialog thread: {e}"),
        }
    }

    /// Non-blocking check on the open dialog.
    fn drain_file_dialog(&mut self) {
        let Some(rx) = self.file_dialog_rx.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(path) => {
                self.file_dialog_rx = None;
                if let Some(app) = self.app.as_mut() {
                    log::info!("Opening {}", path.display());
                    app.open_file(&path);
                }
            }
            // cancelled
            Err(crossbeam_channel::TryRecvError::Disconnected) => self.file_dialog_rx = None,
            Err(crossbeam_channel::TryRecvError::Empty) => {}
        }
    }
}

impl ApplicationHandler for VidframeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Vidframe")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // Center window on primary monitor
        if let Some(monitor) = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
        {
            let monitor_size = monitor.size();
            let window_size = window.outer_size();
            let monitor_pos = monitor.position();
            let x = monitor_size.width.saturating_sub(window_size.width) / 2;
            let y = monitor_size.height.saturating_sub(window_size.height) / 2;
            window.set_outer_position(winit::dpi::PhysicalPosition::new(
                monitor_pos.x + x as i32,
                monitor_pos.y + y as i32,
            ));
        }

        self.window = Some(window.clone());

        let mut settings = SettingsConfig::load();
        self.cli.apply(&mut settings);
        let initial = self.cli.file.clone();

        match App::new(window, settings) {
            Ok(mut app) => {
                if let Some(path) = initial {
                    app.open_file(&path);
                }
                app.window.request_redraw();
                self.app = Some(app);
                log::info!("Vidframe initialized");
            }
            Err(e) => {
                log::error!("Failed to initialize app: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let mut open_dialog = false;
        {
            let Some(app) = self.app.as_mut() else {
                return;
            };

            let egui_consumed = app.egui_overlay.handle_event(&app.window, &event);

            match event {
                WindowEvent::CloseRequested => {
                    app.quit_requested = true;
                }
                WindowEvent::Resized(size) => {
                    app.resize(size.width, size.height);
                    app.window.request_redraw();
                }
                WindowEvent::ModifiersChanged(modifiers) => {
                    app.shift_held = modifiers.state().shift_key();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.pointer_moved(position.x, position.y);
                    app.window.request_redraw();
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    match state {
                        ElementState::Pressed => app.pointer_pressed(),
                        ElementState::Released => app.pointer_released(),
                    }
                    app.window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } if !egui_consumed || !app.egui_overlay.wants_keyboard() => {
                    match key {
                        KeyCode::Escape => app.quit_requested = true,
                        KeyCode::KeyF => {
                            let window = &app.window;
                            if window.fullscreen().is_some() {
                                window.set_fullscreen(None);
                            } else {
                                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                            }
                        }
                        KeyCode::KeyO => open_dialog = true,
                        KeyCode::Space => app.toggle_play_pause(),
                        KeyCode::KeyL => app.toggle_loop(),
                        KeyCode::KeyC => app.toggle_layout(),
                        KeyCode::KeyT => {
                            let next = app.egui_overlay.theme.toggle();
                            app.egui_overlay.set_theme(next);
                        }
                        _ => {}
                    }
                    app.window.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    app.update();
                    app.draw_ui();

                    if let Err(e) = app.render() {
                        if let Some(wgpu::SurfaceError::OutOfMemory) = e.downcast_ref() {
                            log::error!("Out of GPU memory");
                            event_loop.exit();
                        } else {
                            log::warn!("Surface error: {e}");
                        }
                    }
                }
                _ => {}
            }

            if app.quit_requested {
                app.shutdown();
                event_loop.exit();
                return;
            }
        }

        if open_dialog {
            self.open_file_dialog();
        }
        self.drain_file_dialog();
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // keep polling while the dialog is open
        if self.file_dialog_rx.is_some() {
            self.drain_file_dialog();
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = CliArgs::parse();

    let event_loop = EventLoop::new()?;
    // redraws are driven by the overlay's frame task
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = VidframeApp::new(cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
