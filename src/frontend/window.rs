// Window module - Demo front-end around the presenter
//
// Creates the window, paces frames, runs the test machine into the
// presenter's pixel buffer and routes hotkeys and debug-window actions.

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use super::config::FrontendConfig;
use super::debug_overlay::{DebugAction, DebugOverlay, StatusInfo};
use super::machine::{TestMachine, SCREEN};
use super::screenshot::save_screenshot;
use crate::display::{Dimension, DisplayInfo, PixelFormat};
use crate::gpu::{GpuContext, Presenter, PresenterConfig};

/// What a hotkey does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ToggleDebug,
    Action(DebugAction),
}

/// Map a key to its command
///
/// F1 debug window, F2/F3 success/error flash, M mute, P pattern,
/// F9 screenshot, F10 snapshot.
pub fn key_command(key: KeyCode) -> Option<KeyCommand> {
    let action = match key {
        KeyCode::F1 => return Some(KeyCommand::ToggleDebug),
        KeyCode::F2 => DebugAction::FlashSuccess,
        KeyCode::F3 => DebugAction::FlashError,
        KeyCode::KeyM => DebugAction::ToggleAudio,
        KeyCode::KeyP => DebugAction::NextPattern,
        KeyCode::F9 => DebugAction::Screenshot,
        KeyCode::F10 => DebugAction::Snapshot,
        _ => return None,
    };
    Some(KeyCommand::Action(action))
}

/// Copy of one frame from the pixel buffer store
///
/// `None` if the framebuffer does not fit the store.
fn frame_pixels(presenter: &Presenter, info: &DisplayInfo) -> Option<Vec<u8>> {
    copy_frame(
        presenter.pixel_buffer(),
        presenter.pixel_format(),
        info.framebuffer,
    )
}

fn copy_frame(store: &[u8], format: PixelFormat, framebuffer: Dimension) -> Option<Vec<u8>> {
    store
        .get(..format.frame_len(framebuffer))
        .map(<[u8]>::to_vec)
}

/// Demo front-end window
pub struct FrontendWindow {
    config: FrontendConfig,
    presenter_config: PresenterConfig,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    overlay: Option<DebugOverlay>,
    machine: TestMachine,
    last_frame_time: Instant,
    frame_time: Duration,
    error: Option<Box<dyn Error>>,
}

impl FrontendWindow {
    /// Create the front-end (window and GPU are created when the loop starts)
    pub fn new(config: FrontendConfig, presenter_config: PresenterConfig) -> Self {
        let format = if presenter_config.paletted {
            PixelFormat::Indexed8
        } else {
            PixelFormat::Rgba8
        };
        let palette_len = presenter_config.palette.as_ref().map_or(64, |p| p.len());
        Self {
            config,
            presenter_config,
            window: None,
            presenter: None,
            overlay: None,
            machine: TestMachine::new(format, palette_len),
            last_frame_time: Instant::now(),
            frame_time: Duration::ZERO,
            error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let size = self
            .config
            .display
            .initial_window_size(SCREEN, self.config.video.scale());
        let window_attributes = Window::default_attributes()
            .with_title(format!("emu-gfx - {}", size))
            .with_inner_size(PhysicalSize::new(size.width, size.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let gpu = GpuContext::new(window.clone(), self.config.video.vsync)?;
        let mut presenter = Presenter::new(gpu, self.presenter_config.clone())?;
        let mut overlay = DebugOverlay::new(&window, presenter.device(), presenter.surface_format());

        let placeholder = presenter.empty_snapshot_texture()?;
        if let Some(view) = presenter.texture_view(placeholder) {
            overlay.set_placeholder(presenter.device(), view);
        }

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.overlay = Some(overlay);
        Ok(())
    }

    /// Check if enough time has passed for the next frame
    fn should_render_frame(&mut self) -> bool {
        let elapsed = self.last_frame_time.elapsed();
        if elapsed >= self.config.video.frame_duration() {
            self.frame_time = elapsed;
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }

    /// Run one machine frame and draw it
    fn render(&mut self) -> Result<Vec<DebugAction>, Box<dyn Error>> {
        let (Some(window), Some(presenter), Some(overlay)) =
            (&self.window, self.presenter.as_mut(), self.overlay.as_mut())
        else {
            return Ok(Vec::new());
        };

        let info = self.machine.run_frame(presenter.pixel_buffer_mut());
        let status = self.machine.status();
        let actions = overlay.run(
            window,
            &StatusInfo {
                frame_time: self.frame_time,
                frame_count: status.frame_count,
                canvas: presenter.canvas(),
                viewport: presenter.last_viewport(),
                audio_suspended: status.audio_suspended,
            },
        );

        presenter.draw_frame(&info, status, Some(&mut *overlay))?;
        overlay.end_frame();
        Ok(actions)
    }

    fn apply(&mut self, action: DebugAction) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match action {
            DebugAction::FlashSuccess => presenter.notify_success(),
            DebugAction::FlashError => presenter.notify_error(),
            DebugAction::ToggleAudio => self.machine.toggle_audio(),
            DebugAction::NextPattern => self.machine.next_pattern(),
            DebugAction::Screenshot => {
                let info = self.machine.display_info();
                let result = presenter
                    .resolve_rgba(&info, presenter.pixel_buffer())
                    .map_err(|e| e.to_string())
                    .and_then(|rgba| {
                        save_screenshot(&rgba, info.view.size(), &self.config.screenshot)
                            .map_err(|e| e.to_string())
                    });
                match result {
                    Ok(_) => presenter.notify_success(),
                    Err(e) => {
                        log::error!("Screenshot failed: {}", e);
                        presenter.notify_error();
                    }
                }
            }
            DebugAction::Snapshot => {
                let Some(overlay) = self.overlay.as_mut() else {
                    return;
                };
                let info = self.machine.display_info();
                let Some(pixels) = frame_pixels(presenter, &info) else {
                    log::error!(
                        "Snapshot failed: framebuffer {} exceeds the pixel buffer",
                        info.framebuffer
                    );
                    presenter.notify_error();
                    return;
                };

                match presenter.create_screenshot_texture(&info, &pixels) {
                    Ok(handle) => {
                        let evicted = presenter.texture_view(handle).and_then(|view| {
                            overlay.add_thumbnail(presenter.device(), handle, view, info.view.size())
                        });
                        if let Some(old) = evicted {
                            if let Err(e) = presenter.destroy_texture(old) {
                                log::warn!("{}", e);
                            }
                        }
                        presenter.notify_success();
                    }
                    Err(e) => {
                        log::error!("Snapshot failed: {}", e);
                        presenter.notify_error();
                    }
                }
            }
        }
    }

    /// Release overlay thumbnails and every GPU resource
    fn shutdown_graphics(&mut self) {
        let thumbnails = self
            .overlay
            .take()
            .map(|mut overlay| overlay.clear_thumbnails())
            .unwrap_or_default();
        if let Some(mut presenter) = self.presenter.take() {
            for handle in thumbnails {
                if let Err(e) = presenter.destroy_texture(handle) {
                    log::warn!("{}", e);
                }
            }
            presenter.shutdown();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn Error>) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for FrontendWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(overlay)) = (&self.window, self.overlay.as_mut()) {
            if overlay.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.shutdown_graphics();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_command(code) {
                Some(KeyCommand::ToggleDebug) => {
                    if let Some(overlay) = self.overlay.as_mut() {
                        overlay.toggle();
                    }
                }
                Some(KeyCommand::Action(action)) => self.apply(action),
                None => {}
            },
            WindowEvent::RedrawRequested => {
                if self.should_render_frame() {
                    match self.render() {
                        Ok(actions) => {
                            for action in actions {
                                self.apply(action);
                            }
                        }
                        Err(e) => self.fail(event_loop, e),
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Create and run the front-end window
///
/// # Arguments
/// * `config` - Front-end configuration
///
/// # Returns
/// Result indicating success or error
pub fn run_frontend(config: FrontendConfig) -> Result<(), Box<dyn Error>> {
    let presenter_config = config.display.presenter_config()?;
    let event_loop = EventLoop::new()?;

    if config.video.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    println!("Starting presenter demo...");
    println!("  Screen: {}", SCREEN);
    println!(
        "  Window size: {}",
        config
            .display
            .initial_window_size(SCREEN, config.video.scale())
    );
    println!("  Scale: {}x", config.video.scale());
    println!("  Target FPS: {}", config.video.fps);
    println!("  VSync: {}", config.video.vsync);
    println!(
        "  Color: {}",
        if presenter_config.paletted {
            "paletted"
        } else {
            "direct"
        }
    );
    println!();
    println!("  F1 debug window, F2/F3 flash, M mute, P pattern, F9 screenshot, F10 snapshot");

    let mut app = FrontendWindow::new(config, presenter_config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_frame_checks_store_size() {
        let store = vec![7u8; 16 * 16];
        let small = copy_frame(&store, PixelFormat::Indexed8, Dimension::new(16, 8)).unwrap();
        assert_eq!(small.len(), 128);

        assert!(copy_frame(&store, PixelFormat::Rgba8, Dimension::new(16, 16)).is_none());
        assert!(copy_frame(&store, PixelFormat::Indexed8, Dimension::new(32, 32)).is_none());
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(key_command(KeyCode::F1), Some(KeyCommand::ToggleDebug));
        assert_eq!(
            key_command(KeyCode::F2),
            Some(KeyCommand::Action(DebugAction::FlashSuccess))
        );
        assert_eq!(
            key_command(KeyCode::F3),
            Some(KeyCommand::Action(DebugAction::FlashError))
        );
        assert_eq!(
            key_command(KeyCode::KeyM),
            Some(KeyCommand::Action(DebugAction::ToggleAudio))
        );
        assert_eq!(
            key_command(KeyCode::KeyP),
            Some(KeyCommand::Action(DebugAction::NextPattern))
        );
        assert_eq!(
            key_command(KeyCode::F9),
            Some(KeyCommand::Action(DebugAction::Screenshot))
        );
        assert_eq!(
            key_command(KeyCode::F10),
            Some(KeyCommand::Action(DebugAction::Snapshot))
        );
        assert_eq!(key_command(KeyCode::KeyA), None);
    }
}
