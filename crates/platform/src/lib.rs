//! Platform layer: windowing, input collection and the per-frame camera step.
//!
//! Drawing is left to the caller: every redraw hands the freshly integrated
//! camera matrices to a callback.

pub mod input;

use std::time::Instant;

use anyhow::{Context, Result};
use corelib::{CameraMatrices, ControlsConfig, FpsControls};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::input::{InputState, WindowInput};

#[derive(Clone, Debug)]
pub struct WindowSettings {
    pub title: String,
    pub controls: ControlsConfig,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "glwalk".to_owned(),
            controls: ControlsConfig::default(),
        }
    }
}

/// Open a window and fly the camera until Escape or close.
pub fn run_fly_camera<F>(settings: WindowSettings, on_frame: F) -> Result<()>
where
    F: FnMut(&FpsControls, &CameraMatrices),
{
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FlyCamera {
        input: InputState::new(settings.controls.center()),
        settings,
        window: None,
        controls: None,
        clock: Instant::now(),
        frames: 0,
        on_frame,
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    if let Some(err) = app.error {
        return Err(err);
    }
    if let Some(controls) = &app.controls {
        log::info!(
            "Camera stopped at {:?} after {} frames",
            controls.position(),
            app.frames
        );
    }
    Ok(())
}

struct FlyCamera<F> {
    settings: WindowSettings,
    window: Option<Window>,
    input: InputState,
    controls: Option<FpsControls>,
    clock: Instant,
    frames: u64,
    on_frame: F,
    error: Option<anyhow::Error>,
}

impl<F> FlyCamera<F>
where
    F: FnMut(&FpsControls, &CameraMatrices),
{
    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Window> {
        let cfg = &self.settings.controls;
        let attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(cfg.viewport_width, cfg.viewport_height))
            .with_resizable(false);
        let window = event_loop
            .create_window(attrs)
            .context("Failed to create window")?;

        // Hide the cursor and keep it inside so deltas are unbounded.
        window.set_cursor_visible(false);
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("Cursor grab unavailable: {e}");
        }
        let (cx, cy) = cfg.center();
        if let Err(e) = window.set_cursor_position(PhysicalPosition::new(cx, cy)) {
            log::warn!("Initial cursor warp failed: {e}");
        }

        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );
        Ok(window)
    }

    fn step(&mut self) {
        let now = self.now();
        let (Some(window), Some(controls)) = (self.window.as_ref(), self.controls.as_mut()) else {
            return;
        };
        let mut source = WindowInput::new(&mut self.input, window);
        let matrices = controls.update(&mut source, now);
        (self.on_frame)(controls, &matrices);
        self.frames += 1;
    }
}

impl<F> ApplicationHandler for FlyCamera<F>
where
    F: FnMut(&FpsControls, &CameraMatrices),
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match self.create_window(event_loop) {
            Ok(window) => {
                self.window = Some(window);
                self.input = InputState::new(self.settings.controls.center());
                self.controls = Some(FpsControls::new(self.settings.controls, self.now()));
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { ref event, .. }
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed =>
            {
                log::info!("Escape pressed. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.step(),
            WindowEvent::Resized(size) => {
                log::debug!("Resized: {}x{} (viewport stays fixed)", size.width, size.height);
            }
            other => {
                self.input.handle_window_event(&other);
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        self.input.handle_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
