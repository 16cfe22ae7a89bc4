//! Keyboard/cursor state collected from winit window events.

use corelib::controls::{InputSource, MoveKey};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

/// Arrow keys drive the camera; WASD is accepted as well.
pub fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(MoveKey::Backward),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(MoveKey::StrafeLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(MoveKey::StrafeRight),
        _ => None,
    }
}

/// Cursor state is sampled in one of two ways: the absolute position from
/// `CursorMoved` (recentred by warping each frame), or, once a warp has been
/// refused, the centre plus raw `MouseMotion` deltas gathered since the last
/// sample.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: [bool; 4],
    cursor: (f64, f64),
    center: (f64, f64),
    motion: (f64, f64),
    relative: bool,
}

impl InputState {
    pub fn new(center: (f64, f64)) -> Self {
        Self {
            cursor: center,
            center,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held[key.slot()]
    }

    #[inline]
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    /// `true` once the platform has refused to warp the cursor.
    #[inline]
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Cursor position as the camera should see it this frame.
    pub fn sampled_cursor(&self) -> (f64, f64) {
        if self.relative {
            (self.center.0 + self.motion.0, self.center.1 + self.motion.1)
        } else {
            self.cursor
        }
    }

    pub fn set_key(&mut self, code: KeyCode, state: ElementState) {
        if let Some(key) = move_key(code) {
            self.held[key.slot()] = state.is_pressed();
        }
    }

    pub fn set_cursor(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = (position.x, position.y);
    }

    pub fn add_motion(&mut self, dx: f64, dy: f64) {
        self.motion.0 += dx;
        self.motion.1 += dy;
    }

    /// Record a recentre to `center`. `warped` says whether the OS cursor
    /// actually moved; the first refusal switches to relative sampling.
    pub fn recenter(&mut self, center: (f64, f64), warped: bool) {
        if !warped && !self.relative {
            log::info!("Falling back to relative mouse motion for camera look");
            self.relative = true;
        }
        self.center = center;
        self.motion = (0.0, 0.0);
        if !self.relative {
            // The next CursorMoved overwrites this with the real position.
            self.cursor = center;
        }
    }

    /// Release everything, e.g. when focus is lost mid-press.
    pub fn clear(&mut self) {
        self.held = [false; 4];
        self.motion = (0.0, 0.0);
    }

    /// Returns `true` if the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) if move_key(code).is_some() => {
                    self.set_key(code, event.state);
                    true
                }
                _ => false,
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(*position);
                true
            }
            WindowEvent::Focused(false) => {
                self.clear();
                false
            }
            _ => false,
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = *event {
            self.add_motion(dx, dy);
        }
    }
}

/// [`InputState`] bound to the window whose cursor gets recentred.
pub struct WindowInput<'a> {
    state: &'a mut InputState,
    window: &'a Window,
}

impl<'a> WindowInput<'a> {
    pub fn new(state: &'a mut InputState, window: &'a Window) -> Self {
        Self { state, window }
    }
}

impl InputSource for WindowInput<'_> {
    fn is_held(&self, key: MoveKey) -> bool {
        self.state.is_held(key)
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.state.sampled_cursor()
    }

    fn warp_cursor(&mut self, x: f64, y: f64) {
        let warped = !self.state.is_relative()
            && match self.window.set_cursor_position(PhysicalPosition::new(x, y)) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Cursor warp unsupported on this platform: {e}");
                    false
                }
            };
        self.state.recenter((x, y), warped);
    }
}
