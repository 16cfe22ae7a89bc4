//! First-person fly camera driven by held keys and an absolute cursor
//! position that is warped back to the viewport centre every frame.

use std::f32::consts::FRAC_PI_2;

use crate::camera::{Camera, CameraBasis, CameraMatrices};
use crate::error::{CoreError, CoreResult};
use crate::{Vec3, vec3};

/// Pitch bound used when `clamp_pitch` is enabled; kept just inside +-90 deg
/// so `direction` never becomes parallel to the look-at up vector.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

/// Logical movement keys; the platform layer decides the physical mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Forward,
        MoveKey::Backward,
        MoveKey::StrafeLeft,
        MoveKey::StrafeRight,
    ];

    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            MoveKey::Forward => 0,
            MoveKey::Backward => 1,
            MoveKey::StrafeLeft => 2,
            MoveKey::StrafeRight => 3,
        }
    }
}

/// Per-frame input as seen by [`FpsControls::update`].
pub trait InputSource {
    fn is_held(&self, key: MoveKey) -> bool;

    /// Cursor position in viewport pixels, origin top-left.
    fn cursor_position(&self) -> (f64, f64);

    /// Move the cursor; called once per update with the viewport centre.
    fn warp_cursor(&mut self, x: f64, y: f64);
}

/// Plain input state, used headless and in tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub held: [bool; 4],
    pub cursor: (f64, f64),
}

impl InputSnapshot {
    /// No keys held, cursor resting at the viewport centre.
    pub fn centered(config: &ControlsConfig) -> Self {
        Self {
            held: [false; 4],
            cursor: config.center(),
        }
    }

    pub fn with_key(mut self, key: MoveKey) -> Self {
        self.held[key.slot()] = true;
        self
    }

    pub fn with_cursor(mut self, x: f64, y: f64) -> Self {
        self.cursor = (x, y);
        self
    }
}

impl InputSource for InputSnapshot {
    fn is_held(&self, key: MoveKey) -> bool {
        self.held[key.slot()]
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    fn warp_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }
}

/// Tunables for [`FpsControls`]. Defaults match the classic tutorial camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlsConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub start_position: Vec3,
    /// Radians; 3.14 faces roughly toward -Z.
    pub start_horizontal: f32,
    pub start_vertical: f32,
    pub fov_deg: f32,
    /// World units per second.
    pub speed: f32,
    /// Radians per pixel of cursor offset.
    pub mouse_speed: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Off by default: the unclamped camera flips over past the poles.
    pub clamp_pitch: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024,
            viewport_height: 768,
            start_position: vec3(0.0, 0.0, 5.0),
            start_horizontal: 3.14,
            start_vertical: 0.0,
            fov_deg: 45.0,
            speed: 3.0,
            mouse_speed: 0.005,
            z_near: 0.1,
            z_far: 100.0,
            clamp_pitch: false,
        }
    }
}

impl ControlsConfig {
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_fov(mut self, fov_deg: f32) -> Self {
        self.fov_deg = fov_deg;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_mouse_speed(mut self, mouse_speed: f32) -> Self {
        self.mouse_speed = mouse_speed;
        self
    }

    pub fn with_clamp_pitch(mut self, clamp_pitch: bool) -> Self {
        self.clamp_pitch = clamp_pitch;
        self
    }

    pub fn with_orientation(mut self, horizontal: f32, vertical: f32) -> Self {
        self.start_horizontal = horizontal;
        self.start_vertical = vertical;
        self
    }

    pub fn with_start_position(mut self, position: Vec3) -> Self {
        self.start_position = position;
        self
    }

    /// Integer-halved viewport size, matching how the cursor is recentred.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.viewport_width / 2),
            f64::from(self.viewport_height / 2),
        )
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport_width as f32 / self.viewport_height.max(1) as f32
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(CoreError::EmptyViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(CoreError::FieldOfView(self.fov_deg));
        }
        if !(self.z_near > 0.0 && self.z_near < self.z_far) {
            return Err(CoreError::ClipPlanes {
                near: self.z_near,
                far: self.z_far,
            });
        }
        for (name, value) in [("speed", self.speed), ("mouse speed", self.mouse_speed)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Rate { name, value });
            }
        }
        Ok(())
    }
}

/// Camera state carried between frames.
#[derive(Clone, Debug)]
pub struct FpsControls {
    config: ControlsConfig,
    position: Vec3,
    horizontal: f32,
    vertical: f32,
    last_time: f64,
}

impl FpsControls {
    /// `start_time` is the clock reading the first frame's delta is measured
    /// from, in seconds.
    pub fn new(config: ControlsConfig, start_time: f64) -> Self {
        Self {
            position: config.start_position,
            horizontal: config.start_horizontal,
            vertical: config.start_vertical,
            config,
            last_time: start_time,
        }
    }

    #[inline]
    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn horizontal_angle(&self) -> f32 {
        self.horizontal
    }

    #[inline]
    pub fn vertical_angle(&self) -> f32 {
        self.vertical
    }

    #[inline]
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    #[inline]
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_angles(self.horizontal, self.vertical)
    }

    /// Perspective camera for the current state, without advancing it.
    pub fn camera(&self) -> Camera {
        let basis = self.basis();
        Camera {
            eye: self.position,
            direction: basis.direction,
            up: basis.up,
            fov_y_deg: self.config.fov_deg,
            z_near: self.config.z_near,
            z_far: self.config.z_far,
            aspect: self.config.aspect(),
        }
    }

    /// Integrate one frame of input and return the new view/projection.
    ///
    /// Simultaneous movement keys are summed without normalisation, so a
    /// diagonal moves `sqrt(2)` times faster than a single axis.
    pub fn update<I: InputSource + ?Sized>(&mut self, input: &mut I, now: f64) -> CameraMatrices {
        let dt = (now - self.last_time) as f32;

        let (cx, cy) = self.config.center();
        let (x, y) = input.cursor_position();
        input.warp_cursor(cx, cy);

        let mouse_speed = f64::from(self.config.mouse_speed);
        self.horizontal += (mouse_speed * (cx - x)) as f32;
        self.vertical += (mouse_speed * (cy - y)) as f32;
        if self.config.clamp_pitch {
            self.vertical = self.vertical.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        let basis = self.basis();
        let step = self.config.speed * dt;
        for key in MoveKey::ALL {
            if !input.is_held(key) {
                continue;
            }
            self.position += match key {
                MoveKey::Forward => basis.direction * step,
                MoveKey::Backward => -basis.direction * step,
                MoveKey::StrafeRight => basis.right * step,
                MoveKey::StrafeLeft => -basis.right * step,
            };
        }

        log::trace!(
            "controls: dt={:.4}s pos={:?} h={:.3} v={:.3}",
            dt,
            self.position,
            self.horizontal,
            self.vertical
        );

        self.last_time = now;
        self.camera().matrices()
    }
}
