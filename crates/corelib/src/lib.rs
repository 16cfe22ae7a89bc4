//! Core types: math re-exports, camera basis/matrices and the first-person
//! input integrator.

pub use glam::{Mat4, Vec3, vec3};

pub mod camera;
pub mod controls;
pub mod error;

pub use camera::{Camera, CameraBasis, CameraMatrices};
pub use controls::{ControlsConfig, FpsControls, InputSnapshot, InputSource, MoveKey};
pub use error::{CoreError, CoreResult};
