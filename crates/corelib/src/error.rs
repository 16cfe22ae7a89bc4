//! Core errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("viewport must be non-empty, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    #[error("field of view must lie in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    ClipPlanes { near: f32, far: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Rate { name: &'static str, value: f32 },
}

pub type CoreResult<T> = Result<T, CoreError>;
