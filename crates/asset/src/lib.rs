//! Asset loading/parsers (meshes, textures, shaders).
//! Meshes come out expanded (one vertex per triangle corner), textures as
//! raw texel data for upload, shaders as source text.

pub mod error;
pub mod mesh;
pub mod obj;
pub mod shader;
pub mod texture;

pub use error::{AssetError, AssetResult, Attribute};
pub use mesh::{MeshData, MeshVertex};
