use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Which raw pool a face index points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Normal => "normal",
        })
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("face corner {corner}: {attribute} index {index} out of range (1..={len})")]
    IndexOutOfRange {
        attribute: Attribute,
        index: u32,
        len: usize,
        corner: usize,
    },
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid DDS data: {0}")]
    Dds(#[from] ddsfile::Error),
    #[error("unsupported texture: {0}")]
    UnsupportedTexture(String),
    #[error("shader source {} is empty", path.display())]
    EmptyShader { path: PathBuf },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
