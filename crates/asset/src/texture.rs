//! Texture loading and data structures.
//! Uncompressed images (BMP/PNG) are decoded to RGBA8; DDS files keep their
//! DXT blocks and are only sliced into mip levels.

use std::{fs, io::Cursor, path::Path};

use ddsfile::{D3DFormat, Dds};

use crate::error::{AssetError, AssetResult};

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Wrap RGBA8 texels, checking the buffer size.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> AssetResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AssetError::UnsupportedTexture(format!(
                "{}x{} RGBA8 needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Load a BMP or PNG file.
    pub fn load<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);
        let bytes = fs::read(path).map_err(|e| AssetError::io(path, e))?;
        let tex = Self::from_image_bytes(&bytes)?;
        log::info!(
            "Loaded texture {}x{} with {} bytes",
            tex.width,
            tex.height,
            tex.data.len()
        );
        Ok(tex)
    }

    /// Decode an in-memory image. Rows come out bottom-up, the order
    /// `glTexImage2D` expects for a bottom-left texture origin.
    pub fn from_image_bytes(bytes: &[u8]) -> AssetResult<Self> {
        let img = image::load_from_memory(bytes)?;
        let rgba = img.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new_rgba8(width, height, rgba.into_raw())
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size =
            self.width as usize * self.height as usize * self.bytes_per_pixel() as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

/// S3TC block formats accepted from DDS files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressedFormat {
    Dxt1,
    Dxt3,
    Dxt5,
}

impl CompressedFormat {
    /// Bytes per 4x4 block.
    pub const fn block_size(self) -> u32 {
        match self {
            CompressedFormat::Dxt1 => 8,
            CompressedFormat::Dxt3 | CompressedFormat::Dxt5 => 16,
        }
    }

    /// `GL_COMPRESSED_RGBA_S3TC_DXT{1,3,5}_EXT`.
    pub const fn gl_internal_format(self) -> u32 {
        match self {
            CompressedFormat::Dxt1 => 0x83F1,
            CompressedFormat::Dxt3 => 0x83F2,
            CompressedFormat::Dxt5 => 0x83F3,
        }
    }

    /// Size in bytes of one mip level; `None` if it does not fit in `usize`.
    pub fn level_size(self, width: u32, height: u32) -> Option<usize> {
        let blocks = u64::from(width.div_ceil(4)).checked_mul(u64::from(height.div_ceil(4)))?;
        let bytes = blocks.checked_mul(u64::from(self.block_size()))?;
        usize::try_from(bytes).ok()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Block-compressed texture, ready for `glCompressedTexImage2D` per level.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedTexture {
    pub format: CompressedFormat,
    pub width: u32,
    pub height: u32,
    pub mips: Vec<MipLevel>,
}

impl CompressedTexture {
    pub fn load_dds<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        log::info!("Loading DDS texture from {:?}", path);
        let bytes = fs::read(path).map_err(|e| AssetError::io(path, e))?;
        let tex = Self::from_dds_bytes(&bytes)?;
        log::info!(
            "Loaded DDS {:?} {}x{} with {} mip levels",
            tex.format,
            tex.width,
            tex.height,
            tex.mips.len()
        );
        Ok(tex)
    }

    pub fn from_dds_bytes(bytes: &[u8]) -> AssetResult<Self> {
        let dds = Dds::read(&mut Cursor::new(bytes))?;

        let format = match dds.get_d3d_format() {
            Some(D3DFormat::DXT1) => CompressedFormat::Dxt1,
            Some(D3DFormat::DXT3) => CompressedFormat::Dxt3,
            Some(D3DFormat::DXT5) => CompressedFormat::Dxt5,
            other => {
                return Err(AssetError::UnsupportedTexture(format!(
                    "DDS format {other:?}, expected DXT1/DXT3/DXT5"
                )));
            }
        };

        let width = dds.get_width();
        let height = dds.get_height();
        let mips = mip_chain(format, width, height, dds.get_num_mipmap_levels(), &dds.data)?;
        Ok(Self {
            format,
            width,
            height,
            mips,
        })
    }
}

const MAX_MIP_LEVELS: u32 = 33;

/// Slice a packed mip chain. Dimensions halve per level, floored at 1.
pub fn mip_chain(
    format: CompressedFormat,
    width: u32,
    height: u32,
    levels: u32,
    data: &[u8],
) -> AssetResult<Vec<MipLevel>> {
    if width == 0 || height == 0 {
        return Err(AssetError::UnsupportedTexture(format!(
            "empty DDS surface {width}x{height}"
        )));
    }

    let (mut w, mut h) = (width, height);
    let mut offset = 0usize;
    // A full chain for a 2^32 surface has 33 levels.
    let mut mips = Vec::with_capacity(levels.clamp(1, MAX_MIP_LEVELS) as usize);

    for level in 0..levels.max(1) {
        if offset >= data.len() {
            return Err(AssetError::UnsupportedTexture(format!(
                "DDS declares {levels} mip levels but data ends after level {}",
                level.saturating_sub(1)
            )));
        }
        let end = format
            .level_size(w, h)
            .and_then(|size| offset.checked_add(size))
            .ok_or_else(|| {
                AssetError::UnsupportedTexture(format!("mip level {level} ({w}x{h}) is too large"))
            })?;
        let chunk = data.get(offset..end).ok_or_else(|| {
            AssetError::UnsupportedTexture(format!(
                "mip level {level} ({w}x{h}) needs bytes {offset}..{end}, file has {}",
                data.len()
            ))
        })?;
        mips.push(MipLevel {
            width: w,
            height: h,
            data: chunk.to_vec(),
        });
        offset = end;
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }

    Ok(mips)
}
