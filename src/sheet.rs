//! The decoded sprite strip that tiles are read from.

use std::path::Path;

use image::DynamicImage;

use crate::error::AtlasError;
use crate::tiles::{tile_offset, tile_stride};

/// An owned, row-major image buffer with 3 or 4 bytes per pixel.
///
/// 8-bit RGB and RGBA images keep their layout as decoded. Anything else
/// (grey, 16-bit, float) is converted to RGBA8 so the bytes always match a
/// GL upload format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl SpriteSheet {
    /// Decode the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Load`] if the file is missing or cannot be
    /// decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let image = image::open(path)?;
        let sheet = Self::from_image(image);
        log::info!(
            "loaded {} ({}x{}, {} channels)",
            path.display(),
            sheet.width,
            sheet.height,
            sheet.channels
        );
        Ok(sheet)
    }

    /// Decode an encoded image held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Load`] if the bytes cannot be decoded.
    pub fn from_memory(bytes: &[u8]) -> Result<Self, AtlasError> {
        Ok(Self::from_image(image::load_from_memory(bytes)?))
    }

    /// Take ownership of a decoded image.
    #[must_use]
    pub fn from_image(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => {
                let (width, height) = rgb.dimensions();
                Self {
                    pixels: rgb.into_raw(),
                    width,
                    height,
                    channels: 3,
                }
            }
            other => {
                let rgba = other.into_rgba8();
                let (width, height) = rgba.dimensions();
                Self {
                    pixels: rgba.into_raw(),
                    width,
                    height,
                    channels: 4,
                }
            }
        }
    }

    /// Wrap raw pixel bytes.
    ///
    /// Returns `None` unless `channels` is 3 or 4 and `pixels` holds exactly
    /// `width * height * channels` bytes.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(usize::from(channels))?;
        (matches!(channels, 3 | 4) && pixels.len() == expected).then_some(Self {
            pixels,
            width,
            height,
            channels,
        })
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel (3 or 4).
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// The raw pixel bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel bytes of tile `index`, treating the buffer as a contiguous
    /// strip of `tile_size`×`tile_size` tiles.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::TileOutOfBounds`] if the tile extends past the
    /// end of the buffer.
    pub fn tile(&self, index: usize, tile_size: u32) -> Result<&[u8], AtlasError> {
        let offset = tile_offset(index, tile_size, self.channels);
        let end = offset
            .zip(tile_stride(tile_size, self.channels))
            .and_then(|(offset, stride)| offset.checked_add(stride));

        match (offset, end) {
            (Some(offset), Some(end)) if end <= self.pixels.len() => Ok(&self.pixels[offset..end]),
            _ => Err(AtlasError::TileOutOfBounds {
                index,
                offset: offset.unwrap_or(usize::MAX),
                end: end.unwrap_or(usize::MAX),
                len: self.pixels.len(),
            }),
        }
    }
}
