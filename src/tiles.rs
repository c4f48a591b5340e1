//! Tile addressing and the atlas blit loop.
//!
//! The sprite sheet is expected to be a strip of square tiles laid out one
//! after another in memory (a `tile_size`-wide column of tiles satisfies
//! this). Tile `n` therefore starts at `n * channels * tile_size²` bytes.
//!
//! The atlas is filled by walking its surface in `tile_size` steps, rows
//! outer, and picking a palette tile for each cell with
//! [`AtlasLayout::selector`]. Writes go through a [`TileSink`] so the same
//! loop drives the GL texture and the in-memory [`CpuAtlas`].

use crate::config::{BG_TILE_SIZE, DEFAULT_HEIGHT, DEFAULT_WIDTH, PALETTE_SIZE};
use crate::error::AtlasError;
use crate::sheet::SpriteSheet;

/// Number of bytes in one tile, or `None` if it does not fit in `usize`.
#[must_use]
pub fn tile_stride(tile_size: u32, channels: u8) -> Option<usize> {
    let edge = usize::try_from(tile_size).ok()?;
    edge.checked_mul(edge)?.checked_mul(usize::from(channels))
}

/// Byte offset of tile `index` within a contiguous tile strip, or `None` if
/// it does not fit in `usize`.
#[must_use]
pub fn tile_offset(index: usize, tile_size: u32, channels: u8) -> Option<usize> {
    index.checked_mul(tile_stride(tile_size, channels)?)
}

/// Dimensions of the atlas surface and how it is tiled.
///
/// Constructed through [`AtlasLayout::new`], which guarantees that the tile
/// size evenly divides both dimensions and that the palette is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    width: u32,
    height: u32,
    tile_size: u32,
    palette_size: u32,
}

/// One cell of the atlas and the palette tile written into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePlacement {
    /// Destination column origin in pixels.
    pub x: u32,
    /// Destination row origin in pixels.
    pub y: u32,
    /// Index of the palette tile copied into this cell.
    pub selector: u32,
}

impl AtlasLayout {
    /// Create a layout, rejecting tile sizes that leave a partial row or
    /// column and empty palettes.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::UnevenLayout`] if `tile_size` is zero or does
    /// not divide `width` and `height`, and [`AtlasError::EmptyPalette`] if
    /// `palette_size` is zero.
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        palette_size: u32,
    ) -> Result<Self, AtlasError> {
        if tile_size == 0 || width % tile_size != 0 || height % tile_size != 0 {
            return Err(AtlasError::UnevenLayout {
                width,
                height,
                tile_size,
            });
        }
        if palette_size == 0 {
            return Err(AtlasError::EmptyPalette);
        }
        Ok(Self {
            width,
            height,
            tile_size,
            palette_size,
        })
    }

    /// Atlas width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Atlas height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile edge length in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of palette tiles the selector cycles through.
    #[must_use]
    pub const fn palette_size(&self) -> u32 {
        self.palette_size
    }

    /// Number of cells in the atlas.
    #[must_use]
    pub const fn tile_count(&self) -> u64 {
        (self.width / self.tile_size) as u64 * (self.height / self.tile_size) as u64
    }

    /// Palette tile for the cell whose origin is (`col`, `row`).
    ///
    /// This sums the pixel coordinates before dividing, so the pattern runs
    /// in diagonal stripes rather than reading the palette left to right.
    /// The sum is taken in `u64`, so any pair of `u32` coordinates is valid.
    #[must_use]
    // The result is below `palette_size`, so it fits back into u32.
    #[expect(clippy::cast_possible_truncation)]
    pub const fn selector(&self, row: u32, col: u32) -> u32 {
        let diagonal = (row as u64 + col as u64) / self.tile_size as u64;
        (diagonal % self.palette_size as u64) as u32
    }

    /// Every cell of the atlas, row by row.
    pub fn placements(self) -> impl Iterator<Item = TilePlacement> {
        let step = self.tile_size as usize;
        (0..self.height).step_by(step).flat_map(move |y| {
            (0..self.width)
                .step_by(step)
                .map(move |x| TilePlacement {
                    x,
                    y,
                    selector: self.selector(y, x),
                })
        })
    }
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tile_size: BG_TILE_SIZE,
            palette_size: PALETTE_SIZE,
        }
    }
}

/// Destination for tile writes.
pub trait TileSink {
    /// Copy one `tile_size`×`tile_size` tile into the cell at
    /// (`placement.x`, `placement.y`).
    ///
    /// `pixels` holds exactly [`tile_stride`]`(tile_size, channels)` bytes,
    /// row-major. Tiles taken from a [`SpriteSheet`] always have 3 or 4
    /// channels; sinks may ignore any other shape.
    fn write_tile(&mut self, placement: TilePlacement, tile_size: u32, channels: u8, pixels: &[u8]);
}

/// Fill the atlas from `sheet`, returning the number of tiles written.
///
/// Every palette tile is resolved before the first write, so a sheet that
/// is too short leaves the sink untouched.
///
/// # Errors
///
/// Returns [`AtlasError::TileOutOfBounds`] if the sheet does not hold
/// `palette_size` tiles.
pub fn blit_tiles<S>(
    sheet: &SpriteSheet,
    layout: AtlasLayout,
    sink: &mut S,
) -> Result<usize, AtlasError>
where
    S: TileSink + ?Sized,
{
    let tile_size = layout.tile_size();
    let palette = (0..layout.palette_size() as usize)
        .map(|index| sheet.tile(index, tile_size))
        .collect::<Result<Vec<_>, _>>()?;

    let mut writes = 0;
    for placement in layout.placements() {
        let pixels = palette[placement.selector as usize];
        sink.write_tile(placement, tile_size, sheet.channels(), pixels);
        writes += 1;
    }

    log::debug!(
        "blitted {writes} tiles of {tile_size}px into a {}x{} atlas",
        layout.width(),
        layout.height()
    );
    Ok(writes)
}

/// An atlas held in CPU memory, RGBA8, row-major.
///
/// Mirrors what `glTexSubImage2D` does to the GL atlas, which makes the blit
/// observable without a context. Three-channel tiles are widened with an
/// opaque alpha.
#[derive(Debug, Clone)]
pub struct CpuAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CpuAtlas {
    /// A zeroed atlas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// The RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (`x`, `y`), or `None` outside the atlas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[at..at + 4]);
        Some(rgba)
    }
}

impl TileSink for CpuAtlas {
    fn write_tile(&mut self, placement: TilePlacement, tile_size: u32, channels: u8, pixels: &[u8]) {
        if !matches!(channels, 3 | 4) {
            log::warn!("ignoring {channels}-channel tile at ({}, {})", placement.x, placement.y);
            return;
        }
        let channels = usize::from(channels);
        let Some(row_len) = (tile_size as usize)
            .checked_mul(channels)
            .filter(|&len| len > 0)
        else {
            return;
        };
        let width = self.width as usize;

        for (row, src) in pixels.chunks_exact(row_len).enumerate() {
            let y = placement.y as usize + row;
            if y >= self.height as usize {
                break;
            }
            for (col, texel) in src.chunks_exact(channels).enumerate() {
                let x = placement.x as usize + col;
                if x >= width {
                    break;
                }
                let at = (y * width + x) * 4;
                let rgba = match *texel {
                    [r, g, b] => [r, g, b, u8::MAX],
                    [r, g, b, a] => [r, g, b, a],
                    _ => continue,
                };
                self.pixels[at..at + 4].copy_from_slice(&rgba);
            }
        }
    }
}
