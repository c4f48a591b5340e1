//! Fixed demo settings.
//!
//! There is no command line or config file; everything is a compile-time
//! default collected into [`DemoConfig`] so it can be passed around
//! explicitly.

use std::path::PathBuf;

use crate::tiles::AtlasLayout;

/// Window and atlas width in pixels.
pub const DEFAULT_WIDTH: u32 = 256;

/// Window and atlas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 192;

/// Edge length of a background tile.
pub const BG_TILE_SIZE: u32 = 16;

/// Number of distinct tiles in the sprite strip.
pub const PALETTE_SIZE: u32 = 8;

/// Window title.
pub const WINDOW_TITLE: &str = "Your RPG Name";

/// Sprite strip, relative to the working directory.
pub const SPRITE_SHEET_PATH: &str = "assets/BasicSprite.png";

/// Requested OpenGL core profile version.
pub const GL_VERSION: (u8, u8) = (4, 6);

/// Everything the bootstrap and scene need to know up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Window title.
    pub title: String,
    /// Inner window size in physical pixels.
    pub window_size: [u32; 2],
    /// Atlas dimensions and tiling parameters.
    pub layout: AtlasLayout,
    /// Path of the sprite strip.
    pub sheet_path: PathBuf,
    /// OpenGL core profile version (major, minor).
    pub gl_version: (u8, u8),
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_owned(),
            window_size: [DEFAULT_WIDTH, DEFAULT_HEIGHT],
            layout: AtlasLayout::default(),
            sheet_path: PathBuf::from(SPRITE_SHEET_PATH),
            gl_version: GL_VERSION,
        }
    }
}
