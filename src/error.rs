//! Error types for each layer of the demo.
//!
//! Startup failures are fatal and bubble up to `main`. Atlas failures are
//! reported by the frame driver and rendering continues with whatever the
//! atlas texture already holds.

use thiserror::Error;

/// Errors raised while decoding the sprite sheet or blitting its tiles.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The image file could not be read or decoded.
    #[error("failed to load sprite sheet: {0}")]
    Load(#[from] image::ImageError),

    /// The tile size does not evenly divide the atlas surface.
    #[error("tile size {tile_size} does not evenly divide a {width}x{height} atlas")]
    UnevenLayout {
        /// Atlas width in pixels.
        width: u32,
        /// Atlas height in pixels.
        height: u32,
        /// Tile edge length in pixels.
        tile_size: u32,
    },

    /// The palette holds no tiles to select from.
    #[error("palette size must be at least 1")]
    EmptyPalette,

    /// A tile's byte range extends past the end of the sheet buffer.
    #[error("tile {index} spans bytes {offset}..{end} but the sheet holds {len} bytes")]
    TileOutOfBounds {
        /// Requested tile index.
        index: usize,
        /// Start of the tile's byte range.
        offset: usize,
        /// End (exclusive) of the tile's byte range.
        end: usize,
        /// Length of the sheet buffer.
        len: usize,
    },
}

/// Errors raised while creating GL objects or compiling shaders.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A shader stage failed to compile.
    #[error("{stage} shader failed to compile: {log}")]
    Compile {
        /// `"vertex"` or `"fragment"`.
        stage: &'static str,
        /// The driver's info log.
        log: String,
    },

    /// The shader program failed to link.
    #[error("shader program failed to link: {0}")]
    Link(String),

    /// A GL object could not be created (glow reports these as strings).
    #[error("failed to create GL object: {0}")]
    Resource(String),
}

impl From<String> for RenderError {
    fn from(message: String) -> Self {
        Self::Resource(message)
    }
}

/// Errors that abort startup before the first frame.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The winit event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// No window or GL config could be produced for this display.
    #[error("failed to create window: {0}")]
    Display(String),

    /// The display builder returned a config without a window.
    #[error("display builder did not create a window")]
    MissingWindow,

    /// The native window handle was unavailable.
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    /// Context or surface creation failed.
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),

    /// GL resources or shaders could not be set up.
    #[error(transparent)]
    Render(#[from] RenderError),
}
