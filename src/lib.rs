//! A small OpenGL demo that builds a tile atlas from a sprite strip, using
//! [glow] for GL calls and [winit]/[glutin] for the window and context.
//!
//! On the first frame the sprite strip is decoded, sliced into fixed-size
//! square tiles, and blitted into a 256×192 atlas texture; every frame then
//! draws that atlas over the whole window with a single indexed draw.
//!
//! The tiling logic ([`AtlasLayout`], [`blit_tiles`], [`SpriteSheet`]) and
//! the frame state machine ([`FrameDriver`]) have no GL dependency and can
//! be driven against a [`CpuAtlas`] or any other [`TileSink`] /
//! [`FrameTarget`].
//!
//! # Safety
//!
//! [`RenderState`] and [`AtlasScene`] require a valid, current OpenGL
//! context. Their constructors and GL-issuing methods are `unsafe`.
//!
//! [glow]: https://docs.rs/glow
//! [winit]: https://docs.rs/winit
//! [glutin]: https://docs.rs/glutin

mod app;
mod config;
mod error;
mod frame;
mod render;
mod shaders;
mod sheet;
mod tiles;
mod types;

pub use app::run;
pub use config::{
    DemoConfig, BG_TILE_SIZE, DEFAULT_HEIGHT, DEFAULT_WIDTH, GL_VERSION, PALETTE_SIZE,
    SPRITE_SHEET_PATH, WINDOW_TITLE,
};
pub use error::{AtlasError, RenderError, StartupError};
pub use frame::{FrameDriver, FrameTarget, LoadState};
pub use render::{AtlasScene, RenderState};
pub use sheet::SpriteSheet;
pub use tiles::{
    blit_tiles, tile_offset, tile_stride, AtlasLayout, CpuAtlas, TilePlacement, TileSink,
};
