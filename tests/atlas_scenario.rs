//! End-to-end tiling without a GL context: a sprite strip is blitted into a
//! recording sink and a CPU atlas through the same frame driver the window
//! uses.

#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tile_atlas_glow::{
    blit_tiles, AtlasError, AtlasLayout, CpuAtlas, DemoConfig, FrameDriver, FrameTarget,
    LoadState, SpriteSheet, TilePlacement, TileSink, BG_TILE_SIZE, DEFAULT_HEIGHT, DEFAULT_WIDTH,
    PALETTE_SIZE, SPRITE_SHEET_PATH,
};

/// A 16×128 RGBA strip whose tile `n` is filled with `[n, 0, 0, 255]`.
fn strip_png() -> Vec<u8> {
    let strip = RgbaImage::from_fn(16, 128, |_, y| {
        Rgba([u8::try_from(y / 16).unwrap(), 0, 0, 255])
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::from(strip)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[derive(Default)]
struct Recorder {
    writes: Vec<TilePlacement>,
}

impl TileSink for Recorder {
    fn write_tile(&mut self, placement: TilePlacement, tile_size: u32, channels: u8, pixels: &[u8]) {
        assert_eq!(tile_size, 16);
        assert_eq!(channels, 4);
        assert_eq!(pixels.len(), 16 * 16 * 4);
        assert_eq!(u32::from(pixels[0]), placement.selector);
        self.writes.push(placement);
    }
}

/// Loads the sheet from memory on populate, like the GL scene does from
/// disk.
struct CpuScene {
    png: Option<Vec<u8>>,
    atlas: CpuAtlas,
    draws: usize,
}

impl FrameTarget for CpuScene {
    type Error = AtlasError;

    fn populate(&mut self) -> Result<usize, AtlasError> {
        let png = self.png.as_deref().unwrap_or_default();
        let sheet = SpriteSheet::from_memory(png)?;
        blit_tiles(&sheet, AtlasLayout::default(), &mut self.atlas)
    }

    fn draw(&mut self) {
        self.draws += 1;
    }
}

#[test]
fn default_layout_issues_192_writes() {
    let sheet = SpriteSheet::from_memory(&strip_png()).unwrap();
    assert_eq!(sheet.pixels().len(), 8 * 1024);

    let mut sink = Recorder::default();
    let writes = blit_tiles(&sheet, AtlasLayout::default(), &mut sink).unwrap();
    assert_eq!(writes, 192);
    assert_eq!(sink.writes.len(), 192);

    let row0: Vec<u32> = sink
        .writes
        .iter()
        .filter(|p| p.y == 0)
        .map(|p| p.selector)
        .collect();
    assert_eq!(row0, [0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn driver_populates_cpu_atlas_once() {
    let mut driver = FrameDriver::new(CpuScene {
        png: Some(strip_png()),
        atlas: CpuAtlas::new(256, 192),
        draws: 0,
    });
    for _ in 0..10 {
        driver.frame();
    }
    assert_eq!(driver.state(), LoadState::Loaded);

    let scene = driver.into_target();
    assert_eq!(scene.draws, 10);
    // Cell (col 3, row 2) selects ((32 + 48) / 16) % 8 = 5.
    assert_eq!(scene.atlas.pixel(48, 32), Some([5, 0, 0, 255]));
    assert_eq!(scene.atlas.pixel(63, 47), Some([5, 0, 0, 255]));
    assert!(scene.atlas.pixels().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn failed_load_leaves_atlas_untouched() {
    let mut driver = FrameDriver::new(CpuScene {
        png: None,
        atlas: CpuAtlas::new(256, 192),
        draws: 0,
    });
    driver.frame();
    driver.frame();

    let scene = driver.into_target();
    assert_eq!(scene.draws, 2);
    assert!(scene.atlas.pixels().iter().all(|&b| b == 0));
}

#[test]
fn bundled_sprite_strip_fills_the_palette() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/BasicSprite.png");
    let sheet = SpriteSheet::open(path).unwrap();
    assert_eq!((sheet.width(), sheet.height()), (16, 128));

    let mut atlas = CpuAtlas::new(256, 192);
    assert_eq!(
        blit_tiles(&sheet, AtlasLayout::default(), &mut atlas).unwrap(),
        192
    );
}

#[test]
fn default_config_uses_crate_constants() {
    let layout = AtlasLayout::default();
    assert_eq!(
        (layout.width(), layout.height(), layout.tile_size(), layout.palette_size()),
        (DEFAULT_WIDTH, DEFAULT_HEIGHT, BG_TILE_SIZE, PALETTE_SIZE)
    );

    let config = DemoConfig::default();
    assert_eq!(config.layout, layout);
    assert_eq!(config.sheet_path, std::path::Path::new(SPRITE_SHEET_PATH));
}
