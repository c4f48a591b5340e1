//! GL objects for the demo: the quad program, its buffers, and the atlas
//! texture the tiles are blitted into.

use std::path::PathBuf;
use std::sync::Arc;

use glow::{HasContext, PixelUnpackData};

use crate::{
    config::DemoConfig,
    error::{AtlasError, RenderError},
    frame::FrameTarget,
    shaders,
    sheet::SpriteSheet,
    tiles::{self, AtlasLayout, TilePlacement, TileSink},
    types::{Vertex, QUAD_INDICES, QUAD_VERTICES},
};

/// GL internal format for RGBA8 textures, pre-cast to the `i32` that
/// `tex_image_2d` expects.
#[expect(clippy::cast_possible_wrap)]
const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

/// Texture unit the atlas is bound to.
const ATLAS_UNIT: i32 = 0;

/// Convert a `u32` to `i32` for GL API calls.
///
/// # Panics
///
/// Panics if `value > i32::MAX`. Atlas and viewport dimensions never come
/// close.
fn gl_size(value: u32) -> i32 {
    i32::try_from(value).expect("dimension exceeds i32::MAX")
}

/// Upload format for tightly packed pixels with `channels` bytes each.
fn pixel_format(channels: u8) -> u32 {
    match channels {
        3 => glow::RGB,
        _ => glow::RGBA,
    }
}

/// Handles to everything needed to draw the atlas quad.
///
/// Created once after the context is made current and kept until the
/// window closes.
pub struct RenderState {
    /// The OpenGL context, shared with the window bootstrap.
    gl: Arc<glow::Context>,

    /// Program built from the quad vertex and fragment shaders.
    program: glow::Program,

    /// Vertex array describing the [`Vertex`] layout.
    vao: glow::VertexArray,
    /// Static quad corners.
    vbo: glow::Buffer,
    /// Static quad indices.
    ebo: glow::Buffer,

    /// RGBA8 atlas texture, allocated at [`layout`](Self::layout) size.
    texture: glow::Texture,
    /// Dimensions the atlas storage was allocated with.
    layout: AtlasLayout,
}

impl RenderState {
    /// Compile the quad program, upload the quad, and allocate the atlas.
    ///
    /// The atlas storage is allocated here but left unfilled; its contents
    /// are undefined until [`upload_tiles`](Self::upload_tiles) runs.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid. The caller must ensure
    /// that [`destroy`](Self::destroy) is called before the context is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if shader compilation, program linking, or GL object
    /// creation fails.
    pub unsafe fn new(gl: Arc<glow::Context>, layout: AtlasLayout) -> Result<Self, RenderError> {
        let program = unsafe {
            shaders::compile_program(&gl, shaders::QUAD_VERTEX_SRC, shaders::QUAD_FRAGMENT_SRC)?
        };

        unsafe {
            gl.use_program(Some(program));
            match gl.get_uniform_location(program, "u_atlas") {
                Some(location) => gl.uniform_1_i32(Some(&location), ATLAS_UNIT),
                None => log::warn!("u_atlas not found in quad program"),
            }
            gl.use_program(None);
        }

        let (vao, vbo, ebo) = unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;
            let ebo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_VERTICES),
                glow::STATIC_DRAW,
            );

            // Vertex is 16 bytes, well within i32 range.
            #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let stride = std::mem::size_of::<Vertex>() as i32;
            #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let tex_coord_offset = std::mem::offset_of!(Vertex, tex_coord) as i32;

            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, tex_coord_offset);
            gl.enable_vertex_attrib_array(1);

            // The element binding is recorded in the VAO.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_INDICES),
                glow::STATIC_DRAW,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            (vao, vbo, ebo)
        };

        let texture = unsafe {
            let texture = gl.create_texture()?;
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                RGBA8_INTERNAL_FORMAT,
                gl_size(layout.width()),
                gl_size(layout.height()),
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(None),
            );
            Self::set_atlas_tex_params(&gl);
            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        log::debug!(
            "render state ready, atlas {}x{}",
            layout.width(),
            layout.height()
        );

        Ok(Self {
            gl,
            program,
            vao,
            vbo,
            ebo,
            texture,
            layout,
        })
    }

    /// Pixel-art filtering: nearest sampling, clamped edges, no mipmaps.
    unsafe fn set_atlas_tex_params(gl: &glow::Context) {
        // GL constant values are small enough that the cast is always safe.
        #[expect(clippy::cast_possible_wrap)]
        unsafe {
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
        }
    }

    /// Blit tiles from `sheet` into the atlas texture.
    ///
    /// Returns the number of sub-image writes issued.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet holds fewer tiles than the layout's
    /// palette; no writes are issued in that case.
    pub unsafe fn upload_tiles(&self, sheet: &SpriteSheet) -> Result<usize, AtlasError> {
        let gl: &glow::Context = &self.gl;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            // RGB tiles are not 4-byte aligned per row in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }

        let result = tiles::blit_tiles(sheet, self.layout, &mut GlAtlas { gl });

        unsafe {
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        result
    }

    /// Draw the atlas over the whole viewport.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn draw(&self) {
        let gl = &self.gl;

        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.bind_vertex_array(Some(self.vao));

            #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            gl.draw_elements(
                glow::TRIANGLES,
                QUAD_INDICES.len() as i32,
                glow::UNSIGNED_INT,
                0,
            );

            gl.bind_vertex_array(None);
        }
    }

    /// Match the viewport to a new framebuffer size.
    ///
    /// # Safety
    ///
    /// Requires a current GL context matching the one passed to
    /// [`new`](Self::new).
    pub unsafe fn resize_viewport(&self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, gl_size(width), gl_size(height)) };
    }

    /// The atlas layout this state was allocated for.
    #[must_use]
    pub fn layout(&self) -> AtlasLayout {
        self.layout
    }

    /// Clean up all GL resources owned by this state.
    ///
    /// # Safety
    ///
    /// Must be called with the same GL context that was used to create the
    /// state, and must be called exactly once.
    pub unsafe fn destroy(&self) {
        let gl = &self.gl;
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ebo);
            gl.delete_texture(self.texture);
        }
    }
}

/// [`TileSink`] writing into whichever texture is bound to `TEXTURE_2D`.
///
/// Only built inside [`RenderState::upload_tiles`], which guarantees a
/// current context and a bound atlas.
struct GlAtlas<'a> {
    gl: &'a glow::Context,
}

impl TileSink for GlAtlas<'_> {
    fn write_tile(&mut self, placement: TilePlacement, tile_size: u32, channels: u8, pixels: &[u8]) {
        let size = gl_size(tile_size);
        // SAFETY: see the type-level comment.
        unsafe {
            self.gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_size(placement.x),
                gl_size(placement.y),
                size,
                size,
                pixel_format(channels),
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }
}

/// The demo scene: render state plus where to find the sprite strip.
///
/// Implements [`FrameTarget`] so a [`FrameDriver`](crate::FrameDriver) can
/// populate it once and draw it every frame.
pub struct AtlasScene {
    render: RenderState,
    sheet_path: PathBuf,
}

impl AtlasScene {
    /// Set up GL state for `config`.
    ///
    /// # Safety
    ///
    /// Same requirements as [`RenderState::new`]. The context must stay
    /// current for as long as the scene is used, since [`FrameTarget`]
    /// methods issue GL calls.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderState::new`] failures.
    pub unsafe fn new(gl: Arc<glow::Context>, config: &DemoConfig) -> Result<Self, RenderError> {
        let render = unsafe { RenderState::new(gl, config.layout)? };
        Ok(Self {
            render,
            sheet_path: config.sheet_path.clone(),
        })
    }

    /// The underlying GL objects.
    #[must_use]
    pub fn render_state(&self) -> &RenderState {
        &self.render
    }
}

impl FrameTarget for AtlasScene {
    type Error = AtlasError;

    fn populate(&mut self) -> Result<usize, AtlasError> {
        let sheet = SpriteSheet::open(&self.sheet_path)?;
        // SAFETY: the context is current for the scene's lifetime (see `new`).
        unsafe { self.render.upload_tiles(&sheet) }
    }

    fn draw(&mut self) {
        // SAFETY: the context is current for the scene's lifetime (see `new`).
        unsafe { self.render.draw() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_format_follows_channel_count() {
        assert_eq!(pixel_format(3), glow::RGB);
        assert_eq!(pixel_format(4), glow::RGBA);
    }

    #[test]
    fn gl_size_passes_small_values() {
        assert_eq!(gl_size(0), 0);
        assert_eq!(gl_size(256), 256);
    }

    #[test]
    #[should_panic(expected = "dimension exceeds i32::MAX")]
    fn gl_size_rejects_huge_values() {
        let _ = gl_size(u32::MAX);
    }
}
