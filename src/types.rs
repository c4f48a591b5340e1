//! Vertex layout and the static full-screen quad.

use bytemuck::{Pod, Zeroable};

/// A quad vertex: clip-space position and texture coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

/// Corners of a quad covering the whole viewport.
///
/// Texture coordinates are not flipped, so row 0 of the atlas lands at the
/// bottom of the window.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [-1.0, -1.0],
        tex_coord: [0.0, 0.0],
    },
    Vertex {
        position: [-1.0, 1.0],
        tex_coord: [0.0, 1.0],
    },
    Vertex {
        position: [1.0, -1.0],
        tex_coord: [1.0, 0.0],
    },
    Vertex {
        position: [1.0, 1.0],
        tex_coord: [1.0, 1.0],
    },
];

/// Two triangles sharing the quad's diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_four_packed_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 64);
    }

    #[test]
    fn quad_indices_cover_all_corners() {
        assert_eq!(QUAD_INDICES.len(), 6);
        for corner in 0..4 {
            assert!(QUAD_INDICES.contains(&corner));
        }
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }
}
