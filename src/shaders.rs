//! GLSL shader sources and compilation helpers.
//!
//! Both stages target GLSL 4.60 core, matching the context requested at
//! startup.

use glow::HasContext;

use crate::error::RenderError;

/// Vertex shader for the full-screen quad.
///
/// Positions are already in clip space; the texture coordinate is passed
/// through unchanged.
pub const QUAD_VERTEX_SRC: &str = r"#version 460 core

layout (location = 0) in vec2 a_position;
layout (location = 1) in vec2 a_tex_coord;

out vec2 v_tex_coord;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
    v_tex_coord = a_tex_coord;
}
";

/// Fragment shader that samples the atlas.
///
/// # Uniforms
///
/// | Name        | Type        | Description                   |
/// |-------------|-------------|-------------------------------|
/// | `u_atlas`   | `sampler2D` | Atlas texture (unit 0)        |
pub const QUAD_FRAGMENT_SRC: &str = r"#version 460 core

in vec2 v_tex_coord;

uniform sampler2D u_atlas;

out vec4 frag_color;

void main() {
    frag_color = texture(u_atlas, v_tex_coord);
}
";

/// Compile a shader program from vertex and fragment source strings.
///
/// The compiled shader objects are detached and deleted after linking, so
/// only the program handle needs to be cleaned up by the caller.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns [`RenderError::Compile`] with the driver log if a stage fails to
/// compile, or [`RenderError::Link`] if linking fails.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, RenderError> {
    let program = unsafe { gl.create_program() }?;

    let vs = unsafe { compile_shader(gl, glow::VERTEX_SHADER, vertex_src) }
        .inspect_err(|_| unsafe { gl.delete_program(program) })?;
    let fs = unsafe { compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) }.inspect_err(
        |_| unsafe {
            gl.delete_shader(vs);
            gl.delete_program(program);
        },
    )?;

    unsafe {
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        let linked = gl.get_program_link_status(program);
        let log = (!linked).then(|| gl.get_program_info_log(program));

        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        if let Some(log) = log {
            gl.delete_program(program);
            return Err(RenderError::Link(log));
        }
    }

    Ok(program)
}

/// Compile a single shader stage (vertex or fragment) from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, RenderError> {
    unsafe {
        let shader = gl.create_shader(shader_type)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RenderError::Compile {
                stage: stage_name(shader_type),
                log,
            });
        }

        Ok(shader)
    }
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_target_core_460() {
        for src in [QUAD_VERTEX_SRC, QUAD_FRAGMENT_SRC] {
            assert!(src.starts_with("#version 460 core\n"));
        }
    }

    #[test]
    fn vertex_attribute_locations_match_buffer_layout() {
        assert!(QUAD_VERTEX_SRC.contains("layout (location = 0) in vec2 a_position"));
        assert!(QUAD_VERTEX_SRC.contains("layout (location = 1) in vec2 a_tex_coord"));
        assert!(QUAD_FRAGMENT_SRC.contains("uniform sampler2D u_atlas"));
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "fragment");
        assert_eq!(stage_name(0), "unknown");
    }
}
