use eframe::glow::{self, HasContext};
use tracing::{debug, error};

use fractview_render::{Device, RenderError, Uniform};

/// `GL_CONTEXT_LOST` (GL 4.5 / KHR_robustness); not exported by glow.
const GL_CONTEXT_LOST: u32 = 0x0507;

/// [`Device`] on top of the glow context egui paints with.
///
/// Only constructed inside paint callbacks and `on_exit`, i.e. on the thread
/// that owns the GL context.
pub struct GlowDevice<'a> {
    gl: &'a glow::Context,
    vao: glow::VertexArray,
}

impl<'a> GlowDevice<'a> {
    pub fn new(gl: &'a glow::Context, vao: glow::VertexArray) -> Self {
        Self { gl, vao }
    }

    fn check_lost(&self) -> fractview_render::Result<()> {
        // SAFETY: plain state query on the current context.
        let err = unsafe { self.gl.get_error() };
        if err == GL_CONTEXT_LOST {
            error!("OpenGL context lost");
            return Err(RenderError::DeviceLost);
        }
        if err != glow::NO_ERROR {
            debug!("GL error 0x{err:04X}");
        }
        Ok(())
    }
}

impl Device for GlowDevice<'_> {
    type Program = glow::Program;

    fn compile(&mut self, vertex: &str, fragment: &str) -> Result<glow::Program, String> {
        let gl = self.gl;
        // SAFETY: every handle created here is either attached to the returned
        // program or deleted before returning.
        unsafe {
            let program = gl.create_program()?;
            let sources = [
                (glow::VERTEX_SHADER, vertex),
                (glow::FRAGMENT_SHADER, fragment),
            ];

            let mut shaders = Vec::with_capacity(sources.len());
            for (shader_type, source) in sources {
                let shader = match gl.create_shader(shader_type) {
                    Ok(s) => s,
                    Err(e) => {
                        discard(gl, program, &shaders);
                        return Err(e);
                    }
                };
                gl.shader_source(shader, source);
                gl.compile_shader(shader);
                shaders.push(shader);
                if !gl.get_shader_compile_status(shader) {
                    let log = gl.get_shader_info_log(shader);
                    discard(gl, program, &shaders);
                    return Err(log);
                }
                gl.attach_shader(program, shader);
            }

            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                discard(gl, program, &shaders);
                return Err(log);
            }

            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }
            Ok(program)
        }
    }

    fn use_program(&mut self, program: &glow::Program) -> fractview_render::Result<()> {
        // SAFETY: program and vao were created on this context.
        unsafe {
            self.gl.use_program(Some(*program));
            self.gl.bind_vertex_array(Some(self.vao));
        }
        self.check_lost()
    }

    fn set_uniform(&mut self, program: &glow::Program, name: &str, value: Uniform<'_>) {
        let gl = self.gl;
        // SAFETY: the program is in use (set by `use_program`); a missing
        // location is None, which GL ignores.
        unsafe {
            let location = gl.get_uniform_location(*program, name);
            let location = location.as_ref();
            match value {
                Uniform::Float(v) => gl.uniform_1_f32(location, v),
                Uniform::Double(v) => gl.uniform_1_f64(location, v),
                Uniform::Int(v) => gl.uniform_1_i32(location, v),
                Uniform::Vec2([x, y]) => gl.uniform_2_f32(location, x, y),
                Uniform::DVec2([x, y]) => gl.uniform_2_f64(location, x, y),
                Uniform::Vec3Array(colors) => {
                    gl.uniform_3_f32_slice(location, colors.as_flattened())
                }
            }
        }
    }

    fn draw_quad(&mut self) -> fractview_render::Result<()> {
        // SAFETY: program and vertex array are bound by `use_program`.
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
            self.gl.bind_vertex_array(None);
            self.gl.use_program(None);
        }
        self.check_lost()
    }

    fn release(&mut self, program: glow::Program) {
        // SAFETY: the engine releases each program exactly once.
        unsafe { self.gl.delete_program(program) };
    }
}

/// Delete a half-built program and its shaders.
unsafe fn discard(gl: &glow::Context, program: glow::Program, shaders: &[glow::Shader]) {
    for &shader in shaders {
        gl.delete_shader(shader);
    }
    gl.delete_program(program);
}
