use std::ffi::{c_void, CStr};

use glow::{Context, HasContext, NativeProgram, NativeShader, NativeUniformLocation};

use crate::core::rendering::render_api::{ActiveUniform, BackendInfo, RenderBackend, API};
use crate::core::rendering::shader::{ShaderDataType, ShaderStage, UniformValue};

/// OpenGL implementation of [RenderBackend] on top of glow.
///
/// The backend does not own the GL context itself, only the function table.
/// Whoever created the context (the windowing layer) must keep it current on
/// the thread that uses this backend.
pub struct OpenGLRenderBackend {
    gl: Context,
}

impl OpenGLRenderBackend {
    pub fn new(gl: Context) -> Self {
        OpenGLRenderBackend { gl }
    }

    /// Build the function table from a platform loader, like
    /// `glutin`'s `Display::get_proc_address`.
    ///
    /// # Safety
    /// A GL context must be current on this thread, and `loader` must return
    /// valid pointers for that context.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        Self::new(Context::from_loader_function_cstr(loader))
    }

    pub fn gl(&self) -> &Context {
        &self.gl
    }

    #[inline(always)]
    fn get_string(&self, variant: u32) -> String {
        unsafe { self.gl.get_parameter_string(variant) }
    }
}

impl RenderBackend for OpenGLRenderBackend {
    type Shader = NativeShader;
    type Program = NativeProgram;
    type UniformLocation = NativeUniformLocation;

    fn get_api(&self) -> API {
        API::OpenGL
    }

    fn get_info(&self) -> BackendInfo {
        BackendInfo {
            version: self.get_string(glow::VERSION),
            renderer: self.get_string(glow::RENDERER),
            vendor: self.get_string(glow::VENDOR),
        }
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<NativeShader, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(shader_type) }
    }

    fn compile_shader(&mut self, shader: NativeShader, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn get_shader_info_log(&self, shader: NativeShader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&mut self, shader: NativeShader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&mut self) -> Result<NativeProgram, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&mut self, program: NativeProgram, shader: NativeShader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&mut self, program: NativeProgram, shader: NativeShader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&mut self, program: NativeProgram) -> bool {
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn get_program_info_log(&self, program: NativeProgram) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&mut self, program: NativeProgram) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&mut self, program: Option<NativeProgram>) {
        unsafe { self.gl.use_program(program) }
    }

    fn get_active_uniforms(&self, program: NativeProgram) -> Vec<ActiveUniform> {
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .map(|uniform| ActiveUniform {
                    data_type: data_type_from_gl(uniform.utype),
                    array_len: uniform.size,
                    name: uniform.name,
                })
                .collect()
        }
    }

    fn get_uniform_location(
        &self,
        program: NativeProgram,
        name: &str,
    ) -> Option<NativeUniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform(&mut self, location: &NativeUniformLocation, value: UniformValue<'_>) {
        let gl = &self.gl;
        let location = Some(location);

        unsafe {
            match value {
                UniformValue::Float(x) => gl.uniform_1_f32(location, x),
                UniformValue::Float2(v) => gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Float3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Float4(v) => gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Int(x) => gl.uniform_1_i32(location, x),
                UniformValue::Int2(v) => gl.uniform_2_i32(location, v.x, v.y),
                UniformValue::Int3(v) => gl.uniform_3_i32(location, v.x, v.y, v.z),
                UniformValue::Int4(v) => gl.uniform_4_i32(location, v.x, v.y, v.z, v.w),
                UniformValue::UInt(x) => gl.uniform_1_u32(location, x),
                // glam matrices are already column-major
                UniformValue::Mat3(m) => {
                    gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
                UniformValue::IntArray(values) => gl.uniform_1_i32_slice(location, values),
            }
        }
    }
}

/// Translate a GL uniform type enum into our data type
pub fn data_type_from_gl(gl_type: u32) -> ShaderDataType {
    match gl_type {
        glow::FLOAT => ShaderDataType::Float,
        glow::FLOAT_VEC2 => ShaderDataType::Float2,
        glow::FLOAT_VEC3 => ShaderDataType::Float3,
        glow::FLOAT_VEC4 => ShaderDataType::Float4,
        glow::FLOAT_MAT3 => ShaderDataType::Mat3,
        glow::FLOAT_MAT4 => ShaderDataType::Mat4,
        glow::INT => ShaderDataType::Int,
        glow::INT_VEC2 => ShaderDataType::Int2,
        glow::INT_VEC3 => ShaderDataType::Int3,
        glow::INT_VEC4 => ShaderDataType::Int4,
        glow::UNSIGNED_INT => ShaderDataType::UInt,
        glow::BOOL => ShaderDataType::Bool,
        glow::SAMPLER_2D
        | glow::SAMPLER_3D
        | glow::SAMPLER_CUBE
        | glow::SAMPLER_2D_ARRAY
        | glow::SAMPLER_2D_SHADOW => ShaderDataType::Sampler,
        other => ShaderDataType::Other(other),
    }
}
