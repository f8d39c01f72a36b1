pub use dog_gl::core::logging::{init_logging, LoggingConfig};
pub use dog_gl::core::platform::opengl::opengl_render_backend::OpenGLRenderBackend;
pub use dog_gl::core::rendering::context::{ProgramUniforms, RenderContext, RenderSettings};
pub use dog_gl::core::rendering::render_api::{ProgramHandle, RenderBackend, API};
pub use dog_gl::core::rendering::shader::{
    ShaderDataType, ShaderError, ShaderSrc, ShaderStage, UniformValue,
};
