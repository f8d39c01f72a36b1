use super::shader::ShaderStage;

/// A stage that compiled successfully and can be attached to a program.
///
/// Stages are consumed by [super::context::RenderContext::link_program], which
/// releases them whatever the link result is, or handed back with
/// [super::context::RenderContext::release_stage]. Stages still pending when
/// the context is dropped are deleted then.
#[derive(Debug)]
pub struct CompiledStage<S> {
    pub(super) stage: ShaderStage,
    pub(super) native_shader: S,
}

impl<S: Copy> CompiledStage<S> {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn native_shader(&self) -> S {
        self.native_shader
    }
}

/// A linked program registered in a render context
#[derive(Debug)]
pub struct ShaderProgram<P> {
    pub(super) name: String,
    pub(super) native_program: P,
}

impl<P: Copy> ShaderProgram<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_program(&self) -> P {
        self.native_program
    }
}
