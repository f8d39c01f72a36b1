use std::fmt::Debug;

use crate::core::utils::handle::Handle;

use super::shader::{ShaderDataType, ShaderStage, UniformValue};

/// Identity of a linked program, valid for the lifetime of the render context
/// that created it. Destroying the program kills the handle for good.
pub type ProgramHandle = Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum API {
    OpenGL,
    /// Backends with no GPU behind them, like the ones used in tests
    Headless,
}

/// Driver identification strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendInfo {
    pub version: String,
    pub renderer: String,
    pub vendor: String,
}

/// An active uniform of a linked program, as enumerated by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    pub name: String,
    pub data_type: ShaderDataType,
    /// Number of elements, 1 for non-array uniforms
    pub array_len: i32,
}

/// This is the behaviour that a render api instance should implement,
/// translating the platform-specific details of the API to this trait.
///
/// Every method assumes the graphics context of the backend is current on the
/// calling thread. The trait only exposes raw driver primitives: cleanup on
/// failure and uniform bookkeeping belong to [super::context::RenderContext].
pub trait RenderBackend {
    type Shader: Copy + Debug + PartialEq;
    type Program: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    fn get_api(&self) -> API;
    fn get_info(&self) -> BackendInfo;

    // Shader stages
    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Upload `source` and compile it, returns the compile status
    fn compile_shader(&mut self, shader: Self::Shader, source: &str) -> bool;
    fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&mut self, shader: Self::Shader);

    // Programs
    fn create_program(&mut self) -> Result<Self::Program, String>;
    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&mut self, program: Self::Program, shader: Self::Shader);
    /// Link the program, returns the link status
    fn link_program(&mut self, program: Self::Program) -> bool;
    fn get_program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&mut self, program: Self::Program);
    fn use_program(&mut self, program: Option<Self::Program>);

    // Uniforms
    fn get_active_uniforms(&self, program: Self::Program) -> Vec<ActiveUniform>;
    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    /// Single typed write into the currently bound program
    fn set_uniform(&mut self, location: &Self::UniformLocation, value: UniformValue<'_>);
}
