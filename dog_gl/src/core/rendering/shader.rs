use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};
use thiserror::Error;

use super::render_api::ProgramHandle;

/// Programmable pipeline stages a program is linked from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Where to take the GLSL text of a stage from
#[derive(Debug, Clone, Copy)]
pub enum ShaderSrc<'a> {
    Code(&'a str),
    File(&'a Path),
}

impl<'a> ShaderSrc<'a> {
    /// Resolve the source text. Unreadable files and empty sources are
    /// errors, so nothing is ever compiled from them.
    pub fn load(&self) -> Result<Cow<'a, str>, ShaderError> {
        let source = match self {
            ShaderSrc::Code(code) => Cow::Borrowed(*code),
            ShaderSrc::File(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| {
                    ShaderError::Load {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Cow::Owned(contents)
            }
        };

        if source.trim().is_empty() {
            return Err(ShaderError::EmptySource {
                origin: self.origin(),
            });
        }

        Ok(source)
    }

    fn origin(&self) -> String {
        match self {
            ShaderSrc::Code(_) => "inline code".to_owned(),
            ShaderSrc::File(path) => format!("file '{}'", path.display()),
        }
    }
}

/// Possible uniform data types, as reported by the driver for active uniforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    Float,
    Float2,
    Float3,
    Float4,
    Mat3,
    Mat4,
    Int,
    Int2,
    Int3,
    Int4,
    UInt,
    Bool,
    Sampler,
    /// Anything the uploader has no typed path for (doubles, other matrix shapes...)
    Other(u32),
}

impl ShaderDataType {
    /// Whether a value of this shape can be written into a uniform of this
    /// type. Booleans and samplers are written through the integer path, and
    /// types with no typed upload path accept anything.
    pub fn accepts(&self, value: &UniformValue<'_>) -> bool {
        match (self, value.data_type()) {
            (ShaderDataType::Other(_), _) => true,
            (ShaderDataType::Bool | ShaderDataType::Sampler, ShaderDataType::Int) => true,
            (declared, received) => *declared == received,
        }
    }
}

/// A typed value ready to be written into a uniform slot.
///
/// There's no boolean variant: drivers have no boolean upload path, so `bool`
/// converts into `Int(1)` or `Int(0)`. Matrices are column-major, the same
/// layout glam uses, and are never transposed on upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    Float(f32),
    Float2(Vec2),
    Float3(Vec3),
    Float4(Vec4),
    Int(i32),
    Int2(IVec2),
    Int3(IVec3),
    Int4(IVec4),
    UInt(u32),
    Mat3(Mat3),
    Mat4(Mat4),
    IntArray(&'a [i32]),
}

impl UniformValue<'_> {
    /// Closest GLSL type for this value
    pub fn data_type(&self) -> ShaderDataType {
        match self {
            UniformValue::Float(_) => ShaderDataType::Float,
            UniformValue::Float2(_) => ShaderDataType::Float2,
            UniformValue::Float3(_) => ShaderDataType::Float3,
            UniformValue::Float4(_) => ShaderDataType::Float4,
            UniformValue::Int(_) | UniformValue::IntArray(_) => ShaderDataType::Int,
            UniformValue::Int2(_) => ShaderDataType::Int2,
            UniformValue::Int3(_) => ShaderDataType::Int3,
            UniformValue::Int4(_) => ShaderDataType::Int4,
            UniformValue::UInt(_) => ShaderDataType::UInt,
            UniformValue::Mat3(_) => ShaderDataType::Mat3,
            UniformValue::Mat4(_) => ShaderDataType::Mat4,
        }
    }
}

macro_rules! impl_uniform_value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for UniformValue<'_> {
                fn from(value: $source) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_uniform_value_from! {
    f32 => Float,
    Vec2 => Float2,
    Vec3 => Float3,
    Vec4 => Float4,
    i32 => Int,
    IVec2 => Int2,
    IVec3 => Int3,
    IVec4 => Int4,
    u32 => UInt,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

impl From<bool> for UniformValue<'_> {
    fn from(value: bool) -> Self {
        UniformValue::Int(i32::from(value))
    }
}

impl<'a> From<&'a [i32]> for UniformValue<'a> {
    fn from(value: &'a [i32]) -> Self {
        UniformValue::IntArray(value)
    }
}

impl<'a, const N: usize> From<&'a [i32; N]> for UniformValue<'a> {
    fn from(value: &'a [i32; N]) -> Self {
        UniformValue::IntArray(value.as_slice())
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    /// Shader source file could not be read
    #[error("could not read shader source '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Shader source resolved to no text at all
    #[error("shader source from {origin} is empty")]
    EmptySource { origin: String },
    /// The driver could not allocate a shader object
    #[error("could not create {stage} shader: {reason}")]
    StageCreation { stage: ShaderStage, reason: String },
    /// The driver could not allocate a program object
    #[error("could not create shader program '{name}': {reason}")]
    ProgramCreation { name: String, reason: String },
    /// Could not compile this shader
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStage, log: String },
    /// Both stages compiled, but the program did not link
    #[error("shader program '{name}' failed to link: {log}")]
    Link { name: String, log: String },
    /// The handle points to a destroyed (or never created) program
    #[error("shader program {0:?} is not alive")]
    InvalidProgram(ProgramHandle),
}
