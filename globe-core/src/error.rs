/// Error type shared by every globe front end
use std::fmt;

use thiserror::Error;

/// Pipeline stage a shader source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {0}")]
    ShaderLink(String),

    #[error("shader attribute `{0}` not found in linked program")]
    MissingAttribute(String),

    #[error("shader uniform `{0}` not found in linked program")]
    MissingUniform(String),

    #[error("failed to allocate {0} buffer")]
    BufferAllocation(&'static str),

    #[error("failed to allocate texture")]
    TextureAllocation,

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("globe viewer is not initialized; call init() first")]
    NotInitialized,

    #[error("globe viewer is already initialized")]
    AlreadyInitialized,

    #[error("globe viewer is bound to canvas `{bound}`, not `{requested}`")]
    CanvasMismatch { bound: String, requested: String },
}

impl GlobeError {
    /// Compile and link failures; both abort viewer setup
    pub fn is_shader_build_failure(&self) -> bool {
        matches!(
            self,
            GlobeError::ShaderCompile { .. } | GlobeError::ShaderLink(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GlobeError>;
