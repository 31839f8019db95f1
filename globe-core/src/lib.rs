/// Globe Core Library - Platform-independent globe viewer logic
///
/// This library provides the sphere mesh generator, the model-view transform,
/// projection math, pointer interaction and viewer configuration shared by the
/// web and terminal front ends.

pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use config::{InteractionSettings, ViewerConfig};
pub use error::{GlobeError, ShaderStage};
pub use geometry::{Mesh, Triangle, Vertex};
pub use interaction::{InteractionController, PointerState};
pub use projection::Projection;
pub use transform::{ModelView, Transform};
