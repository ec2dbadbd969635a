pub mod program;
pub mod registry;

pub use program::{uniforms, ShaderKind, ShaderParamId, ShaderProgram};
pub use registry::{ShaderFactory, ShaderRegistry};
