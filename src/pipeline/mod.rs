pub mod overwrite;
pub mod settings;
pub mod stack;
pub mod wgpu_state;

pub use overwrite::{OverwriteFlags, PipelineOverwrite};
pub use settings::{ColorMask, CompareFunction, DrawMode, PipelineSettings};
pub use stack::{OverwriteStack, OverwriteToken, StackId, StackScope};
