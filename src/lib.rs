//! Render-state caching core: a dependency-tracked matrix table, typed
//! parameter packages, a stack of pipeline overwrites and a renderer that
//! forwards only changed state to a pluggable backend.

pub mod asset;
pub mod error;
pub mod math;
pub mod params;
pub mod pipeline;
pub mod renderer;
pub mod settings;
pub mod shader;

pub use error::{RenderError, Result};
pub use math::{MatrixSlot, MatrixTable};
pub use params::{PackagePuffer, ParamPackage, ParamPackageBuilder};
pub use pipeline::{OverwriteStack, PipelineOverwrite, PipelineSettings};
pub use renderer::{RenderBackend, Renderer};
pub use settings::RendererSettings;
pub use shader::{ShaderProgram, ShaderRegistry};

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
