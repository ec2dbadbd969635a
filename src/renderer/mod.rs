pub mod backend;
pub mod dirty;
pub mod draw;
pub mod fog;
pub mod lights;
pub mod pass;
pub mod renderer;
pub mod scope;
pub mod stats;

pub use backend::{BackendCall, RecordingBackend, RenderBackend};
pub use dirty::DirtyFlags;
pub use draw::{DrawRequest, GeometryBuffers, IndexFormat, PrimitiveType, Winding};
pub use fog::{Fog, FogMode, FogUniform};
pub use lights::{pack_lights, Light, LightKind};
pub use pass::Pass;
pub use renderer::{DrawOutcome, RenderMode, RenderTarget, RenderTransform, Renderer};
pub use scope::OverwriteScope;
pub use stats::RendererStats;
