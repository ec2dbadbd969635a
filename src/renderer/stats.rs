/// Counters collected between two [`take_stats`](super::Renderer::take_stats) calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RendererStats {
    pub draw_calls: u32,
    pub primitives: u64,
    pub skipped_draws: u32,
    pub failed_draws: u32,
    pub pass_changes: u32,
    pub shader_switches: u32,
    pub texture_binds: u32,
    pub transform_uploads: u32,
    pub light_uploads: u32,
    pub fog_uploads: u32,
    pub shader_param_uploads: u32,
}

impl RendererStats {
    /// Every state-changing backend call, excluding draws.
    pub fn total_state_changes(&self) -> u32 {
        self.pass_changes
            + self.texture_binds
            + self.transform_uploads
            + self.light_uploads
            + self.fog_uploads
            + self.shader_param_uploads
    }

    pub fn total_draw_attempts(&self) -> u32 {
        self.draw_calls + self.skipped_draws + self.failed_draws
    }
}
