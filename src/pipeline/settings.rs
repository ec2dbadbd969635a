// pipeline/settings.rs
/// Depth comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    Never,
    Less,
    #[default]
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
    NotEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    #[default]
    Fill,
    Wireframe,
    Point,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const COLOR = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

/// Fixed rendering behaviour of a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub depth_compare: CompareFunction,
    pub color_mask: ColorMask,
    pub draw_mode: DrawMode,
    pub polygon_offset: f32,
    pub fog: bool,
    pub lighting: bool,
    pub z_write: bool,
    pub normalize_normals: bool,
    pub smooth_shading: bool,
    pub backface_culling: bool,
    pub frontface_culling: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            depth_compare: CompareFunction::LessEqual,
            color_mask: ColorMask::all(),
            draw_mode: DrawMode::Fill,
            polygon_offset: 0.0,
            fog: false,
            lighting: true,
            z_write: true,
            normalize_normals: false,
            smooth_shading: true,
            backface_culling: true,
            frontface_culling: false,
        }
    }
}

impl PipelineSettings {
    /// Settings for screen-space overlays: no depth test or write, no lighting.
    pub fn overlay() -> Self {
        Self {
            depth_compare: CompareFunction::Always,
            z_write: false,
            lighting: false,
            backface_culling: false,
            ..Self::default()
        }
    }

    pub fn with_lighting(mut self, lighting: bool) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_fog(mut self, fog: bool) -> Self {
        self.fog = fog;
        self
    }

    pub fn with_polygon_offset(mut self, offset: f32) -> Self {
        self.polygon_offset = offset;
        self
    }

    pub fn with_draw_mode(mut self, mode: DrawMode) -> Self {
        self.draw_mode = mode;
        self
    }

    pub fn depth_test(&self) -> bool {
        self.depth_compare != CompareFunction::Always
    }

    /// Swaps front/back face culling, used when a draw submits clockwise
    /// geometry.
    pub fn flip_culling(&mut self) {
        std::mem::swap(&mut self.backface_culling, &mut self.frontface_culling);
    }
}
