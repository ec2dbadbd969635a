bitflags::bitflags! {
    /// State categories that changed since the last successful setup.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u16 {
        const PASS = 1 << 0;
        const OVERWRITES = 1 << 1;
        const WORLD = 1 << 2;
        const VIEW_PROJECTION = 1 << 3;
        const LIGHTS = 1 << 4;
        const FOG = 1 << 5;
        const RENDER_TARGET = 1 << 6;
        const RENDER_MODE = 1 << 7;
        const POLYGON_OFFSET = 1 << 8;
    }
}

impl DirtyFlags {
    /// Changes that force the view and projection to be rebuilt in any mode.
    pub const VIEW_INPUTS: Self = Self::VIEW_PROJECTION
        .union(Self::RENDER_MODE)
        .union(Self::POLYGON_OFFSET);

    /// Changes that force the view and projection to be rebuilt. The render
    /// target only feeds the pixel projection used in 2D.
    pub fn view_inputs(mode_2d: bool) -> Self {
        if mode_2d {
            Self::VIEW_INPUTS | Self::RENDER_TARGET
        } else {
            Self::VIEW_INPUTS
        }
    }
}
