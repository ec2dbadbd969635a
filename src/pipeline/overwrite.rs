// pipeline/overwrite.rs
use super::settings::{CompareFunction, DrawMode, PipelineSettings};

bitflags::bitflags! {
    /// Forced changes carried by a [`PipelineOverwrite`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OverwriteFlags: u16 {
        const DISABLE_LIGHTING = 1 << 0;
        const DISABLE_FOG = 1 << 1;
        const FORCE_DRAW_MODE = 1 << 2;
        const DISABLE_ZWRITE = 1 << 3;
        const DISABLE_ZCMP = 1 << 4;
        const NORMALIZE_NORMALS = 1 << 5;
        const DISABLE_BACKFACE_CULL = 1 << 6;
        const ENABLE_FRONTFACE_CULL = 1 << 7;
    }
}

/// A delta applied on top of [`PipelineSettings`].
///
/// Flags force a value, `polygon_offset_add` accumulates. The default value is
/// the identity overwrite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOverwrite {
    pub flags: OverwriteFlags,
    pub draw_mode: DrawMode,
    pub polygon_offset_add: f32,
}

impl Default for PipelineOverwrite {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PipelineOverwrite {
    pub const IDENTITY: PipelineOverwrite = PipelineOverwrite {
        flags: OverwriteFlags::empty(),
        draw_mode: DrawMode::Fill,
        polygon_offset_add: 0.0,
    };

    pub fn from_flags(flags: OverwriteFlags) -> Self {
        Self {
            flags,
            ..Self::IDENTITY
        }
    }

    pub fn disable_lighting() -> Self {
        Self::from_flags(OverwriteFlags::DISABLE_LIGHTING)
    }

    pub fn disable_fog() -> Self {
        Self::from_flags(OverwriteFlags::DISABLE_FOG)
    }

    pub fn force_draw_mode(mode: DrawMode) -> Self {
        Self {
            flags: OverwriteFlags::FORCE_DRAW_MODE,
            draw_mode: mode,
            polygon_offset_add: 0.0,
        }
    }

    pub fn add_polygon_offset(offset: f32) -> Self {
        Self {
            polygon_offset_add: offset,
            ..Self::IDENTITY
        }
    }

    pub fn is_identity(&self) -> bool {
        self.flags.is_empty() && self.polygon_offset_add == 0.0
    }

    /// Returns `settings` with this delta applied. Pure.
    pub fn apply(&self, settings: &PipelineSettings) -> PipelineSettings {
        let mut out = *settings;
        out.polygon_offset += self.polygon_offset_add;

        if self.flags.contains(OverwriteFlags::DISABLE_LIGHTING) {
            out.lighting = false;
        }
        if self.flags.contains(OverwriteFlags::DISABLE_FOG) {
            out.fog = false;
        }
        if self.flags.contains(OverwriteFlags::FORCE_DRAW_MODE) {
            out.draw_mode = self.draw_mode;
        }
        if self.flags.contains(OverwriteFlags::DISABLE_ZWRITE) {
            out.z_write = false;
        }
        if self.flags.contains(OverwriteFlags::DISABLE_ZCMP) {
            out.depth_compare = CompareFunction::Always;
        }
        if self.flags.contains(OverwriteFlags::NORMALIZE_NORMALS) {
            out.normalize_normals = true;
        }
        if self.flags.contains(OverwriteFlags::DISABLE_BACKFACE_CULL) {
            out.backface_culling = false;
        }
        if self.flags.contains(OverwriteFlags::ENABLE_FRONTFACE_CULL) {
            out.frontface_culling = true;
        }
        out
    }

    /// The single overwrite equivalent to applying `self` and then `next`.
    pub fn then(&self, next: &PipelineOverwrite) -> PipelineOverwrite {
        let draw_mode = if next.flags.contains(OverwriteFlags::FORCE_DRAW_MODE) {
            next.draw_mode
        } else {
            self.draw_mode
        };
        PipelineOverwrite {
            flags: self.flags | next.flags,
            draw_mode,
            polygon_offset_add: self.polygon_offset_add + next.polygon_offset_add,
        }
    }
}
