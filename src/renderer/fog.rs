use bytemuck::{Pod, Zeroable};

use crate::params::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FogMode {
    #[default]
    Linear,
    Exp,
    Exp2,
}

impl FogMode {
    fn tag(self) -> f32 {
        match self {
            FogMode::Linear => 0.0,
            FogMode::Exp => 1.0,
            FogMode::Exp2 => 2.0,
        }
    }
}

/// Scene fog. Whether it is applied is decided per pass by the pipeline
/// settings; this only describes its shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub mode: FogMode,
    pub color: Color,
    pub start: f32,
    pub end: f32,
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            mode: FogMode::Linear,
            color: Color::new(0.5, 0.5, 0.5, 1.0),
            start: 10.0,
            end: 100.0,
            density: 0.01,
        }
    }
}

impl Fog {
    pub fn linear(color: Color, start: f32, end: f32) -> Self {
        Self {
            mode: FogMode::Linear,
            color,
            start,
            end,
            ..Self::default()
        }
    }

    pub fn exponential(mode: FogMode, color: Color, density: f32) -> Self {
        Self {
            mode,
            color,
            density,
            ..Self::default()
        }
    }

    /// Fraction of the surface color kept at `distance` (1 = no fog).
    pub fn factor(&self, distance: f32) -> f32 {
        let f = match self.mode {
            FogMode::Linear => {
                let span = self.end - self.start;
                if span.abs() <= f32::EPSILON {
                    if distance < self.end { 1.0 } else { 0.0 }
                } else {
                    (self.end - distance) / span
                }
            }
            FogMode::Exp => (-self.density * distance).exp(),
            FogMode::Exp2 => (-(self.density * distance).powi(2)).exp(),
        };
        f.clamp(0.0, 1.0)
    }

    pub fn uniform(&self, enabled: bool) -> FogUniform {
        FogUniform {
            color: self.color.to_array(),
            params: [
                self.start,
                self.end,
                self.density,
                if enabled { self.mode.tag() } else { -1.0 },
            ],
        }
    }
}

/// GPU layout of [`Fog`]. `params.w` is the mode tag, or -1 when disabled.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FogUniform {
    pub color: [f32; 4],
    pub params: [f32; 4],
}
