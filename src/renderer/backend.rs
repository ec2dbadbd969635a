//! Seam between the state cache and whatever actually talks to the GPU.

use glam::Mat4;

use super::draw::{DrawRequest, PrimitiveType};
use super::fog::Fog;
use super::lights::Light;
use super::pass::Pass;
use crate::error::{RenderError, Result};
use crate::math::MatrixSlot;
use crate::params::TextureSlot;
use crate::pipeline::PipelineSettings;
use crate::shader::{ShaderParamId, ShaderProgram};

/// Device adapter driven by the renderer. Every call is issued only after
/// the renderer decided the corresponding state actually changed.
pub trait RenderBackend {
    /// Makes `shader` current with the effective `settings`.
    fn enable_pass(&mut self, settings: &PipelineSettings, shader: &ShaderProgram, pass: &Pass);

    fn enable_texture_layer(&mut self, layer: usize, texture: TextureSlot);

    /// Fixed-function transform upload. Only `World`, `View` and `Projection`
    /// are ever passed.
    fn set_transform(&mut self, slot: MatrixSlot, matrix: &Mat4);

    /// `None` disables the light slot.
    fn set_light(&mut self, index: usize, light: Option<&Light>);

    fn set_fog(&mut self, fog: &Fog, enabled: bool);

    fn set_shader_parameter(&mut self, id: ShaderParamId, bytes: &[u8]);

    fn draw(&mut self, request: &DrawRequest) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    EnablePass {
        shader: String,
        settings: PipelineSettings,
    },
    TextureLayer {
        layer: usize,
        texture: TextureSlot,
    },
    Transform {
        slot: MatrixSlot,
        matrix: Mat4,
    },
    Light {
        index: usize,
        light: Option<Light>,
    },
    Fog {
        fog: Fog,
        enabled: bool,
    },
    ShaderParameter {
        id: ShaderParamId,
        bytes: Vec<u8>,
    },
    Draw {
        primitive: PrimitiveType,
        primitive_count: u32,
        change_id: u64,
    },
}

/// Backend that records every call instead of touching a device. Used by
/// the headless demo and by tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    fail_draws: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `draw` fail (the call is still recorded).
    pub fn set_fail_draws(&mut self, fail: bool) {
        self.fail_draws = fail;
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn transforms(&self) -> impl Iterator<Item = (MatrixSlot, Mat4)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Transform { slot, matrix } => Some((*slot, *matrix)),
            _ => None,
        })
    }

    /// Most recent matrix uploaded to `slot`.
    pub fn last_transform(&self, slot: MatrixSlot) -> Option<Mat4> {
        self.transforms()
            .filter(|(s, _)| *s == slot)
            .map(|(_, matrix)| matrix)
            .last()
    }

    pub fn last_pass(&self) -> Option<&PipelineSettings> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::EnablePass { settings, .. } => Some(settings),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn enable_pass(&mut self, settings: &PipelineSettings, shader: &ShaderProgram, _pass: &Pass) {
        self.calls.push(BackendCall::EnablePass {
            shader: shader.name().to_string(),
            settings: *settings,
        });
    }

    fn enable_texture_layer(&mut self, layer: usize, texture: TextureSlot) {
        self.calls.push(BackendCall::TextureLayer { layer, texture });
    }

    fn set_transform(&mut self, slot: MatrixSlot, matrix: &Mat4) {
        self.calls.push(BackendCall::Transform {
            slot,
            matrix: *matrix,
        });
    }

    fn set_light(&mut self, index: usize, light: Option<&Light>) {
        self.calls.push(BackendCall::Light {
            index,
            light: light.copied(),
        });
    }

    fn set_fog(&mut self, fog: &Fog, enabled: bool) {
        self.calls.push(BackendCall::Fog { fog: *fog, enabled });
    }

    fn set_shader_parameter(&mut self, id: ShaderParamId, bytes: &[u8]) {
        self.calls.push(BackendCall::ShaderParameter {
            id,
            bytes: bytes.to_vec(),
        });
    }

    fn draw(&mut self, request: &DrawRequest) -> Result<()> {
        self.calls.push(BackendCall::Draw {
            primitive: request.primitive,
            primitive_count: request.primitive_count,
            change_id: request.geometry.change_id(),
        });
        if self.fail_draws {
            return Err(RenderError::Backend("recorded draw rejected".into()));
        }
        Ok(())
    }
}
