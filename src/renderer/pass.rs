use crate::asset::Handle;
use crate::error::Result;
use crate::params::{PackagePuffer, ParamType, TextureSlot};
use crate::pipeline::PipelineSettings;
use crate::shader::ShaderProgram;

/// A complete description of how to draw: settings, shader, bound textures
/// and the parameter values handed to the shader.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub settings: PipelineSettings,
    pub shader: Handle<ShaderProgram>,
    pub textures: Vec<TextureSlot>,
    pub params: Option<PackagePuffer>,
}

impl Pass {
    pub fn new(shader: Handle<ShaderProgram>) -> Self {
        Self {
            settings: PipelineSettings::default(),
            shader,
            textures: Vec::new(),
            params: None,
        }
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_params(mut self, params: PackagePuffer) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_texture(mut self, layer: usize, texture: TextureSlot) -> Self {
        self.set_texture(layer, texture);
        self
    }

    pub fn set_texture(&mut self, layer: usize, texture: TextureSlot) {
        if self.textures.len() <= layer {
            self.textures.resize(layer + 1, TextureSlot::EMPTY);
        }
        self.textures[layer] = texture;
    }

    /// Texture bound to `layer`, or [`TextureSlot::EMPTY`].
    pub fn texture(&self, layer: usize) -> TextureSlot {
        self.textures.get(layer).copied().unwrap_or(TextureSlot::EMPTY)
    }

    /// Rebinds texture layers from the `Texture` fields of the parameter
    /// package, in declaration order. Returns the number of layers bound.
    pub fn bind_textures_from_params(&mut self) -> Result<usize> {
        let Some(params) = &self.params else {
            return Ok(0);
        };
        let package = params.package();
        let count = package.count_of_type(ParamType::Texture);

        let mut textures = Vec::with_capacity(count);
        for n in 0..count {
            let id = package.nth_of_type(ParamType::Texture, n)?;
            textures.push(params.get::<TextureSlot>(id)?);
        }
        self.textures = textures;
        Ok(count)
    }
}
