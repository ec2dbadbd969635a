// shader/program.rs
use crate::math::MatrixSlot;
use crate::params::PackagePuffer;
use crate::renderer::RenderBackend;

/// Uniform slot of a programmable shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderParamId(pub u32);

/// How a shader receives transforms, lights and fog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Consumes state through direct backend calls (`set_transform`, `set_light`, ...).
    FixedFunction,
    /// Consumes state as named uniform parameters.
    Programmable,
}

impl ShaderKind {
    pub fn consumes_matrices_as_uniforms(self) -> bool {
        matches!(self, ShaderKind::Programmable)
    }
}

/// Well-known uniform names the renderer fills for programmable shaders.
pub mod uniforms {
    use crate::math::MatrixSlot;

    pub const LIGHTS: &str = "Lights";
    pub const LIGHT_COUNT: &str = "LightCount";
    pub const FOG: &str = "Fog";

    pub const fn matrix(slot: MatrixSlot) -> &'static str {
        match slot {
            MatrixSlot::World => "World",
            MatrixSlot::View => "View",
            MatrixSlot::Projection => "Projection",
            MatrixSlot::WorldInverse => "WorldInverse",
            MatrixSlot::ViewInverse => "ViewInverse",
            MatrixSlot::WorldView => "WorldView",
            MatrixSlot::WorldProjection => "WorldProjection",
            MatrixSlot::ViewProjection => "ViewProjection",
            MatrixSlot::WorldViewProjection => "WorldViewProjection",
            MatrixSlot::WorldViewInverse => "WorldViewInverse",
            MatrixSlot::WorldTranspose => "WorldTranspose",
            MatrixSlot::ViewTranspose => "ViewTranspose",
            MatrixSlot::WorldInverseTranspose => "WorldInverseTranspose",
            MatrixSlot::ViewInverseTranspose => "ViewInverseTranspose",
            MatrixSlot::WorldViewTranspose => "WorldViewTranspose",
            MatrixSlot::WorldViewInverseTranspose => "WorldViewInverseTranspose",
        }
    }
}

/// Description of a compiled shader: its kind and the uniform slots it exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    name: String,
    kind: ShaderKind,
    params: Vec<String>,
}

impl ShaderProgram {
    pub fn fixed_function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ShaderKind::FixedFunction,
            params: Vec::new(),
        }
    }

    pub fn programmable<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        params.into_iter().fold(
            Self {
                name: name.into(),
                kind: ShaderKind::Programmable,
                params: Vec::new(),
            },
            |program, param| program.with_param(param),
        )
    }

    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.params.contains(&name) {
            self.params.push(name);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn consumes_matrices_as_uniforms(&self) -> bool {
        self.kind.consumes_matrices_as_uniforms()
    }

    pub fn param_id(&self, name: &str) -> Option<ShaderParamId> {
        self.params
            .iter()
            .position(|p| p == name)
            .map(|i| ShaderParamId(i as u32))
    }

    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    pub fn matrix_param(&self, slot: MatrixSlot) -> Option<ShaderParamId> {
        self.param_id(uniforms::matrix(slot))
    }

    /// Uploads the pass parameters this shader knows about. Fields carrying an
    /// explicit link use it; others are matched by name. Returns the number of
    /// uploads issued.
    pub fn load_scene_params(&self, params: &PackagePuffer, backend: &mut dyn RenderBackend) -> usize {
        if !self.consumes_matrices_as_uniforms() {
            return 0;
        }

        let mut uploaded = 0;
        for field in params.package().fields() {
            let Some(id) = field.link.or_else(|| self.param_id(&field.name)) else {
                continue;
            };
            backend.set_shader_parameter(id, &params.as_bytes()[field.range()]);
            uploaded += 1;
        }
        uploaded
    }
}
