// shader/registry.rs
use std::collections::HashMap;

use super::program::{uniforms, ShaderProgram};
use crate::asset::{AssetCache, Handle};
use crate::error::{RenderError, Result};
use crate::math::MatrixSlot;

pub type ShaderFactory = Box<dyn Fn() -> ShaderProgram>;

pub const SOLID: &str = "solid";
pub const TRANSPARENT_ALPHA: &str = "transparent_alpha";
pub const UNLIT_UNIFORM: &str = "unlit_uniform";
pub const LIT_UNIFORM: &str = "lit_uniform";

/// Named shader factories plus the programs instantiated from them.
///
/// Populated explicitly during start-up; instantiating the same name twice
/// returns the same handle.
#[derive(Default)]
pub struct ShaderRegistry {
    factories: HashMap<String, ShaderFactory>,
    programs: AssetCache<ShaderProgram>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in fixed-function and uniform shaders.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(SOLID, || ShaderProgram::fixed_function(SOLID));
        registry.register(TRANSPARENT_ALPHA, || {
            ShaderProgram::fixed_function(TRANSPARENT_ALPHA)
        });
        registry.register(UNLIT_UNIFORM, || {
            ShaderProgram::programmable(
                UNLIT_UNIFORM,
                [
                    uniforms::matrix(MatrixSlot::WorldViewProjection),
                    "DiffuseColor",
                    "Texture0",
                    uniforms::FOG,
                ],
            )
        });
        registry.register(LIT_UNIFORM, || {
            ShaderProgram::programmable(
                LIT_UNIFORM,
                [
                    uniforms::matrix(MatrixSlot::World),
                    uniforms::matrix(MatrixSlot::ViewProjection),
                    uniforms::matrix(MatrixSlot::WorldViewProjection),
                    uniforms::matrix(MatrixSlot::WorldInverseTranspose),
                    uniforms::matrix(MatrixSlot::ViewInverse),
                    uniforms::LIGHTS,
                    uniforms::LIGHT_COUNT,
                    uniforms::FOG,
                    "DiffuseColor",
                    "Shininess",
                ],
            )
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: impl Fn() -> ShaderProgram + 'static) {
        if self
            .factories
            .insert(name.to_string(), Box::new(factory))
            .is_some()
        {
            log::debug!("Shader factory '{}' replaced", name);
        } else {
            log::debug!("Shader factory '{}' registered", name);
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn instantiate(&mut self, name: &str) -> Result<Handle<ShaderProgram>> {
        if let Some(handle) = self.programs.find(name) {
            return Ok(handle);
        }
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RenderError::UnknownShader(name.to_string()))?;
        let handle = self.programs.insert_named(name, factory());
        log::debug!("Shader '{}' instantiated as {:?}", name, handle);
        Ok(handle)
    }

    /// Adds a program that does not come from a factory.
    pub fn add(&mut self, program: ShaderProgram) -> Handle<ShaderProgram> {
        let name = program.name().to_string();
        self.programs.insert_named(&name, program)
    }

    pub fn find(&self, name: &str) -> Option<Handle<ShaderProgram>> {
        self.programs.find(name)
    }

    pub fn get(&self, handle: Handle<ShaderProgram>) -> Option<&ShaderProgram> {
        self.programs.get(handle)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderKind;

    #[test]
    fn builtins_instantiate_once() {
        let mut registry = ShaderRegistry::with_builtin();
        let a = registry.instantiate(SOLID).unwrap();
        let b = registry.instantiate(SOLID).unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(a).unwrap().kind(), ShaderKind::FixedFunction);

        let lit = registry.instantiate(LIT_UNIFORM).unwrap();
        assert_ne!(a, lit);
        assert!(registry.get(lit).unwrap().consumes_matrices_as_uniforms());
        assert_eq!(registry.find(LIT_UNIFORM), Some(lit));
    }

    #[test]
    fn unknown_names_fail() {
        let mut registry = ShaderRegistry::new();
        assert_eq!(
            registry.instantiate("missing"),
            Err(RenderError::UnknownShader("missing".into()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn registration_is_explicit() {
        let mut registry = ShaderRegistry::new();
        assert!(!registry.is_registered("toon"));
        registry.register("toon", || ShaderProgram::programmable("toon", ["World"]));
        assert!(registry.is_registered("toon"));
        let handle = registry.instantiate("toon").unwrap();
        assert_eq!(registry.get(handle).unwrap().name(), "toon");
    }
}
