// params/package.rs
use std::ops::Range;
use std::sync::Arc;

use super::types::{ParamType, ParamValue};
use super::PackagePuffer;
use crate::error::{RenderError, Result};
use crate::shader::ShaderParamId;

/// Index of a field inside a [`ParamPackage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    pub name: String,
    pub ty: ParamType,
    pub offset: usize,
    pub size: usize,
    /// Backend-specific linkage, typically the uniform slot the field feeds.
    pub link: Option<ShaderParamId>,
}

impl FieldDesc {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }

    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Schema under construction. Call [`build`](Self::build) to freeze it.
#[derive(Debug, Clone)]
pub struct ParamPackageBuilder {
    name: String,
    fields: Vec<FieldDesc>,
    defaults: Vec<u8>,
}

impl ParamPackageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            defaults: Vec::new(),
        }
    }

    /// Declares a field with a default value.
    ///
    /// Redeclaring an existing name with the same type returns the existing id
    /// and keeps the first default; a different type is a conflict.
    pub fn add_param<T: ParamValue>(&mut self, name: &str, default: T) -> Result<ParamId> {
        self.add_raw(name, T::TYPE, bytemuck::bytes_of(&default))
    }

    /// Declares a field whose default is all zero bytes.
    pub fn add_param_of_type(&mut self, name: &str, ty: ParamType) -> Result<ParamId> {
        let zeros = vec![0u8; ty.size()];
        self.add_raw(name, ty, &zeros)
    }

    fn add_raw(&mut self, name: &str, ty: ParamType, default: &[u8]) -> Result<ParamId> {
        debug_assert_eq!(default.len(), ty.size());

        if let Some(index) = self.fields.iter().position(|f| f.name == name) {
            let existing = self.fields[index].ty;
            if existing == ty {
                return Ok(ParamId(index));
            }
            return Err(RenderError::ParamTypeConflict {
                name: name.to_string(),
                existing,
                requested: ty,
            });
        }

        let offset = align_up(self.size(), ty.align());
        let field = FieldDesc {
            name: name.to_string(),
            ty,
            offset,
            size: ty.size(),
            link: None,
        };

        let mut defaults = vec![0u8; field.end()];
        for existing in &self.fields {
            defaults[existing.range()].copy_from_slice(&self.defaults[existing.range()]);
        }
        defaults[field.range()].copy_from_slice(default);

        log::debug!(
            "Package '{}': added '{}' ({:?}) at offset {}",
            self.name,
            name,
            ty,
            offset
        );

        self.defaults = defaults;
        self.fields.push(field);
        Ok(ParamId(self.fields.len() - 1))
    }

    pub fn set_link(&mut self, id: ParamId, link: ShaderParamId) -> Result<()> {
        let field = self
            .fields
            .get_mut(id.0)
            .ok_or(RenderError::ParamIdOutOfRange(id.0))?;
        field.link = Some(link);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn size(&self) -> usize {
        self.fields.last().map_or(0, FieldDesc::end)
    }

    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    pub fn build(self) -> Arc<ParamPackage> {
        let size = self.size();
        Arc::new(ParamPackage {
            name: self.name,
            fields: self.fields,
            defaults: self.defaults,
            size,
        })
    }
}

/// Frozen parameter schema shared by every instance built from it.
#[derive(Debug, PartialEq)]
pub struct ParamPackage {
    name: String,
    fields: Vec<FieldDesc>,
    defaults: Vec<u8>,
    size: usize,
}

impl ParamPackage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    pub fn defaults(&self) -> &[u8] {
        &self.defaults
    }

    pub fn field(&self, id: ParamId) -> Result<&FieldDesc> {
        self.fields
            .get(id.0)
            .ok_or(RenderError::ParamIdOutOfRange(id.0))
    }

    pub fn find(&self, name: &str) -> Option<ParamId> {
        self.fields.iter().position(|f| f.name == name).map(ParamId)
    }

    /// Resolves `name` and checks that it holds a `T`.
    pub fn lookup<T: ParamValue>(&self, name: &str) -> Result<ParamId> {
        let id = self
            .find(name)
            .ok_or_else(|| RenderError::ParamNotFound(name.to_string()))?;
        self.typed_field::<T>(id)?;
        Ok(id)
    }

    pub(crate) fn typed_field<T: ParamValue>(&self, id: ParamId) -> Result<&FieldDesc> {
        let field = self.field(id)?;
        if field.ty != T::TYPE {
            return Err(RenderError::ParamTypeMismatch {
                name: field.name.clone(),
                expected: T::TYPE,
                found: field.ty,
            });
        }
        Ok(field)
    }

    pub fn count_of_type(&self, ty: ParamType) -> usize {
        self.fields.iter().filter(|f| f.ty == ty).count()
    }

    /// Fields of type `ty` in declaration (and therefore offset) order.
    pub fn params_of_type(&self, ty: ParamType) -> impl Iterator<Item = ParamId> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.ty == ty)
            .map(|(i, _)| ParamId(i))
    }

    pub fn nth_of_type(&self, ty: ParamType, n: usize) -> Result<ParamId> {
        self.params_of_type(ty)
            .nth(n)
            .ok_or(RenderError::ParamIndexOutOfRange {
                ty,
                index: n,
                count: self.count_of_type(ty),
            })
    }

    pub fn create_package(self: &Arc<Self>) -> PackagePuffer {
        PackagePuffer::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Color, TextureSlot};

    #[test]
    fn redeclaring_same_type_is_idempotent() {
        let mut builder = ParamPackageBuilder::new("test");
        let a = builder.add_param("x", 1.0f32).unwrap();
        builder.add_param("y", [0.0f32; 4]).unwrap();
        let size = builder.size();

        let again = builder.add_param("x", 7.0f32).unwrap();
        assert_eq!(a, again);
        assert_eq!(builder.size(), size);
        assert_eq!(builder.len(), 2);

        let package = builder.build();
        let puffer = package.create_package();
        assert_eq!(puffer.get::<f32>(a).unwrap(), 1.0);
    }

    #[test]
    fn redeclaring_with_other_type_conflicts() {
        let mut builder = ParamPackageBuilder::new("test");
        builder.add_param("color", [1.0f32; 4]).unwrap();
        let err = builder.add_param("color", 0.5f32).unwrap_err();
        assert_eq!(
            err,
            RenderError::ParamTypeConflict {
                name: "color".into(),
                existing: ParamType::Vec4,
                requested: ParamType::Float,
            }
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn offsets_respect_alignment_and_never_overlap() {
        let mut builder = ParamPackageBuilder::new("layout");
        builder.add_param("flag", 1u8).unwrap();
        builder.add_param("scale", 2.0f64).unwrap();
        builder.add_param("tint", 3u8).unwrap();
        builder.add_param("pos", [0.0f32; 3]).unwrap();
        builder.add_param("mode", 4i32).unwrap();
        builder.add_param("tex", TextureSlot(9)).unwrap();
        let package = builder.build();

        let fields = package.fields();
        for field in fields {
            assert_eq!(field.offset % field.ty.align(), 0, "{}", field.name);
        }
        for pair in fields.windows(2) {
            assert!(pair[0].end() <= pair[1].offset);
        }
        assert_eq!(fields[1].offset, std::mem::align_of::<f64>());
        let last = fields.last().unwrap();
        assert_eq!(package.size(), last.offset + last.size);
        assert_eq!(package.defaults().len(), package.size());
    }

    #[test]
    fn defaults_survive_buffer_growth() {
        let mut builder = ParamPackageBuilder::new("defaults");
        let a = builder.add_param("a", 0x11u8).unwrap();
        let b = builder.add_param("b", Color::new(0.1, 0.2, 0.3, 0.4)).unwrap();
        let c = builder.add_param("c", -5i32).unwrap();
        let d = builder.add_param_of_type("d", ParamType::Matrix4).unwrap();
        let package = builder.build();

        let puffer = package.create_package();
        assert_eq!(puffer.get::<u8>(a).unwrap(), 0x11);
        assert_eq!(
            puffer.get::<Color>(b).unwrap(),
            Color::new(0.1, 0.2, 0.3, 0.4)
        );
        assert_eq!(puffer.get::<i32>(c).unwrap(), -5);
        assert_eq!(puffer.get::<[[f32; 4]; 4]>(d).unwrap(), [[0.0; 4]; 4]);
    }

    #[test]
    fn nth_of_type_walks_declaration_order() {
        let mut builder = ParamPackageBuilder::new("textures");
        let t0 = builder.add_param("albedo", TextureSlot(1)).unwrap();
        builder.add_param("gloss", 0.5f32).unwrap();
        let t1 = builder.add_param("normal", TextureSlot(2)).unwrap();
        let package = builder.build();

        assert_eq!(package.count_of_type(ParamType::Texture), 2);
        assert_eq!(package.nth_of_type(ParamType::Texture, 0).unwrap(), t0);
        assert_eq!(package.nth_of_type(ParamType::Texture, 1).unwrap(), t1);
        assert!(matches!(
            package.nth_of_type(ParamType::Texture, 2),
            Err(RenderError::ParamIndexOutOfRange { count: 2, .. })
        ));
    }

    #[test]
    fn lookup_checks_name_and_type() {
        let mut builder = ParamPackageBuilder::new("lookup");
        builder.add_param("shininess", 8.0f32).unwrap();
        let package = builder.build();

        assert!(package.lookup::<f32>("shininess").is_ok());
        assert!(matches!(
            package.lookup::<u32>("shininess"),
            Err(RenderError::ParamTypeMismatch { .. })
        ));
        assert_eq!(
            package.lookup::<f32>("missing"),
            Err(RenderError::ParamNotFound("missing".into()))
        );
    }

    #[test]
    fn links_are_recorded_per_field() {
        let mut builder = ParamPackageBuilder::new("links");
        let id = builder.add_param("tint", Color::WHITE).unwrap();
        builder.set_link(id, ShaderParamId(3)).unwrap();
        assert!(builder.set_link(ParamId(5), ShaderParamId(1)).is_err());
        let package = builder.build();
        assert_eq!(package.field(id).unwrap().link, Some(ShaderParamId(3)));
    }
}
