//! Type-erased parameter packages.
//!
//! A [`ParamPackage`] is a frozen schema of named, typed fields with computed
//! byte offsets. A [`PackagePuffer`] is one instance of that layout: a byte
//! buffer initialised from the schema defaults with typed, bounds-checked
//! accessors.

pub mod package;
pub mod puffer;
pub mod types;

pub use package::{FieldDesc, ParamId, ParamPackage, ParamPackageBuilder};
pub use puffer::{PackageParam, PackageParamMut, PackagePuffer};
pub use types::{Color, ParamType, ParamValue, TextureSlot};

use std::sync::Arc;

use crate::error::Result;

pub const STANDARD_TEXTURE_LAYERS: usize = 4;

/// Schema used by passes rendered with the fixed-function shader.
pub fn standard_material() -> Result<Arc<ParamPackage>> {
    let mut builder = ParamPackageBuilder::new("StandardMaterial");
    builder.add_param("DiffuseColor", Color::WHITE)?;
    builder.add_param("AmbientColor", Color::new(0.2, 0.2, 0.2, 1.0))?;
    builder.add_param("SpecularColor", Color::BLACK)?;
    builder.add_param("Shininess", 0.0f32)?;
    for layer in 0..STANDARD_TEXTURE_LAYERS {
        builder.add_param(&format!("Texture{layer}"), TextureSlot::EMPTY)?;
    }
    Ok(builder.build())
}
