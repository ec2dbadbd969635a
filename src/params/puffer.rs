// params/puffer.rs
use std::marker::PhantomData;
use std::sync::Arc;

use super::package::{FieldDesc, ParamId, ParamPackage};
use super::types::ParamValue;
use crate::error::Result;

/// Instance data laid out by a [`ParamPackage`].
#[derive(Debug, Clone)]
pub struct PackagePuffer {
    package: Arc<ParamPackage>,
    data: Vec<u8>,
}

impl PackagePuffer {
    pub fn new(package: &Arc<ParamPackage>) -> Self {
        Self {
            package: Arc::clone(package),
            data: package.defaults().to_vec(),
        }
    }

    pub fn package(&self) -> &Arc<ParamPackage> {
        &self.package
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Rebinds the instance to `package`. A different schema resets every
    /// field to that schema's defaults; the same schema keeps current values.
    pub fn retype(&mut self, package: &Arc<ParamPackage>) {
        if Arc::ptr_eq(&self.package, package) {
            return;
        }
        self.package = Arc::clone(package);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.data.clear();
        self.data.extend_from_slice(self.package.defaults());
    }

    pub fn param<T: ParamValue>(&self, id: ParamId) -> Result<PackageParam<'_, T>> {
        let desc = self.package.typed_field::<T>(id)?;
        Ok(PackageParam {
            bytes: &self.data[desc.range()],
            desc,
            _marker: PhantomData,
        })
    }

    pub fn param_mut<T: ParamValue>(&mut self, id: ParamId) -> Result<PackageParamMut<'_, T>> {
        let desc = self.package.typed_field::<T>(id)?;
        Ok(PackageParamMut {
            bytes: &mut self.data[desc.range()],
            desc,
            _marker: PhantomData,
        })
    }

    pub fn param_by_name<T: ParamValue>(&self, name: &str) -> Result<PackageParam<'_, T>> {
        let id = self.package.lookup::<T>(name)?;
        self.param(id)
    }

    pub fn param_by_name_mut<T: ParamValue>(
        &mut self,
        name: &str,
    ) -> Result<PackageParamMut<'_, T>> {
        let id = self.package.lookup::<T>(name)?;
        self.param_mut(id)
    }

    pub fn get<T: ParamValue>(&self, id: ParamId) -> Result<T> {
        Ok(self.param::<T>(id)?.get())
    }

    pub fn set<T: ParamValue>(&mut self, id: ParamId, value: T) -> Result<()> {
        self.param_mut::<T>(id)?.set(value);
        Ok(())
    }

    /// Untyped view of a single field, as uploaded to a backend.
    pub fn field_bytes(&self, id: ParamId) -> Result<&[u8]> {
        let desc = self.package.field(id)?;
        Ok(&self.data[desc.range()])
    }
}

impl PartialEq for PackagePuffer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.package, &other.package) && self.data == other.data
    }
}

/// Read-only typed view of one field.
pub struct PackageParam<'a, T: ParamValue> {
    bytes: &'a [u8],
    desc: &'a FieldDesc,
    _marker: PhantomData<T>,
}

impl<'a, T: ParamValue> PackageParam<'a, T> {
    pub fn get(&self) -> T {
        bytemuck::pod_read_unaligned(self.bytes)
    }

    pub fn desc(&self) -> &'a FieldDesc {
        self.desc
    }

    pub fn name(&self) -> &'a str {
        &self.desc.name
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Writable typed view of one field.
pub struct PackageParamMut<'a, T: ParamValue> {
    bytes: &'a mut [u8],
    desc: &'a FieldDesc,
    _marker: PhantomData<T>,
}

impl<'a, T: ParamValue> PackageParamMut<'a, T> {
    pub fn get(&self) -> T {
        bytemuck::pod_read_unaligned(self.bytes)
    }

    pub fn set(&mut self, value: T) {
        self.bytes.copy_from_slice(bytemuck::bytes_of(&value));
    }

    pub fn update(&mut self, f: impl FnOnce(T) -> T) {
        let value = f(self.get());
        self.set(value);
    }

    pub fn desc(&self) -> &'a FieldDesc {
        self.desc
    }
}
