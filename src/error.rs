use thiserror::Error;

use crate::math::MatrixSlot;
use crate::params::ParamType;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("matrix slot {0:?} is derived and cannot be written directly")]
    DerivedMatrixSlot(MatrixSlot),

    #[error("unknown render transform id {0}")]
    UnknownTransform(u32),

    #[error("parameter '{name}' already declared as {existing:?}, cannot redeclare as {requested:?}")]
    ParamTypeConflict {
        name: String,
        existing: ParamType,
        requested: ParamType,
    },

    #[error("parameter '{name}' has type {found:?}, accessed as {expected:?}")]
    ParamTypeMismatch {
        name: String,
        expected: ParamType,
        found: ParamType,
    },

    #[error("parameter '{0}' not found")]
    ParamNotFound(String),

    #[error("parameter id {0} out of range")]
    ParamIdOutOfRange(usize),

    #[error("no {ty:?} parameter at index {index} (package has {count})")]
    ParamIndexOutOfRange {
        ty: ParamType,
        index: usize,
        count: usize,
    },

    #[error("pop on an empty pipeline overwrite stack")]
    OverwriteUnderflow,

    #[error("overwrite token is already bound to another stack")]
    TokenBoundToOtherStack,

    #[error("no shader factory registered under '{0}'")]
    UnknownShader(String),

    #[error("shader handle {0} is not part of the renderer's registry")]
    InvalidShaderHandle(usize),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
