// params/types.rs
use bytemuck::{Pod, Zeroable};

/// Semantic type tag stored with every package field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Byte,
    Int,
    UInt,
    Float,
    Double,
    Vec2,
    Vec3,
    Vec4,
    Matrix4,
    Color,
    Texture,
}

impl ParamType {
    pub const fn size(self) -> usize {
        match self {
            ParamType::Byte => 1,
            ParamType::Int | ParamType::UInt | ParamType::Float | ParamType::Texture => 4,
            ParamType::Double | ParamType::Vec2 => 8,
            ParamType::Vec3 => 12,
            ParamType::Vec4 | ParamType::Color => 16,
            ParamType::Matrix4 => 64,
        }
    }

    pub const fn align(self) -> usize {
        match self {
            ParamType::Byte => 1,
            ParamType::Double => std::mem::align_of::<f64>(),
            _ => 4,
        }
    }
}

/// A value that can live inside a parameter package.
///
/// Values are plain bytes (`Pod`), so moving a package buffer never needs
/// per-field copy or drop glue.
pub trait ParamValue: Pod {
    const TYPE: ParamType;
}

impl ParamValue for u8 {
    const TYPE: ParamType = ParamType::Byte;
}

impl ParamValue for i32 {
    const TYPE: ParamType = ParamType::Int;
}

impl ParamValue for u32 {
    const TYPE: ParamType = ParamType::UInt;
}

impl ParamValue for f32 {
    const TYPE: ParamType = ParamType::Float;
}

impl ParamValue for f64 {
    const TYPE: ParamType = ParamType::Double;
}

impl ParamValue for [f32; 2] {
    const TYPE: ParamType = ParamType::Vec2;
}

impl ParamValue for [f32; 3] {
    const TYPE: ParamType = ParamType::Vec3;
}

impl ParamValue for [f32; 4] {
    const TYPE: ParamType = ParamType::Vec4;
}

impl ParamValue for [[f32; 4]; 4] {
    const TYPE: ParamType = ParamType::Matrix4;
}

impl ParamValue for Color {
    const TYPE: ParamType = ParamType::Color;
}

impl ParamValue for TextureSlot {
    const TYPE: ParamType = ParamType::Texture;
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Texture id referenced from a package field. `0` means "no texture".
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct TextureSlot(pub u32);

impl TextureSlot {
    pub const EMPTY: TextureSlot = TextureSlot(0);

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}
