pub mod matrix_table;

pub use matrix_table::{MatrixSlot, MatrixSlots, MatrixTable};

use glam::{Affine3A, Mat4, Vec3};

/// Inverse of an affine transform (rotation, scale, translation).
///
/// Cheaper than a general 4x4 inverse; the projective row is assumed to be
/// `(0, 0, 0, 1)` and is ignored.
pub fn transform_inverse(m: Mat4) -> Mat4 {
    Mat4::from(Affine3A::from_mat4(m).inverse())
}

/// Clip-space depth translation applied in front of a projection so that a
/// positive `offset` pulls geometry toward the viewer by `offset` depth-buffer
/// steps.
pub fn polygon_offset_matrix(offset: f32, depth_bits: u8) -> Mat4 {
    if offset == 0.0 {
        return Mat4::IDENTITY;
    }
    let step = 1.0 / (1u64 << depth_bits.min(32)) as f32;
    Mat4::from_translation(Vec3::new(0.0, 0.0, -offset * step))
}

/// Pixel-space orthographic projection: origin top-left, +Y down.
pub fn ortho_pixel_projection(width: u32, height: u32) -> Mat4 {
    Mat4::orthographic_rh(
        0.0,
        width.max(1) as f32,
        height.max(1) as f32,
        0.0,
        -1.0,
        1.0,
    )
}
