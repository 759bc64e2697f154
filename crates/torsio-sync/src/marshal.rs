//! Conversions between host-side math types and the flat arrays crossing the
//! engine boundary.
//!
//! Wire layout:
//! - 4×4 matrix: 16 `f32`, row-major, `flat[row * 4 + col] == m[row][col]`
//! - 3-vector: `[x, y, z]` narrowed to `f32`
//!
//! glam stores matrices column-major, so flattening goes through a transpose.

use glam::{DVec3, Mat4};

/// Flattens `m` row-major.
#[inline]
pub fn flatten_row_major(m: &Mat4) -> [f32; 16] {
    m.transpose().to_cols_array()
}

/// Inverse of [`flatten_row_major`], for engine implementations.
#[inline]
pub fn unflatten_row_major(flat: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(flat).transpose()
}

/// Narrows a double-precision vector to the boundary's `f32` triple.
#[inline]
pub fn narrow_vec3(v: DVec3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}
