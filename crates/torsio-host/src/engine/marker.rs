use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};

use super::needle::Needle;

/// Needle length in NDC at rest.
const BASE_LENGTH: f32 = 0.12;
/// Extra length per g of in-plane acceleration.
const LENGTH_PER_G: f32 = 0.18;
const GRAVITY: f32 = 9.81;

/// GPU-side marker parameters (WGSL `Marker`).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MarkerUniform {
    /// Column-major, as WGSL expects.
    pub view_proj: [[f32; 4]; 4],
    pub direction: [f32; 2],
    pub length: f32,
    pub strength: f32,
    pub aspect: f32,
    pub _pad: [f32; 3],
}

/// Everything the marker needs to draw, independent of the GPU.
#[derive(Debug, Clone)]
pub struct MarkerState {
    view_proj: Mat4,
    needle: Needle,
    accel: Vec2,
    strength: f32,
    aspect: f32,
}

impl Default for MarkerState {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY,
            needle: Needle::default(),
            accel: Vec2::ZERO,
            strength: 0.0,
            aspect: 1.0,
        }
    }
}

impl MarkerState {
    pub fn set_camera(&mut self, view: Mat4, projection: Mat4) {
        self.view_proj = projection * view;
    }

    /// Ignores degenerate sizes (minimized window).
    pub fn set_screen(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.aspect = (width / height) as f32;
        }
    }

    pub fn step(&mut self, acceleration: &[f32; 3], strength: f32) {
        self.accel = Vec2::new(acceleration[0], acceleration[1]);
        self.strength = strength;
        self.needle.step(self.accel, strength);
    }

    pub fn needle(&self) -> &Needle {
        &self.needle
    }

    /// World origin in normalized device coordinates, or `None` when it lies
    /// behind the camera.
    pub fn anchor_ndc(&self) -> Option<Vec2> {
        let clip = self.view_proj * Vec4::W;
        (clip.w > f32::EPSILON).then(|| clip.truncate().truncate() / clip.w)
    }

    pub fn uniform(&self) -> MarkerUniform {
        let g = if self.accel.is_finite() {
            self.accel.length() / GRAVITY
        } else {
            0.0
        };
        MarkerUniform {
            view_proj: self.view_proj.to_cols_array_2d(),
            direction: self.needle.direction().to_array(),
            length: BASE_LENGTH + LENGTH_PER_G * g.min(1.0),
            strength: self.strength,
            aspect: self.aspect,
            _pad: [0.0; 3],
        }
    }
}
