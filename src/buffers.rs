//! Fixed-length render attribute buffers.
//!
//! Four parallel arrays, one slot per potential particle:
//!
//! | Attribute | Components |
//! |-----------|------------|
//! | position  | 3 × f32 |
//! | color     | 3 × f32 |
//! | size      | f32 |
//! | alpha     | f32 |
//!
//! The arrays are always exactly `capacity` slots long. The render backend
//! reads them as flat `f32` slices (or raw bytes) without copying.

use bytemuck::cast_slice;
use glam::Vec3;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderBuffers {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    sizes: Vec<f32>,
    alphas: Vec<f32>,
}

impl RenderBuffers {
    /// Zeroed buffers with room for `capacity` particles.
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: vec![[0.0; 3]; capacity],
            colors: vec![[0.0; 3]; capacity],
            sizes: vec![0.0; capacity],
            alphas: vec![0.0; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.alphas.len()
    }

    /// Change the slot count. New slots start zeroed; surviving slots keep
    /// their contents until the next repack.
    pub fn resize(&mut self, capacity: usize) {
        self.positions.resize(capacity, [0.0; 3]);
        self.colors.resize(capacity, [0.0; 3]);
        self.sizes.resize(capacity, 0.0);
        self.alphas.resize(capacity, 0.0);
    }

    /// Publish one particle into `slot`.
    #[inline]
    pub fn write(&mut self, slot: usize, position: Vec3, color: Vec3, size: f32, alpha: f32) {
        self.positions[slot] = position.to_array();
        self.colors[slot] = color.to_array();
        self.sizes[slot] = size;
        self.alphas[slot] = alpha;
    }

    /// Hide every slot from `start` onward (position, size and alpha zeroed).
    pub fn hide_from(&mut self, start: usize) {
        let start = start.min(self.capacity());
        self.positions[start..].fill([0.0; 3]);
        self.sizes[start..].fill(0.0);
        self.alphas[start..].fill(0.0);
    }

    /// Zero all four attributes in every slot.
    pub fn zero(&mut self) {
        self.hide_from(0);
        self.colors.fill([0.0; 3]);
    }

    pub fn position(&self, slot: usize) -> Option<Vec3> {
        self.positions.get(slot).map(|p| Vec3::from_array(*p))
    }

    pub fn color(&self, slot: usize) -> Option<Vec3> {
        self.colors.get(slot).map(|c| Vec3::from_array(*c))
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` slice.
    pub fn positions(&self) -> &[f32] {
        cast_slice(&self.positions)
    }

    /// Colors as a flat `[r0, g0, b0, r1, ...]` slice.
    pub fn colors(&self) -> &[f32] {
        cast_slice(&self.colors)
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Raw bytes of each attribute in the order position, color, size, alpha.
    pub fn as_bytes(&self) -> [&[u8]; 4] {
        [
            cast_slice(&self.positions),
            cast_slice(&self.colors),
            cast_slice(&self.sizes),
            cast_slice(&self.alphas),
        ]
    }
}
