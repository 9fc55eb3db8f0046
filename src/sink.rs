//! Render sink boundary.
//!
//! The simulation writes per-particle attributes into flat arrays shaped for
//! direct upload: stride-3 positions/colors for point primitives, stride-6
//! for line segments (head vertex then tail vertex), and packed
//! [`SpriteInstance`] records for the sprite layer. A backend implements
//! [`AttributeSink`] and receives slices plus a draw range each tick; the
//! core has no other contact with rendering.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One cosmic object, both render layers.
///
/// `#[repr(C)]` + `Pod` so a slice of these can be uploaded as a raw
/// instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 3],
    /// Scale of the distant beacon-point quad.
    pub point_scale: f32,
    pub point_color: [f32; 3],
    pub point_opacity: f32,
    /// Scale of the resolved sprite image.
    pub sprite_scale: f32,
    pub sprite_opacity: f32,
    /// Sprite rotation in radians.
    pub spin: f32,
    /// Index into the sprite texture catalog.
    pub sprite_index: u32,
}

/// Stride-3 position/color arrays for point primitives.
#[derive(Clone, Debug, Default)]
pub struct PointBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    draw_count: usize,
}

impl PointBuffer {
    /// Size the buffer for `slots` points. Existing data is zeroed.
    pub fn reset(&mut self, slots: usize) {
        self.positions.clear();
        self.positions.resize(slots * 3, 0.0);
        self.colors.clear();
        self.colors.resize(slots * 3, 0.0);
        self.draw_count = 0;
    }

    /// Write one point at `index`.
    #[inline]
    pub fn write(&mut self, index: usize, position: Vec3, color: Vec3) {
        let base = index * 3;
        self.positions[base..base + 3].copy_from_slice(&position.to_array());
        self.colors[base..base + 3].copy_from_slice(&color.to_array());
    }

    /// Set the number of leading points to draw.
    #[inline]
    pub fn set_draw_count(&mut self, count: usize) {
        self.draw_count = count;
    }

    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Point capacity in slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Raw byte view of the position array for direct upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw byte view of the color array.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Stride-6 position/color arrays for line-segment primitives.
///
/// Each segment stores its head vertex then its tail vertex; colors carry a
/// shade per vertex so a segment can fade along its length.
#[derive(Clone, Debug, Default)]
pub struct LineBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    vertex_count: usize,
}

impl LineBuffer {
    /// Size the buffer for `segments` line segments. Existing data is zeroed.
    pub fn reset(&mut self, segments: usize) {
        self.positions.clear();
        self.positions.resize(segments * 6, 0.0);
        self.colors.clear();
        self.colors.resize(segments * 6, 0.0);
        self.vertex_count = 0;
    }

    /// Write one segment with per-vertex colors.
    #[inline]
    pub fn write(&mut self, segment: usize, head: Vec3, tail: Vec3, head_color: Vec3, tail_color: Vec3) {
        let base = segment * 6;
        self.positions[base..base + 3].copy_from_slice(&head.to_array());
        self.positions[base + 3..base + 6].copy_from_slice(&tail.to_array());
        self.colors[base..base + 3].copy_from_slice(&head_color.to_array());
        self.colors[base + 3..base + 6].copy_from_slice(&tail_color.to_array());
    }

    /// Set the number of leading vertices to draw (two per segment).
    #[inline]
    pub fn set_vertex_count(&mut self, count: usize) {
        self.vertex_count = count;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Segment capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.positions.len() / 6
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Everything a field produced for the current tick.
///
/// Which buffers are populated depends on the variant: the node graph fills
/// points and lines, the photon tunnel fills lines, the sprite field fills
/// sprite instances.
#[derive(Clone, Debug, Default)]
pub struct FieldFrame {
    pub points: PointBuffer,
    pub lines: LineBuffer,
    pub sprites: Vec<SpriteInstance>,
    /// Leading sprite instances eligible for drawing this tick.
    pub sprite_active: usize,
}

impl FieldFrame {
    /// Forward populated buffers to a sink.
    pub fn present<S: AttributeSink>(&self, sink: &mut S) {
        if self.points.capacity() > 0 {
            sink.points(self.points.positions(), self.points.colors(), self.points.draw_count());
        }
        if self.lines.capacity() > 0 {
            sink.lines(self.lines.positions(), self.lines.colors(), self.lines.vertex_count());
        }
        if !self.sprites.is_empty() {
            sink.sprites(&self.sprites, self.sprite_active);
        }
    }
}

/// Receiver for per-tick attribute arrays.
///
/// All hooks default to no-ops so a backend implements only the primitives
/// its variant produces.
pub trait AttributeSink {
    /// Stride-3 point positions/colors; draw the first `draw_count` points.
    fn points(&mut self, positions: &[f32], colors: &[f32], draw_count: usize) {
        let _ = (positions, colors, draw_count);
    }

    /// Stride-3 line vertices (two per segment); draw the first
    /// `vertex_count` vertices.
    fn lines(&mut self, positions: &[f32], colors: &[f32], vertex_count: usize) {
        let _ = (positions, colors, vertex_count);
    }

    /// Packed sprite instances; draw the first `active` of them.
    fn sprites(&mut self, instances: &[SpriteInstance], active: usize) {
        let _ = (instances, active);
    }
}

/// Sink that discards everything. Handy for headless stepping and benches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl AttributeSink for NullSink {}
