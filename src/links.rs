//! Node-graph connectivity: proximity lines, pointer repulsion, and the
//! fractional spawn budget.
//!
//! The line pass is a greedy, order-dependent approximation of a proximity
//! graph, not a nearest-neighbor search: pairs are visited in active-index
//! order (i < j) and emission stops the moment a per-node or global cap is
//! hit, silently dropping any pairs discovered later.

use crate::config::NodeParams;
use crate::particle::Particle;
use crate::sink::LineBuffer;
use glam::{Vec2, Vec3};

/// Fractional spawn accumulator.
///
/// `accrue` adds `rate * dt`; each whole unit grants one spawn. Fractions
/// carry across ticks, so spawn timing is frame-rate independent.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpawnBudget {
    budget: f32,
}

impl SpawnBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `rate * dt` to the budget.
    pub fn accrue(&mut self, rate: f32, dt: f32) {
        self.budget += rate * dt;
    }

    /// Consume one whole unit if available.
    ///
    /// The unit is spent even if the caller then fails to find a free slot,
    /// matching the drop-on-full behavior of the spawn loop.
    pub fn take(&mut self) -> bool {
        if self.budget >= 1.0 {
            self.budget -= 1.0;
            true
        } else {
            false
        }
    }

    /// Fractional budget currently held.
    #[inline]
    pub fn pending(&self) -> f32 {
        self.budget
    }
}

/// Push a node away from the pointer.
///
/// Strength falls off linearly from the pointer to `pointer_radius`. This
/// runs after boundary wraparound without re-checking the result against
/// the viewport; a node wrapped near an edge can sit just outside it for
/// one frame, which the next tick's wrap pass corrects. Kept as-is to match
/// the observed behavior.
pub fn repel_from_pointer(p: &mut Particle, pointer: Vec2, params: &NodeParams, dt: f32) {
    let dx = p.position.x - pointer.x;
    let dy = p.position.y - pointer.y;
    let dist_sq = dx * dx + dy * dy;
    let radius_sq = params.pointer_radius * params.pointer_radius;
    // Lower bound on dist_sq keeps the normalization finite for a node
    // sitting exactly under the pointer.
    if dist_sq <= 1e-4 || dist_sq >= radius_sq {
        return;
    }
    let dist = dist_sq.sqrt();
    let strength = (params.pointer_radius - dist) / params.pointer_radius * params.pointer_strength;
    p.position.x += dx / dist * strength * dt;
    p.position.y += dy / dist * strength * dt;
}

/// Emit proximity line segments for the active nodes.
///
/// `active` holds pool indices of live nodes in compacted order. Segments
/// are written from the start of `lines`; returns the number emitted, never
/// more than `max_segments` and never more than
/// `params.max_connections_per_node` per node.
pub fn build_links(
    slots: &[Particle],
    active: &[usize],
    params: &NodeParams,
    max_segments: usize,
    lines: &mut LineBuffer,
) -> usize {
    let mut cursor = 0;

    for i in 0..active.len() {
        if cursor >= max_segments {
            break;
        }
        let a = &slots[active[i]];
        let mut connections = 0;

        for j in (i + 1)..active.len() {
            if cursor >= max_segments || connections >= params.max_connections_per_node {
                break;
            }
            let b = &slots[active[j]];
            let distance = a.position.distance(b.position);
            if distance > params.connection_distance {
                continue;
            }

            let alpha = (1.0 - distance / params.connection_distance) * params.line_alpha;
            lines.write(
                cursor,
                a.position,
                b.position,
                Vec3::splat(alpha),
                Vec3::splat(alpha),
            );
            connections += 1;
            cursor += 1;
        }
    }

    cursor
}
