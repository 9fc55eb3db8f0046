//! Particle records and the fixed-capacity pool.
//!
//! A pool is allocated once per device class and never grows or shrinks
//! afterwards; "destroying" a particle means reseeding its slot in place.
//! Slots are identified by index only — nothing holds a reference to a
//! particle across ticks.

use glam::{Vec2, Vec3};

/// One particle slot. The fields are the union of what the three variants
/// use; each variant touches only its own subset and leaves the rest zeroed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// World-space position. `z` is the depth coordinate, negative toward
    /// the far plane.
    pub position: Vec3,
    /// Per-axis velocity (node variant).
    pub velocity: Vec3,
    /// Orbit angle around the tunnel axis (tunnel variants).
    pub angle: f32,
    /// Normalized corridor radius at spawn (tunnel variants).
    pub radius: f32,
    /// Orbit rate in radians per second (tunnel variants).
    pub angular_speed: f32,
    /// Depth advance rate (tunnel/sprite variants).
    pub speed: f32,
    /// Unscaled streak length (tunnel variants).
    pub base_length: f32,
    /// Lateral drift rates (sprite variant).
    pub drift: Vec2,
    /// Resting sprite scale before depth scaling (sprite variant).
    pub base_scale: f32,
    /// Index into the sprite catalog (sprite variant).
    pub sprite_index: u32,
    /// Current sprite rotation in radians (sprite variant).
    pub spin: f32,
    /// Sprite rotation rate (sprite variant).
    pub spin_speed: f32,
    /// Phase offset for the brightness twinkle.
    pub twinkle: f32,
    /// Per-particle darkening bias applied to streak shades.
    pub shade_bias: f32,
    /// Seconds since spawn (node variant).
    pub age: f32,
    /// Lifespan in seconds (node variant).
    pub life: f32,
    /// Whether the slot currently holds a living node (node variant only;
    /// tunnel/sprite slots are always live within the active window).
    pub active: bool,
}

/// Fixed-size, index-stable particle storage.
///
/// `resize` is the only way capacity changes, and it discards every slot:
/// the pool comes back zeroed and unseeded, forcing the owning field to run
/// a full fill-mode reseed pass before the next simulation step.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    seeded: bool,
}

impl ParticlePool {
    /// Allocate a pool of `n` zeroed slots.
    pub fn new(n: usize) -> Self {
        Self {
            slots: vec![Particle::default(); n],
            seeded: false,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has zero slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the initial fill-mode reseed pass has run.
    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Mark the initial reseed pass as done.
    pub(crate) fn mark_seeded(&mut self) {
        self.seeded = true;
    }

    /// Replace the pool with `n` freshly zeroed slots.
    ///
    /// All prior particle state is discarded and the pool is unseeded
    /// again. Called only when the device-class ceiling changes.
    pub fn resize(&mut self, n: usize) {
        self.slots.clear();
        self.slots.resize(n, Particle::default());
        self.seeded = false;
    }

    /// Shared view of all slots.
    #[inline]
    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    /// Mutable view of all slots.
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [Particle] {
        &mut self.slots
    }

    /// Index of the first inactive slot, if any (node variant spawning).
    pub fn first_inactive(&self) -> Option<usize> {
        self.slots.iter().position(|p| !p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_zeroed_and_unseeded() {
        let pool = ParticlePool::new(8);
        assert_eq!(pool.len(), 8);
        assert!(!pool.is_seeded());
        assert!(pool.slots().iter().all(|p| *p == Particle::default()));
    }

    #[test]
    fn test_resize_discards_state() {
        let mut pool = ParticlePool::new(4);
        pool.mark_seeded();
        pool.slots_mut()[2].speed = 31.0;
        pool.slots_mut()[2].active = true;

        pool.resize(6);
        assert_eq!(pool.len(), 6);
        assert!(!pool.is_seeded());
        assert!(pool.slots().iter().all(|p| *p == Particle::default()));
    }

    #[test]
    fn test_first_inactive_skips_live_nodes() {
        let mut pool = ParticlePool::new(3);
        pool.slots_mut()[0].active = true;
        assert_eq!(pool.first_inactive(), Some(1));
        pool.slots_mut()[1].active = true;
        pool.slots_mut()[2].active = true;
        assert_eq!(pool.first_inactive(), None);
    }
}
