//! Respawn policy: (re)initializing a particle slot in place.
//!
//! Each variant has one reseed function taking the slot context and its
//! parameter block. `fill` mode is used only for the initial seeding pass
//! and stratifies particles across the whole depth range (one segment per
//! slot plus jitter) so the first rendered frame has no pop-in wavefront;
//! steady-state recycling instead drops particles just past the far plane.
//!
//! Every randomized parameter is drawn from the bounded ranges in the
//! variant's parameter block — nothing unbounded reaches the simulation.

use crate::config::{DeviceClass, NodeParams, SpriteParams, TunnelParams};
use crate::particle::Particle;
use crate::sprites::{SpriteCatalog, SpriteKind};
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;

/// Draw from a range, tolerating degenerate `min == max` ranges.
#[inline]
pub(crate) fn uniform(rng: &mut SmallRng, range: &Range<f32>) -> f32 {
    if range.end > range.start {
        rng.gen_range(range.start..range.end)
    } else {
        range.start
    }
}

/// Everything a reseed needs to know about the slot being refreshed.
pub struct RespawnContext<'a> {
    pub rng: &'a mut SmallRng,
    /// Slot being reseeded.
    pub slot_index: usize,
    /// Current pool size.
    pub pool_size: usize,
    pub half_width: f32,
    pub half_height: f32,
    pub device: DeviceClass,
    /// Initial-seeding mode (stratified depth) vs steady-state recycle.
    pub fill: bool,
}

impl RespawnContext<'_> {
    /// Corridor radius sample: `center + u^exponent * (outer - center)`.
    ///
    /// The power law pushes mass away from the exact center, leaving the
    /// corridor hollow-cored.
    fn corridor_radius(&mut self, center: f32, outer: f32, exponent: f32) -> f32 {
        let mix = self.rng.gen::<f32>().powf(exponent);
        center + mix * (outer - center)
    }

    /// Stratified fill depth: the slot's own segment of the usable depth
    /// range, plus jitter covering `jitter_fraction` of the segment.
    fn fill_depth(&mut self, far: f32, near: f32, headroom: f32, jitter_fraction: f32) -> f32 {
        let segment = (far + near - headroom) / self.pool_size.max(1) as f32;
        let base = -far + segment * self.slot_index as f32;
        base + uniform(self.rng, &(0.0..segment * jitter_fraction))
    }
}

/// Reseed a photon-tunnel slot.
pub fn reseed_photon(p: &mut Particle, ctx: &mut RespawnContext<'_>, params: &TunnelParams) {
    let angle = uniform(ctx.rng, &(0.0..TAU));
    let radius = ctx.corridor_radius(
        params.center_corridor,
        params.outer_corridor,
        params.radial_exponent,
    );

    p.angle = angle;
    p.radius = radius;
    p.position = Vec3::new(
        0.0,
        0.0,
        if ctx.fill {
            ctx.fill_depth(params.far_depth, params.near_depth, 0.0, 1.0)
        } else {
            uniform(
                ctx.rng,
                &(-params.far_depth - 18.0..-params.far_depth + 6.0),
            )
        },
    );
    p.speed = uniform(ctx.rng, &params.speed(ctx.device));
    p.base_length = uniform(ctx.rng, &params.base_length);
    p.twinkle = uniform(ctx.rng, &(0.0..TAU));
    p.shade_bias = uniform(ctx.rng, &params.shade_bias);

    // Photons nearer the corridor center orbit faster.
    let span = (params.outer_corridor - params.center_corridor).max(1e-6);
    let normalized_radius = (radius - params.center_corridor) / span;
    let base_angular = uniform(ctx.rng, &params.angular_speed);
    p.angular_speed = base_angular * (1.0 + (1.0 - normalized_radius) * params.angular_center_boost);
}

/// Reseed a cosmic-object slot.
pub fn reseed_sprite(
    p: &mut Particle,
    ctx: &mut RespawnContext<'_>,
    params: &SpriteParams,
    catalog: &SpriteCatalog,
) {
    let angle = uniform(ctx.rng, &(0.0..TAU));
    let radius = ctx.corridor_radius(
        params.center_corridor,
        params.outer_corridor,
        params.radial_exponent,
    );
    let sprite_index = catalog.pick(ctx.rng, ctx.slot_index, ctx.device);
    let (scale_range, kind) = match catalog.get(sprite_index) {
        Some(def) => (def.base_scale.clone(), def.kind),
        None => (1.0..1.0, SpriteKind::Planet),
    };

    let x = angle.cos() * ctx.half_width * radius;
    let y = angle.sin() * ctx.half_height * radius;
    let z = if ctx.fill {
        ctx.fill_depth(params.far_depth, params.near_depth, 10.0, 0.72)
    } else {
        uniform(
            ctx.rng,
            &(-params.far_depth - 12.0..-params.far_depth + 18.0),
        )
    };

    p.position = Vec3::new(x, y, z);
    p.speed = uniform(ctx.rng, &params.speed(ctx.device));
    p.drift = Vec2::new(
        x * uniform(ctx.rng, &(-params.drift_factor..params.drift_factor)),
        y * uniform(ctx.rng, &(-params.drift_factor..params.drift_factor)),
    );
    p.base_scale = uniform(ctx.rng, &scale_range);
    p.sprite_index = sprite_index;
    p.spin = uniform(ctx.rng, &(0.0..TAU));
    p.spin_speed = uniform(ctx.rng, &kind.spin_range());
    p.twinkle = uniform(ctx.rng, &(0.0..TAU));
}

/// Bring a dead node slot to life.
///
/// Nodes are 2D drifters: uniform position across the viewport, tiny depth
/// jitter, finite lifespan with the fade curve applied in the update step.
pub fn spawn_node(p: &mut Particle, ctx: &mut RespawnContext<'_>, params: &NodeParams) {
    p.position = Vec3::new(
        uniform(ctx.rng, &(-ctx.half_width..ctx.half_width)),
        uniform(ctx.rng, &(-ctx.half_height..ctx.half_height)),
        uniform(ctx.rng, &(-params.depth_jitter..params.depth_jitter)),
    );
    p.velocity = Vec3::new(
        uniform(ctx.rng, &params.velocity_xy),
        uniform(ctx.rng, &params.velocity_xy),
        uniform(ctx.rng, &params.velocity_z),
    );
    p.age = 0.0;
    p.life = uniform(ctx.rng, &params.life);
    p.active = true;
}
