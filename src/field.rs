//! The field engine: one generic per-frame simulation driving all three
//! variants.
//!
//! A [`Field`] owns its particle pool, RNG, frame budget, and output frame.
//! The host calls [`Field::tick`] once per display refresh with the elapsed
//! delta and the current environment ([`TickInput`]); the field decides how
//! much simulated time to apply, advances the active prefix of the pool,
//! recycles particles that crossed a boundary, and rewrites the flat
//! attribute arrays a render sink consumes.
//!
//! Nothing in here can fail at tick time: respawn draws only from bounded
//! ranges, near-zero vector lengths are guarded, and a sprite index that
//! cannot be resolved falls back to neutral visuals.

use crate::budget::FrameBudget;
use crate::config::{
    DeviceClass, FieldConfig, NodeParams, SpriteParams, TunnelParams, Viewport, MAX_TICK_DELTA,
};
use crate::links::{self, SpawnBudget};
use crate::particle::ParticlePool;
use crate::sink::{AttributeSink, FieldFrame, SpriteInstance};
use crate::spawn::{self, RespawnContext};
use crate::sprites::{SpriteCatalog, SpriteKind};
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Environment sampled by the host for one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    /// Wall-clock seconds since the previous tick.
    pub dt: f32,
    pub viewport: Viewport,
    /// Pointer position in world units (node variant).
    pub pointer: Vec2,
    /// Normalized scroll progress in [0, 1] (sprite variant rush boost).
    pub scroll_progress: f32,
    /// Host accessibility preference, re-sampled every tick.
    pub reduced_motion: bool,
}

/// Normalized depth position: 0 at the far plane, 1 at the near plane.
#[inline]
pub fn depth_progress(z: f32, far_depth: f32, near_depth: f32) -> f32 {
    ((z + far_depth) / (far_depth + near_depth)).clamp(0.0, 1.0)
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(x: f32, edge0: f32, edge1: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// One particle field instance.
pub struct Field {
    config: FieldConfig,
    catalog: SpriteCatalog,
    device: DeviceClass,
    pool: ParticlePool,
    budget: FrameBudget,
    spawn_budget: SpawnBudget,
    rng: SmallRng,
    elapsed: f32,
    frame: FieldFrame,
    active_scratch: Vec<usize>,
}

impl Field {
    /// Create a field with a time-based RNG seed.
    pub fn new(config: FieldConfig) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(config, seed)
    }

    /// Create a field with an explicit RNG seed (deterministic runs).
    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        let device = DeviceClass::Desktop;
        let pool = ParticlePool::new(config.pool_limit(device));
        let mut field = Self {
            config,
            catalog: SpriteCatalog::builtin(),
            device,
            pool,
            budget: FrameBudget::new(),
            spawn_budget: SpawnBudget::new(),
            rng: SmallRng::seed_from_u64(seed),
            elapsed: 0.0,
            frame: FieldFrame::default(),
            active_scratch: Vec::new(),
        };
        field.size_outputs();
        field
    }

    /// Replace the sprite catalog (sprite variant; ignored elsewhere).
    pub fn with_catalog(mut self, catalog: SpriteCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// The configuration this field was built with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Sprite catalog in use.
    pub fn catalog(&self) -> &SpriteCatalog {
        &self.catalog
    }

    /// Current device class.
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// The particle pool (inspection and tests).
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Seconds of (clamped) host time this field has observed. Advances
    /// even on ticks the reduced-motion gate holds back, so twinkle phases
    /// keep wall-clock cadence.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Output of the most recent admitted tick.
    pub fn frame(&self) -> &FieldFrame {
        &self.frame
    }

    /// Active count the field would simulate this tick.
    pub fn active_count(&self, reduced_motion: bool) -> usize {
        self.config
            .reduced()
            .active_count(self.pool.len(), reduced_motion)
    }

    /// Forward the current frame to a sink.
    pub fn present<S: AttributeSink>(&self, sink: &mut S) {
        self.frame.present(sink);
    }

    /// Size the output buffers for the current pool and device class.
    fn size_outputs(&mut self) {
        let n = self.pool.len();
        match &self.config {
            FieldConfig::PhotonTunnel(_) => {
                self.frame.lines.reset(n);
                self.frame.points.reset(0);
                self.frame.sprites.clear();
            }
            FieldConfig::SpriteField(_) => {
                self.frame.sprites.clear();
                self.frame.sprites.resize(n, SpriteInstance::default());
                self.frame.points.reset(0);
                self.frame.lines.reset(0);
            }
            FieldConfig::NodeGraph(p) => {
                self.frame.points.reset(n);
                self.frame.lines.reset(p.max_line_segments.get(self.device));
            }
        }
    }

    /// Advance the field by one host tick.
    pub fn tick(&mut self, input: &TickInput) {
        // The elapsed clock keeps running even when the reduced-motion gate
        // holds, matching the renderer's wall clock the visuals were tuned
        // against.
        self.elapsed += input.dt.clamp(0.0, MAX_TICK_DELTA);

        let device = input.viewport.device_class();
        if device != self.device {
            self.device = device;
            self.pool.resize(self.config.pool_limit(device));
            self.size_outputs();
            self.budget.reset();
        }

        let interval = self.config.reduced().update_interval;
        let Some(step) = self.budget.admit(input.dt, input.reduced_motion, interval) else {
            return;
        };

        let config = self.config.clone();
        match &config {
            FieldConfig::PhotonTunnel(params) => self.step_tunnel(params, step, input),
            FieldConfig::SpriteField(params) => self.step_sprites(params, step, input),
            FieldConfig::NodeGraph(params) => self.step_nodes(params, step, input),
        }
    }

    fn respawn_ctx<'a>(
        rng: &'a mut SmallRng,
        slot: usize,
        pool_size: usize,
        viewport: &Viewport,
        device: DeviceClass,
        fill: bool,
    ) -> RespawnContext<'a> {
        RespawnContext {
            rng,
            slot_index: slot,
            pool_size,
            half_width: viewport.half_width,
            half_height: viewport.half_height,
            device,
            fill,
        }
    }

    // =========================================================================
    // PHOTON TUNNEL
    // =========================================================================

    fn step_tunnel(&mut self, params: &TunnelParams, step: f32, input: &TickInput) {
        let vp = &input.viewport;
        let pool_size = self.pool.len();

        if !self.pool.is_seeded() {
            for i in 0..pool_size {
                let mut ctx =
                    Self::respawn_ctx(&mut self.rng, i, pool_size, vp, self.device, true);
                spawn::reseed_photon(&mut self.pool.slots_mut()[i], &mut ctx, params);
            }
            self.pool.mark_seeded();
        }

        let reduced = input.reduced_motion;
        let motion = if reduced { params.reduced.motion_scale } else { 1.0 };
        let active = params.reduced.active_count(pool_size, reduced);
        let lateral_limit = params.outer_corridor * 1.2;

        for i in 0..active {
            let p = &mut self.pool.slots_mut()[i];
            p.position.z += p.speed * step * motion;
            p.angle += p.angular_speed * step * motion;

            let dp = depth_progress(p.position.z, params.far_depth, params.near_depth);
            let expansion = 1.0 + dp * dp * params.radial_expansion;
            let past_near = p.position.z > params.near_depth;
            let outside_corridor = p.radius * expansion > lateral_limit;
            if past_near || outside_corridor {
                let mut ctx =
                    Self::respawn_ctx(&mut self.rng, i, pool_size, vp, self.device, false);
                spawn::reseed_photon(&mut self.pool.slots_mut()[i], &mut ctx, params);
            }

            let p = &mut self.pool.slots_mut()[i];
            let dp = depth_progress(p.position.z, params.far_depth, params.near_depth);
            let expansion = 1.0 + dp * dp * params.radial_expansion;
            let effective_radius = p.radius * expansion;

            p.position.x = p.angle.cos() * effective_radius * vp.half_width;
            p.position.y = p.angle.sin() * effective_radius * vp.half_height;

            let pulse = params.twinkle_base
                + (p.twinkle + self.elapsed * params.twinkle_rate).sin() * params.twinkle_amp;
            let intensity = (0.16 + dp * 0.84) * pulse;
            let head_shade = (1.0 - intensity * p.shade_bias).max(0.03);
            let tail_shade = (head_shade + 0.2 + (1.0 - dp) * 0.16).min(1.0);
            let streak_length = p.base_length * (0.5 + dp * 3.5);

            // Orbit tangent bends the tail sideways; guard the length so a
            // degenerate tangent cannot produce non-finite vertices.
            let tangent = Vec2::new(
                -p.angle.sin() * effective_radius * vp.half_width,
                p.angle.cos() * effective_radius * vp.half_height,
            );
            let tangent_len = tangent.length();
            let tangent_len = if tangent_len < 1e-6 { 1.0 } else { tangent_len };
            let bend = tangent / tangent_len * streak_length * params.tangent_streak_weight;

            let head = p.position;
            let tail = Vec3::new(head.x - bend.x, head.y - bend.y, head.z - streak_length);
            self.frame
                .lines
                .write(i, head, tail, Vec3::splat(head_shade), Vec3::splat(tail_shade));
        }

        for i in active..pool_size {
            park_line(&mut self.frame.lines, i, params.far_depth);
        }
        self.frame.lines.set_vertex_count(active * 2);
    }

    // =========================================================================
    // SPRITE FIELD
    // =========================================================================

    fn step_sprites(&mut self, params: &SpriteParams, step: f32, input: &TickInput) {
        let vp = &input.viewport;
        let pool_size = self.pool.len();

        if !self.pool.is_seeded() {
            for i in 0..pool_size {
                let mut ctx =
                    Self::respawn_ctx(&mut self.rng, i, pool_size, vp, self.device, true);
                spawn::reseed_sprite(
                    &mut self.pool.slots_mut()[i],
                    &mut ctx,
                    params,
                    &self.catalog,
                );
            }
            self.pool.mark_seeded();
        }

        let reduced = input.reduced_motion;
        let motion = if reduced { params.reduced.motion_scale } else { 1.0 };
        let active = params.reduced.active_count(pool_size, reduced);
        let rush_boost = 1.0 + input.scroll_progress.clamp(0.0, 1.0) * params.rush_gain;
        let lateral_x = vp.half_width * params.outer_corridor * params.lateral_margin;
        let lateral_y = vp.half_height * params.outer_corridor * params.lateral_margin;

        for i in 0..active {
            let p = &mut self.pool.slots_mut()[i];
            let dp = depth_progress(p.position.z, params.far_depth, params.near_depth);

            // Far objects crawl, near ones rush past.
            let slowdown = params.slowdown_base + dp * dp * params.slowdown_gain;
            p.position.z += p.speed * step * motion * slowdown * rush_boost;
            p.position.x += p.drift.x * step * (0.32 + dp * 0.5);
            p.position.y += p.drift.y * step * (0.32 + dp * 0.5);
            p.spin += p.spin_speed * step * (0.25 + dp * 0.9);

            if p.position.z > params.near_depth
                || p.position.x.abs() > lateral_x
                || p.position.y.abs() > lateral_y
            {
                let mut ctx =
                    Self::respawn_ctx(&mut self.rng, i, pool_size, vp, self.device, false);
                spawn::reseed_sprite(
                    &mut self.pool.slots_mut()[i],
                    &mut ctx,
                    params,
                    &self.catalog,
                );
            }

            let p = self.pool.slots()[i];
            let dp = depth_progress(p.position.z, params.far_depth, params.near_depth);
            let sprite_visibility = smoothstep(dp, 0.18, 0.66);
            let point_visibility = 1.0 - smoothstep(dp, 0.16, 0.58);
            let twinkle = params.twinkle_base
                + (p.twinkle + self.elapsed * params.twinkle_rate).sin() * params.twinkle_amp;

            let (kind, beacon_color) = match self.catalog.get(p.sprite_index) {
                Some(def) => (def.kind, def.beacon_color),
                None => (SpriteKind::Planet, Vec3::ONE),
            };

            let point_scale = params.point_scale.start
                + (params.point_scale.end - params.point_scale.start) * dp;

            self.frame.sprites[i] = SpriteInstance {
                position: p.position.to_array(),
                point_scale,
                point_color: beacon_color.to_array(),
                point_opacity: (point_visibility * twinkle * kind.point_boost()).min(1.0),
                sprite_scale: p.base_scale * (0.22 + dp * 1.08),
                sprite_opacity: (sprite_visibility * (0.64 + dp * 0.36) * kind.sprite_boost())
                    .min(1.0),
                spin: p.spin,
                sprite_index: p.sprite_index,
            };
        }

        for i in active..pool_size {
            park_sprite(&mut self.frame.sprites[i], params.park_depth());
        }
        self.frame.sprite_active = active;
    }

    // =========================================================================
    // NODE GRAPH
    // =========================================================================

    fn step_nodes(&mut self, params: &NodeParams, step: f32, input: &TickInput) {
        let vp = &input.viewport;
        let pool_size = self.pool.len();

        if !self.pool.is_seeded() {
            // Nodes start dead; the spawn budget populates the pool.
            self.pool.mark_seeded();
        }

        self.spawn_budget
            .accrue(params.spawn_rate.get(self.device), step);
        while self.spawn_budget.take() {
            let Some(slot) = self.pool.first_inactive() else {
                break;
            };
            let mut ctx = Self::respawn_ctx(&mut self.rng, slot, pool_size, vp, self.device, false);
            spawn::spawn_node(&mut self.pool.slots_mut()[slot], &mut ctx, params);
        }

        self.active_scratch.clear();
        let mut active_count = 0;

        for i in 0..pool_size {
            let p = &mut self.pool.slots_mut()[i];
            if !p.active {
                continue;
            }

            p.age += step;
            if p.age >= p.life {
                p.active = false;
                continue;
            }

            p.position += p.velocity * step;

            // Toroidal wrap across the viewport.
            if p.position.x > vp.half_width {
                p.position.x = -vp.half_width;
            } else if p.position.x < -vp.half_width {
                p.position.x = vp.half_width;
            }
            if p.position.y > vp.half_height {
                p.position.y = -vp.half_height;
            } else if p.position.y < -vp.half_height {
                p.position.y = vp.half_height;
            }

            links::repel_from_pointer(p, input.pointer, params, step);

            // Fast fade-in, slower fade-out tail.
            let normalized_age = p.age / p.life;
            let fade_in = (normalized_age * 4.0).min(1.0);
            let fade_out = ((1.0 - normalized_age) * 1.25).min(1.0);
            let alpha = fade_in.min(fade_out).max(0.0);

            let position = p.position;
            self.frame
                .points
                .write(active_count, position, Vec3::splat(alpha));
            self.active_scratch.push(i);
            active_count += 1;
        }

        self.frame.points.set_draw_count(active_count);

        let max_segments = params
            .max_line_segments
            .get(self.device)
            .min(self.frame.lines.capacity());
        let emitted = links::build_links(
            self.pool.slots(),
            &self.active_scratch,
            params,
            max_segments,
            &mut self.frame.lines,
        );
        self.frame.lines.set_vertex_count(emitted * 2);
    }
}

/// Park a line slot beyond the active window: collapsed to a zero-length
/// segment at the far plane with zero shade.
fn park_line(lines: &mut crate::sink::LineBuffer, index: usize, far_depth: f32) {
    let off = Vec3::new(0.0, 0.0, -far_depth);
    lines.write(index, off, off, Vec3::ZERO, Vec3::ZERO);
}

/// Park a sprite slot: pushed behind the far plane, minimal scale, fully
/// transparent, regardless of whatever stale attributes it held.
fn park_sprite(instance: &mut SpriteInstance, park_depth: f32) {
    *instance = SpriteInstance {
        position: [0.0, 0.0, park_depth],
        point_scale: 0.01,
        sprite_scale: 0.01,
        ..SpriteInstance::default()
    };
}
