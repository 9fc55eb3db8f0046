//! End-to-end behavior of the three field variants through the public API.

use warpfield::config::{
    DeviceClass, FieldConfig, NodeParams, SpriteParams, TunnelParams, Viewport,
};
use warpfield::field::{Field, TickInput};
use warpfield::links::{self, SpawnBudget};
use warpfield::particle::Particle;
use warpfield::sink::{AttributeSink, LineBuffer, SpriteInstance};
use warpfield::sprites::SpriteCatalog;
use glam::{Vec2, Vec3};

const STEP_60HZ: f32 = 1.0 / 60.0;

fn desktop_viewport() -> Viewport {
    Viewport::new(12.0, 7.0, 1440.0)
}

fn mobile_viewport() -> Viewport {
    Viewport::new(8.0, 6.0, 390.0)
}

fn input(dt: f32, viewport: Viewport, reduced: bool) -> TickInput {
    TickInput {
        dt,
        viewport,
        pointer: Vec2::new(100.0, 100.0),
        scroll_progress: 0.0,
        reduced_motion: reduced,
    }
}

// =========================================================================
// PHOTON TUNNEL
// =========================================================================

#[test]
fn test_tunnel_particles_stay_inside_flight_envelope() {
    let params = TunnelParams::default();
    let mut field = Field::with_seed(FieldConfig::photon_tunnel(), 7);
    let vp = desktop_viewport();

    for _ in 0..600 {
        field.tick(&input(STEP_60HZ, vp, false));
        for p in field.pool().slots() {
            assert!(p.position.z >= -params.far_depth - 18.0);
            assert!(p.position.z <= params.near_depth + 1e-3);
            assert!(p.radius >= params.center_corridor - 1e-6);
            assert!(p.radius <= params.outer_corridor + 1e-6);
        }
    }

    let frame = field.frame();
    assert_eq!(frame.lines.vertex_count(), 2000 * 2);
    for v in frame.lines.positions() {
        assert!(v.is_finite());
    }
    for c in frame.lines.colors() {
        assert!((0.0..=1.0).contains(c));
    }
}

#[test]
fn test_tunnel_reduced_motion_draws_half_the_pool() {
    let mut field = Field::with_seed(FieldConfig::photon_tunnel(), 9);
    let vp = desktop_viewport();

    // 1/12 s threshold needs three max-length ticks to release.
    field.tick(&input(1.0 / 30.0, vp, true));
    field.tick(&input(1.0 / 30.0, vp, true));
    assert_eq!(field.frame().lines.vertex_count(), 0);
    field.tick(&input(1.0 / 30.0, vp, true));

    let frame = field.frame();
    assert_eq!(frame.lines.vertex_count(), 1000 * 2);

    // Slots beyond the active window are parked dark at the far plane.
    let colors = frame.lines.colors();
    for c in &colors[1000 * 6..] {
        assert_eq!(*c, 0.0);
    }
    let positions = frame.lines.positions();
    for seg in 1000..2000 {
        assert_eq!(positions[seg * 6 + 2], -96.0);
        assert_eq!(positions[seg * 6 + 5], -96.0);
    }
}

#[test]
fn test_reduced_gate_holds_then_releases_accumulated_time() {
    let mut field = Field::with_seed(FieldConfig::photon_tunnel(), 3);
    let vp = desktop_viewport();

    // Zero-length tick seeds the pool without moving anything.
    field.tick(&input(0.0, vp, false));
    let seeded = field.pool().slots()[0];
    let z0 = seeded.position.z;
    let speed = seeded.speed;

    // Two held ticks: the pool must not move at all.
    field.tick(&input(1.0 / 30.0, vp, true));
    field.tick(&input(1.0 / 30.0, vp, true));
    assert_eq!(field.pool().slots()[0].position.z, z0);

    // Third tick crosses 1/12 s and applies the full accumulated budget,
    // scaled by the reduced-motion factor.
    field.tick(&input(1.0 / 30.0, vp, true));
    let d = 1.0f32 / 30.0;
    let accumulated = (d + d) + d;
    let expected = z0 + speed * accumulated * 0.45;
    assert!((field.pool().slots()[0].position.z - expected).abs() < 1e-4);
}

#[test]
fn test_hitch_delta_is_clamped_to_max_step() {
    let mut field = Field::with_seed(FieldConfig::photon_tunnel(), 3);
    let vp = desktop_viewport();

    field.tick(&input(0.0, vp, false));
    let seeded = field.pool().slots()[0];

    // A five-second stall advances the simulation by at most 1/30 s.
    field.tick(&input(5.0, vp, false));
    let expected = seeded.position.z + seeded.speed * (1.0 / 30.0);
    assert!((field.pool().slots()[0].position.z - expected).abs() < 1e-4);
}

#[test]
fn test_wire_profile_uses_its_own_pool_and_corridor() {
    let mut field = Field::with_seed(FieldConfig::photon_wire(), 21);
    let vp = desktop_viewport();
    field.tick(&input(STEP_60HZ, vp, false));

    assert_eq!(field.pool().len(), 1400);
    for p in field.pool().slots() {
        assert!(p.radius >= 0.2 - 1e-6);
        assert!(p.radius <= 1.32 + 1e-6);
        assert!(p.speed >= 28.0 && p.speed <= 72.0);
    }
}

#[test]
fn test_device_class_change_resizes_and_reseeds() {
    let mut field = Field::with_seed(FieldConfig::photon_tunnel(), 13);

    field.tick(&input(STEP_60HZ, desktop_viewport(), false));
    assert_eq!(field.device(), DeviceClass::Desktop);
    assert_eq!(field.pool().len(), 2000);

    // Crossing the breakpoint shrinks the pool and refills it from scratch
    // with mobile-tuned speeds.
    field.tick(&input(STEP_60HZ, mobile_viewport(), false));
    assert_eq!(field.device(), DeviceClass::Mobile);
    assert_eq!(field.pool().len(), 1000);
    for p in field.pool().slots() {
        assert!(p.speed >= 18.0 && p.speed <= 42.0);
        assert!(p.position.z >= -96.0 - 18.0 - 1e-3);
        assert!(p.position.z <= 8.5 + 1e-3);
    }

    field.tick(&input(STEP_60HZ, desktop_viewport(), false));
    assert_eq!(field.pool().len(), 2000);
}

// =========================================================================
// SPRITE FIELD
// =========================================================================

#[test]
fn test_sprite_reduced_parks_trailing_slots() {
    let params = SpriteParams::default();
    let mut field = Field::with_seed(FieldConfig::sprite_field(), 17);
    let vp = desktop_viewport();

    field.tick(&input(STEP_60HZ, vp, false));
    assert_eq!(field.frame().sprite_active, 6);

    // 1/14 s threshold: two max-length ticks hold, the third releases.
    field.tick(&input(1.0 / 30.0, vp, true));
    field.tick(&input(1.0 / 30.0, vp, true));
    assert_eq!(field.frame().sprite_active, 6);
    field.tick(&input(1.0 / 30.0, vp, true));

    let frame = field.frame();
    assert_eq!(frame.sprite_active, 4);
    for instance in &frame.sprites[4..] {
        assert_eq!(instance.point_opacity, 0.0);
        assert_eq!(instance.sprite_opacity, 0.0);
        assert_eq!(instance.point_scale, 0.01);
        assert_eq!(instance.sprite_scale, 0.01);
        assert_eq!(instance.position, [0.0, 0.0, params.park_depth()]);
    }
}

#[test]
fn test_sprite_scroll_rush_accelerates_depth() {
    let mut plain = Field::with_seed(FieldConfig::sprite_field(), 29);
    let mut rushed = Field::with_seed(FieldConfig::sprite_field(), 29);
    let vp = desktop_viewport();

    plain.tick(&input(0.0, vp, false));
    rushed.tick(&input(0.0, vp, false));
    assert_eq!(
        plain.pool().slots()[0].position.z,
        rushed.pool().slots()[0].position.z
    );

    for _ in 0..30 {
        plain.tick(&input(STEP_60HZ, vp, false));
        let mut fast = input(STEP_60HZ, vp, false);
        fast.scroll_progress = 1.0;
        rushed.tick(&fast);
    }

    // Slot 0 spawns deepest, so neither copy can recycle this early.
    assert!(rushed.pool().slots()[0].position.z > plain.pool().slots()[0].position.z);
}

#[test]
fn test_sprite_instances_stay_renderable() {
    let catalog_len = SpriteCatalog::builtin().len();
    let mut field = Field::with_seed(FieldConfig::sprite_field(), 41);
    let vp = desktop_viewport();

    for _ in 0..400 {
        let mut tick = input(STEP_60HZ, vp, false);
        tick.scroll_progress = 0.3;
        field.tick(&tick);

        let frame = field.frame();
        for instance in &frame.sprites[..frame.sprite_active] {
            assert!((0.0..=1.0).contains(&instance.point_opacity));
            assert!((0.0..=1.0).contains(&instance.sprite_opacity));
            assert!(instance.position.iter().all(|v| v.is_finite()));
            assert!(instance.sprite_scale > 0.0);
            assert!((instance.sprite_index as usize) < catalog_len);
        }
    }
}

// =========================================================================
// NODE GRAPH
// =========================================================================

#[test]
fn test_spawn_budget_releases_whole_units_only() {
    // 10 spawns/s over one second of uniform 50 ms ticks.
    let mut budget = SpawnBudget::new();
    let mut spawned = 0;
    for _ in 0..20 {
        budget.accrue(10.0, 0.05);
        while budget.take() {
            spawned += 1;
        }
    }
    assert_eq!(spawned, 10);

    // Same second delivered as ragged dyadic ticks.
    let mut budget = SpawnBudget::new();
    let mut spawned = 0;
    let ticks = [
        0.0625, 0.0625, 0.0625, 0.0625, 0.0625, 0.0625, 0.0625, 0.0625, 0.125, 0.125, 0.25,
    ];
    assert_eq!(ticks.iter().sum::<f32>(), 1.0);
    for dt in ticks {
        budget.accrue(10.0, dt);
        while budget.take() {
            spawned += 1;
        }
    }
    assert_eq!(spawned, 10);
}

#[test]
fn test_link_segment_cap_with_colocated_nodes() {
    // Ten nodes on one spot saturate every pair; the segment cap has to be
    // the only limit that matters.
    let params = NodeParams::default();
    let mut slots = vec![Particle::default(); 10];
    for p in &mut slots {
        p.position = Vec3::ZERO;
        p.active = true;
    }
    let active: Vec<usize> = (0..10).collect();

    let mut lines = LineBuffer::default();
    lines.reset(16);
    let emitted = links::build_links(&slots, &active, &params, 3, &mut lines);
    assert_eq!(emitted, 3);
}

#[test]
fn test_node_graph_reaches_steady_population() {
    let params = NodeParams::default();
    let mut field = Field::with_seed(FieldConfig::node_graph(), 37);
    let vp = desktop_viewport();

    let mut peak = 0;
    for _ in 0..600 {
        field.tick(&input(STEP_60HZ, vp, false));
        peak = peak.max(field.frame().points.draw_count());
    }

    let frame = field.frame();
    assert!(peak > 0);
    assert!(peak <= 120);
    assert!(frame.points.draw_count() > 0);

    // Fade alpha is written into the point colors.
    for c in &frame.points.colors()[..frame.points.draw_count() * 3] {
        assert!((0.0..=1.0).contains(c));
    }

    // Segment output respects the desktop cap, two vertices per segment.
    assert!(frame.lines.vertex_count() % 2 == 0);
    assert!(frame.lines.vertex_count() <= params.max_line_segments.desktop * 2);

    // Drifting nodes stay wrapped inside the viewport.
    for p in field.pool().slots().iter().filter(|p| p.active) {
        assert!(p.position.x.abs() <= vp.half_width + 1e-3);
        assert!(p.position.y.abs() <= vp.half_height + 1e-3);
    }
}

#[test]
fn test_nodes_expire_and_slots_recycle() {
    let mut field = Field::with_seed(FieldConfig::node_graph(), 43);
    let vp = desktop_viewport();

    // Run past the longest lifespan (5.8 s); the first cohort must have
    // died and been replaced, keeping the population below the pool cap.
    for _ in 0..(8 * 60) {
        field.tick(&input(STEP_60HZ, vp, false));
    }
    let alive = field.pool().slots().iter().filter(|p| p.active).count();
    assert!(alive > 0);
    assert!(alive < 120);
    for p in field.pool().slots().iter().filter(|p| p.active) {
        assert!(p.age < p.life);
    }
}

// =========================================================================
// SINK
// =========================================================================

#[derive(Default)]
struct CaptureSink {
    point_calls: usize,
    line_calls: usize,
    sprite_calls: usize,
    line_vertices: usize,
    line_floats: usize,
}

impl AttributeSink for CaptureSink {
    fn points(&mut self, _: &[f32], _: &[f32], _: usize) {
        self.point_calls += 1;
    }

    fn lines(&mut self, positions: &[f32], _: &[f32], vertex_count: usize) {
        self.line_calls += 1;
        self.line_vertices = vertex_count;
        self.line_floats = positions.len();
    }

    fn sprites(&mut self, _: &[SpriteInstance], _: usize) {
        self.sprite_calls += 1;
    }
}

#[test]
fn test_present_forwards_only_populated_buffers() {
    let mut field = Field::with_seed(FieldConfig::photon_tunnel(), 51);
    field.tick(&input(STEP_60HZ, desktop_viewport(), false));

    let mut sink = CaptureSink::default();
    field.present(&mut sink);
    assert_eq!(sink.line_calls, 1);
    assert_eq!(sink.point_calls, 0);
    assert_eq!(sink.sprite_calls, 0);
    assert_eq!(sink.line_vertices, 2000 * 2);
    assert_eq!(sink.line_floats, 2000 * 6);
}

#[test]
fn test_active_count_accessor_matches_reduced_policy() {
    let tunnel = Field::with_seed(FieldConfig::photon_tunnel(), 1);
    assert_eq!(tunnel.active_count(false), 2000);
    assert_eq!(tunnel.active_count(true), 1000);

    let sprites = Field::with_seed(FieldConfig::sprite_field(), 1);
    assert_eq!(sprites.active_count(true), 4);
}
