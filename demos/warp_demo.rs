//! Headless tour of the three field variants.
//!
//! Steps each variant for a few simulated seconds, prints what it produced,
//! and exports the built-in sprite sheet as PNGs.
//!
//! Run with: `cargo run --example warp_demo`

use std::path::Path;
use warpfield::prelude::*;

struct SummarySink {
    points: usize,
    line_vertices: usize,
    sprites_active: usize,
}

impl SummarySink {
    fn new() -> Self {
        Self {
            points: 0,
            line_vertices: 0,
            sprites_active: 0,
        }
    }
}

impl AttributeSink for SummarySink {
    fn points(&mut self, _: &[f32], _: &[f32], draw_count: usize) {
        self.points = draw_count;
    }

    fn lines(&mut self, _: &[f32], _: &[f32], vertex_count: usize) {
        self.line_vertices = vertex_count;
    }

    fn sprites(&mut self, _: &[SpriteInstance], active: usize) {
        self.sprites_active = active;
    }
}

fn run_variant(name: &str, config: FieldConfig, seconds: f32) {
    let mut field = Field::new(config);
    let mut clock = TickClock::new();
    clock.set_fixed_delta(Some(1.0 / 60.0));

    let viewport = Viewport::new(12.0, 7.0, 1440.0);
    let ticks = (seconds * 60.0) as u32;
    for i in 0..ticks {
        let (elapsed, dt) = clock.update();
        field.tick(&TickInput {
            dt,
            viewport,
            // Sweep the pointer across the plane so the node variant shows
            // its repulsion.
            pointer: Vec2::new((elapsed * 0.7).sin() * 4.0, (elapsed * 0.4).cos() * 2.0),
            scroll_progress: (i as f32 / ticks as f32).min(1.0),
            reduced_motion: false,
        });
    }

    let mut sink = SummarySink::new();
    field.present(&mut sink);
    println!(
        "{name:>14}: pool {:>4}  points {:>3}  line vertices {:>4}  sprites {}",
        field.pool().len(),
        sink.points,
        sink.line_vertices,
        sink.sprites_active,
    );
}

fn main() {
    println!("=== warpfield demo ===");
    println!("Simulating 5 s of each variant at a fixed 60 Hz step.\n");

    run_variant("node graph", FieldConfig::node_graph(), 5.0);
    run_variant("photon tunnel", FieldConfig::photon_tunnel(), 5.0);
    run_variant("photon wire", FieldConfig::photon_wire(), 5.0);
    run_variant("sprite field", FieldConfig::sprite_field(), 5.0);

    let catalog = SpriteCatalog::builtin();
    match catalog.export_png(Path::new("target/sprites")) {
        Ok(paths) => {
            println!("\nExported {} sprite sheets:", paths.len());
            for path in paths {
                println!("  {}", path.display());
            }
        }
        Err(err) => eprintln!("sprite export failed: {err}"),
    }
}
