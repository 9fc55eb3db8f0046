//! # warpfield
//!
//! Depth-layered particle field simulation for animated "warp tunnel"
//! backdrops: drifting wireframe nodes, photon light-streaks, and
//! pixel-art cosmic objects flying past the camera.
//!
//! The crate is the simulation core only. It owns fixed-capacity particle
//! pools, the respawn/recycling lifecycle, depth-based visual falloff, and
//! reduced-motion frame budgeting — and hands a render backend flat
//! position/color/scale arrays each tick through a narrow sink trait.
//! Canvas setup, materials, and texture upload stay on the host's side of
//! that boundary.
//!
//! ## Quick Start
//!
//! ```ignore
//! use warpfield::prelude::*;
//!
//! let mut field = Field::new(FieldConfig::photon_tunnel());
//! let mut clock = TickClock::new();
//!
//! // In your per-frame callback:
//! let (_, dt) = clock.update();
//! field.tick(&TickInput {
//!     dt,
//!     viewport: Viewport::new(12.0, 7.0, 1440.0),
//!     pointer: Vec2::ZERO,
//!     scroll_progress: 0.0,
//!     reduced_motion: false,
//! });
//! field.present(&mut my_sink); // my_sink: impl AttributeSink
//! ```
//!
//! ## Core Concepts
//!
//! ### Variants
//!
//! One engine drives three field variants, selected by [`FieldConfig`]:
//!
//! | Variant | Look | Primitives |
//! |---------|------|------------|
//! | [`FieldConfig::node_graph`] | drifting nodes joined by proximity lines | points + lines |
//! | [`FieldConfig::photon_tunnel`] / [`FieldConfig::photon_wire`] | comet-tail light streaks rushing past | lines |
//! | [`FieldConfig::sprite_field`] | a handful of pixel-art planets, galaxies, comets | sprite instances |
//!
//! ### Pools and reseeding
//!
//! Pools are sized once per device class (mobile vs desktop, 768px
//! breakpoint) and never reallocate; a particle that crosses the near plane
//! or leaves the corridor is reseeded in its slot. Crossing the breakpoint
//! is the one event that rebuilds the pool.
//!
//! ### Reduced motion
//!
//! When the host reports a reduced-motion preference, fields keep
//! accepting ticks but apply updates at a lower frequency, scale motion
//! down, and simulate only a documented fraction of the pool. Slots past
//! the active window are parked off-screen at zero opacity so sink buffers
//! keep their size.

pub mod budget;
pub mod config;
pub mod error;
pub mod field;
pub mod links;
pub mod particle;
pub mod sink;
pub mod spawn;
pub mod sprites;
pub mod time;

pub use budget::FrameBudget;
pub use bytemuck;
pub use config::{
    DeviceClass, DeviceLimit, FieldConfig, NodeParams, ReducedMotion, SpriteParams, TunnelParams,
    Viewport, MAX_TICK_DELTA, MOBILE_BREAKPOINT,
};
pub use error::{CatalogError, SpriteWriteError};
pub use field::{depth_progress, smoothstep, Field, TickInput};
pub use glam::{Vec2, Vec3};
pub use links::SpawnBudget;
pub use particle::{Particle, ParticlePool};
pub use sink::{AttributeSink, FieldFrame, LineBuffer, NullSink, PointBuffer, SpriteInstance};
pub use sprites::{SpriteCatalog, SpriteDef, SpriteKind};
pub use time::TickClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use warpfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{DeviceClass, FieldConfig, Viewport};
    pub use crate::field::{Field, TickInput};
    pub use crate::sink::{AttributeSink, FieldFrame, NullSink, SpriteInstance};
    pub use crate::sprites::{SpriteCatalog, SpriteKind};
    pub use crate::time::TickClock;
    pub use crate::{Vec2, Vec3};
}
