//! Field variant configuration.
//!
//! Each field variant (node graph, photon tunnel, sprite field) shares the
//! same simulation shape but carries its own parameter block. The blocks are
//! plain data: pool ceilings per device class, depth range, speed range,
//! corridor radii, and the visual response curves the update step evaluates.
//!
//! Constructors on [`FieldConfig`] hold the authoritative numbers. Fields are
//! public so callers (and tests) can derive tuned variants:
//!
//! ```ignore
//! let mut cfg = NodeParams::default();
//! cfg.max_line_segments = DeviceLimit { desktop: 64, mobile: 32 };
//! let field = Field::new(FieldConfig::NodeGraph(cfg));
//! ```

use std::ops::Range;

/// Pixel width below which a viewport is treated as a mobile device.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Upper bound applied to every incoming tick delta, in seconds.
///
/// A backgrounded tab can hand the next tick a multi-second delta; clamping
/// keeps that from becoming one huge simulation step.
pub const MAX_TICK_DELTA: f32 = 1.0 / 30.0;

/// Device class derived from viewport pixel width.
///
/// Pool sizes, speed ranges, and spawn rates differ per class. A class
/// change is the only event that reinitializes a field's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// Classify a viewport by its pixel width.
    pub fn from_pixel_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Whether this is the mobile class.
    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceClass::Mobile)
    }
}

/// A value that differs between desktop and mobile device classes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceLimit<T: Copy> {
    pub desktop: T,
    pub mobile: T,
}

impl<T: Copy> DeviceLimit<T> {
    /// Pick the value for a device class.
    pub fn get(&self, device: DeviceClass) -> T {
        match device {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Mobile => self.mobile,
        }
    }
}

/// World-space viewport extents plus the pixel width used for device
/// classification.
///
/// `half_width`/`half_height` are world units (half the visible plane at the
/// particle layer); `pixel_width` is the raw surface width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub half_width: f32,
    pub half_height: f32,
    pub pixel_width: f32,
}

impl Viewport {
    /// Build a viewport from full world-space extents and pixel width.
    pub fn new(width: f32, height: f32, pixel_width: f32) -> Self {
        Self {
            half_width: width * 0.5,
            half_height: height * 0.5,
            pixel_width,
        }
    }

    /// Device class for this viewport.
    pub fn device_class(&self) -> DeviceClass {
        DeviceClass::from_pixel_width(self.pixel_width)
    }
}

/// Reduced-motion behavior shared by all variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReducedMotion {
    /// Minimum accumulated time before an update is applied, in seconds.
    pub update_interval: f32,
    /// Multiplier on simulated motion while reduced motion is active.
    pub motion_scale: f32,
    /// Fraction of the pool kept active (1.0 = whole pool).
    pub active_fraction: f32,
    /// Floor on the active count after applying the fraction.
    pub min_active: usize,
}

impl ReducedMotion {
    /// Active count for a pool of `pool_size` slots.
    pub fn active_count(&self, pool_size: usize, reduced: bool) -> usize {
        if !reduced {
            return pool_size;
        }
        let scaled = (pool_size as f32 * self.active_fraction).floor() as usize;
        scaled.max(self.min_active).min(pool_size)
    }
}

/// Parameters for the photon streak tunnel variants.
#[derive(Clone, Debug)]
pub struct TunnelParams {
    pub pool: DeviceLimit<usize>,
    /// Depth of the far spawn plane (particles live in `z ∈ [-far, near]`).
    pub far_depth: f32,
    /// Depth of the near recycle plane.
    pub near_depth: f32,
    pub speed_desktop: Range<f32>,
    pub speed_mobile: Range<f32>,
    /// Minimum normalized radial distance of spawned photons from center.
    pub center_corridor: f32,
    /// Maximum normalized radial distance (the tunnel radius).
    pub outer_corridor: f32,
    /// Exponent biasing radial samples away from the exact center.
    pub radial_exponent: f32,
    pub angular_speed: Range<f32>,
    /// Inner photons orbit faster: `base * (1 + (1 - r_norm) * boost)`.
    pub angular_center_boost: f32,
    /// Quadratic-in-depth widening of the corridor toward the near plane.
    pub radial_expansion: f32,
    /// How much of the streak tail bends along the orbit tangent.
    pub tangent_streak_weight: f32,
    pub base_length: Range<f32>,
    pub shade_bias: Range<f32>,
    /// Twinkle rate in radians per second of elapsed time.
    pub twinkle_rate: f32,
    /// Brightness pulse: `base + sin(phase + t * rate) * amplitude`.
    pub twinkle_base: f32,
    pub twinkle_amp: f32,
    pub reduced: ReducedMotion,
}

impl Default for TunnelParams {
    /// Profile A: the dense photon tunnel.
    fn default() -> Self {
        Self {
            pool: DeviceLimit { desktop: 2000, mobile: 1000 },
            far_depth: 96.0,
            near_depth: 8.5,
            speed_desktop: 22.0..55.0,
            speed_mobile: 18.0..42.0,
            center_corridor: 0.08,
            outer_corridor: 1.45,
            radial_exponent: 0.7,
            angular_speed: 0.4..1.0,
            angular_center_boost: 1.2,
            radial_expansion: 0.45,
            tangent_streak_weight: 0.25,
            base_length: 0.4..1.4,
            shade_bias: 0.78..1.04,
            twinkle_rate: 2.5,
            twinkle_base: 0.72,
            twinkle_amp: 0.28,
            reduced: ReducedMotion {
                update_interval: 1.0 / 12.0,
                motion_scale: 0.45,
                active_fraction: 0.5,
                min_active: 0,
            },
        }
    }
}

impl TunnelParams {
    /// Speed range for a device class.
    pub fn speed(&self, device: DeviceClass) -> Range<f32> {
        match device {
            DeviceClass::Desktop => self.speed_desktop.clone(),
            DeviceClass::Mobile => self.speed_mobile.clone(),
        }
    }
}

/// Parameters for the sprite-based cosmic object field.
#[derive(Clone, Debug)]
pub struct SpriteParams {
    pub pool: DeviceLimit<usize>,
    pub far_depth: f32,
    pub near_depth: f32,
    pub speed_desktop: Range<f32>,
    pub speed_mobile: Range<f32>,
    pub center_corridor: f32,
    pub outer_corridor: f32,
    pub radial_exponent: f32,
    /// Lateral drift rate as a fraction of spawn position per second.
    pub drift_factor: f32,
    /// Depth advance slowdown: `base + depth_progress² * gain`.
    pub slowdown_base: f32,
    pub slowdown_gain: f32,
    /// Scroll-linked speed multiplier: `1 + scroll_progress * rush_gain`.
    pub rush_gain: f32,
    /// Lateral recycle margin as a multiple of the outer corridor.
    pub lateral_margin: f32,
    pub twinkle_rate: f32,
    /// Brightness pulse: `base + sin(phase + t * rate) * amplitude`.
    pub twinkle_base: f32,
    pub twinkle_amp: f32,
    /// Beacon-point scale at the far and near planes.
    pub point_scale: Range<f32>,
    pub reduced: ReducedMotion,
}

impl Default for SpriteParams {
    fn default() -> Self {
        Self {
            pool: DeviceLimit { desktop: 6, mobile: 4 },
            far_depth: 140.0,
            near_depth: 8.5,
            speed_desktop: 18.0..28.0,
            speed_mobile: 14.0..22.0,
            center_corridor: 0.72,
            outer_corridor: 1.42,
            radial_exponent: 0.32,
            drift_factor: 0.0018,
            slowdown_base: 0.18,
            slowdown_gain: 1.12,
            rush_gain: 1.8,
            lateral_margin: 1.22,
            twinkle_rate: 3.1,
            twinkle_base: 0.68,
            twinkle_amp: 0.32,
            point_scale: 0.026..0.18,
            reduced: ReducedMotion {
                update_interval: 1.0 / 14.0,
                motion_scale: 0.4,
                active_fraction: 0.75,
                min_active: 2,
            },
        }
    }
}

impl SpriteParams {
    /// Speed range for a device class.
    pub fn speed(&self, device: DeviceClass) -> Range<f32> {
        match device {
            DeviceClass::Desktop => self.speed_desktop.clone(),
            DeviceClass::Mobile => self.speed_mobile.clone(),
        }
    }

    /// Depth slots beyond the pool are parked here, behind the far plane.
    pub fn park_depth(&self) -> f32 {
        -self.far_depth - 16.0
    }
}

/// Parameters for the wireframe node-graph variant.
#[derive(Clone, Debug)]
pub struct NodeParams {
    pub pool: DeviceLimit<usize>,
    /// Node spawns per second, fed through a fractional budget accumulator.
    pub spawn_rate: DeviceLimit<f32>,
    pub max_line_segments: DeviceLimit<usize>,
    pub max_connections_per_node: usize,
    /// Maximum world-space distance at which two nodes link up.
    pub connection_distance: f32,
    /// Line alpha at zero distance; falls off linearly to the cutoff.
    pub line_alpha: f32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub velocity_xy: Range<f32>,
    pub velocity_z: Range<f32>,
    /// Spawn depth jitter; the variant is visually flat.
    pub depth_jitter: f32,
    pub life: Range<f32>,
    pub reduced: ReducedMotion,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            pool: DeviceLimit { desktop: 120, mobile: 68 },
            spawn_rate: DeviceLimit { desktop: 14.0, mobile: 8.0 },
            max_line_segments: DeviceLimit { desktop: 520, mobile: 220 },
            max_connections_per_node: 5,
            connection_distance: 1.8,
            line_alpha: 0.35,
            pointer_radius: 2.5,
            pointer_strength: 1.75,
            velocity_xy: -0.13..0.13,
            velocity_z: -0.035..0.035,
            depth_jitter: 0.25,
            life: 2.8..5.8,
            reduced: ReducedMotion {
                update_interval: 1.0 / 12.0,
                motion_scale: 1.0,
                active_fraction: 1.0,
                min_active: 0,
            },
        }
    }
}

/// Tagged configuration selecting one of the three field variants.
///
/// The three variants share one engine ([`crate::Field`]); this enum is the
/// capability descriptor that parameterizes it.
#[derive(Clone, Debug)]
pub enum FieldConfig {
    NodeGraph(NodeParams),
    PhotonTunnel(TunnelParams),
    SpriteField(SpriteParams),
}

impl FieldConfig {
    /// Wireframe node graph: drifting 2D nodes joined by proximity lines.
    pub fn node_graph() -> Self {
        FieldConfig::NodeGraph(NodeParams::default())
    }

    /// Photon tunnel, profile A: dense light streaks with a hollow core.
    pub fn photon_tunnel() -> Self {
        FieldConfig::PhotonTunnel(TunnelParams::default())
    }

    /// Photon tunnel, profile B: sparser, faster streaks on a wider core,
    /// paired visually with the wireframe hero.
    pub fn photon_wire() -> Self {
        FieldConfig::PhotonTunnel(TunnelParams {
            pool: DeviceLimit { desktop: 1400, mobile: 760 },
            speed_desktop: 28.0..72.0,
            speed_mobile: 22.0..56.0,
            center_corridor: 0.2,
            outer_corridor: 1.32,
            ..TunnelParams::default()
        })
    }

    /// Sprite field: a handful of pixel-art cosmic objects drifting past.
    pub fn sprite_field() -> Self {
        FieldConfig::SpriteField(SpriteParams::default())
    }

    /// Pool ceiling for a device class.
    pub fn pool_limit(&self, device: DeviceClass) -> usize {
        match self {
            FieldConfig::NodeGraph(p) => p.pool.get(device),
            FieldConfig::PhotonTunnel(p) => p.pool.get(device),
            FieldConfig::SpriteField(p) => p.pool.get(device),
        }
    }

    /// Reduced-motion behavior block.
    pub fn reduced(&self) -> &ReducedMotion {
        match self {
            FieldConfig::NodeGraph(p) => &p.reduced,
            FieldConfig::PhotonTunnel(p) => &p.reduced,
            FieldConfig::SpriteField(p) => &p.reduced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_class_breakpoint() {
        assert_eq!(DeviceClass::from_pixel_width(767.9), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_pixel_width(768.0), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_pixel_width(1920.0), DeviceClass::Desktop);
    }

    #[test]
    fn test_pool_limits_per_variant() {
        let desktop = DeviceClass::Desktop;
        let mobile = DeviceClass::Mobile;
        assert_eq!(FieldConfig::photon_tunnel().pool_limit(desktop), 2000);
        assert_eq!(FieldConfig::photon_tunnel().pool_limit(mobile), 1000);
        assert_eq!(FieldConfig::photon_wire().pool_limit(desktop), 1400);
        assert_eq!(FieldConfig::photon_wire().pool_limit(mobile), 760);
        assert_eq!(FieldConfig::sprite_field().pool_limit(desktop), 6);
        assert_eq!(FieldConfig::sprite_field().pool_limit(mobile), 4);
        assert_eq!(FieldConfig::node_graph().pool_limit(desktop), 120);
        assert_eq!(FieldConfig::node_graph().pool_limit(mobile), 68);
    }

    #[test]
    fn test_reduced_active_count() {
        let tunnel = TunnelParams::default();
        assert_eq!(tunnel.reduced.active_count(2000, false), 2000);
        assert_eq!(tunnel.reduced.active_count(2000, true), 1000);

        let sprite = SpriteParams::default();
        assert_eq!(sprite.reduced.active_count(6, true), 4);
        // Floor kicks in for tiny pools.
        assert_eq!(sprite.reduced.active_count(2, true), 2);
    }

    #[test]
    fn test_viewport_halves_extents() {
        let vp = Viewport::new(12.0, 7.0, 1440.0);
        assert_eq!(vp.half_width, 6.0);
        assert_eq!(vp.half_height, 3.5);
        assert_eq!(vp.device_class(), DeviceClass::Desktop);
    }
}
