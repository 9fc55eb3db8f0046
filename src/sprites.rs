//! Pixel-art sprite catalog for the cosmic object field.
//!
//! Sprites are authored as rows of palette tokens and rasterized into
//! `image::RgbaImage` textures at startup. The catalog also owns the
//! per-slot category schedule: which kind of object (planet, galaxy, comet,
//! black hole) a given pool slot prefers, so variety is deterministic per
//! slot even though the pick within a kind is random.
//!
//! Textures are plain owned values; dropping the images (or anything a sink
//! derived from them) is the whole teardown story.

use crate::config::DeviceClass;
use crate::error::{CatalogError, SpriteWriteError};
use glam::Vec3;
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::Rng;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Token-to-RGBA palette shared by the built-in sprites. `.` is always
/// transparent and never appears here.
pub const PIXEL_PALETTE: &[(char, [u8; 4])] = &[
    ('o', [255, 161, 82, 255]),  // warm orange
    ('y', [255, 224, 120, 255]), // sun yellow
    ('r', [214, 84, 58, 255]),   // dusk red
    ('b', [58, 92, 196, 255]),   // deep blue
    ('c', [108, 198, 255, 255]), // ice cyan
    ('w', [244, 248, 255, 255]), // near white
    ('p', [154, 98, 230, 255]),  // violet
    ('m', [236, 120, 214, 255]), // magenta
    ('g', [128, 168, 112, 255]), // sage green
    ('d', [84, 64, 56, 255]),    // dark soil
    ('k', [10, 8, 16, 255]),     // void black
    ('t', [190, 214, 255, 150]), // translucent comet tail
];

/// Category of cosmic object a sprite depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Planet,
    Galaxy,
    Comet,
    BlackHole,
}

impl SpriteKind {
    /// Spin rate range drawn at respawn, radians per second.
    pub fn spin_range(&self) -> Range<f32> {
        match self {
            SpriteKind::Galaxy => -0.32..0.32,
            SpriteKind::BlackHole => -0.26..0.26,
            SpriteKind::Comet => -0.08..0.08,
            SpriteKind::Planet => -0.14..0.14,
        }
    }

    /// Opacity boost for the distant beacon-point layer.
    pub fn point_boost(&self) -> f32 {
        match self {
            SpriteKind::Galaxy => 1.25,
            SpriteKind::BlackHole => 1.3,
            SpriteKind::Comet => 1.12,
            SpriteKind::Planet => 1.0,
        }
    }

    /// Opacity boost for the resolved sprite layer.
    pub fn sprite_boost(&self) -> f32 {
        match self {
            SpriteKind::Galaxy => 1.15,
            SpriteKind::BlackHole => 1.18,
            SpriteKind::Comet => 1.06,
            SpriteKind::Planet => 1.0,
        }
    }
}

/// Slot-to-kind schedule for mobile pools.
pub const MOBILE_KIND_SEQUENCE: &[SpriteKind] = &[
    SpriteKind::Planet,
    SpriteKind::Galaxy,
    SpriteKind::Comet,
    SpriteKind::BlackHole,
];

/// Slot-to-kind schedule for desktop pools; planets dominate.
pub const DESKTOP_KIND_SEQUENCE: &[SpriteKind] = &[
    SpriteKind::Planet,
    SpriteKind::Galaxy,
    SpriteKind::Planet,
    SpriteKind::Comet,
    SpriteKind::Planet,
    SpriteKind::BlackHole,
];

/// One authored sprite: pixel rows plus the tuning the field reads at
/// respawn time.
#[derive(Clone, Debug)]
pub struct SpriteDef {
    pub kind: SpriteKind,
    /// Pixel rows, one token per pixel, `.` transparent.
    pub rows: &'static [&'static str],
    /// World-scale range drawn at respawn.
    pub base_scale: Range<f32>,
    /// Color of the distant beacon point for this object.
    pub beacon_color: Vec3,
}

const GAS_PLANET: &[&str] = &[
    "...ooo...",
    ".ooyyyoo.",
    ".oyyoyyo.",
    "ooyyyyyoo",
    "orrrrrrro",
    "ooyyyyyoo",
    ".oyyoyyo.",
    ".ooyyyoo.",
    "...ooo...",
];

const ICE_PLANET: &[&str] = &[
    "...bbb...",
    ".bbcccbb.",
    ".bcwwccb.",
    "bccwwwccb",
    "bccccwccb",
    "bbcccccbb",
    ".bccwccb.",
    ".bbcccbb.",
    "...bbb...",
];

const MOSS_PLANET: &[&str] = &[
    "..ggg..",
    ".gddgg.",
    "gddgggg",
    "gdgggdg",
    "ggggddg",
    ".ggddg.",
    "..ggg..",
];

const SPIRAL_GALAXY: &[&str] = &[
    ".....p.....",
    "...ppwp....",
    "..pw..wp...",
    ".pw.ww.wp..",
    ".p.wmmw.p..",
    "p.wmwwmw.p.",
    ".p.wmmw.p..",
    ".pw.ww.wp..",
    "..pw..wp...",
    "...pwpp....",
    ".....p.....",
];

const COMET: &[&str] = &[
    "........ww.",
    "......wwcw.",
    "t..ttwccccw",
    ".ttwwcccwcw",
    "t..ttwccccw",
    "......wwcw.",
    "........ww.",
];

const BLACK_HOLE: &[&str] = &[
    "....ooo....",
    "..oo...oo..",
    ".o..kkk..o.",
    ".o.kkkkk.o.",
    "o.kkkkkkk.o",
    "o.kkkkkkk.o",
    "o.kkkkkkk.o",
    ".o.kkkkk.o.",
    ".o..kkk..o.",
    "..oo...oo..",
    "....ooo....",
];

/// Sprite definitions plus the palette that rasterizes them.
#[derive(Clone, Debug)]
pub struct SpriteCatalog {
    sprites: Vec<SpriteDef>,
    palette: Vec<(char, [u8; 4])>,
}

impl SpriteCatalog {
    /// The built-in cosmic object set: three planets, a galaxy, a comet,
    /// and a black hole.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                SpriteDef {
                    kind: SpriteKind::Planet,
                    rows: GAS_PLANET,
                    base_scale: 2.6..3.4,
                    beacon_color: Vec3::new(1.0, 0.78, 0.46),
                },
                SpriteDef {
                    kind: SpriteKind::Planet,
                    rows: ICE_PLANET,
                    base_scale: 2.2..3.0,
                    beacon_color: Vec3::new(0.62, 0.82, 1.0),
                },
                SpriteDef {
                    kind: SpriteKind::Planet,
                    rows: MOSS_PLANET,
                    base_scale: 1.8..2.4,
                    beacon_color: Vec3::new(0.66, 0.88, 0.62),
                },
                SpriteDef {
                    kind: SpriteKind::Galaxy,
                    rows: SPIRAL_GALAXY,
                    base_scale: 3.2..4.2,
                    beacon_color: Vec3::new(0.84, 0.66, 1.0),
                },
                SpriteDef {
                    kind: SpriteKind::Comet,
                    rows: COMET,
                    base_scale: 2.0..2.8,
                    beacon_color: Vec3::new(0.88, 0.95, 1.0),
                },
                SpriteDef {
                    kind: SpriteKind::BlackHole,
                    rows: BLACK_HOLE,
                    base_scale: 3.0..3.8,
                    beacon_color: Vec3::new(1.0, 0.62, 0.3),
                },
            ],
            PIXEL_PALETTE.to_vec(),
        )
    }

    /// Build a catalog from custom sprites and palette.
    pub fn new(sprites: Vec<SpriteDef>, palette: Vec<(char, [u8; 4])>) -> Self {
        Self { sprites, palette }
    }

    /// Number of sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether the catalog holds no sprites.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprite definition by pool index, if present.
    pub fn get(&self, index: u32) -> Option<&SpriteDef> {
        self.sprites.get(index as usize)
    }

    /// All sprite definitions.
    pub fn sprites(&self) -> &[SpriteDef] {
        &self.sprites
    }

    /// Resolve a palette token to RGBA.
    fn color_for(&self, token: char) -> Option<[u8; 4]> {
        self.palette
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, c)| *c)
    }

    /// The kind schedule for a device class.
    pub fn kind_sequence(device: DeviceClass) -> &'static [SpriteKind] {
        match device {
            DeviceClass::Mobile => MOBILE_KIND_SEQUENCE,
            DeviceClass::Desktop => DESKTOP_KIND_SEQUENCE,
        }
    }

    /// Choose a sprite for a pool slot.
    ///
    /// The slot index walks the device's kind schedule cyclically, then a
    /// random member of that kind is drawn. A kind with no sprites falls
    /// back to a pooled draw across the whole catalog, and an empty catalog
    /// falls back to index 0 — selection never fails.
    pub fn pick(&self, rng: &mut SmallRng, slot_index: usize, device: DeviceClass) -> u32 {
        let sequence = Self::kind_sequence(device);
        let preferred = sequence[slot_index % sequence.len()];

        let pool: Vec<u32> = self
            .sprites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind == preferred)
            .map(|(i, _)| i as u32)
            .collect();

        if !pool.is_empty() {
            return pool[rng.gen_range(0..pool.len())];
        }
        if !self.sprites.is_empty() {
            return rng.gen_range(0..self.sprites.len()) as u32;
        }
        0
    }

    /// Check the catalog for authoring mistakes.
    ///
    /// Rasterization itself never fails (unknown tokens render transparent);
    /// this is the strict pass for catching typos up front.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (si, sprite) in self.sprites.iter().enumerate() {
            let Some(first) = sprite.rows.first() else {
                return Err(CatalogError::EmptySprite { sprite: si });
            };
            let width = first.chars().count();
            for (ri, row) in sprite.rows.iter().enumerate() {
                let found = row.chars().count();
                if found != width {
                    return Err(CatalogError::RaggedRows {
                        sprite: si,
                        row: ri,
                        expected: width,
                        found,
                    });
                }
                for token in row.chars() {
                    if token != '.' && self.color_for(token).is_none() {
                        return Err(CatalogError::UnknownToken {
                            sprite: si,
                            row: ri,
                            token,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Rasterize one sprite into an RGBA image, one pixel per token.
    ///
    /// `.` and unknown tokens stay transparent. Returns `None` for an
    /// out-of-range index or a sprite with no rows.
    pub fn rasterize(&self, index: u32) -> Option<RgbaImage> {
        let sprite = self.get(index)?;
        let height = sprite.rows.len() as u32;
        let width = sprite.rows.first()?.chars().count() as u32;
        if width == 0 {
            return None;
        }

        let mut img = RgbaImage::new(width, height);
        for (y, row) in sprite.rows.iter().enumerate() {
            for (x, token) in row.chars().enumerate() {
                if token == '.' {
                    continue;
                }
                let Some(color) = self.color_for(token) else {
                    continue;
                };
                if (x as u32) < width {
                    img.put_pixel(x as u32, y as u32, image::Rgba(color));
                }
            }
        }
        Some(img)
    }

    /// Rasterize every sprite in catalog order.
    pub fn rasterize_all(&self) -> Vec<RgbaImage> {
        (0..self.sprites.len() as u32)
            .filter_map(|i| self.rasterize(i))
            .collect()
    }

    /// Write every sprite texture as `sprite_<index>.png` under `dir`,
    /// returning the written paths.
    pub fn export_png(&self, dir: &Path) -> Result<Vec<PathBuf>, SpriteWriteError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.sprites.len());
        for index in 0..self.sprites.len() as u32 {
            if let Some(img) = self.rasterize(index) {
                let path = dir.join(format!("sprite_{}.png", index));
                img.save(&path)?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
