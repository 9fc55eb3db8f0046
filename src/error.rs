//! Error types for warpfield.
//!
//! The per-tick simulation path is infallible by design; everything that can
//! fail happens at authoring or export time (sprite catalog validation,
//! writing textures to disk).

use std::fmt;

/// Problems found while validating a sprite catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// A sprite has no pixel rows at all.
    EmptySprite {
        /// Index of the offending sprite in the catalog.
        sprite: usize,
    },
    /// A sprite's rows are not all the same length.
    RaggedRows {
        sprite: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A row references a token missing from the palette.
    UnknownToken {
        sprite: usize,
        row: usize,
        token: char,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::EmptySprite { sprite } => {
                write!(f, "Sprite {} has no pixel rows", sprite)
            }
            CatalogError::RaggedRows { sprite, row, expected, found } => write!(
                f,
                "Sprite {} row {} is {} tokens wide, expected {}",
                sprite, row, found, expected
            ),
            CatalogError::UnknownToken { sprite, row, token } => write!(
                f,
                "Sprite {} row {} uses token '{}' missing from the palette",
                sprite, row, token
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Errors from exporting sprite textures to disk.
#[derive(Debug)]
pub enum SpriteWriteError {
    /// Encoding or writing the image failed.
    Image(image::ImageError),
    /// Creating the output directory failed.
    Io(std::io::Error),
}

impl fmt::Display for SpriteWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteWriteError::Image(e) => write!(f, "Failed to write sprite image: {}", e),
            SpriteWriteError::Io(e) => write!(f, "Failed to create sprite output directory: {}", e),
        }
    }
}

impl std::error::Error for SpriteWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpriteWriteError::Image(e) => Some(e),
            SpriteWriteError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for SpriteWriteError {
    fn from(e: image::ImageError) -> Self {
        SpriteWriteError::Image(e)
    }
}

impl From<std::io::Error> for SpriteWriteError {
    fn from(e: std::io::Error) -> Self {
        SpriteWriteError::Io(e)
    }
}
