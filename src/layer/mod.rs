//! Layer resolution and compositing primitives.
//!
//! [`LayerResolver`] turns manifest layer entries into decoded
//! [`LayerImage`]s. A layer that cannot be drawn for a per-item reason is
//! reported as a [`SkipReason`] instead of an error so that one bad layer
//! never aborts the whole flatten.

pub mod blend;
pub mod placement;

pub use placement::Placement;

use std::fmt;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader};

use crate::error::{FlattenError, FlattenResult};
use crate::icon::LayerImage;
use crate::manifest::Layer;

// ============================================================================
// SkipReason
// ============================================================================

/// Why a layer entry contributed nothing to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The entry has no `image-name`.
    MetadataOnly,
    /// The declared asset does not exist on disk.
    MissingAsset(PathBuf),
    /// The scale factor is non-positive, non-finite, shrinks the layer to
    /// nothing, or grows it past [`MAX_SCALED_SIDE`](crate::MAX_SCALED_SIDE).
    UnusableScale { name: String, scale: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetadataOnly => f.write_str("layer has no image"),
            Self::MissingAsset(path) => write!(f, "image not found: {}", path.display()),
            Self::UnusableScale { name, scale } => {
                write!(f, "scale {scale} is unusable for {name}")
            }
        }
    }
}

// ============================================================================
// LayerResolver
// ============================================================================

/// Outcome of resolving one layer entry.
#[derive(Debug)]
pub enum Resolution {
    Ready(LayerImage),
    Skipped(SkipReason),
}

/// Locates and decodes layer assets inside an icon's assets folder.
#[derive(Debug, Clone)]
pub struct LayerResolver {
    assets_dir: PathBuf,
}

impl LayerResolver {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    /// Resolves a layer entry to its decoded image.
    ///
    /// Entries without an image and entries whose asset is missing are
    /// skipped. An asset that exists but cannot be decoded is an error.
    pub fn resolve(&self, layer: &Layer) -> FlattenResult<Resolution> {
        let Some(name) = layer.image_name.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(Resolution::Skipped(SkipReason::MetadataOnly));
        };

        let path = self.assets_dir.join(name);
        if !path.is_file() {
            return Ok(Resolution::Skipped(SkipReason::MissingAsset(path)));
        }

        let data = decode_rgba(&path).map_err(|source| FlattenError::AssetDecode { path, source })?;
        Ok(Resolution::Ready(LayerImage::new(name, data)))
    }
}

fn decode_rgba(path: &Path) -> Result<image::RgbaImage, ImageError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.into_rgba8())
}

// ============================================================================
// Tests
// ============================================================================
