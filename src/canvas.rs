//! The square raster the icon is flattened onto.

use image::{DynamicImage, RgbImage, RgbaImage};
use palette::Srgb;

use crate::color::opaque_pixel;
use crate::icon::{LayerImage, SizePx};
use crate::layer::Placement;
use crate::layer::blend::composite_over;

/// A fixed-size square RGBA canvas.
///
/// Created fully opaque in the background color. Layers are pasted in call
/// order, each one drawn over everything before it. The canvas dimensions
/// never change after creation.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Creates a `side × side` canvas filled with `fill` at full opacity.
    pub fn new(side: u32, fill: Srgb<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(side, side, opaque_pixel(fill)),
        }
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.image.width(), self.image.height())
    }

    /// Read-only view of the current pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }

    /// Pastes `layer` with its top-left corner at the placement, using the
    /// layer's alpha as the mask.
    pub fn paste(&mut self, layer: &LayerImage, placement: Placement) {
        composite_over(&mut self.image, &layer.data, placement.x, placement.y);
    }

    /// Discards the alpha channel.
    pub fn flatten(self) -> RgbImage {
        DynamicImage::ImageRgba8(self.image).into_rgb8()
    }
}
