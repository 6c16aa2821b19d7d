//! Pixel geometry and decoded layer images.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba32FImage, RgbaImage};

/// Largest width or height a scaled layer may reach.
///
/// Anything larger is far outside any icon canvas and would only allocate.
pub const MAX_SCALED_SIDE: u32 = 8192;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Multiplies both dimensions by `factor`, truncating toward zero.
    ///
    /// Returns `None` for a non-finite or non-positive factor, or when either
    /// resulting dimension would be zero or exceed [`MAX_SCALED_SIDE`].
    pub fn scaled(&self, factor: f64) -> Option<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        let side = |length: u32| {
            let scaled = (length as f64 * factor).trunc();
            (scaled >= 1.0 && scaled <= MAX_SCALED_SIDE as f64).then_some(scaled as u32)
        };
        Some(Self::new(side(self.width)?, side(self.height)?))
    }
}

/// A decoded layer asset, ready to be composited.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerImage {
    /// The asset name as declared in the manifest.
    pub name: String,

    /// Pixel data in straight (non-premultiplied) RGBA.
    pub data: RgbaImage,
}

impl LayerImage {
    pub fn new(name: impl Into<String>, data: RgbaImage) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Resamples the image by `factor` with a Lanczos3 filter.
    ///
    /// Filtering happens on premultiplied alpha so the color of transparent
    /// pixels never bleeds into visible edges. A factor of exactly 1 returns
    /// the image untouched. Returns `None` when the factor cannot produce a
    /// drawable image (see [`SizePx::scaled`]).
    pub fn scaled(self, factor: f64) -> Option<Self> {
        if factor == 1.0 {
            return Some(self);
        }
        let target = self.dimensions().scaled(factor)?;

        let mut premul = DynamicImage::ImageRgba8(self.data).into_rgba32f();
        premultiply_in_place(&mut premul);
        let mut resized = imageops::resize(&premul, target.width, target.height, FilterType::Lanczos3);
        unpremultiply_in_place(&mut resized);

        Some(Self {
            name: self.name,
            data: DynamicImage::ImageRgba32F(resized).into_rgba8(),
        })
    }
}

fn premultiply_in_place(image: &mut Rgba32FImage) {
    for px in image.pixels_mut() {
        let a = px[3];
        px[0] *= a;
        px[1] *= a;
        px[2] *= a;
    }
}

fn unpremultiply_in_place(image: &mut Rgba32FImage) {
    for px in image.pixels_mut() {
        let a = px[3];
        if a <= 0.0 {
            px.0 = [0.0; 4];
            continue;
        }
        px[0] = (px[0] / a).min(1.0);
        px[1] = (px[1] / a).min(1.0);
        px[2] = (px[2] / a).min(1.0);
    }
}
