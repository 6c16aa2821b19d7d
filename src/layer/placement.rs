//! Where a layer lands on the canvas.

use crate::icon::SizePx;
use crate::manifest::Position;

/// The top-left pixel at which a layer is pasted, plus the scale it was
/// drawn at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub scale: f64,
}

impl Placement {
    /// Centers a layer of `layer` size on `canvas`, then shifts it by the
    /// position's translation.
    ///
    /// `layer` must already be the post-scale size. Coordinates are computed
    /// in floating point and truncated toward zero, never rounded:
    /// `x = trunc(canvas.width / 2 - layer.width / 2 + dx)`.
    pub fn centered(canvas: SizePx, layer: SizePx, position: &Position) -> Self {
        let [dx, dy] = position.translation_in_points;
        let x = canvas.width as f64 / 2.0 - layer.width as f64 / 2.0 + dx;
        let y = canvas.height as f64 / 2.0 - layer.height as f64 / 2.0 + dy;
        Self {
            x: x.trunc() as i64,
            y: y.trunc() as i64,
            scale: position.scale,
        }
    }
}
