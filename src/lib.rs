//! icon-flattener: turn layered icon folders into flat, opaque PNGs.
//!
//! An icon folder (as produced by Icon Composer) holds an `icon.json`
//! manifest and an `Assets/` directory of raster layers. The manifest names a
//! solid background fill and an ordered list of layer groups; each layer can
//! be scaled and offset from the canvas center.
//!
//! Flattening paints the fill onto a 1024×1024 canvas, draws every layer in
//! manifest order, drops the alpha channel, and writes a PNG.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = icon_flattener::flatten_icon(
//!     Path::new("assets/icons/AppIcon.icon"),
//!     Path::new("assets/icons/AppIconFlat.png"),
//! )?;
//!
//! for reason in report.skipped() {
//!     eprintln!("skipped: {reason}");
//! }
//! # Ok::<(), icon_flattener::FlattenError>(())
//! ```
//!
//! # Partial failures
//!
//! A layer whose asset is missing is skipped with a warning, and a malformed
//! fill color falls back to opaque white. Only a missing or malformed
//! manifest, an undecodable asset, or an unwritable output abort the run.

mod canvas;
mod color;
mod error;
mod flattener;
mod icon;
mod layer;
mod manifest;

pub use canvas::Canvas;
pub use color::{WHITE, opaque_pixel, parse_tagged_color};
pub use error::{FlattenError, FlattenResult};
pub use flattener::{
    FlattenOptions, FlattenReport, Flattener, LayerOutcome, flatten_icon, write_png,
};
pub use icon::{LayerImage, MAX_SCALED_SIDE, SizePx};
pub use layer::{LayerResolver, Placement, Resolution, SkipReason};
pub use manifest::{Fill, FillSpec, Group, Layer, Manifest, Position};
