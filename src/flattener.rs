//! The flattening pipeline: manifest → canvas → opaque PNG.

use std::path::Path;

use image::{ImageError, ImageFormat, RgbImage};
use palette::Srgb;
use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::error::{FlattenError, FlattenResult};
use crate::icon::SizePx;
use crate::layer::{LayerResolver, Placement, Resolution, SkipReason};
use crate::manifest::Manifest;

// ============================================================================
// FlattenOptions
// ============================================================================

/// Settings for a flatten run. The defaults match the Icon Composer layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Side length of the square output, in pixels.
    pub canvas_size: u32,
    /// File name of the manifest inside the icon folder.
    pub manifest_name: String,
    /// Folder inside the icon folder that holds the layer assets.
    pub assets_dir_name: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            canvas_size: 1024,
            manifest_name: "icon.json".to_string(),
            assets_dir_name: "Assets".to_string(),
        }
    }
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas_size(mut self, canvas_size: u32) -> Self {
        self.canvas_size = canvas_size;
        self
    }

    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn with_assets_dir_name(mut self, name: impl Into<String>) -> Self {
        self.assets_dir_name = name.into();
        self
    }
}

// ============================================================================
// FlattenReport
// ============================================================================

/// What happened to one layer entry.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerOutcome {
    Composited {
        name: String,
        /// Size after scaling.
        size: SizePx,
        placement: Placement,
    },
    Skipped(SkipReason),
}

/// Summary of a flatten run, in manifest order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenReport {
    pub fill: Srgb<u8>,
    pub canvas_size: SizePx,
    pub layers: Vec<LayerOutcome>,
}

impl FlattenReport {
    /// Number of layers actually drawn.
    pub fn composited_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|outcome| matches!(outcome, LayerOutcome::Composited { .. }))
            .count()
    }

    /// Reasons for every layer that was not drawn.
    pub fn skipped(&self) -> impl Iterator<Item = &SkipReason> {
        self.layers.iter().filter_map(|outcome| match outcome {
            LayerOutcome::Skipped(reason) => Some(reason),
            LayerOutcome::Composited { .. } => None,
        })
    }
}

// ============================================================================
// Flattener
// ============================================================================

/// Flattens layered icon folders into opaque PNGs.
///
/// # Example
///
/// ```no_run
/// use icon_flattener::{FlattenOptions, Flattener};
///
/// let flattener = Flattener::new(FlattenOptions::default());
/// let report = flattener.run("AppIcon.icon".as_ref(), "AppIcon.png".as_ref())?;
/// println!("drew {} layers", report.composited_count());
/// # Ok::<(), icon_flattener::FlattenError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    options: FlattenOptions,
}

impl Flattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self { options }
    }

    /// Loads the manifest of `icon_folder`, checking the folder first.
    pub fn load_manifest(&self, icon_folder: &Path) -> FlattenResult<Manifest> {
        if !icon_folder.is_dir() {
            return Err(FlattenError::NotADirectory(icon_folder.to_path_buf()));
        }
        Manifest::load(icon_folder, &self.options.manifest_name)
    }

    /// Draws every layer of `manifest` onto a fresh canvas.
    ///
    /// Layers are drawn strictly in manifest order. Missing assets and
    /// unusable scales are logged and skipped; only decode failures abort.
    pub fn composite(
        &self,
        icon_folder: &Path,
        manifest: &Manifest,
    ) -> FlattenResult<(Canvas, FlattenReport)> {
        let fill = manifest.fill_color();
        info!("background color: RGB({}, {}, {})", fill.red, fill.green, fill.blue);

        let mut canvas = Canvas::new(self.options.canvas_size, fill);
        let resolver = LayerResolver::new(icon_folder.join(&self.options.assets_dir_name));
        let mut outcomes = Vec::new();

        for layer in manifest.layers() {
            let image = match resolver.resolve(layer)? {
                Resolution::Ready(image) => image,
                Resolution::Skipped(reason) => {
                    log_skip(&reason);
                    outcomes.push(LayerOutcome::Skipped(reason));
                    continue;
                }
            };

            let position = layer.position();
            let name = image.name.clone();
            let Some(image) = image.scaled(position.scale) else {
                let reason = SkipReason::UnusableScale {
                    name,
                    scale: position.scale,
                };
                log_skip(&reason);
                outcomes.push(LayerOutcome::Skipped(reason));
                continue;
            };

            let size = image.dimensions();
            let placement = Placement::centered(canvas.size(), size, &position);
            info!(
                "layer {name}: position ({}, {}), scale {}",
                placement.x, placement.y, placement.scale
            );
            canvas.paste(&image, placement);
            outcomes.push(LayerOutcome::Composited {
                name,
                size,
                placement,
            });
        }

        let report = FlattenReport {
            fill,
            canvas_size: canvas.size(),
            layers: outcomes,
        };
        Ok((canvas, report))
    }

    /// Runs the whole pipeline and writes the flattened PNG to `output`.
    #[tracing::instrument(skip(self))]
    pub fn run(&self, icon_folder: &Path, output: &Path) -> FlattenResult<FlattenReport> {
        let manifest = self.load_manifest(icon_folder)?;
        let (canvas, report) = self.composite(icon_folder, &manifest)?;
        write_png(&canvas.flatten(), output)?;

        info!(
            "icon written: {} ({}x{}, no alpha)",
            output.display(),
            report.canvas_size.width,
            report.canvas_size.height
        );
        Ok(report)
    }
}

/// Flattens `icon_folder` into `output` with default options.
pub fn flatten_icon(icon_folder: &Path, output: &Path) -> FlattenResult<FlattenReport> {
    Flattener::default().run(icon_folder, output)
}

fn log_skip(reason: &SkipReason) {
    match reason {
        SkipReason::MetadataOnly => debug!("skipping layer: {reason}"),
        _ => warn!("skipping layer: {reason}"),
    }
}

/// Writes `image` as PNG, regardless of the extension of `path`.
///
/// Missing parent directories are created.
pub fn write_png(image: &RgbImage, path: &Path) -> FlattenResult<()> {
    let write_error = |source: ImageError| FlattenError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_error(ImageError::IoError(e)))?;
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(write_error)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Fill, Group, Layer, Position};
    use image::{Rgba, RgbaImage};

    struct IconFolder {
        dir: tempfile::TempDir,
    }

    impl IconFolder {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join("Assets")).unwrap();
            Self { dir }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn asset(&self, name: &str, width: u32, height: u32, pixel: [u8; 4]) {
            RgbaImage::from_pixel(width, height, Rgba(pixel))
                .save(self.path().join("Assets").join(name))
                .unwrap();
        }
    }

    fn manifest(fill: &str, layers: Vec<Layer>) -> Manifest {
        Manifest {
            fill: Some(Fill::solid(fill)),
            groups: vec![Group { layers }],
        }
    }

    #[test]
    fn default_options() {
        let options = FlattenOptions::default();
        assert_eq!(options.canvas_size, 1024);
        assert_eq!(options.manifest_name, "icon.json");
        assert_eq!(options.assets_dir_name, "Assets");

        let custom = FlattenOptions::new()
            .with_canvas_size(64)
            .with_manifest_name("manifest.json")
            .with_assets_dir_name("layers");
        assert_eq!(custom.canvas_size, 64);
        assert_eq!(custom.manifest_name, "manifest.json");
        assert_eq!(custom.assets_dir_name, "layers");
    }

    #[test]
    fn empty_manifest_yields_flat_fill() {
        let folder = IconFolder::new();
        let flattener = Flattener::default();

        let (canvas, report) = flattener
            .composite(folder.path(), &manifest("srgb:0,0.5,1", vec![]))
            .unwrap();

        assert_eq!(report.canvas_size, SizePx::square(1024));
        assert!(report.layers.is_empty());
        assert!(canvas.pixels().pixels().all(|p| p.0 == [0, 128, 255, 255]));
    }

    #[test]
    fn layers_are_centered_and_drawn_in_order() {
        let folder = IconFolder::new();
        folder.asset("big.png", 200, 200, [255, 0, 0, 255]);
        folder.asset("small.png", 100, 100, [0, 255, 0, 255]);
        let flattener = Flattener::new(FlattenOptions::new().with_canvas_size(400));

        let (canvas, report) = flattener
            .composite(
                folder.path(),
                &manifest("srgb:1,1,1", vec![Layer::new("big.png"), Layer::new("small.png")]),
            )
            .unwrap();

        assert_eq!(report.composited_count(), 2);
        let pixels = canvas.pixels();
        // small covers 150..250, big covers 100..300
        assert_eq!(pixels.get_pixel(200, 200).0, [0, 255, 0, 255]);
        assert_eq!(pixels.get_pixel(120, 120).0, [255, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(99, 99).0, [255, 255, 255, 255]);
    }

    #[test]
    fn reversing_manifest_order_reverses_occlusion() {
        let folder = IconFolder::new();
        folder.asset("a.png", 50, 50, [255, 0, 0, 255]);
        folder.asset("b.png", 50, 50, [0, 0, 255, 255]);
        let flattener = Flattener::new(FlattenOptions::new().with_canvas_size(100));

        let (canvas, _) = flattener
            .composite(
                folder.path(),
                &manifest("srgb:0,0,0", vec![Layer::new("b.png"), Layer::new("a.png")]),
            )
            .unwrap();

        assert_eq!(canvas.pixels().get_pixel(50, 50).0, [255, 0, 0, 255]);
    }

    #[test]
    fn scale_and_translation_are_applied() {
        let folder = IconFolder::new();
        folder.asset("dot.png", 10, 10, [0, 0, 0, 255]);
        let flattener = Flattener::new(FlattenOptions::new().with_canvas_size(100));
        let layer = Layer::new("dot.png").with_position(Position::new(2.0, [15.0, -10.0]));

        let (_, report) = flattener
            .composite(folder.path(), &manifest("srgb:1,1,1", vec![layer]))
            .unwrap();

        match &report.layers[0] {
            LayerOutcome::Composited { size, placement, .. } => {
                assert_eq!(*size, SizePx::square(20));
                assert_eq!((placement.x, placement.y), (55, 30));
                assert_eq!(placement.scale, 2.0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn missing_and_unusable_layers_are_skipped() {
        let folder = IconFolder::new();
        folder.asset("ok.png", 10, 10, [0, 0, 0, 255]);
        let flattener = Flattener::new(FlattenOptions::new().with_canvas_size(50));
        let layers = vec![
            Layer::default(),
            Layer::new("missing.png"),
            Layer::new("ok.png").with_position(Position::new(0.0, [0.0, 0.0])),
            Layer::new("ok.png"),
        ];

        let (canvas, report) = flattener
            .composite(folder.path(), &manifest("srgb:1,1,1", layers))
            .unwrap();

        assert_eq!(report.composited_count(), 1);
        let skipped: Vec<_> = report.skipped().collect();
        assert_eq!(skipped.len(), 3);
        assert_eq!(*skipped[0], SkipReason::MetadataOnly);
        assert!(matches!(skipped[1], SkipReason::MissingAsset(_)));
        assert!(matches!(skipped[2], SkipReason::UnusableScale { .. }));
        assert_eq!(canvas.pixels().get_pixel(25, 25).0, [0, 0, 0, 255]);
    }

    #[test]
    fn load_manifest_rejects_non_directories() {
        let folder = IconFolder::new();
        let file = folder.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let err = Flattener::default().load_manifest(&file).unwrap_err();
        assert!(matches!(err, FlattenError::NotADirectory(_)));
    }

    #[test]
    fn write_png_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("deeper").join("icon.png");

        write_png(&RgbImage::new(2, 2), &out).unwrap();

        let written = image::open(&out).unwrap();
        assert_eq!(written.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn write_png_reports_unwritable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let err = write_png(&RgbImage::new(2, 2), &blocker.join("icon.png")).unwrap_err();
        assert!(matches!(err, FlattenError::Write { .. }));
    }
}
