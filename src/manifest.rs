//! The `icon.json` manifest of a layered icon folder.
//!
//! Only the fields the flattener consumes are modelled; anything else in the
//! document is ignored.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "fill": { "solid": "srgb:1.00000,0.60392,0.33725,1.00000" },
//!   "groups": [
//!     {
//!       "layers": [
//!         {
//!           "image-name": "glyph.png",
//!           "position": { "scale": 0.8, "translation-in-points": [0, -40] }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::color::{WHITE, parse_tagged_color};
use crate::error::{FlattenError, FlattenResult};

// ============================================================================
// Manifest
// ============================================================================

/// A parsed icon manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Manifest {
    /// Background fill. `None` means opaque white.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,

    /// Layer groups in drawing order.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Manifest {
    /// Loads `<folder>/<manifest_name>`.
    ///
    /// A missing manifest is reported as [`FlattenError::ManifestNotFound`];
    /// malformed JSON as [`FlattenError::ManifestParse`].
    pub fn load(folder: &Path, manifest_name: &str) -> FlattenResult<Self> {
        let path = folder.join(manifest_name);
        if !path.is_file() {
            return Err(FlattenError::ManifestNotFound(path));
        }

        let json = std::fs::read_to_string(&path).map_err(|source| FlattenError::ManifestRead {
            path: path.clone(),
            source,
        })?;

        Self::from_json(&json).map_err(|source| FlattenError::ManifestParse { path, source })
    }

    /// Deserializes a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the manifest to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The background color, defaulting to opaque white.
    pub fn fill_color(&self) -> Srgb<u8> {
        self.fill
            .as_ref()
            .and_then(Fill::solid_color)
            .map(parse_tagged_color)
            .unwrap_or(WHITE)
    }

    /// Every layer of every group, in drawing order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.groups.iter().flat_map(|group| group.layers.iter())
    }

    /// Returns the JSON schema of the consumed manifest subset.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Manifest)
    }
}

// ============================================================================
// Fill
// ============================================================================

/// The `fill` section.
///
/// Icon Composer writes either an object (`{"solid": "..."}`,
/// `{"automatic-gradient": "..."}`) or a bare keyword such as `"automatic"`.
/// Only solid fills are honored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Fill {
    Spec(FillSpec),
    Keyword(String),
}

impl Fill {
    /// Creates a solid fill from a tagged color string.
    pub fn solid(color: impl Into<String>) -> Self {
        Self::Spec(FillSpec {
            solid: Some(color.into()),
        })
    }

    fn solid_color(&self) -> Option<&str> {
        match self {
            Self::Spec(spec) => spec.solid.as_deref(),
            Self::Keyword(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FillSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid: Option<String>,
}

// ============================================================================
// Groups & Layers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Group {
    /// Layers in drawing order.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// One entry of a group's `layers` list.
///
/// Entries without an `image-name` carry metadata only and are not drawn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Layer {
    /// Asset file name, relative to the icon's assets folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Layer {
    /// Creates a layer drawing `image_name` at the default position.
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: Some(image_name.into()),
            position: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// The effective position; an absent `position` means scale 1, no offset.
    pub fn position(&self) -> Position {
        self.position.unwrap_or_default()
    }
}

/// Scale and offset of a layer relative to the canvas center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Position {
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Offset in canvas points, `[dx, dy]`.
    #[serde(default)]
    pub translation_in_points: [f64; 2],
}

impl Position {
    pub fn new(scale: f64, translation_in_points: [f64; 2]) -> Self {
        Self {
            scale,
            translation_in_points,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(default_scale(), [0.0, 0.0])
    }
}

fn default_scale() -> f64 {
    1.0
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_deserializes() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert!(manifest.fill.is_none());
        assert!(manifest.groups.is_empty());
        assert_eq!(manifest.fill_color(), WHITE);
        assert_eq!(manifest.layers().count(), 0);
    }

    #[test]
    fn reads_solid_fill_and_layers() {
        let json = r#"{
            "fill": { "solid": "srgb:0.00000,0.50000,1.00000,1.00000" },
            "groups": [
                { "layers": [
                    { "image-name": "a.png", "name": "a" },
                    { "image-name": "b.png",
                      "position": { "scale": 0.5, "translation-in-points": [10, -20.5] } }
                ] },
                { "shadow": { "kind": "neutral" } },
                { "layers": [ { "name": "metadata only" } ] }
            ],
            "supported-platforms": { "squares": "shared" }
        }"#;
        let manifest = Manifest::from_json(json).unwrap();

        let fill = manifest.fill_color();
        assert_eq!((fill.red, fill.green, fill.blue), (0, 128, 255));

        let layers: Vec<_> = manifest.layers().collect();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].image_name.as_deref(), Some("a.png"));
        assert_eq!(layers[0].position(), Position::default());
        assert_eq!(layers[1].position(), Position::new(0.5, [10.0, -20.5]));
        assert!(layers[2].image_name.is_none());
    }

    #[test]
    fn partial_position_uses_defaults() {
        let json = r#"{ "groups": [ { "layers": [
            { "image-name": "a.png", "position": { "translation-in-points": [4, 8] } },
            { "image-name": "b.png", "position": { "scale": 2 } }
        ] } ] }"#;
        let manifest = Manifest::from_json(json).unwrap();
        let layers: Vec<_> = manifest.layers().collect();
        assert_eq!(layers[0].position(), Position::new(1.0, [4.0, 8.0]));
        assert_eq!(layers[1].position(), Position::new(2.0, [0.0, 0.0]));
    }

    #[test]
    fn non_solid_fills_default_to_white() {
        for json in [
            r#"{ "fill": "automatic" }"#,
            r#"{ "fill": { "automatic-gradient": "srgb:0,0,0,1" } }"#,
            r#"{ "fill": {} }"#,
            r#"{ "fill": null }"#,
        ] {
            let manifest = Manifest::from_json(json).unwrap();
            assert_eq!(manifest.fill_color(), WHITE, "json {json}");
        }
    }

    #[test]
    fn malformed_fill_color_defaults_to_white() {
        let manifest = Manifest::from_json(r#"{ "fill": { "solid": "bogus" } }"#).unwrap();
        assert_eq!(manifest.fill_color(), WHITE);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(Manifest::from_json("{ \"groups\": [").is_err());
        assert!(Manifest::from_json(r#"{ "groups": "nope" }"#).is_err());
    }

    #[test]
    fn builder_round_trips_through_json() {
        let manifest = Manifest {
            fill: Some(Fill::solid("srgb:1,0,0")),
            groups: vec![Group {
                layers: vec![Layer::new("a.png").with_position(Position::new(2.0, [1.0, 2.0]))],
            }],
        };
        let json = manifest.to_json_pretty().unwrap();
        assert!(json.contains("\"image-name\""));
        assert!(json.contains("\"translation-in-points\""));
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }

    #[test]
    fn load_reports_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(dir.path(), "icon.json").unwrap_err();
        assert!(matches!(err, FlattenError::ManifestNotFound(path) if path.ends_with("icon.json")));
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon.json"), "not json").unwrap();
        let err = Manifest::load(dir.path(), "icon.json").unwrap_err();
        assert!(matches!(err, FlattenError::ManifestParse { .. }));
    }

    #[cfg(feature = "jsonschema")]
    #[test]
    fn schema_names_consumed_fields() {
        let schema = serde_json::to_string(&Manifest::json_schema()).unwrap();
        assert!(schema.contains("image-name"));
        assert!(schema.contains("translation-in-points"));
    }
}
