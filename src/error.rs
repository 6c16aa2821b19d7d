//! Error types for the flattening pipeline.
//!
//! Only fatal conditions are represented here. Per-layer problems such as a
//! missing asset are reported through [`SkipReason`](crate::SkipReason) and
//! never abort a run.

use std::path::PathBuf;

pub type FlattenResult<T> = Result<T, FlattenError>;

#[derive(thiserror::Error, Debug)]
pub enum FlattenError {
    #[error("{} is not a valid icon folder", .0.display())]
    NotADirectory(PathBuf),

    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode layer asset {}: {source}", path.display())]
    AssetDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
