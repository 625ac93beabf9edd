//! Document types for contentsnap.
//!
//! This crate defines the schema layer: the YAML content snap manifest
//! (`SnapManifest`), the TOML version catalogue (`Catalogue`), and the key
//! newtypes shared by both.

pub mod catalogue;
pub mod manifest;
pub mod types;

pub use catalogue::{parse_catalogue_str, Catalogue, CatalogueError, LibraryEntry};
pub use manifest::{parse_manifest_str, ManifestError, SnapDescription, SnapManifest};
pub use types::{LibraryKey, SnapKey};
