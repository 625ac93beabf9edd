//! Version resolution and content snap generation for contentsnap.
//!
//! This crate ties the schema documents together: it resolves each content
//! snap's symbolic `version` against the library catalogue (`resolve`),
//! runs the load → resolve → write pipeline over files (`run_resolve`), and
//! renders per-snap build directories from a template tree (`generate`).

pub mod generate;
pub mod pipeline;
pub mod resolve;
pub mod template;

pub use generate::{
    catalogue_path_for, generate, load_content_snaps, write_content_snap, ContentSnap,
    GenerateOptions, GenerateReport, GeneratedSnap, DEFAULT_DESTINATION,
};
pub use pipeline::{
    load_catalogue, load_manifest, run_resolve, write_atomic, write_manifest, ResolvePaths,
    ResolveReport, DEFAULT_CATALOGUE, DEFAULT_MANIFEST, DEFAULT_OUTPUT,
};
pub use resolve::{resolve, resolve_in_place, ResolveError, ResolvedSnap};
pub use template::substitute;

use contentsnap_schema::{CatalogueError, ManifestError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {}: {source}", path.display())]
    Catalogue {
        path: PathBuf,
        source: CatalogueError,
    },
    #[error("parse error: {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: ManifestError,
    },
    #[error("lookup error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("I/O error: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(ManifestError),
    #[error("template error: no template for '{snap}' in {}", dir.display())]
    MissingTemplate { snap: String, dir: PathBuf },
}

/// Coarse classification of a [`CoreError`], used to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Lookup,
    Io,
    Other,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Catalogue { .. } | Self::Manifest { .. } => ErrorKind::Parse,
            Self::Resolve(_) => ErrorKind::Lookup,
            Self::Io { .. } => ErrorKind::Io,
            Self::Serialize(_) | Self::MissingTemplate { .. } => ErrorKind::Other,
        }
    }

    /// Adapter for `map_err` that attaches the offending path to an I/O error.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
