use crate::resolve::{resolve_in_place, ResolvedSnap};
use crate::CoreError;
use contentsnap_schema::{parse_catalogue_str, parse_manifest_str, Catalogue, SnapManifest};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const DEFAULT_MANIFEST: &str = "supported.yaml";
pub const DEFAULT_CATALOGUE: &str = "supported.versions.toml";
pub const DEFAULT_OUTPUT: &str = "transformed.yaml";

/// The three files a resolve run touches.
///
/// `Default` yields the fixed names relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePaths {
    pub manifest: PathBuf,
    pub catalogue: PathBuf,
    pub output: PathBuf,
}

impl Default for ResolvePaths {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            catalogue: PathBuf::from(DEFAULT_CATALOGUE),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Outcome of a successful [`run_resolve`].
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub manifest: PathBuf,
    pub catalogue: PathBuf,
    pub output: PathBuf,
    pub snaps: Vec<ResolvedSnap>,
}

pub fn load_catalogue(path: &Path) -> Result<Catalogue, CoreError> {
    let content = fs::read_to_string(path).map_err(CoreError::io(path))?;
    parse_catalogue_str(&content).map_err(|source| CoreError::Catalogue {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_manifest(path: &Path) -> Result<SnapManifest, CoreError> {
    let content = fs::read_to_string(path).map_err(CoreError::io(path))?;
    parse_manifest_str(&content).map_err(|source| CoreError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

/// Give the temp file the permissions `dest` already has, or `0644` for a
/// new file (`NamedTempFile` creates it owner-only).
#[cfg(unix)]
fn apply_output_permissions(tmp: &Path, dest: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::metadata(dest).map_or_else(
        |_| fs::Permissions::from_mode(0o644),
        |meta| meta.permissions(),
    );
    fs::set_permissions(tmp, perms)
}

#[cfg(not(unix))]
fn apply_output_permissions(_tmp: &Path, _dest: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Write `content` to `dest` through a temporary file in the same directory,
/// so readers never observe a half-written file.
pub fn write_atomic(dest: &Path, content: &str) -> Result<(), CoreError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(CoreError::io(&dir))?;
    tmp.write_all(content.as_bytes())
        .map_err(CoreError::io(tmp.path()))?;
    apply_output_permissions(tmp.path(), dest).map_err(CoreError::io(tmp.path()))?;
    tmp.as_file().sync_all().map_err(CoreError::io(tmp.path()))?;
    tmp.persist(dest).map_err(|e| CoreError::Io {
        path: dest.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

pub fn write_manifest(path: &Path, manifest: &SnapManifest) -> Result<(), CoreError> {
    let yaml = manifest.to_yaml_string().map_err(CoreError::Serialize)?;
    write_atomic(path, &yaml)
}

/// Load the catalogue and manifest, resolve every snap, then write the
/// result. Nothing is written unless every snap resolved.
pub fn run_resolve(paths: &ResolvePaths) -> Result<ResolveReport, CoreError> {
    info!(
        "resolving {} against {}",
        paths.manifest.display(),
        paths.catalogue.display()
    );
    let catalogue = load_catalogue(&paths.catalogue)?;
    debug!("catalogue has {} libraries", catalogue.len());
    let mut manifest = load_manifest(&paths.manifest)?;
    debug!("manifest has {} content snaps", manifest.len());

    let snaps = resolve_in_place(&mut manifest, &catalogue)?;

    write_manifest(&paths.output, &manifest)?;
    info!(
        "wrote {} resolved snaps to {}",
        snaps.len(),
        paths.output.display()
    );

    Ok(ResolveReport {
        manifest: paths.manifest.clone(),
        catalogue: paths.catalogue.clone(),
        output: paths.output.clone(),
        snaps,
    })
}
