use crate::pipeline::{load_catalogue, load_manifest};
use crate::resolve::resolve_in_place;
use crate::template::substitute;
use crate::CoreError;
use contentsnap_schema::{SnapDescription, SnapKey};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_DESTINATION: &str = "content";
const COMMON_TEMPLATE: &str = "common";
const TEMPLATE_SUFFIX: &str = ".yaml.template";
const DEFAULT_BUILD_JDK: &str = "openjdk-17-jdk-headless";

/// A resolved, non-tool content snap, ready to be rendered.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContentSnap {
    pub name: String,
    pub version: String,
    pub summary: String,
    pub description: String,
    pub upstream: String,
    pub license: String,
    pub build_jdk: String,
    pub extra_command: String,
}

impl ContentSnap {
    /// Build from a description whose `version` has already been resolved.
    /// `name` falls back to the snap key.
    pub fn from_description(key: &SnapKey, description: &SnapDescription) -> Self {
        let text = |field: &str| description.field_str(field).unwrap_or_default().to_owned();
        Self {
            name: description
                .field_str("name")
                .unwrap_or(key.as_str())
                .to_owned(),
            version: description.version.clone(),
            summary: text("summary"),
            description: text("description"),
            upstream: text("upstream"),
            license: text("license"),
            build_jdk: description
                .field_str("build-jdk")
                .unwrap_or(DEFAULT_BUILD_JDK)
                .to_owned(),
            extra_command: text("extra-command"),
        }
    }

    /// Placeholder values for `.yaml.template` files.
    pub fn replacements(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("version", self.version.clone()),
            ("summary", self.summary.clone()),
            ("description", indent_block(&self.description)),
            ("upstream", self.upstream.clone()),
            ("license", self.license.clone()),
            ("build-jdk", self.build_jdk.clone()),
            ("extra-command", self.extra_command.clone()),
        ])
    }
}

/// Indent every non-empty line by two spaces so the text can sit under a
/// YAML block scalar (`description: |`).
fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `supported.yaml` -> `supported.versions.toml`.
pub fn catalogue_path_for(manifest: &Path) -> PathBuf {
    manifest.with_extension("versions.toml")
}

/// Load the manifest and its sibling catalogue, drop tool snaps and resolve
/// the rest. Snaps are unique by name; the first one (in key order) wins.
pub fn load_content_snaps(manifest_path: &Path) -> Result<Vec<ContentSnap>, CoreError> {
    let catalogue = load_catalogue(&catalogue_path_for(manifest_path))?;
    let mut manifest = load_manifest(manifest_path)?;

    manifest.content_snaps.retain(|key, description| {
        if description.is_tool() {
            info!("skipping tool snap {key}");
            false
        } else {
            true
        }
    });
    resolve_in_place(&mut manifest, &catalogue)?;

    let mut by_name: BTreeMap<String, ContentSnap> = BTreeMap::new();
    for (key, description) in &manifest.content_snaps {
        let snap = ContentSnap::from_description(key, description);
        if by_name.contains_key(&snap.name) {
            warn!(
                "duplicate content snap name '{}' (key {key}), ignoring",
                snap.name
            );
            continue;
        }
        by_name.insert(snap.name.clone(), snap);
    }
    Ok(by_name.into_values().collect())
}

/// Template directory for `snap`: its own directory if present, otherwise
/// the shared `common` one.
fn template_source(snap: &ContentSnap, templates: &Path) -> Result<PathBuf, CoreError> {
    let own = templates.join(&snap.name);
    if own.is_dir() {
        return Ok(own);
    }
    debug!("{} not found, trying {COMMON_TEMPLATE}", own.display());
    let common = templates.join(COMMON_TEMPLATE);
    if common.is_dir() {
        return Ok(common);
    }
    Err(CoreError::MissingTemplate {
        snap: snap.name.clone(),
        dir: templates.to_path_buf(),
    })
}

/// Render a `.yaml.template` into `{base}.yaml`, or copy any other file as is.
fn render_or_copy(
    path: &Path,
    name: &str,
    target: &Path,
    vars: &BTreeMap<&str, String>,
    written: &mut Vec<PathBuf>,
) -> Result<(), CoreError> {
    let dest = if let Some(base) = name.strip_suffix(TEMPLATE_SUFFIX) {
        let content = fs::read_to_string(path).map_err(CoreError::io(path))?;
        let dest = target.join(format!("{base}.yaml"));
        debug!("render {} -> {}", path.display(), dest.display());
        fs::write(&dest, substitute(&content, vars)).map_err(CoreError::io(&dest))?;
        dest
    } else {
        let dest = target.join(name);
        debug!("copy {} -> {}", path.display(), dest.display());
        fs::copy(path, &dest).map_err(CoreError::io(&dest))?;
        dest
    };
    written.push(dest);
    Ok(())
}

/// Mirror `current` into `target`. Symlinks to files are materialised as
/// regular files; symlinks to directories and dangling links are skipped.
fn copy_tree(
    current: &Path,
    target: &Path,
    vars: &BTreeMap<&str, String>,
    written: &mut Vec<PathBuf>,
) -> Result<(), CoreError> {
    fs::create_dir_all(target).map_err(CoreError::io(target))?;

    let mut entries = fs::read_dir(current)
        .map_err(CoreError::io(current))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(CoreError::io(current))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        let file_type = entry.file_type().map_err(CoreError::io(&path))?;

        if file_type.is_dir() {
            copy_tree(&path, &target.join(&file_name), vars, written)?;
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {
                    render_or_copy(&path, &name, target, vars, written)?;
                }
                Ok(_) => warn!("skipping symlink to directory {}", path.display()),
                Err(e) => warn!("skipping unreadable symlink {}: {e}", path.display()),
            }
        } else {
            render_or_copy(&path, &name, target, vars, written)?;
        }
    }
    Ok(())
}

/// Render one content snap into `destination/<name>`. Returns the template
/// directory used and the files written.
pub fn write_content_snap(
    snap: &ContentSnap,
    destination: &Path,
    templates: &Path,
) -> Result<(PathBuf, Vec<PathBuf>), CoreError> {
    info!("writing content snap {} version {}", snap.name, snap.version);
    let source = template_source(snap, templates)?;
    let target = destination.join(&snap.name);
    let mut written = Vec::new();
    copy_tree(&source, &target, &snap.replacements(), &mut written)?;
    Ok((source, written))
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub manifest: PathBuf,
    pub destination: PathBuf,
    pub templates: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct GeneratedSnap {
    pub name: String,
    pub version: String,
    pub template: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub destination: PathBuf,
    pub snaps: Vec<GeneratedSnap>,
}

/// Generate a build directory for every non-tool snap in the manifest.
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, CoreError> {
    let snaps = load_content_snaps(&options.manifest)?;
    let mut generated = Vec::with_capacity(snaps.len());
    for snap in snaps {
        let (template, files) =
            write_content_snap(&snap, &options.destination, &options.templates)?;
        generated.push(GeneratedSnap {
            name: snap.name,
            version: snap.version,
            template,
            files,
        });
    }
    Ok(GenerateReport {
        destination: options.destination.clone(),
        snaps: generated,
    })
}
