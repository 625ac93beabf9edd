use contentsnap_schema::{Catalogue, LibraryKey, SnapDescription, SnapKey, SnapManifest};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("snap '{snap}' references unknown library '{library}'")]
    UnknownLibrary { snap: SnapKey, library: LibraryKey },
    #[error("snap '{snap}' references library '{library}', which has no version")]
    UnversionedLibrary { snap: SnapKey, library: LibraryKey },
}

impl ResolveError {
    /// The catalogue key that failed to resolve.
    pub fn library(&self) -> &LibraryKey {
        match self {
            Self::UnknownLibrary { library, .. } | Self::UnversionedLibrary { library, .. } => {
                library
            }
        }
    }
}

/// One substitution performed by the resolver.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedSnap {
    pub snap: SnapKey,
    pub library: LibraryKey,
    pub version: String,
}

fn lookup(
    snap: &SnapKey,
    description: &SnapDescription,
    catalogue: &Catalogue,
) -> Result<ResolvedSnap, ResolveError> {
    let library = LibraryKey::new(description.version.as_str());
    let Some(entry) = catalogue.get(&library) else {
        return Err(ResolveError::UnknownLibrary {
            snap: snap.clone(),
            library,
        });
    };
    let Some(version) = entry.version() else {
        return Err(ResolveError::UnversionedLibrary {
            snap: snap.clone(),
            library,
        });
    };
    debug!("{snap}: {library} -> {version}");
    Ok(ResolvedSnap {
        snap: snap.clone(),
        library,
        version: version.to_owned(),
    })
}

/// Replace every snap's symbolic `version` with the catalogue's concrete
/// version.
///
/// Every lookup happens before the first write: on error the manifest is
/// left exactly as it was. Stops at the first missing key, in snap key order.
pub fn resolve_in_place(
    manifest: &mut SnapManifest,
    catalogue: &Catalogue,
) -> Result<Vec<ResolvedSnap>, ResolveError> {
    let resolved = manifest
        .content_snaps
        .iter()
        .map(|(snap, description)| lookup(snap, description, catalogue))
        .collect::<Result<Vec<_>, _>>()?;

    for (description, entry) in manifest.content_snaps.values_mut().zip(&resolved) {
        description.version.clone_from(&entry.version);
    }
    Ok(resolved)
}

/// Pure variant of [`resolve_in_place`]: the input manifest is not touched.
pub fn resolve(
    manifest: &SnapManifest,
    catalogue: &Catalogue,
) -> Result<SnapManifest, ResolveError> {
    let mut resolved = manifest.clone();
    resolve_in_place(&mut resolved, catalogue)?;
    Ok(resolved)
}
