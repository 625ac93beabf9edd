use crate::types::LibraryKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Version catalogue: library keys mapped to concrete version records.
///
/// Only the `libraries` table is read; any other tables (`versions`,
/// `plugins`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Catalogue {
    pub libraries: BTreeMap<LibraryKey, LibraryEntry>,
}

/// A single `libraries` record, e.g.
/// `spring-boot-34 = { group = "...", name = "...", version = "3.4.2" }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct LibraryEntry {
    pub fields: BTreeMap<String, toml::Value>,
}

impl LibraryEntry {
    /// The plain `version` string, if present. `version.ref` tables are not
    /// followed.
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(toml::Value::as_str)
    }
}

impl Catalogue {
    pub fn get(&self, key: &str) -> Option<&LibraryEntry> {
        self.libraries.get(key)
    }

    /// Concrete version for `key`. `None` when the library is absent or
    /// carries no plain `version` string.
    pub fn version_of(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(LibraryEntry::version)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

pub fn parse_catalogue_str(input: &str) -> Result<Catalogue, CatalogueError> {
    Ok(toml::from_str(input)?)
}
