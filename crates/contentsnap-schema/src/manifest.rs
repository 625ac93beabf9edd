use crate::types::SnapKey;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Content snap manifest (`supported.yaml`).
///
/// `content-snaps` is the only required key. Any other top-level keys are
/// carried through unchanged, including non-string keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SnapManifest {
    #[serde(rename = "content-snaps")]
    pub content_snaps: BTreeMap<SnapKey, SnapDescription>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// One entry under `content-snaps`.
///
/// Before resolution `version` names a catalogue library key; afterwards it
/// holds the concrete version string.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SnapDescription {
    pub version: String,
    #[serde(flatten)]
    pub fields: Mapping,
}

impl SnapDescription {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            fields: Mapping::new(),
        }
    }

    /// String value of an arbitrary description field.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Tool snaps (`tool: true`) carry build tooling rather than library
    /// content and are skipped by the generator.
    pub fn is_tool(&self) -> bool {
        self.fields
            .get("tool")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl SnapManifest {
    pub fn len(&self) -> usize {
        self.content_snaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content_snaps.is_empty()
    }

    pub fn to_yaml_string(&self) -> Result<String, ManifestError> {
        serde_yaml::to_string(self).map_err(ManifestError::Serialize)
    }
}

/// Parse a manifest, expanding `<<: *anchor` merge keys first.
pub fn parse_manifest_str(input: &str) -> Result<SnapManifest, ManifestError> {
    let mut value: Value = serde_yaml::from_str(input)?;
    value.apply_merge()?;
    Ok(serde_yaml::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPRING_MANIFEST: &str = r"
content-snaps:
  content-for-spring-boot-33:
    upstream: https://github.com/spring-projects/spring-boot
    version: spring-boot-33
    channel: latest/edge
    mount: /maven-repo
    name: content-for-spring-boot-33
    summary: Rebuild of Spring Boot Framework sources v3.3.x
    description: |
      Rebuild of Spring Boot Framework sources v3.3.x

      Spring is a trademark of Broadcom Inc. and/or its subsidiaries.
    license: Apache-2.0
    build-jdk: openjdk-17-jdk-headless
    lts: false
  gradle-tool:
    version: gradle-8
    name: gradle-tool
    tool: true
";

    #[test]
    fn parses_full_manifest() {
        let manifest = parse_manifest_str(SPRING_MANIFEST).expect("should parse");
        assert_eq!(manifest.len(), 2);
        let snap = &manifest.content_snaps["content-for-spring-boot-33"];
        assert_eq!(snap.version, "spring-boot-33");
        assert_eq!(snap.field_str("license"), Some("Apache-2.0"));
        assert_eq!(snap.field_str("lts"), None);
        assert!(snap
            .field_str("description")
            .unwrap()
            .starts_with("Rebuild of Spring Boot"));
        assert!(!snap.is_tool());
        assert!(manifest.content_snaps["gradle-tool"].is_tool());
    }

    #[test]
    fn parses_minimal_manifest() {
        let manifest = parse_manifest_str("content-snaps:\n  snap-1:\n    version: lib-a\n")
            .expect("should parse");
        assert_eq!(manifest.content_snaps["snap-1"], SnapDescription::new("lib-a"));
        assert!(manifest.extra.is_empty());
    }

    #[test]
    fn keeps_extra_top_level_keys() {
        let input = "maintainer: devpack\ncontent-snaps:\n  snap-1:\n    version: lib-a\n";
        let manifest = parse_manifest_str(input).expect("should parse");
        assert_eq!(
            manifest.extra.get("maintainer").and_then(Value::as_str),
            Some("devpack")
        );
        let yaml = manifest.to_yaml_string().unwrap();
        assert!(yaml.contains("maintainer: devpack"), "{yaml}");
    }

    #[test]
    fn serialized_manifest_parses_back() {
        let manifest = parse_manifest_str(SPRING_MANIFEST).unwrap();
        let yaml = manifest.to_yaml_string().unwrap();
        assert!(yaml.starts_with("content-snaps:"), "{yaml}");
        let back = parse_manifest_str(&yaml).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn merge_keys_supply_shared_fields() {
        let input = r"
base: &base
  version: lib-a
  license: Apache-2.0
content-snaps:
  snap-1:
    <<: *base
    name: snap-1
  snap-2:
    <<: *base
    version: lib-b
";
        let manifest = parse_manifest_str(input).expect("should parse");
        let snap1 = &manifest.content_snaps["snap-1"];
        assert_eq!(snap1.version, "lib-a");
        assert_eq!(snap1.field_str("license"), Some("Apache-2.0"));
        assert_eq!(snap1.field_str("name"), Some("snap-1"));
        assert!(snap1.fields.get("<<").is_none());
        assert_eq!(manifest.content_snaps["snap-2"].version, "lib-b");
    }

    #[test]
    fn non_string_field_keys_survive_serialization() {
        let input = "content-snaps:\n  snap-1:\n    version: lib-a\n    1: x\n";
        let manifest = parse_manifest_str(input).expect("should parse");
        let key = Value::Number(serde_yaml::Number::from(1u64));
        assert_eq!(
            manifest.content_snaps["snap-1"]
                .fields
                .get(&key)
                .and_then(Value::as_str),
            Some("x")
        );
        let yaml = manifest.to_yaml_string().unwrap();
        assert!(yaml.contains("1: x"), "{yaml}");
        assert!(!yaml.contains("'1'"), "{yaml}");
        assert_eq!(parse_manifest_str(&yaml).unwrap(), manifest);
    }

    #[test]
    fn rejects_missing_content_snaps() {
        let err = parse_manifest_str("snaps:\n  snap-1:\n    version: lib-a\n").unwrap_err();
        assert!(err.to_string().contains("content-snaps"), "{err}");
    }

    #[test]
    fn rejects_snap_without_version() {
        let input = "content-snaps:\n  snap-1:\n    name: snap-1\n";
        let err = parse_manifest_str(input).unwrap_err();
        assert!(err.to_string().contains("version"), "{err}");
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(parse_manifest_str("content-snaps: [unterminated").is_err());
    }
}
