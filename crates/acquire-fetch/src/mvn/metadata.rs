use roxmltree::{Document, Node};

/// One `<snapshotVersion>` record of a snapshot's `maven-metadata.xml`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotVersion {
    pub classifier: Option<String>,
    pub extension: Option<String>,
    pub value: String,
}

/// The parts of `maven-metadata.xml` needed to resolve a snapshot build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// Records in document order. Records without a `<value>` are dropped.
    pub versions: Vec<SnapshotVersion>,
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

impl SnapshotMetadata {
    /// Parse a metadata document. Malformed XML is an error; a well-formed
    /// document without snapshot records yields an empty version list.
    pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
        let document = Document::parse(xml)?;
        let root = document.root_element();

        let versions = child(root, "versioning")
            .and_then(|versioning| child(versioning, "snapshotVersions"))
            .map(|list| {
                list.children()
                    .filter(|n| n.has_tag_name("snapshotVersion"))
                    .filter_map(|record| {
                        Some(SnapshotVersion {
                            classifier: child_text(record, "classifier"),
                            extension: child_text(record, "extension"),
                            value: child_text(record, "value")?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            group_id: child_text(root, "groupId"),
            artifact_id: child_text(root, "artifactId"),
            version: child_text(root, "version"),
            versions,
        })
    }

    /// The version value the resolver uses: the first record listed.
    pub fn latest(&self) -> Option<&str> {
        self.versions.first().map(|v| v.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata modelVersion="1.1.0" xmlns="http://maven.apache.org/METADATA/1.1.0">
  <groupId>org.example</groupId>
  <artifactId>test</artifactId>
  <version>1.0.0-SNAPSHOT</version>
  <versioning>
    <snapshot>
      <timestamp>20240101.010101</timestamp>
      <buildNumber>1</buildNumber>
    </snapshot>
    <lastUpdated>20240101010101</lastUpdated>
    <snapshotVersions>
      <snapshotVersion>
        <extension>jar</extension>
        <value>1.0.0-20240101.010101-1</value>
        <updated>20240101010101</updated>
      </snapshotVersion>
      <snapshotVersion>
        <classifier>sources</classifier>
        <extension>jar</extension>
        <value>1.0.0-20231231.235959-0</value>
      </snapshotVersion>
    </snapshotVersions>
  </versioning>
</metadata>"#;

    #[test]
    fn parses_snapshot_records_in_order() {
        let metadata = SnapshotMetadata::parse(SNAPSHOT).unwrap();

        assert_eq!(metadata.group_id.as_deref(), Some("org.example"));
        assert_eq!(metadata.version.as_deref(), Some("1.0.0-SNAPSHOT"));
        assert_eq!(metadata.versions.len(), 2);
        assert_eq!(metadata.versions[1].classifier.as_deref(), Some("sources"));
        assert_eq!(metadata.latest(), Some("1.0.0-20240101.010101-1"));
    }

    #[test]
    fn missing_versioning_yields_no_versions() {
        let metadata = SnapshotMetadata::parse("<metadata><groupId>g</groupId></metadata>").unwrap();
        assert!(metadata.versions.is_empty());
        assert_eq!(metadata.latest(), None);
    }

    #[test]
    fn records_without_value_are_dropped() {
        let xml = "<metadata><versioning><snapshotVersions>\
                   <snapshotVersion><extension>pom</extension></snapshotVersion>\
                   <snapshotVersion><value>2.0-1</value></snapshotVersion>\
                   </snapshotVersions></versioning></metadata>";
        let metadata = SnapshotMetadata::parse(xml).unwrap();
        assert_eq!(metadata.latest(), Some("2.0-1"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(SnapshotMetadata::parse("<metadata><versioning>").is_err());
        assert!(SnapshotMetadata::parse("not xml at all").is_err());
    }
}
