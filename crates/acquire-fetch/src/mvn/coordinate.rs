use url::Url;

use crate::error::{FetchError, Result};

/// Version suffix asking for the newest build of a snapshot line.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Metadata document published next to every snapshot version directory.
pub const METADATA_FILE: &str = "maven-metadata.xml";

/// An artifact address taken from the query string of a repository URL:
/// `?groupId=org.example&artifactId=test&version=1.0.0&type=jar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub kind: String,
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn required_param(url: &Url, name: &'static str) -> Result<String> {
    query_param(url, name).ok_or(FetchError::MissingParameter(name))
}

impl Coordinate {
    /// Read the coordinate from `url`, using `default_type` when `type` is absent.
    pub fn from_url(url: &Url, default_type: &str) -> Result<Self> {
        Ok(Self {
            group_id: required_param(url, "groupId")?,
            artifact_id: required_param(url, "artifactId")?,
            version: required_param(url, "version")?,
            kind: query_param(url, "type").unwrap_or_else(|| default_type.to_string()),
        })
    }

    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with(SNAPSHOT_SUFFIX)
    }

    /// `<repository>/<group as path>/<artifact>/<version>`, without query or fragment.
    pub fn base_url(&self, repository: &Url) -> Url {
        let mut base = repository.clone();
        base.set_query(None);
        base.set_fragment(None);

        let path = format!(
            "{}/{}/{}/{}",
            repository.path().trim_end_matches('/'),
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version
        );
        base.set_path(&path);
        base
    }

    /// `<artifact>-<version>.<type>` for a resolved version.
    pub fn file_name(&self, resolved_version: &str) -> String {
        format!("{}-{}.{}", self.artifact_id, resolved_version, self.kind)
    }
}

/// Append `/<segment>` to the path of `base`.
pub(crate) fn join_segment(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    let path = format!("{}/{}", base.path().trim_end_matches('/'), segment);
    url.set_path(&path);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn parses_all_parameters() {
        let coordinate = Coordinate::from_url(
            &url("https://repo.example.com/maven?groupId=org.example&artifactId=test&version=1.0.0&type=war"),
            "jar",
        )
        .unwrap();

        assert_eq!(coordinate.group_id, "org.example");
        assert_eq!(coordinate.artifact_id, "test");
        assert_eq!(coordinate.version, "1.0.0");
        assert_eq!(coordinate.kind, "war");
        assert!(!coordinate.is_snapshot());
    }

    #[test]
    fn type_defaults_when_absent_or_empty() {
        for raw in [
            "https://r/m?groupId=g&artifactId=a&version=1",
            "https://r/m?groupId=g&artifactId=a&version=1&type=",
        ] {
            let coordinate = Coordinate::from_url(&url(raw), "jar").unwrap();
            assert_eq!(coordinate.kind, "jar");
        }
    }

    #[test]
    fn missing_parameters_are_named() {
        let cases = [
            ("https://r/m?artifactId=a&version=1", "groupId"),
            ("https://r/m?groupId=g&version=1", "artifactId"),
            ("https://r/m?groupId=g&artifactId=a", "version"),
            ("https://r/m?groupId=g&artifactId=a&version=", "version"),
        ];
        for (raw, expected) in cases {
            match Coordinate::from_url(&url(raw), "jar") {
                Err(FetchError::MissingParameter(name)) => assert_eq!(name, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn base_url_strips_query_and_expands_group() {
        let repository = url("http://user@host:8081/nexus/repo/?groupId=org.example.sub&artifactId=test&version=1.0.0#frag");
        let coordinate = Coordinate::from_url(&repository, "jar").unwrap();

        assert_eq!(
            coordinate.base_url(&repository).as_str(),
            "http://user@host:8081/nexus/repo/org/example/sub/test/1.0.0"
        );
    }

    #[test]
    fn snapshot_detection_and_file_name() {
        let coordinate = Coordinate::from_url(
            &url("https://r/m?groupId=g&artifactId=test&version=1.0.0-SNAPSHOT"),
            "jar",
        )
        .unwrap();

        assert!(coordinate.is_snapshot());
        assert_eq!(
            coordinate.file_name("1.0.0-20240101.010101-1"),
            "test-1.0.0-20240101.010101-1.jar"
        );
    }

    #[test]
    fn join_segment_adds_one_level() {
        let base = url("https://r/m/org/example/test/1.0.0");
        assert_eq!(
            join_segment(&base, METADATA_FILE).as_str(),
            "https://r/m/org/example/test/1.0.0/maven-metadata.xml"
        );
    }
}
