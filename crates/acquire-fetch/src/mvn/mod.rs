//! Maven repository getter.
//!
//! Source format: `mvn::http://[user@]host[:port]/repo/path?groupId=..&artifactId=..&version=..[&type=..]`.
//! The getter turns the coordinate into a concrete artifact URL, resolving
//! `-SNAPSHOT` versions through `maven-metadata.xml`, and hands the transfer
//! to the wrapped getter.

mod coordinate;
mod metadata;

use std::fs;
use std::path::{self, Path};

use tracing::debug;
use url::Url;

use crate::error::{FetchError, Result};
use crate::getter::Getter;
use crate::mode::ClientMode;

pub use coordinate::{Coordinate, METADATA_FILE, SNAPSHOT_SUFFIX};
pub use metadata::{SnapshotMetadata, SnapshotVersion};

/// Configuration for [`MvnGetter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MvnOptions {
    /// Artifact type used when the URL carries no `type` parameter.
    ///
    /// Default: `jar`
    pub default_type: String,
}

impl Default for MvnOptions {
    fn default() -> Self {
        Self {
            default_type: "jar".to_string(),
        }
    }
}

impl MvnOptions {
    pub fn default_type(mut self, default_type: impl Into<String>) -> Self {
        self.default_type = default_type.into();
        self
    }
}

/// Resolves repository coordinates and delegates the byte transfer to `G`.
#[derive(Clone, Debug)]
pub struct MvnGetter<G> {
    delegate: G,
    options: MvnOptions,
}

impl<G: Getter> MvnGetter<G> {
    pub fn new(delegate: G) -> Self {
        Self::with_options(delegate, MvnOptions::default())
    }

    pub fn with_options(delegate: G, options: MvnOptions) -> Self {
        Self { delegate, options }
    }

    /// The concrete artifact URL and file name for a coordinate URL.
    ///
    /// Snapshot versions cost one metadata download through the delegate.
    pub fn resolve(&self, url: &Url) -> Result<(Url, String)> {
        let coordinate = Coordinate::from_url(url, &self.options.default_type)?;
        let base = coordinate.base_url(url);

        let version = if coordinate.is_snapshot() {
            self.latest_snapshot_version(&base)?
        } else {
            coordinate.version.clone()
        };

        let file_name = coordinate.file_name(&version);
        Ok((coordinate::join_segment(&base, &file_name), file_name))
    }

    fn latest_snapshot_version(&self, base: &Url) -> Result<String> {
        let metadata_url = coordinate::join_segment(base, METADATA_FILE);

        // Removed on drop, whichever way this function returns.
        let scratch = tempfile::Builder::new()
            .prefix("acquire-mvn-")
            .tempdir()
            .map_err(FetchError::io(std::env::temp_dir()))?;
        let metadata_path = scratch.path().join(METADATA_FILE);

        debug!(%metadata_url, "fetching snapshot metadata");
        self.delegate.get_file(&metadata_path, &metadata_url)?;

        let xml = fs::read_to_string(&metadata_path).map_err(FetchError::io(&metadata_path))?;
        let metadata = SnapshotMetadata::parse(&xml).map_err(|source| FetchError::InvalidMetadata {
            url: metadata_url.clone(),
            source,
        })?;

        metadata
            .latest()
            .map(str::to_string)
            .ok_or(FetchError::NoSnapshotVersions(metadata_url))
    }
}

/// Directory that receives the artifact: `dst` itself when it is spelled as a
/// directory (trailing separator), otherwise its parent.
fn destination_dir(dst: &Path) -> &Path {
    let spelled_as_dir = dst
        .as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|b| path::is_separator(*b as char));

    if spelled_as_dir {
        dst
    } else {
        dst.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl<G: Getter> Getter for MvnGetter<G> {
    fn get(&self, _dst: &Path, _url: &Url) -> Result<()> {
        Err(FetchError::UnsupportedOperation { getter: "MvnGetter" })
    }

    /// Download the artifact into the directory of `dst`, named after the
    /// resolved artifact file. The delegate's result is returned unchanged.
    fn get_file(&self, dst: &Path, url: &Url) -> Result<()> {
        let (artifact_url, file_name) = self.resolve(url)?;
        let target = destination_dir(dst).join(file_name);

        debug!(%artifact_url, target = %target.display(), "resolved maven artifact");
        self.delegate.get_file(&target, &artifact_url)
    }

    fn client_mode(&self, _url: &Url) -> Result<ClientMode> {
        Ok(ClientMode::File)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn destination_dir_uses_parent_of_files() {
        assert_eq!(destination_dir(Path::new("out/app.jar")), Path::new("out"));
        assert_eq!(destination_dir(Path::new("app.jar")), Path::new(""));
    }

    #[test]
    fn destination_dir_keeps_directory_spelling() {
        let dst = PathBuf::from(format!("out{}", path::MAIN_SEPARATOR));
        assert_eq!(destination_dir(&dst), dst.as_path());
    }

    #[test]
    fn options_default_to_jar() {
        assert_eq!(MvnOptions::default().default_type, "jar");
        assert_eq!(MvnOptions::default().default_type("pom").default_type, "pom");
    }
}
