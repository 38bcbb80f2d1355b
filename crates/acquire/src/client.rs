use std::fs;
use std::path::{Path, PathBuf};

use acquire_archive::{Decompressor, DecompressorRegistry};
use acquire_fetch::{ClientMode, Getter, GetterRegistry};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, Result};
use crate::source::Source;

/// Name the archive is downloaded under inside the scratch directory.
const ARCHIVE_FILE: &str = "archive";

/// Downloads `src` into `dst`, unpacking archives on the way.
///
/// ```no_run
/// use acquire::{Client, ClientMode};
///
/// let client = Client::new("https://example.com/tool.tar.gz", "tools/tool")?
///     .mode(ClientMode::Dir);
/// client.get()?;
/// # Ok::<(), acquire::ClientError>(())
/// ```
#[derive(Debug)]
pub struct Client {
    pub src: String,
    pub dst: PathBuf,
    /// Directory relative source paths resolve against.
    pub pwd: Option<PathBuf>,
    pub mode: ClientMode,
    pub getters: GetterRegistry,
    pub decompressors: DecompressorRegistry,
}

impl Client {
    /// A client with every built-in getter and decompressor.
    pub fn new(src: impl Into<String>, dst: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            src: src.into(),
            dst: dst.into(),
            pwd: None,
            mode: ClientMode::Any,
            getters: GetterRegistry::with_defaults()?,
            decompressors: DecompressorRegistry::with_defaults(),
        })
    }

    pub fn pwd(mut self, pwd: impl Into<PathBuf>) -> Self {
        self.pwd = Some(pwd.into());
        self
    }

    pub fn mode(mut self, mode: ClientMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn getters(mut self, getters: GetterRegistry) -> Self {
        self.getters = getters;
        self
    }

    pub fn decompressors(mut self, decompressors: DecompressorRegistry) -> Self {
        self.decompressors = decompressors;
        self
    }

    pub fn get(&self) -> Result<()> {
        let mut source = Source::parse(&self.src, self.pwd.as_deref())?;
        let archive = source.take_archive();
        let decompressor = self.select_decompressor(archive.as_deref(), &source.url)?;

        let name = source.getter_name();
        let getter = self
            .getters
            .get(name)
            .ok_or_else(|| ClientError::UnsupportedScheme(name.to_string()))?;

        info!(url = %source.url, dst = %self.dst.display(), "downloading");

        match decompressor {
            Some((key, decompressor)) => {
                self.get_archive(getter, &source.url, key, decompressor)
            }
            None => self.get_plain(getter, &source.url),
        }
    }

    fn select_decompressor<'a>(
        &'a self,
        archive: Option<&'a str>,
        url: &Url,
    ) -> Result<Option<(&'a str, &'a dyn Decompressor)>> {
        let key = match archive {
            Some("false") => return Ok(None),
            Some(key) => key,
            None => match self.decompressors.match_extension(url.path()) {
                Some(key) => key,
                None => return Ok(None),
            },
        };

        self.decompressors
            .get(key)
            .map(|decompressor| Some((key, decompressor)))
            .ok_or_else(|| ClientError::UnknownArchive(key.to_string()))
    }

    fn get_archive(
        &self,
        getter: &dyn Getter,
        url: &Url,
        key: &str,
        decompressor: &dyn Decompressor,
    ) -> Result<()> {
        let scratch = tempfile::Builder::new()
            .prefix("acquire-")
            .tempdir()
            .map_err(ClientError::TempDir)?;

        getter.get_file(&scratch.path().join(ARCHIVE_FILE), url)?;
        let archive = downloaded_file(scratch.path())?;

        let dir = self.mode != ClientMode::File && !decompressor.single_file_only();
        debug!(format = key, dir, archive = %archive.display(), "decompressing");
        decompressor.decompress(&self.dst, &archive, dir)?;
        Ok(())
    }

    fn get_plain(&self, getter: &dyn Getter, url: &Url) -> Result<()> {
        let mode = match self.mode {
            ClientMode::Any => getter.client_mode(url)?,
            mode => mode,
        };
        debug!(%mode, "resolved client mode");

        match mode {
            ClientMode::Dir => {
                if let Some(parent) = self.dst.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|source| ClientError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                getter.get(&self.dst, url)?;
            }
            ClientMode::File | ClientMode::Any => getter.get_file(&self.dst, url)?,
        }
        Ok(())
    }
}

/// The file a getter produced in `scratch`.
///
/// Most getters write exactly the requested path. Getters that name the file
/// themselves (the repository getter) leave a single differently named file.
fn downloaded_file(scratch: &Path) -> Result<PathBuf> {
    let expected = scratch.join(ARCHIVE_FILE);
    if expected.exists() {
        return Ok(expected);
    }

    let entries = fs::read_dir(scratch).map_err(ClientError::TempDir)?;
    for entry in entries {
        let entry = entry.map_err(ClientError::TempDir)?;
        if entry.path().is_file() {
            return Ok(entry.path());
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_option_wins_over_extension() {
        let client = Client::new("unused", "unused").unwrap();
        let url = Url::parse("https://h/file.bin").unwrap();

        let (key, _) = client.select_decompressor(Some("tar.gz"), &url).unwrap().unwrap();
        assert_eq!(key, "tar.gz");
        assert!(client.select_decompressor(Some("false"), &url).unwrap().is_none());
        assert!(client.select_decompressor(None, &url).unwrap().is_none());
    }

    #[test]
    fn longest_extension_is_selected() {
        let client = Client::new("unused", "unused").unwrap();
        let url = Url::parse("https://h/release.tar.gz").unwrap();

        let (key, decompressor) = client.select_decompressor(None, &url).unwrap().unwrap();
        assert_eq!(key, "tar.gz");
        assert!(!decompressor.single_file_only());
    }

    #[test]
    fn unknown_archive_option_is_an_error() {
        let client = Client::new("unused", "unused").unwrap();
        let url = Url::parse("https://h/file.bin").unwrap();

        let result = client.select_decompressor(Some("rar"), &url);
        assert!(matches!(result, Err(ClientError::UnknownArchive(key)) if key == "rar"));
    }

    #[test]
    fn downloaded_file_falls_back_to_the_only_file() {
        let scratch = tempfile::tempdir().unwrap();
        fs::write(scratch.path().join("test-1.0.tar"), b"x").unwrap();
        assert_eq!(
            downloaded_file(scratch.path()).unwrap(),
            scratch.path().join("test-1.0.tar")
        );

        fs::write(scratch.path().join(ARCHIVE_FILE), b"y").unwrap();
        assert_eq!(
            downloaded_file(scratch.path()).unwrap(),
            scratch.path().join(ARCHIVE_FILE)
        );
    }
}
