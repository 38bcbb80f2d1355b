use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::error::{FetchError, Result};
use crate::getter::Getter;
use crate::mode::ClientMode;

/// Getter for `file://` URLs.
///
/// Directories are linked into place, single files are copied.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileGetter;

fn local_path(url: &Url) -> Result<PathBuf> {
    url.to_file_path()
        .map_err(|()| FetchError::NotALocalPath(url.clone()))
}

impl Getter for FileGetter {
    fn get(&self, dst: &Path, url: &Url) -> Result<()> {
        let src = local_path(url)?;
        if !src.is_dir() {
            return Err(FetchError::SourceNotFound(src));
        }

        match fs::symlink_metadata(dst) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::remove_file(dst).map_err(FetchError::io(dst))?;
            }
            Ok(_) => return Err(FetchError::DestinationExists(dst.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(FetchError::io(dst)(e)),
        }

        if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(FetchError::io(parent))?;
        }

        debug!(src = %src.display(), dst = %dst.display(), "linking directory");
        symlink_dir(&src, dst).map_err(FetchError::io(dst))
    }

    fn get_file(&self, dst: &Path, url: &Url) -> Result<()> {
        let src = local_path(url)?;
        if !src.is_file() {
            return Err(FetchError::SourceNotFound(src));
        }

        if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(FetchError::io(parent))?;
        }

        debug!(src = %src.display(), dst = %dst.display(), "copying file");
        fs::copy(&src, dst).map_err(FetchError::io(dst))?;
        Ok(())
    }

    fn client_mode(&self, url: &Url) -> Result<ClientMode> {
        let src = local_path(url)?;
        match fs::metadata(&src) {
            Ok(meta) if meta.is_dir() => Ok(ClientMode::Dir),
            Ok(_) => Ok(ClientMode::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FetchError::SourceNotFound(src)),
            Err(e) => Err(FetchError::io(src)(e)),
        }
    }
}

#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_for(path: &Path) -> Url {
        Url::from_file_path(path).unwrap()
    }

    #[test]
    fn mode_follows_the_filesystem() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        assert_eq!(FileGetter.client_mode(&url_for(tmp.path())).unwrap(), ClientMode::Dir);
        assert_eq!(FileGetter.client_mode(&url_for(&file)).unwrap(), ClientMode::File);

        let missing = FileGetter.client_mode(&url_for(&tmp.path().join("nope")));
        assert!(matches!(missing, Err(FetchError::SourceNotFound(_))));
    }

    #[test]
    fn get_file_copies_into_new_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src.bin");
        fs::write(&src, "bytes").unwrap();

        let dst = tmp.path().join("out/deeper/dst.bin");
        FileGetter.get_file(&dst, &url_for(&src)).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "bytes");
    }

    #[cfg(unix)]
    #[test]
    fn get_links_directories_and_replaces_old_links() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(second.join("marker"), "2").unwrap();

        let dst = tmp.path().join("link");
        FileGetter.get(&dst, &url_for(&first)).unwrap();
        FileGetter.get(&dst, &url_for(&second)).unwrap();

        assert_eq!(fs::read_link(&dst).unwrap(), second);
        assert_eq!(fs::read_to_string(dst.join("marker")).unwrap(), "2");
    }

    #[test]
    fn get_refuses_to_replace_real_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();

        let result = FileGetter.get(&dst, &url_for(&src));
        assert!(matches!(result, Err(FetchError::DestinationExists(_))));
    }
}
