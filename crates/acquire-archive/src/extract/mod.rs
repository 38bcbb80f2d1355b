//! Filesystem side of extraction, shared by every decompressor.
//!
//! # Platform Behavior
//!
//! **Unix**: permission bits from the archive are applied verbatim (masked to `0o7777`)
//! and symlink entries are materialized as symlinks.
//!
//! **Windows (non-Unix)**: permission handling is a no-op; symlinks are created with
//! `symlink_file`/`symlink_dir`, which may require elevated privileges.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{Error, Result};
use crate::sanitize;

pub(crate) mod stream;
pub(crate) mod tar;
#[cfg(feature = "zip")]
pub(crate) mod zip;

pub use self::tar::untar;

/// Directory attributes captured during extraction and applied once the
/// whole archive has been written.
///
/// Creating anything inside a directory bumps its modification time, so the
/// archive's recorded times can only be restored after the last write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDirectory {
    pub path: PathBuf,
    pub atime: FileTime,
    pub mtime: FileTime,
}

impl PendingDirectory {
    pub fn apply(&self) -> Result<()> {
        apply_times(&self.path, self.atime, self.mtime)
    }
}

/// Apply every pending record in the order the directories were first seen.
pub fn apply_pending(pending: &[PendingDirectory]) -> Result<()> {
    pending.iter().try_for_each(PendingDirectory::apply)
}

/// Destination directory of a directory-mode extraction.
///
/// Every write is checked against the canonical root with symlinks resolved,
/// so links created by earlier entries cannot redirect later ones.
pub(crate) struct Root {
    path: PathBuf,
    resolved: PathBuf,
}

impl Root {
    /// Create `path` if needed and resolve it.
    pub(crate) fn new(path: &Path) -> Result<Self> {
        ensure_directory(path)?;
        let resolved = fs::canonicalize(path).map_err(|source| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            resolved,
        })
    }

    pub(crate) fn entry_path(&self, name: &Path) -> Result<PathBuf> {
        sanitize::entry_path(&self.path, name)
    }

    pub(crate) fn create_dir(&self, path: &Path, name: &Path) -> Result<()> {
        sanitize::check_resolved(&self.resolved, path, name)?;
        ensure_directory(path)
    }

    fn prepare_parent(&self, path: &Path, name: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            sanitize::check_resolved(&self.resolved, parent, name)?;
        }
        ensure_parent(path)
    }

    /// Make `path` ready for a regular file write. An existing symlink there
    /// is replaced rather than written through.
    pub(crate) fn prepare_file(&self, path: &Path, name: &Path) -> Result<()> {
        self.prepare_parent(path, name)?;
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => clear_link_destination(path),
            _ => Ok(()),
        }
    }

    pub(crate) fn symlink(&self, path: &Path, target: &Path, name: &Path) -> Result<()> {
        self.prepare_parent(path, name)?;
        clear_link_destination(path)?;

        let parent = path.parent().unwrap_or(&self.path);
        let link_dir = fs::canonicalize(parent).map_err(|source| Error::ExtractionFailed {
            path: parent.to_path_buf(),
            source,
        })?;
        sanitize::check_symlink_target(&self.resolved, &link_dir, target)?;

        write_symlink(target, path)
    }

    /// `target` is an entry name, resolved like any other entry.
    pub(crate) fn hard_link(&self, path: &Path, target: &Path, name: &Path) -> Result<()> {
        let target_path = self.entry_path(target)?;
        sanitize::check_resolved(&self.resolved, &target_path, target)?;

        self.prepare_parent(path, name)?;
        clear_link_destination(path)?;
        write_hard_link(&target_path, path)
    }
}

pub(crate) fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Archives do not guarantee a directory is listed before the files inside it.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            ensure_directory(parent)
        }
        _ => Ok(()),
    }
}

/// Create or truncate `path` and copy `reader` into it. The handle is closed
/// before returning.
pub(crate) fn write_file<R: Read + ?Sized>(reader: &mut R, path: &Path) -> Result<u64> {
    let mut file = File::create(path).map_err(|source| Error::ExtractionFailed {
        path: path.to_path_buf(),
        source,
    })?;
    io::copy(reader, &mut file).map_err(|source| Error::ExtractionFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
pub(crate) fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777)).map_err(|source| {
        Error::Permissions {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
pub(crate) fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

pub(crate) fn apply_times(path: &Path, atime: FileTime, mtime: FileTime) -> Result<()> {
    filetime::set_file_times(path, atime, mtime).map_err(|source| Error::Times {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|source| Error::LinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source,
    })
}

#[cfg(windows)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    use std::os::windows::fs;

    let resolved = link.parent().map(|p| p.join(target)).unwrap_or_default();
    let result = if resolved.is_dir() {
        fs::symlink_dir(target, link)
    } else {
        fs::symlink_file(target, link)
    };
    result.map_err(|source| Error::LinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source,
    })
}

fn write_hard_link(target: &Path, link: &Path) -> Result<()> {
    fs::hard_link(target, link).map_err(|source| Error::LinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source,
    })
}

/// Remove whatever sits at `path` so a link can take its place.
fn clear_link_destination(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(Error::ExtractionFailed {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "a directory is in the way"),
        }),
        Ok(_) => fs::remove_file(path).map_err(|source| Error::ExtractionFailed {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::ExtractionFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}
