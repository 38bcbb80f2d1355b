use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ::zip::ZipArchive;
use tracing::debug;

use crate::decompressor::Decompressor;
use crate::error::{Error, Result};
use crate::extract::{self, Root};

/// Decompressor for zip archives.
///
/// Zip carries a central directory, so the multiple-file check happens up
/// front instead of while streaming. Symlinks are recognized from the unix
/// mode stored by the archiver. Entry times are not restored.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipDecompressor;

impl Decompressor for ZipDecompressor {
    fn decompress(&self, dst: &Path, src: &Path, dir: bool) -> Result<()> {
        let root = if dir {
            Some(Root::new(dst)?)
        } else {
            extract::ensure_parent(dst)?;
            None
        };

        let file = File::open(src).map_err(|source| Error::Read {
            archive: src.to_path_buf(),
            source,
        })?;
        let zip_error = |source| Error::Zip {
            archive: src.to_path_buf(),
            source,
        };
        let mut archive = ZipArchive::new(file).map_err(zip_error)?;

        if !dir && archive.len() > 1 {
            return Err(Error::MultipleFiles {
                archive: src.to_path_buf(),
            });
        }

        let mut done = false;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(zip_error)?;
            let name = PathBuf::from(entry.name());
            let is_symlink = entry.is_symlink();

            if entry.is_dir() || is_symlink {
                let Some(root) = &root else {
                    return Err(Error::UnexpectedEntryKind {
                        archive: src.to_path_buf(),
                        entry: name,
                    });
                };
                let path = root.entry_path(&name)?;

                if is_symlink {
                    let mut target = String::new();
                    entry
                        .read_to_string(&mut target)
                        .map_err(|source| Error::Read {
                            archive: src.to_path_buf(),
                            source,
                        })?;
                    debug!(link = %path.display(), %target, "creating symlink");
                    root.symlink(&path, Path::new(&target), &name)?;
                    done = true;
                } else {
                    root.create_dir(&path, &name)?;
                }
                continue;
            }

            let path = match &root {
                Some(root) => {
                    let path = root.entry_path(&name)?;
                    root.prepare_file(&path, &name)?;
                    path
                }
                None => dst.to_path_buf(),
            };

            debug!(path = %path.display(), "writing file");
            extract::write_file(&mut entry, &path)?;
            done = true;

            if let Some(mode) = entry.unix_mode() {
                extract::apply_mode(&path, mode)?;
            }
        }

        if !done {
            return Err(Error::EmptyArchive {
                archive: src.to_path_buf(),
            });
        }
        Ok(())
    }
}
