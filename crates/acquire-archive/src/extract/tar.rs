use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ::tar::{Archive, Entry, EntryType};
use filetime::FileTime;
use tracing::{debug, warn};

use crate::decompressor::Decompressor;
use crate::error::{Error, Result};
use crate::extract::{self, PendingDirectory, Root};
use crate::format::Compression;

/// Unpack a tar stream into `dst`.
///
/// `input` must yield the uncompressed tar bytes; `src` only labels errors.
/// With `dir == false` the archive must hold exactly one regular file, which
/// is written to `dst` itself.
pub fn untar<R: Read>(input: R, dst: &Path, src: &Path, dir: bool) -> Result<()> {
    let mut archive = Archive::new(input);
    let entries = archive.entries().map_err(|source| Error::Read {
        archive: src.to_path_buf(),
        source,
    })?;

    let root = if dir { Some(Root::new(dst)?) } else { None };
    let mut done = false;
    let mut pending: Vec<PendingDirectory> = Vec::new();

    for entry in entries {
        let mut entry = entry.map_err(|source| Error::Read {
            archive: src.to_path_buf(),
            source,
        })?;

        let entry_type = entry.header().entry_type();
        if matches!(entry_type, EntryType::XGlobalHeader | EntryType::XHeader) {
            continue;
        }

        let name = entry
            .path()
            .map_err(|source| Error::Read {
                archive: src.to_path_buf(),
                source,
            })?
            .into_owned();

        let path = match &root {
            Some(root) => root.entry_path(&name)?,
            None => dst.to_path_buf(),
        };

        let (atime, mtime) = entry_times(&mut entry);

        if entry_type.is_dir() || entry_type.is_symlink() || entry_type.is_hard_link() {
            let Some(root) = &root else {
                return Err(Error::UnexpectedEntryKind {
                    archive: src.to_path_buf(),
                    entry: name,
                });
            };

            if entry_type.is_dir() {
                debug!(path = %path.display(), "creating directory");
                root.create_dir(&path, &name)?;
                pending.push(PendingDirectory { path, atime, mtime });
            } else {
                unpack_link(root, &entry, entry_type, &path, &name, src)?;
                done = true;
            }
            continue;
        }

        if !is_regular(entry_type) {
            warn!(entry = %name.display(), kind = ?entry_type, "skipping unsupported tar entry");
            continue;
        }

        match &root {
            Some(root) => root.prepare_file(&path, &name)?,
            None => extract::ensure_parent(&path)?,
        }

        if !dir && done {
            return Err(Error::MultipleFiles {
                archive: src.to_path_buf(),
            });
        }
        done = true;

        let mode = entry.header().mode().map_err(|source| Error::Read {
            archive: src.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "writing file with mode {mode:o}");
        extract::write_file(&mut entry, &path)?;
        extract::apply_mode(&path, mode)?;
        extract::apply_times(&path, atime, mtime)?;
    }

    if !done {
        return Err(Error::EmptyArchive {
            archive: src.to_path_buf(),
        });
    }

    extract::apply_pending(&pending)
}

fn is_regular(entry_type: EntryType) -> bool {
    matches!(
        entry_type,
        EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse
    )
}

fn unpack_link<R: Read>(
    root: &Root,
    entry: &Entry<'_, R>,
    entry_type: EntryType,
    path: &Path,
    name: &Path,
    src: &Path,
) -> Result<()> {
    let target = entry
        .link_name()
        .map_err(|source| Error::Read {
            archive: src.to_path_buf(),
            source,
        })?
        .ok_or_else(|| Error::UnexpectedEntryKind {
            archive: src.to_path_buf(),
            entry: name.to_path_buf(),
        })?
        .into_owned();

    debug!(link = %path.display(), target = %target.display(), "creating {entry_type:?} entry");
    if entry_type.is_hard_link() {
        root.hard_link(path, &target, name)
    } else {
        root.symlink(path, &target, name)
    }
}

/// Access and modification times recorded for an entry.
///
/// PAX records win over the header fields since they carry sub-second
/// precision. Without a recorded access time the modification time is used.
fn entry_times<R: Read>(entry: &mut Entry<'_, R>) -> (FileTime, FileTime) {
    let header = entry.header();
    let mut mtime = header
        .mtime()
        .map(|secs| FileTime::from_unix_time(secs as i64, 0))
        .unwrap_or_else(|_| FileTime::zero());
    let mut atime = header
        .as_gnu()
        .and_then(|gnu| gnu.atime().ok())
        .filter(|secs| *secs != 0)
        .map(|secs| FileTime::from_unix_time(secs as i64, 0));

    if let Ok(Some(extensions)) = entry.pax_extensions() {
        for extension in extensions.flatten() {
            let (Ok(key), Ok(value)) = (extension.key(), extension.value()) else {
                continue;
            };
            match key {
                "mtime" => {
                    if let Some(time) = parse_pax_time(value) {
                        mtime = time;
                    }
                }
                "atime" => atime = parse_pax_time(value).or(atime),
                _ => {}
            }
        }
    }

    (atime.unwrap_or(mtime), mtime)
}

/// Parse a PAX time record such as `1700000000.25` or `-12.5`.
fn parse_pax_time(value: &str) -> Option<FileTime> {
    let (negative, value) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let (secs, frac) = value.split_once('.').unwrap_or((value, ""));
    let secs: i64 = secs.parse().ok()?;

    let digits: String = frac.chars().take(9).collect();
    let nanos: u32 = if digits.is_empty() {
        0
    } else {
        let parsed: u32 = digits.parse().ok()?;
        parsed * 10u32.pow(9 - digits.len() as u32)
    };

    if negative {
        if nanos == 0 {
            Some(FileTime::from_unix_time(-secs, 0))
        } else {
            Some(FileTime::from_unix_time(-secs - 1, 1_000_000_000 - nanos))
        }
    } else {
        Some(FileTime::from_unix_time(secs, nanos))
    }
}

/// Decompressor for tar archives, optionally wrapped in a stream compression.
#[derive(Clone, Copy, Debug)]
pub struct TarDecompressor {
    compression: Compression,
}

impl TarDecompressor {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }
}

impl Default for TarDecompressor {
    fn default() -> Self {
        Self::new(Compression::None)
    }
}

impl Decompressor for TarDecompressor {
    fn decompress(&self, dst: &Path, src: &Path, dir: bool) -> Result<()> {
        let root: PathBuf = if dir {
            dst.to_path_buf()
        } else {
            dst.parent().map(Path::to_path_buf).unwrap_or_default()
        };
        if !root.as_os_str().is_empty() {
            extract::ensure_directory(&root)?;
        }

        let file = File::open(src).map_err(|source| Error::Read {
            archive: src.to_path_buf(),
            source,
        })?;
        let reader = self.compression.decoder(file)?;

        untar(reader, dst, src, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pax_time_with_fraction() {
        assert_eq!(
            parse_pax_time("1700000000.25"),
            Some(FileTime::from_unix_time(1_700_000_000, 250_000_000))
        );
    }

    #[test]
    fn pax_time_whole_seconds() {
        assert_eq!(
            parse_pax_time("42"),
            Some(FileTime::from_unix_time(42, 0))
        );
    }

    #[test]
    fn pax_time_negative() {
        assert_eq!(
            parse_pax_time("-1.5"),
            Some(FileTime::from_unix_time(-2, 500_000_000))
        );
    }

    #[test]
    fn pax_time_garbage() {
        assert_eq!(parse_pax_time("soon"), None);
    }

    #[test]
    fn regular_kinds() {
        assert!(is_regular(EntryType::Regular));
        assert!(is_regular(EntryType::Continuous));
        assert!(!is_regular(EntryType::Directory));
        assert!(!is_regular(EntryType::Fifo));
    }
}
