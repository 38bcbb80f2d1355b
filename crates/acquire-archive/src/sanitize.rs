use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry name against the extraction root.
///
/// `.` components are dropped. Absolute names, drive prefixes and `..`
/// components are rejected rather than normalized away, so an entry can never
/// land outside `base`. A name made only of `.` resolves to `base` itself.
pub fn entry_path(base: &Path, entry: &Path) -> Result<PathBuf> {
    let mut relative = PathBuf::new();

    for component in entry.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::PathTraversal {
                    entry: entry.to_path_buf(),
                });
            }
        }
    }

    Ok(base.join(relative))
}

/// Check that the nearest existing ancestor of `anchor` (or `anchor` itself)
/// resolves inside `root`, following symlinks created earlier in the same
/// extraction. `root` must be canonical.
pub fn check_resolved(root: &Path, anchor: &Path, entry: &Path) -> Result<()> {
    let traversal = || Error::PathTraversal {
        entry: entry.to_path_buf(),
    };

    let Some(existing) = anchor
        .ancestors()
        .find(|p| !p.as_os_str().is_empty() && fs::symlink_metadata(p).is_ok())
    else {
        return Ok(());
    };

    // A dangling link cannot be resolved and is rejected.
    let resolved = fs::canonicalize(existing).map_err(|_| traversal())?;
    if resolved.starts_with(root) {
        Ok(())
    } else {
        Err(traversal())
    }
}

/// Check that a symlink inside `link_dir` pointing at `target` stays inside
/// `root`. Both directories must be canonical.
pub fn check_symlink_target(root: &Path, link_dir: &Path, target: &Path) -> Result<()> {
    let traversal = || Error::PathTraversal {
        entry: target.to_path_buf(),
    };

    let relative = link_dir.strip_prefix(root).map_err(|_| traversal())?;
    let mut depth = relative.components().count();

    for component in target.components() {
        match component {
            Component::ParentDir => depth = depth.checked_sub(1).ok_or_else(traversal)?,
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }

    Ok(())
}
