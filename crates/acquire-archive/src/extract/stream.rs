use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::decompressor::Decompressor;
use crate::error::{Error, Result};
use crate::extract;
use crate::format::Compression;

/// Decompressor for a single compressed file (`.gz`, `.xz`, `.zst`).
///
/// A compressed stream carries no entry list, so it can only ever produce one
/// file and directory mode is refused.
#[derive(Clone, Copy, Debug)]
pub struct StreamDecompressor {
    compression: Compression,
}

impl StreamDecompressor {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }
}

impl Decompressor for StreamDecompressor {
    fn decompress(&self, dst: &Path, src: &Path, dir: bool) -> Result<()> {
        if dir {
            return Err(Error::DirectoryUnsupported {
                format: self.compression.name(),
            });
        }

        extract::ensure_parent(dst)?;

        let file = File::open(src).map_err(|source| Error::Read {
            archive: src.to_path_buf(),
            source,
        })?;
        let mut reader = self.compression.decoder(file)?;

        let written = extract::write_file(&mut reader, dst)?;
        debug!(path = %dst.display(), bytes = written, "decompressed {}", self.compression.name());
        Ok(())
    }

    fn single_file_only(&self) -> bool {
        true
    }
}
