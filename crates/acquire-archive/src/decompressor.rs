use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::extract::stream::StreamDecompressor;
use crate::extract::tar::TarDecompressor;
use crate::format::Compression;

/// Unpacks an archive file onto the filesystem.
///
/// `dst` is the directory to populate when `dir` is true, or the exact file
/// to write when it is false. `src` is the archive on local disk.
pub trait Decompressor: Send + Sync {
    fn decompress(&self, dst: &Path, src: &Path, dir: bool) -> Result<()>;

    /// Whether this format can only ever yield one file.
    fn single_file_only(&self) -> bool {
        false
    }
}

/// Maps archive extensions (`tar.gz`, `zip`, ...) to decompressors.
pub struct DecompressorRegistry {
    decompressors: HashMap<String, Box<dyn Decompressor>>,
}

impl DecompressorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            decompressors: HashMap::new(),
        }
    }

    /// Registry holding every format compiled into this crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("tar", TarDecompressor::new(Compression::None));
        registry.register("tar.gz", TarDecompressor::new(Compression::Gzip));
        registry.register("tgz", TarDecompressor::new(Compression::Gzip));
        registry.register("gz", StreamDecompressor::new(Compression::Gzip));

        #[cfg(feature = "xz")]
        {
            registry.register("tar.xz", TarDecompressor::new(Compression::Xz));
            registry.register("txz", TarDecompressor::new(Compression::Xz));
            registry.register("xz", StreamDecompressor::new(Compression::Xz));
        }

        #[cfg(feature = "zstd")]
        {
            registry.register("tar.zst", TarDecompressor::new(Compression::Zstd));
            registry.register("tzst", TarDecompressor::new(Compression::Zstd));
            registry.register("zst", StreamDecompressor::new(Compression::Zstd));
        }

        #[cfg(feature = "zip")]
        registry.register("zip", crate::extract::zip::ZipDecompressor);

        registry
    }

    pub fn register(&mut self, key: impl Into<String>, decompressor: impl Decompressor + 'static) {
        self.decompressors.insert(key.into(), Box::new(decompressor));
    }

    pub fn get(&self, key: &str) -> Option<&dyn Decompressor> {
        self.decompressors.get(key).map(|d| d.as_ref())
    }

    /// Longest registered key that `path` ends with, as `.<key>`.
    ///
    /// `release.tar.gz` matches `tar.gz` rather than `gz`.
    pub fn match_extension(&self, path: &str) -> Option<&str> {
        self.decompressors
            .keys()
            .filter(|key| {
                path.len() > key.len()
                    && path.ends_with(key.as_str())
                    && path[..path.len() - key.len()].ends_with('.')
            })
            .max_by_key(|key| key.len())
            .map(String::as_str)
    }

    /// All registered keys.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.decompressors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for DecompressorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for DecompressorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressorRegistry")
            .field("formats", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_extension_wins() {
        let registry = DecompressorRegistry::with_defaults();
        assert_eq!(registry.match_extension("/dl/release.tar.gz"), Some("tar.gz"));
        assert_eq!(registry.match_extension("/dl/notes.gz"), Some("gz"));
        assert_eq!(registry.match_extension("/dl/bundle.tgz"), Some("tgz"));
    }

    #[test]
    fn extension_needs_a_dot() {
        let registry = DecompressorRegistry::with_defaults();
        assert_eq!(registry.match_extension("/dl/guitar"), None);
        assert_eq!(registry.match_extension("tar"), None);
        assert_eq!(registry.match_extension("/dl/plain.txt"), None);
    }

    #[test]
    fn gzip_stream_is_single_file_only() {
        let registry = DecompressorRegistry::with_defaults();
        assert!(registry.get("gz").unwrap().single_file_only());
        assert!(!registry.get("tar.gz").unwrap().single_file_only());
    }

    #[test]
    fn custom_registration() {
        struct Noop;
        impl Decompressor for Noop {
            fn decompress(&self, _: &Path, _: &Path, _: bool) -> Result<()> {
                Ok(())
            }
        }

        let mut registry = DecompressorRegistry::new();
        assert!(registry.get("noop").is_none());
        registry.register("noop", Noop);
        assert!(registry.get("noop").is_some());
        assert_eq!(registry.keys(), vec!["noop"]);
    }
}
