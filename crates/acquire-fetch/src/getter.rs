//! The getter capability and the registry that selects one per source.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use url::Url;

use crate::error::Result;
use crate::file::FileGetter;
use crate::mode::ClientMode;

/// Places the artifact behind a URL onto local disk.
///
/// Implementations are independent values; a getter that only needs to
/// compute a different URL wraps another getter instead of re-implementing
/// the transfer.
pub trait Getter: Send + Sync {
    /// Download a directory tree into `dst`.
    fn get(&self, dst: &Path, url: &Url) -> Result<()>;

    /// Download a single file to `dst`.
    fn get_file(&self, dst: &Path, url: &Url) -> Result<()>;

    /// Whether `url` names a file or a directory.
    fn client_mode(&self, url: &Url) -> Result<ClientMode>;
}

impl<G: Getter + ?Sized> Getter for Box<G> {
    fn get(&self, dst: &Path, url: &Url) -> Result<()> {
        (**self).get(dst, url)
    }

    fn get_file(&self, dst: &Path, url: &Url) -> Result<()> {
        (**self).get_file(dst, url)
    }

    fn client_mode(&self, url: &Url) -> Result<ClientMode> {
        (**self).client_mode(url)
    }
}

/// Maps a URL scheme or forced getter name (`mvn` in `mvn::https://...`)
/// to a getter.
pub struct GetterRegistry {
    getters: HashMap<String, Box<dyn Getter>>,
}

impl GetterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            getters: HashMap::new(),
        }
    }

    /// Registry holding every getter compiled into this crate.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        registry.register("file", FileGetter);

        #[cfg(feature = "reqwest")]
        {
            let http = crate::http::HttpGetter::new()?;
            registry.register("http", http.clone());
            registry.register("https", http.clone());
            registry.register("mvn", crate::mvn::MvnGetter::new(http));
        }

        Ok(registry)
    }

    pub fn register(&mut self, name: impl Into<String>, getter: impl Getter + 'static) {
        self.getters.insert(name.into(), Box::new(getter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Getter> {
        self.getters.get(name).map(|getter| getter.as_ref())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.getters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for GetterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GetterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterRegistry")
            .field("getters", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(ClientMode);

    impl Getter for Fixed {
        fn get(&self, _dst: &Path, _url: &Url) -> Result<()> {
            Ok(())
        }

        fn get_file(&self, _dst: &Path, _url: &Url) -> Result<()> {
            Ok(())
        }

        fn client_mode(&self, _url: &Url) -> Result<ClientMode> {
            Ok(self.0)
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = GetterRegistry::new();
        registry.register("s3", Fixed(ClientMode::Dir));

        let url = Url::parse("s3://bucket/key").unwrap();
        let getter = registry.get("s3").unwrap();
        assert_eq!(getter.client_mode(&url).unwrap(), ClientMode::Dir);
        assert!(registry.get("ftp").is_none());
    }

    #[test]
    fn defaults_include_file() {
        let registry = GetterRegistry::with_defaults().unwrap();
        assert!(registry.get("file").is_some());
        #[cfg(feature = "reqwest")]
        assert_eq!(registry.names(), vec!["file", "http", "https", "mvn"]);
    }

    #[test]
    fn boxed_getters_delegate() {
        let boxed: Box<dyn Getter> = Box::new(Fixed(ClientMode::File));
        let url = Url::parse("s3://bucket/key").unwrap();
        assert_eq!(boxed.client_mode(&url).unwrap(), ClientMode::File);
    }
}
