use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::error::{FetchError, Result};
use crate::getter::Getter;
use crate::mode::ClientMode;

/// Configuration for [`HttpGetter`].
///
/// # Examples
///
/// ```
/// use acquire_fetch::HttpOptions;
/// use std::time::Duration;
///
/// let options = HttpOptions::default()
///     .timeout(Duration::from_secs(30))
///     .header("Authorization", "Bearer token");
/// ```
#[derive(Clone, Debug)]
pub struct HttpOptions {
    /// Total time allowed for one request, body included.
    ///
    /// Default: None (no timeout)
    pub timeout: Option<Duration>,

    /// Value of the `User-Agent` header.
    ///
    /// Default: `acquire/<crate version>`
    pub user_agent: String,

    /// Extra headers sent with every request.
    ///
    /// Default: empty
    pub headers: Vec<(String, String)>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("acquire/", env!("CARGO_PKG_VERSION")).to_string(),
            headers: Vec::new(),
        }
    }
}

impl HttpOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Plain HTTP(S) byte transfer over a blocking reqwest client.
#[derive(Clone, Debug)]
pub struct HttpGetter {
    client: reqwest::blocking::Client,
    options: HttpOptions,
}

impl HttpGetter {
    pub fn new() -> Result<Self> {
        Self::with_options(HttpOptions::default())
    }

    pub fn with_options(options: HttpOptions) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, options })
    }
}

impl Getter for HttpGetter {
    fn get(&self, _dst: &Path, _url: &Url) -> Result<()> {
        Err(FetchError::UnsupportedOperation { getter: "HttpGetter" })
    }

    /// Stream the body into a temporary file beside `dst`, then rename it into
    /// place so a failed transfer never leaves a truncated file at `dst`.
    fn get_file(&self, dst: &Path, url: &Url) -> Result<()> {
        info!("Downloading {url} to {}", dst.display());

        let mut request = self.client.get(url.as_str());
        for (key, value) in &self.options.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let mut response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let parent = match dst.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(FetchError::io(parent))?;

        let mut staging = tempfile::Builder::new()
            .prefix(".acquire-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(FetchError::io(parent))?;
        let bytes = response.copy_to(staging.as_file_mut())?;
        staging
            .persist(dst)
            .map_err(|e| FetchError::Io {
                path: dst.to_path_buf(),
                source: e.error,
            })?;

        debug!(bytes, path = %dst.display(), "download complete");
        Ok(())
    }

    fn client_mode(&self, _url: &Url) -> Result<ClientMode> {
        Ok(ClientMode::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder() {
        let options = HttpOptions::default()
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent")
            .header("Accept", "*/*");

        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.user_agent, "test-agent");
        assert_eq!(options.headers, vec![("Accept".to_string(), "*/*".to_string())]);
    }

    #[test]
    fn default_user_agent_names_the_crate() {
        assert!(HttpOptions::default().user_agent.starts_with("acquire/"));
    }

    #[test]
    fn directories_are_unsupported() {
        let getter = HttpGetter::new().unwrap();
        let url = Url::parse("https://example.com/dir/").unwrap();
        let result = getter.get(Path::new("out"), &url);
        assert!(matches!(result, Err(FetchError::UnsupportedOperation { .. })));
        assert_eq!(getter.client_mode(&url).unwrap(), ClientMode::File);
    }
}
