//! Turning the raw source string into a getter name and URL.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{ClientError, Result};

/// Query option selecting the archive format, or `false` to skip extraction.
pub const ARCHIVE_OPTION: &str = "archive";

/// A parsed source: an optional forced getter and the URL handed to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// Getter named with `getter::url`, overriding the URL scheme.
    pub forced: Option<String>,
    pub url: Url,
}

/// Splits `mvn::https://...` into `("mvn", "https://...")`.
fn split_forced(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once("::") {
        Some((name, rest))
            if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (Some(name), rest)
        }
        _ => (None, raw),
    }
}

fn path_url(raw: &str, pwd: Option<&Path>) -> Result<Url> {
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    };

    let path = PathBuf::from(path);
    let absolute = if path.is_absolute() {
        path
    } else {
        match pwd {
            Some(pwd) => pwd.join(path),
            None => return Err(ClientError::RelativePath(raw.to_string())),
        }
    };

    let mut url = Url::from_file_path(&absolute)
        .map_err(|()| ClientError::RelativePath(raw.to_string()))?;
    url.set_query(query);
    Ok(url)
}

impl Source {
    /// Parse `raw`, resolving relative paths against `pwd`.
    ///
    /// Anything with a scheme longer than one character is a URL. A single
    /// letter scheme is a Windows drive, so it is read as a path like every
    /// other scheme-less string.
    pub fn parse(raw: &str, pwd: Option<&Path>) -> Result<Self> {
        let (forced, rest) = split_forced(raw);

        let url = match Url::parse(rest) {
            Ok(url) if url.scheme().len() > 1 => url,
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => path_url(rest, pwd)?,
            Err(source) => {
                return Err(ClientError::InvalidSource {
                    raw: raw.to_string(),
                    source,
                });
            }
        };

        Ok(Self {
            forced: forced.map(str::to_string),
            url,
        })
    }

    /// Name used to look up the getter.
    pub fn getter_name(&self) -> &str {
        self.forced.as_deref().unwrap_or_else(|| self.url.scheme())
    }

    /// Remove the `archive` option from the URL and return its value.
    pub fn take_archive(&mut self) -> Option<String> {
        let mut archive = None;
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter_map(|(key, value)| {
                if key == ARCHIVE_OPTION {
                    archive = Some(value.into_owned());
                    None
                } else {
                    Some((key.into_owned(), value.into_owned()))
                }
            })
            .collect();

        if archive.is_some() {
            if kept.is_empty() {
                self.url.set_query(None);
            } else {
                self.url.query_pairs_mut().clear().extend_pairs(kept);
            }
        }
        archive
    }
}
