use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// What a download is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientMode {
    /// Let the getter decide from the source.
    #[default]
    Any,
    /// Exactly one file at the destination path.
    File,
    /// A directory tree rooted at the destination path.
    Dir,
}

impl ClientMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMode::Any => "any",
            ClientMode::File => "file",
            ClientMode::Dir => "dir",
        }
    }
}

impl fmt::Display for ClientMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientMode {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(ClientMode::Any),
            "file" => Ok(ClientMode::File),
            "dir" => Ok(ClientMode::Dir),
            other => Err(FetchError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for mode in [ClientMode::Any, ClientMode::File, ClientMode::Dir] {
            assert_eq!(mode.to_string().parse::<ClientMode>().unwrap(), mode);
        }
    }

    #[test]
    fn default_is_any() {
        assert_eq!(ClientMode::default(), ClientMode::Any);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "folder".parse::<ClientMode>().unwrap_err();
        assert!(matches!(err, FetchError::InvalidMode(ref m) if m == "folder"));
        assert_eq!(
            err.to_string(),
            "invalid client mode, must be 'any', 'file', or 'dir': folder"
        );
    }
}
