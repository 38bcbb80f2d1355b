//! Fetch an artifact and put it in place.
//!
//! A [`Client`] parses the source string, chooses a getter by forced name or
//! URL scheme, downloads the artifact and, when the source names an archive,
//! unpacks it into the destination.
//!
//! ```text
//! https://example.com/tool.tar.gz           http getter, tar.gz decompressor
//! mvn::https://repo/maven?groupId=..        repository getter over http
//! ./dist/app.zip?archive=false              file getter, copied as-is
//! ```

mod client;
mod error;
mod source;

pub use acquire_archive::{Decompressor, DecompressorRegistry};
pub use acquire_fetch::{ClientMode, Getter, GetterRegistry};
pub use client::Client;
pub use error::{ClientError, Result};
pub use source::{ARCHIVE_OPTION, Source};
