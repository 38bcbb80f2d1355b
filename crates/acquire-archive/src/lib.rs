//! Archive decompressors with single-file and directory extraction contracts.
//!
//! # Architecture
//!
//! - `decompressor.rs` - The [`Decompressor`] capability and the extension registry
//! - `extract/` - Per-format implementations and the shared filesystem writes
//! - `format.rs` - Stream compression codecs
//! - `sanitize.rs` - Entry path resolution (zip-slip prevention)

pub use decompressor::{Decompressor, DecompressorRegistry};
pub use error::{Error, Result};
pub use extract::stream::StreamDecompressor;
pub use extract::tar::TarDecompressor;
#[cfg(feature = "zip")]
pub use extract::zip::ZipDecompressor;
pub use extract::{PendingDirectory, untar};
pub use format::Compression;

mod decompressor;
mod error;
pub mod extract;
pub mod format;
mod sanitize;
