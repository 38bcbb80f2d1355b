//! Getters that place remote artifacts on local disk.
//!
//! # Architecture
//!
//! - [`Getter`] - The byte-fetch capability, one implementation per source kind
//! - [`GetterRegistry`] - Scheme / forced-getter name to getter dispatch
//! - [`mvn`] - Maven coordinate resolution layered over any other getter
//!
//! Getters are synchronous. Retries, checksums and caching are left to the
//! caller or to a wrapping getter.

mod error;
mod file;
mod getter;
#[cfg(feature = "reqwest")]
mod http;
mod mode;
pub mod mvn;

pub use error::{FetchError, Result};
pub use file::FileGetter;
pub use getter::{Getter, GetterRegistry};
#[cfg(feature = "reqwest")]
pub use http::{HttpGetter, HttpOptions};
pub use mode::ClientMode;
pub use mvn::{MvnGetter, MvnOptions};
