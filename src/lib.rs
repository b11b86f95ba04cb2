//! Host platform properties collected once at process start.
//!
//! [`global()`] returns the process-wide [`PlatformProperties`] record:
//! OS identity, separators, user directories, format and display locales,
//! text encodings, CPU description and (on macOS) proxy settings.
//! [`normalize_encoding`] rewrites a handful of legacy codeset aliases to
//! their IANA names.

pub mod config;
pub mod domain;
pub mod encoding;
pub mod error;
pub mod native;
pub mod platform;

pub use config::Config;
pub use domain::collector::Collector;
pub use domain::locale::{Category, Locale};
pub use domain::properties::{global, PlatformProperties, PropertiesBuilder};
pub use domain::proxy::{PartialProxyPolicy, ProxyEndpoint, ProxyKind, ProxySettings};
pub use encoding::{normalize_encoding, UnicodeEncoding};
pub use error::{ConfigError, ConversionError};
pub use native::NativeText;
