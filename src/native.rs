//! Host-native text.
//!
//! Paths and user names come from the OS in its preferred width: bytes on
//! Unix, UTF-16 units on Windows. They are kept in that form until a consumer
//! asks for internal text, and the conversion fails instead of substituting
//! replacement characters.

use serde::{Serialize, Serializer};
use std::ffi::OsString;
use std::fmt;

use crate::error::ConversionError;

#[derive(Clone, PartialEq, Eq)]
pub enum NativeText {
    /// Narrow text, as produced by Unix APIs.
    Narrow(Vec<u8>),
    /// Wide text, as produced by Windows `W` APIs.
    Wide(Vec<u16>),
}

impl NativeText {
    #[cfg(unix)]
    pub fn from_os_string(value: OsString) -> Self {
        use std::os::unix::ffi::OsStringExt;
        NativeText::Narrow(value.into_vec())
    }

    #[cfg(windows)]
    pub fn from_os_string(value: OsString) -> Self {
        use std::os::windows::ffi::OsStrExt;
        NativeText::Wide(value.encode_wide().collect())
    }

    #[cfg(not(any(unix, windows)))]
    pub fn from_os_string(value: OsString) -> Self {
        NativeText::Narrow(value.to_string_lossy().into_owned().into_bytes())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NativeText::Narrow(bytes) => bytes.is_empty(),
            NativeText::Wide(units) => units.is_empty(),
        }
    }

    /// Convert to internal text, failing on anything that is not valid
    /// UTF-8 / UTF-16.
    pub fn to_internal(&self) -> Result<String, ConversionError> {
        match self {
            NativeText::Narrow(bytes) => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| ConversionError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                }),
            NativeText::Wide(units) => {
                String::from_utf16(units).map_err(|_| ConversionError::InvalidUtf16)
            }
        }
    }

    /// Lossy rendering for human-facing output only.
    pub fn to_string_lossy(&self) -> String {
        match self {
            NativeText::Narrow(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            NativeText::Wide(units) => String::from_utf16_lossy(units),
        }
    }
}

impl From<&str> for NativeText {
    fn from(value: &str) -> Self {
        NativeText::from_os_string(OsString::from(value))
    }
}

impl fmt::Debug for NativeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeText({:?})", self.to_string_lossy())
    }
}

// Serialized as internal text; unconvertible values become null.
impl Serialize for NativeText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_internal() {
            Ok(text) => serializer.serialize_some(&text),
            Err(_) => serializer.serialize_none(),
        }
    }
}
