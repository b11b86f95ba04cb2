//! Character encoding names.
//!
//! Host locale APIs report codesets under historically inconsistent names.
//! Only a small set of known legacy aliases is rewritten here; everything
//! else is assumed to already be an IANA preferred name.
//!
//! Preferred names from:
//! https://www.iana.org/assignments/character-sets/character-sets.xhtml

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UTF_8: &str = "UTF-8";
pub const ISO_8859_1: &str = "ISO-8859-1";
pub const US_ASCII: &str = "US-ASCII";
pub const ISO_8859_15: &str = "ISO-8859-15";
pub const WINDOWS_1251: &str = "windows-1251";

/// Map a known legacy alias to its IANA name, or return the input unchanged.
///
/// Matching is exact and case-sensitive. The canonical outputs are not
/// themselves aliases, so applying this twice is the same as applying it once.
pub fn normalize_encoding(encoding: &str) -> &str {
    match encoding {
        "ISO8859-1" => ISO_8859_1,
        "ISO8859-15" => ISO_8859_15,
        "ANSI_X3.4-1968" | "ISO646-US" => US_ASCII,
        other => other,
    }
}

/// Normalize a codeset taken from a POSIX locale name (`en_US.utf8`).
///
/// Locale codesets are frequently written without the dash in `UTF-8`; those
/// spellings are folded before the alias table is consulted.
pub fn normalize_codeset(codeset: &str) -> &str {
    if codeset.eq_ignore_ascii_case("utf8") || codeset.eq_ignore_ascii_case("utf-8") {
        return UTF_8;
    }
    normalize_encoding(codeset)
}

/// Default byte order of the fixed-width Unicode encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnicodeEncoding {
    UnicodeBig,
    UnicodeLittle,
}

impl UnicodeEncoding {
    /// Byte order of the target this crate was compiled for.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            UnicodeEncoding::UnicodeBig
        } else {
            UnicodeEncoding::UnicodeLittle
        }
    }
}

impl fmt::Display for UnicodeEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnicodeEncoding::UnicodeBig => write!(f, "UnicodeBig"),
            UnicodeEncoding::UnicodeLittle => write!(f, "UnicodeLittle"),
        }
    }
}
