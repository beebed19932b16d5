//! Capacity-bounded text for device paths and names.
//!
//! Device identity used to live in fixed `char[MAX_PATH_LEN]` buffers.  The
//! same bound is kept here as a type parameter: at most `CAP` bytes of UTF-8,
//! cut on a character boundary, never more.

use std::fmt;
use std::ops::Deref;

/// Buffer bound for device identity text, including a C terminator byte.
pub const MAX_PATH_LEN: usize = 256;

/// Text capacity that fits a `MAX_PATH_LEN` buffer.
pub type DeviceText = BoundedText<{ MAX_PATH_LEN - 1 }>;

/// A string guaranteed to hold at most `CAP` bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedText<const CAP: usize> {
    text: String,
    truncated: bool,
}

impl<const CAP: usize> BoundedText<CAP> {
    pub const CAPACITY: usize = CAP;

    /// Copies `source`, truncating to the longest prefix of at most `CAP`
    /// bytes that ends on a character boundary.
    pub fn truncate_from(source: &str) -> Self {
        if source.len() <= CAP {
            return Self {
                text: source.to_owned(),
                truncated: false,
            };
        }
        let mut end = CAP;
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            text: source[..end].to_owned(),
            truncated: true,
        }
    }

    /// Interprets a C string buffer: stops at the first NUL and replaces
    /// invalid UTF-8 before truncating.
    pub fn from_c_bytes(bytes: &[u8]) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self::truncate_from(&String::from_utf8_lossy(&bytes[..end]))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `true` if the source did not fit and was cut.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

impl<const CAP: usize> Deref for BoundedText<CAP> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl<const CAP: usize> AsRef<str> for BoundedText<CAP> {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl<const CAP: usize> fmt::Display for BoundedText<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<const CAP: usize> PartialEq<str> for BoundedText<CAP> {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl<const CAP: usize> PartialEq<&str> for BoundedText<CAP> {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
