//! Bounded opaque entity tags.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::PlugtestError;

/// Maximum entity tag length in bytes.
pub const MAX_ETAG_LEN: usize = 8;

/// An opaque entity tag of 1 to [`MAX_ETAG_LEN`] bytes.
///
/// Equality is byte-for-byte over the used prefix, so tags of different
/// lengths never compare equal even when one is a prefix of the other.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ETag {
    bytes: [u8; MAX_ETAG_LEN],
    len: u8,
}

impl ETag {
    /// Build a tag from raw option bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, PlugtestError> {
        if bytes.is_empty() {
            return Err(PlugtestError::EmptyTag);
        }
        if bytes.len() > MAX_ETAG_LEN {
            return Err(PlugtestError::TagTooLong { len: bytes.len() });
        }
        let mut buf = [0u8; MAX_ETAG_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    /// Build from a full buffer, keeping the first `len` bytes. `len` is
    /// clamped into the valid range.
    pub(crate) fn from_array(bytes: [u8; MAX_ETAG_LEN], len: usize) -> Self {
        let len = len.clamp(1, MAX_ETAG_LEN);
        let mut buf = [0u8; MAX_ETAG_LEN];
        buf[..len].copy_from_slice(&bytes[..len]);
        Self {
            bytes: buf,
            len: len as u8,
        }
    }

    /// The single zero byte a resource starts out with.
    pub const fn placeholder() -> Self {
        Self {
            bytes: [0u8; MAX_ETAG_LEN],
            len: 1,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Tags are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Exact comparison against client-supplied option bytes.
    ///
    /// Anything that could not be a valid tag (empty, over-long) is simply
    /// not equal.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.as_bytes() == candidate
    }

    /// Lowercase hex rendering used by text transports.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ETag({} [0x{}])", self.len, self.to_hex())
    }
}

impl FromStr for ETag {
    type Err = PlugtestError;

    /// Parse hex, tolerating the surrounding double quotes HTTP puts on tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('"');
        let bytes =
            hex::decode(trimmed).map_err(|e| PlugtestError::InvalidTagEncoding(e.to_string()))?;
        ETag::new(&bytes)
    }
}

impl AsRef<[u8]> for ETag {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Serialize for ETag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
