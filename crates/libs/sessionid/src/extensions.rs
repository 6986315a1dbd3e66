//! Ordered key/value extensions and their binary block form.
//!
//! ```text
//! [count:2][key_len:2][key][value_len:2][value] ... repeated count times
//! ```
//!
//! All integers are big-endian. Keys and values are fields as written by
//! [`crate::string_codec`].

use std::collections::BTreeMap;

use crate::error::{Result, SessionIdError};
use crate::string_codec::{self, FieldReader, FieldWriter, LENGTH_PREFIX_SIZE};

/// Extension key carrying the primary server id.
pub const PRIMARY_ID: &str = "S1";
/// Extension key carrying the site id.
pub const SITE_ID: &str = "SI";
/// Extension key carrying the session storage key.
pub const STORAGE_KEY: &str = "SK";

/// Most entries a block can declare.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// An ordered sequence of extension entries.
///
/// Insertion order (duplicates included) is what gets serialized. Lookups and
/// equality use the mapping view, where the last entry for a key wins.
#[derive(Debug, Clone, Default)]
pub struct ExtensionBlock {
    entries: Vec<(String, String)>,
}

impl ExtensionBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> BTreeMap<&str, &str> {
        self.iter().collect()
    }

    pub fn primary_id(&self) -> Option<&str> {
        self.get(PRIMARY_ID)
    }

    pub fn site_id(&self) -> Option<&str> {
        self.get(SITE_ID)
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.get(STORAGE_KEY)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let count = u16::try_from(self.entries.len()).map_err(|_| {
            SessionIdError::EncodingTooLarge { what: "entry count", len: self.entries.len() }
        })?;
        let body: usize = self.entries.iter().map(|(k, v)| k.len() + v.len()).sum();
        let mut writer =
            FieldWriter::with_capacity(LENGTH_PREFIX_SIZE * (1 + 2 * self.entries.len()) + body);
        writer.write_u16(count);
        for (key, value) in &self.entries {
            writer.write_string(key)?;
            writer.write_string(value)?;
        }
        Ok(writer.into_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(bytes);
        let count = usize::from(reader.read_u16()?);
        // Each entry needs at least its two prefixes; bail before allocating.
        let minimum = count * 2 * LENGTH_PREFIX_SIZE;
        if reader.remaining() < minimum {
            return Err(SessionIdError::TruncatedData {
                offset: LENGTH_PREFIX_SIZE,
                needed: minimum,
                available: reader.remaining(),
            });
        }
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let key = reader.read_string()?;
            let value = reader.read_string()?;
            entries.push((key, value));
        }
        reader.finish()?;
        Ok(Self { entries })
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(string_codec::to_base64(&self.to_bytes()?))
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        Self::from_bytes(&string_codec::from_base64(text)?)
    }
}

impl PartialEq for ExtensionBlock {
    fn eq(&self, other: &Self) -> bool {
        self.as_map() == other.as_map()
    }
}

impl Eq for ExtensionBlock {}

impl<K, V> FromIterator<(K, V)> for ExtensionBlock
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl<K, V> Extend<(K, V)> for ExtensionBlock
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}
