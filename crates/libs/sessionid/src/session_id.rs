//! Three-part session identifier assembly.
//!
//! ```text
//! <core>@<base64 extension block>[#<tail>]
//! ```
//!
//! The block ends at the first byte outside the base64 alphabet, so neither
//! the block nor the tail needs a length prefix. `core` must not contain `@`.

use core::str::FromStr;

use crate::error::{Result, SessionIdError};
use crate::extensions::ExtensionBlock;
use crate::string_codec::is_base64_byte;

/// Separates the core from the extension block.
pub const EXTENSION_MARKER: char = '@';

/// Written between the extension block and a non-empty tail.
pub const TAIL_DELIMITER: char = '#';

/// A parsed session identifier. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentifier {
    core: String,
    extensions: ExtensionBlock,
    tail: String,
}

impl SessionIdentifier {
    pub fn new(core: impl Into<String>, extensions: ExtensionBlock, tail: impl Into<String>) -> Self {
        Self { core: core.into(), extensions, tail: tail.into() }
    }

    /// Assemble the identifier string for `core`, `extensions` and `tail`.
    ///
    /// `core` must not contain [`EXTENSION_MARKER`]; the result would not parse
    /// back to the same parts.
    pub fn create(core: &str, extensions: &ExtensionBlock, tail: &str) -> Result<String> {
        debug_assert!(!core.contains(EXTENSION_MARKER), "core must not contain '@'");
        let block = extensions.to_base64()?;
        let mut out = String::with_capacity(core.len() + block.len() + tail.len() + 2);
        out.push_str(core);
        out.push(EXTENSION_MARKER);
        out.push_str(&block);
        if !tail.is_empty() {
            out.push(TAIL_DELIMITER);
            out.push_str(tail);
        }
        log::debug!(
            "session id: created {} bytes ({} extensions, tail {} bytes)",
            out.len(),
            extensions.len(),
            tail.len()
        );
        Ok(out)
    }

    pub fn encode(&self) -> Result<String> {
        Self::create(&self.core, &self.extensions, &self.tail)
    }

    /// Split `text` back into core, extensions and tail.
    ///
    /// Decoding is all-or-nothing: any invalid block fails the whole parse.
    ///
    /// Text without [`EXTENSION_MARKER`] is an identifier issued without
    /// extensions: it parses as `core` up to the first [`TAIL_DELIMITER`] and
    /// the tail after it, and never fails.
    pub fn parse(text: &str) -> Result<Self> {
        let Some((core, rest)) = text.split_once(EXTENSION_MARKER) else {
            let (core, tail) = text.split_once(TAIL_DELIMITER).unwrap_or((text, ""));
            return Ok(Self::new(core, ExtensionBlock::new(), tail));
        };

        // The run is ASCII, so its byte length is a char boundary.
        let block_len = rest.bytes().take_while(|byte| is_base64_byte(*byte)).count();
        let (block, remainder) = rest.split_at(block_len);
        let tail = remainder.strip_prefix(TAIL_DELIMITER).unwrap_or(remainder);

        let extensions = ExtensionBlock::from_base64(block).map_err(|err| {
            log::warn!("session id: rejected extension block ({:?})", err.kind());
            err
        })?;
        log::debug!(
            "session id: parsed {} bytes ({} extensions, tail {} bytes)",
            text.len(),
            extensions.len(),
            tail.len()
        );
        Ok(Self::new(core, extensions, tail))
    }

    pub fn core(&self) -> &str {
        &self.core
    }

    pub fn extensions(&self) -> &ExtensionBlock {
        &self.extensions
    }

    pub fn has_extensions(&self) -> bool {
        !self.extensions.is_empty()
    }

    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key)
    }

    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn primary_id(&self) -> Option<&str> {
        self.extensions.primary_id()
    }

    pub fn site_id(&self) -> Option<&str> {
        self.extensions.site_id()
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.extensions.storage_key()
    }
}

impl FromStr for SessionIdentifier {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Build an identifier string from ordered `(key, value)` pairs.
pub fn create_session_identifier<I, K, V>(core: &str, extensions: I, tail: &str) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    SessionIdentifier::create(core, &extensions.into_iter().collect(), tail)
}

pub fn parse_session_identifier(text: &str) -> Result<SessionIdentifier> {
    SessionIdentifier::parse(text)
}
