//! # sessionid
//!
//! Issue and parse opaque session identifiers.
//!
//! An identifier carries an opaque core reference produced elsewhere, a small
//! block of key/value extensions, and a free-form tail:
//!
//! ```text
//! <core>@<base64([count:2]([len:2][key][len:2][value])*)>[#<tail>]
//! ```
//!
//! Extensions are neither confidential nor integrity protected at this layer.
//! Decoding treats the whole identifier as untrusted input and fails with a
//! specific [`ErrorKind`] instead of returning partial data.
//!
//! ## Example
//!
//! ```rust
//! use sessionid::{ExtensionBlock, SessionIdentifier};
//!
//! let extensions = ExtensionBlock::new().with("one", "one").with("two", "two");
//! let encoded = SessionIdentifier::create("someEncryptedId", &extensions, "I'm a donkey").unwrap();
//!
//! let sid = SessionIdentifier::parse(&encoded).unwrap();
//! assert_eq!(sid.core(), "someEncryptedId");
//! assert_eq!(sid.extension("one"), Some("one"));
//! assert_eq!(sid.tail(), "I'm a donkey");
//! ```

pub mod error;
pub mod extensions;
pub mod session_id;
pub mod string_codec;

pub use error::{ErrorKind, Result, SessionIdError};
pub use extensions::{ExtensionBlock, PRIMARY_ID, SITE_ID, STORAGE_KEY};
pub use session_id::{
    create_session_identifier, parse_session_identifier, SessionIdentifier, EXTENSION_MARKER,
    TAIL_DELIMITER,
};
