//! Length-prefixed text fields and the base64 step.
//!
//! A field is a 2-byte big-endian byte count followed by that many bytes.
//! The writer encodes U+0000 as the overlong pair `0xC0 0x80` so a field never
//! contains a raw NUL; every other code point is plain UTF-8. The reader only
//! accepts standards-conformant UTF-8, so a field carrying an encoded NUL is
//! rejected with [`SessionIdError::MalformedText`].

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::error::{Result, SessionIdError};

/// Size of the big-endian length prefix in front of each field.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest encoded byte length a single field can carry.
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

const ENCODED_NUL: [u8; 2] = [0xC0, 0x80];

/// Number of bytes `text` occupies once encoded, excluding the prefix.
pub fn encoded_len(text: &str) -> usize {
    text.chars().map(|ch| if ch == '\0' { ENCODED_NUL.len() } else { ch.len_utf8() }).sum()
}

/// Encode a single field: length prefix plus body.
pub fn encode_string(text: &str) -> Result<Vec<u8>> {
    let mut writer = FieldWriter::with_capacity(LENGTH_PREFIX_SIZE + text.len());
    writer.write_string(text)?;
    Ok(writer.into_bytes())
}

/// Decode a single field produced by [`encode_string`].
///
/// The input must hold exactly one field.
pub fn decode_string(bytes: &[u8]) -> Result<String> {
    let mut reader = FieldReader::new(bytes);
    let text = reader.read_string()?;
    reader.finish()?;
    Ok(text)
}

pub fn to_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Standard alphabet, padding required.
pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    Ok(BASE64_STANDARD.decode(text)?)
}

/// `true` for bytes that may appear in [`to_base64`] output.
pub fn is_base64_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'/' | b'=')
}

#[derive(Debug, Default)]
pub(crate) struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    pub(crate) fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn write_string(&mut self, text: &str) -> Result<()> {
        let len = encoded_len(text);
        let prefix = u16::try_from(len)
            .map_err(|_| SessionIdError::EncodingTooLarge { what: "string", len })?;
        self.write_u16(prefix);
        self.buf.reserve(len);
        let mut scratch = [0u8; 4];
        for ch in text.chars() {
            if ch == '\0' {
                self.buf.extend_from_slice(&ENCODED_NUL);
            } else {
                self.buf.extend_from_slice(ch.encode_utf8(&mut scratch).as_bytes());
            }
        }
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Debug)]
pub(crate) struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < needed {
            return Err(SessionIdError::TruncatedData { offset: self.pos, needed, available });
        }
        let start = self.pos;
        self.pos += needed;
        Ok(&self.buf[start..self.pos])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        let raw = self.take(2)?;
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        let len = usize::from(self.read_u16()?);
        let offset = self.pos;
        let raw = self.take(len)?;
        let text = core::str::from_utf8(raw)
            .map_err(|source| SessionIdError::MalformedText { offset, source })?;
        Ok(text.to_owned())
    }

    /// Fails if any bytes are left unread.
    pub(crate) fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(SessionIdError::TrailingBytes(extra)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn encode_string_prefixes_byte_length() {
        let encoded = encode_string("Café").expect("encode");
        assert_eq!(encoded, [0x00, 0x05, b'C', b'a', b'f', 0xC3, 0xA9]);
        assert_eq!(decode_string(&encoded).expect("decode"), "Café");
    }

    #[test]
    fn encode_string_never_emits_raw_nul() {
        let encoded = encode_string("a\0b").expect("encode");
        assert_eq!(encoded, [0x00, 0x04, b'a', 0xC0, 0x80, b'b']);
        assert!(!encoded[LENGTH_PREFIX_SIZE..].contains(&0));
    }

    #[test]
    fn decode_string_rejects_encoded_nul() {
        let encoded = encode_string("Key\0").expect("encoding NUL must succeed");
        let err = decode_string(&encoded).expect_err("decoding NUL must fail");
        assert_eq!(err.kind(), ErrorKind::MalformedText);
    }

    #[test]
    fn decode_string_rejects_latin1_bytes() {
        let bytes = [0x00, 0x04, b'C', b'a', b'f', 0xE9];
        let err = decode_string(&bytes).expect_err("latin-1 must fail");
        assert!(matches!(err, SessionIdError::MalformedText { offset: 2, .. }));
    }

    #[test]
    fn decode_string_rejects_non_canonical_utf8() {
        let cases: [&[u8]; 4] = [
            &[0x00, 0x02, 0xC1, 0x81],
            &[0x00, 0x03, 0xE0, 0x80, 0x80],
            &[0x00, 0x03, 0xED, 0xA0, 0x80],
            &[0x00, 0x04, 0xF4, 0x90, 0x80, 0x80],
        ];
        for bytes in cases {
            let err = decode_string(bytes).expect_err("non-canonical UTF-8 must fail");
            assert_eq!(err.kind(), ErrorKind::MalformedText, "input {bytes:02x?}");
        }
    }

    #[test]
    fn supplementary_code_points_use_four_byte_utf8() {
        let encoded = encode_string("🦀").expect("encode");
        assert_eq!(encoded, [0x00, 0x04, 0xF0, 0x9F, 0xA6, 0x80]);
        assert_eq!(decode_string(&encoded).expect("decode"), "🦀");
    }

    #[test]
    fn encode_string_rejects_oversized_text() {
        let text = "x".repeat(MAX_FIELD_LEN + 1);
        let err = encode_string(&text).expect_err("oversized text must fail");
        assert!(matches!(err, SessionIdError::EncodingTooLarge { len, .. } if len == MAX_FIELD_LEN + 1));

        let nuls = "\0".repeat(MAX_FIELD_LEN / 2 + 1);
        assert!(encode_string(&nuls).is_err(), "NUL expansion counts toward the limit");

        let at_limit = "y".repeat(MAX_FIELD_LEN);
        assert_eq!(encode_string(&at_limit).expect("limit fits").len(), MAX_FIELD_LEN + 2);
    }

    #[test]
    fn decode_string_rejects_short_input() {
        let err = decode_string(&[0x00]).expect_err("missing prefix byte");
        assert!(matches!(err, SessionIdError::TruncatedData { needed: 2, available: 1, .. }));

        let err = decode_string(&[0x00, 0x03, b'a']).expect_err("missing body");
        assert!(matches!(err, SessionIdError::TruncatedData { offset: 2, needed: 3, available: 1 }));
    }

    #[test]
    fn decode_string_rejects_trailing_bytes() {
        let err = decode_string(&[0x00, 0x01, b'a', b'b']).expect_err("trailing byte");
        assert_eq!(err, SessionIdError::TrailingBytes(1));
    }

    #[test]
    fn from_base64_rejects_wrong_alphabet_and_padding() {
        assert_eq!(from_base64("AAA=").expect("valid"), [0, 0]);
        for bad in ["This isn't valid Base64", "AAA", "AA-_", "A==="] {
            let err = from_base64(bad).expect_err("invalid base64");
            assert_eq!(err.kind(), ErrorKind::InvalidEncoding, "input {bad:?}");
        }
    }

    #[test]
    fn base64_alphabet_excludes_markers() {
        let encoded = to_base64(&(0..=255).collect::<Vec<u8>>());
        assert!(encoded.bytes().all(is_base64_byte));
        assert!(!is_base64_byte(b'@'));
        assert!(!is_base64_byte(b'#'));
        assert!(!is_base64_byte(b' '));
    }
}
