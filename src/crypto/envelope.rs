//! Wire format for encrypted fields: `hex(iv):hex(tag):hex(ciphertext)`.

use std::fmt;
use std::str::FromStr;

use crate::crypto::codec::CodecError;

/// Segment delimiter in the serialized envelope.
pub const DELIMITER: char = ':';

/// IV length in bytes (96-bit GCM nonce).
pub const IV_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// One encrypted field as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    pub iv: [u8; IV_LEN],
    pub auth_tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.iv),
            hex::encode(self.auth_tag),
            hex::encode(&self.ciphertext),
        )
    }
}

/// Parses `iv:tag:ciphertext`.
///
/// The ciphertext segment may be empty: GCM emits no ciphertext bytes for an
/// empty plaintext, so `encrypt("")` produces `iv:tag:` and must read back.
/// The IV and tag segments are never optional and must decode to exactly
/// 12 and 16 bytes. Any other shape is [`CodecError::Format`].
impl FromStr for EncryptedEnvelope {
    type Err = CodecError;

    /// Structural validation only. Nothing here touches the cipher.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(DELIMITER);
        let (Some(iv_hex), Some(tag_hex), Some(ct_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CodecError::Format);
        };

        if iv_hex.is_empty() || tag_hex.is_empty() {
            return Err(CodecError::Format);
        }

        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| CodecError::Format)?;

        let mut auth_tag = [0u8; TAG_LEN];
        hex::decode_to_slice(tag_hex, &mut auth_tag).map_err(|_| CodecError::Format)?;

        let ciphertext = hex::decode(ct_hex).map_err(|_| CodecError::Format)?;

        Ok(Self { iv, auth_tag, ciphertext })
    }
}
