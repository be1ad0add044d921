//! Encryption key material.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::codec::CodecError;

/// Environment variable holding the hex-encoded field encryption key.
pub const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A 256-bit AES key. Wiped from memory on drop.
#[derive(Clone)]
pub struct EncryptionKey(Zeroizing<[u8; KEY_LEN]>);

impl EncryptionKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Parse a 64-character hex key. `var` names the source in errors.
    pub fn from_hex(hex_key: &str, var: &str) -> Result<Self, CodecError> {
        let invalid = || CodecError::InvalidKey { var: var.to_string() };

        let decoded = Zeroizing::new(hex::decode(hex_key.trim()).map_err(|_| invalid())?);
        if decoded.len() != KEY_LEN {
            return Err(invalid());
        }

        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Read the key from an environment variable.
    ///
    /// Unset or empty variables yield [`CodecError::MissingKey`] naming `var`.
    pub fn from_env_var(var: &str) -> Result<Self, CodecError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Self::from_hex(&value, var),
            _ => Err(CodecError::MissingKey { var: var.to_string() }),
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Generate a fresh random key for operator provisioning, as 64 hex characters.
pub fn generate_encryption_key() -> String {
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    OsRng.fill_bytes(&mut bytes[..]);
    hex::encode(&bytes[..])
}
