//! AES-256-GCM field codec.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce, Tag};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::crypto::envelope::{EncryptedEnvelope, IV_LEN, TAG_LEN};
use crate::crypto::key::{EncryptionKey, ENCRYPTION_KEY_VAR};
use crate::observability::metrics;

/// Errors produced by the field codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Key variable unset. Fatal misconfiguration.
    #[error("{var} is not set; provide a 256-bit key as 64 hex characters")]
    MissingKey { var: String },

    /// Key variable present but not a 256-bit hex key. Fatal misconfiguration.
    #[error("{var} must be a 256-bit key encoded as 64 hex characters")]
    InvalidKey { var: String },

    /// Envelope is not `iv:tag:ciphertext` hex.
    #[error("Invalid encrypted data format")]
    Format,

    /// Tag verification failed: tampered data or wrong key.
    #[error("Decryption failed: integrity check did not pass")]
    Integrity,

    /// Plaintext exceeds the AES-GCM message length limit.
    #[error("Encryption failed")]
    Encryption,
}

impl CodecError {
    /// True for deployment errors that retrying cannot fix.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::InvalidKey { .. })
    }
}

/// Encrypts and decrypts single text fields under one key.
///
/// Stateless apart from the key; safe to share across tasks.
#[derive(Clone)]
pub struct FieldCodec {
    cipher: Aes256Gcm,
}

impl FieldCodec {
    pub fn new(key: &EncryptionKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Build a codec from `ENCRYPTION_KEY`.
    pub fn from_env() -> Result<Self, CodecError> {
        Self::from_env_var(ENCRYPTION_KEY_VAR)
    }

    /// Build a codec from the named environment variable. Callers decide how to report failure.
    pub fn from_env_var(var: &str) -> Result<Self, CodecError> {
        let key = EncryptionKey::from_env_var(var)?;
        Ok(Self::new(&key))
    }

    /// Encrypt `plaintext` under a fresh random IV.
    pub fn encrypt_envelope(&self, plaintext: &str) -> Result<EncryptedEnvelope, CodecError> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| {
                metrics::record_codec_operation("encrypt", "error");
                CodecError::Encryption
            })?;

        let mut auth_tag = [0u8; TAG_LEN];
        auth_tag.copy_from_slice(tag.as_slice());

        metrics::record_codec_operation("encrypt", "ok");
        Ok(EncryptedEnvelope { iv, auth_tag, ciphertext: buffer })
    }

    /// Authenticated decryption of a parsed envelope.
    pub fn decrypt_envelope(&self, envelope: &EncryptedEnvelope) -> Result<String, CodecError> {
        let mut buffer = envelope.ciphertext.clone();
        let verified = self.cipher.decrypt_in_place_detached(
            Nonce::from_slice(&envelope.iv),
            b"",
            &mut buffer,
            Tag::from_slice(&envelope.auth_tag),
        );

        if verified.is_err() {
            metrics::record_codec_operation("decrypt", "integrity_failure");
            tracing::warn!("Encrypted field failed authentication");
            return Err(CodecError::Integrity);
        }

        // Authenticated bytes that are not UTF-8 were not produced by `encrypt`.
        let plaintext = String::from_utf8(buffer).map_err(|_| {
            metrics::record_codec_operation("decrypt", "integrity_failure");
            CodecError::Integrity
        })?;

        metrics::record_codec_operation("decrypt", "ok");
        Ok(plaintext)
    }

    /// Encrypt to the `iv:tag:ciphertext` wire form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CodecError> {
        self.encrypt_envelope(plaintext).map(|env| env.to_string())
    }

    /// Decrypt from the wire form. Format is checked before the cipher runs.
    pub fn decrypt(&self, envelope: &str) -> Result<String, CodecError> {
        let parsed = envelope.parse::<EncryptedEnvelope>().inspect_err(|_| {
            metrics::record_codec_operation("decrypt", "format_error");
        })?;
        self.decrypt_envelope(&parsed)
    }
}

impl std::fmt::Debug for FieldCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCodec").finish_non_exhaustive()
    }
}

/// Encrypt with the key currently in `ENCRYPTION_KEY`.
pub fn encrypt(plaintext: &str) -> Result<String, CodecError> {
    FieldCodec::from_env()?.encrypt(plaintext)
}

/// Decrypt with the key currently in `ENCRYPTION_KEY`.
pub fn decrypt(envelope: &str) -> Result<String, CodecError> {
    FieldCodec::from_env()?.decrypt(envelope)
}
