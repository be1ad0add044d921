//! Field-level encryption for sensitive values (SSN, account numbers).
//!
//! # Data Flow
//! ```text
//! plaintext field
//!     → key.rs (256-bit key from ENCRYPTION_KEY, loaded on use)
//!     → codec.rs (AES-256-GCM, fresh 96-bit IV per call)
//!     → envelope.rs (hex iv:tag:ciphertext)
//!     → stored as opaque text
//!
//! stored text
//!     → envelope.rs (format check, no crypto yet)
//!     → codec.rs (authenticated decrypt)
//!     → plaintext, held only for the request
//! ```
//!
//! # Design Decisions
//! - A missing key is a deployment error, never replaced by a default key
//! - Malformed envelopes are rejected before any cipher call
//! - Authentication failures carry no detail about the cause
//! - mask.rs is display-only and never fails

pub mod codec;
pub mod envelope;
pub mod key;
pub mod mask;

pub use codec::{decrypt, encrypt, CodecError, FieldCodec};
pub use envelope::EncryptedEnvelope;
pub use key::{generate_encryption_key, EncryptionKey, ENCRYPTION_KEY_VAR};
pub use mask::{mask_account_number, mask_ssn};
