//! Per-request RSA key loading from base64-encoded DER.
//!
//! Public keys are SPKI (`SubjectPublicKeyInfo`), private keys are PKCS#8.
//! Keys are parsed fresh for every request and never cached.

use std::fmt;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use thiserror::Error;

use super::decode_base64;

/// Which half of a key pair a blob is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// SPKI-encoded public key, used only for encryption.
    Public,
    /// PKCS#8-encoded private key, used only for decryption.
    Private,
}

impl KeyKind {
    fn der_format(self) -> &'static str {
        match self {
            KeyKind::Public => "SPKI",
            KeyKind::Private => "PKCS#8",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => f.write_str("public"),
            KeyKind::Private => f.write_str("private"),
        }
    }
}

/// Errors produced while loading key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key string is not valid base64.
    #[error("{kind} key is not valid base64: {source}")]
    InvalidBase64 {
        kind: KeyKind,
        #[source]
        source: base64::DecodeError,
    },

    /// The key field is present in the request but is not a string.
    #[error("{kind} key must be a base64 string")]
    NotAString { kind: KeyKind },

    /// The decoded bytes are not a DER key structure of the declared kind.
    #[error("{kind} key is not a valid {der} DER structure: {message}", der = .kind.der_format())]
    InvalidDer { kind: KeyKind, message: String },
}

/// Decode a base64 DER SPKI blob into an RSA public key.
///
/// # Errors
///
/// Returns [`KeyError::InvalidBase64`] or [`KeyError::InvalidDer`].
pub fn load_public_key(encoded: &str) -> Result<RsaPublicKey, KeyError> {
    let der = decode(KeyKind::Public, encoded)?;
    RsaPublicKey::from_public_key_der(&der).map_err(|e| KeyError::InvalidDer {
        kind: KeyKind::Public,
        message: e.to_string(),
    })
}

/// Decode a base64 DER PKCS#8 blob into an RSA private key.
///
/// # Errors
///
/// Returns [`KeyError::InvalidBase64`] or [`KeyError::InvalidDer`].
pub fn load_private_key(encoded: &str) -> Result<RsaPrivateKey, KeyError> {
    let der = decode(KeyKind::Private, encoded)?;
    RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| KeyError::InvalidDer {
        kind: KeyKind::Private,
        message: e.to_string(),
    })
}

fn decode(kind: KeyKind, encoded: &str) -> Result<Vec<u8>, KeyError> {
    decode_base64(encoded).map_err(|source| KeyError::InvalidBase64 { kind, source })
}
