//! RSA key loading and PKCS#1 v1.5 field encryption primitives.
//!
//! This module is free of HTTP and JSON dependencies. It provides the key
//! loader and the per-value encrypt/decrypt operations used by the field
//! transformer.
//!
//! # Ciphertext format
//!
//! A single RSA block (modulus size) encoded as standard, padded base64.
//! Decoding is lenient about padding, whitespace and the URL-safe alphabet.

pub mod cipher;
pub mod keys;

pub use cipher::{decrypt_field, encrypt_field, CipherError};
pub use keys::{load_private_key, load_public_key, KeyError, KeyKind};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    DecodeError, Engine as _,
};

/// Standard alphabet, padding optional on input.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 the way clients actually send it.
///
/// ASCII whitespace is ignored, padding is optional, and the URL-safe
/// characters `-` and `_` are read as `+` and `/`.
pub(crate) fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    LENIENT.decode(compact)
}
