//! RSA PKCS#1 v1.5 encryption and decryption of individual field values.
//!
//! Each value is encrypted as a single RSA block, so a plaintext may be at
//! most `modulus bytes - 11` long. Padding randomness comes from the OS CSPRNG.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use thiserror::Error;

use super::decode_base64;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The RSA primitive rejected the operation (plaintext too long for the
    /// key, bad padding, wrong key).
    #[error("rsa operation failed: {0}")]
    Rsa(#[from] rsa::Error),

    /// A ciphertext field is not valid base64.
    #[error("ciphertext is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Encrypt `plaintext` under `key` and return the ciphertext as base64.
///
/// # Errors
///
/// Returns [`CipherError::Rsa`] if the plaintext is too long for the key.
pub fn encrypt_field(plaintext: &[u8], key: &RsaPublicKey) -> Result<String, CipherError> {
    let ciphertext = key.encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext)?;
    Ok(STANDARD.encode(ciphertext))
}

/// Decode a base64 ciphertext and decrypt it under `key`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidBase64`] if `encoded` is not base64, or
/// [`CipherError::Rsa`] if decryption fails (wrong key or tampered data).
pub fn decrypt_field(encoded: &str, key: &RsaPrivateKey) -> Result<Vec<u8>, CipherError> {
    let ciphertext = decode_base64(encoded)?;
    Ok(key.decrypt(Pkcs1v15Encrypt, &ciphertext)?)
}
