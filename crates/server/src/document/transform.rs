//! Per-field encryption and decryption over a cloned JSON document.
//!
//! Both directions follow the same shape: clone the input, then for each path
//! in order read the current value, skip it if ineligible, transform it, and
//! write it back. The first failure aborts the whole call and the partially
//! transformed clone is dropped.

use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::path::{self, FieldPath, Lookup};
use crate::crypto::{decrypt_field, encrypt_field, CipherError};

/// Errors produced while transforming a document.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An entry of the field path list is not a string.
    #[error("field path at index {index} must be a string, found {found}")]
    InvalidFieldPath { index: usize, found: &'static str },

    /// Encrypting or decrypting the value at `path` failed.
    #[error("field \"{path}\": {source}")]
    Cipher {
        path: String,
        #[source]
        source: CipherError,
    },
}

/// Parse the raw `campos` entries into [`FieldPath`]s.
///
/// # Errors
///
/// Returns [`TransformError::InvalidFieldPath`] for the first non-string entry.
pub fn parse_field_paths(raw: &[Value]) -> Result<Vec<FieldPath>, TransformError> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(s) => Ok(FieldPath::parse(s)),
            other => Err(TransformError::InvalidFieldPath {
                index,
                found: json_type(other),
            }),
        })
        .collect()
}

/// Return a copy of `document` with every string or number at `paths`
/// replaced by its base64 RSA ciphertext.
///
/// Numbers are encrypted as their JSON text exactly as received, so `1.50`
/// encrypts as `"1.50"` and `1e3` as `"1e3"`, not a normalised form. Absent
/// paths and values of any other type are left as they are.
///
/// # Errors
///
/// Returns [`TransformError::Cipher`] if any eligible value cannot be encrypted.
pub fn encrypt_fields(
    document: &Value,
    key: &RsaPublicKey,
    paths: &[FieldPath],
) -> Result<Value, TransformError> {
    let mut result = document.clone();
    let mut skipped = 0usize;

    for field in paths {
        let plaintext = match path::get(&result, field) {
            Lookup::Found(Value::String(s)) => s.clone(),
            Lookup::Found(Value::Number(n)) => n.to_string(),
            _ => {
                skipped += 1;
                continue;
            }
        };
        let ciphertext = encrypt_field(plaintext.as_bytes(), key).map_err(|source| {
            TransformError::Cipher {
                path: field.to_string(),
                source,
            }
        })?;
        path::set(&mut result, field, Value::String(ciphertext));
    }

    debug!(
        transformed = paths.len() - skipped,
        skipped, "fields encrypted"
    );
    Ok(result)
}

/// Return a copy of `document` with every string at `paths` base64-decoded,
/// decrypted, and replaced by the plaintext.
///
/// Invalid UTF-8 in a plaintext is replaced with U+FFFD. Absent paths and
/// non-string values are left as they are.
///
/// # Errors
///
/// Returns [`TransformError::Cipher`] if any string is not valid base64 or
/// does not decrypt under `key`.
pub fn decrypt_fields(
    document: &Value,
    key: &RsaPrivateKey,
    paths: &[FieldPath],
) -> Result<Value, TransformError> {
    let mut result = document.clone();
    let mut skipped = 0usize;

    for field in paths {
        let Lookup::Found(Value::String(encoded)) = path::get(&result, field) else {
            skipped += 1;
            continue;
        };
        let plaintext = decrypt_field(encoded, key).map_err(|source| TransformError::Cipher {
            path: field.to_string(),
            source,
        })?;
        let plaintext = String::from_utf8_lossy(&plaintext).into_owned();
        path::set(&mut result, field, Value::String(plaintext));
    }

    debug!(
        transformed = paths.len() - skipped,
        skipped, "fields decrypted"
    );
    Ok(result)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
