//! Request and response types exchanged over the public HTTP API.
//!
//! Field names on the wire are fixed (`llavePublica`, `campos`,
//! `encryptedPayload`, ...); the Rust names are their snake_case equivalents.
//!
//! Request fields are kept as raw [`serde_json::Value`]s so that a missing or
//! wrongly-typed field is reported by request validation as a 400, rather than
//! by the deserialiser.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Arbitrary JSON document whose listed fields will be encrypted.
    #[serde(default)]
    pub payload: Value,
    /// Base64 of a DER-encoded SPKI RSA public key.
    #[serde(default, rename = "llavePublica")]
    pub llave_publica: Value,
    /// Dotted field paths to encrypt, e.g. `["user.ssn"]`.
    #[serde(default)]
    pub campos: Value,
}

/// Successful response body for `POST /encrypt`.
///
/// Listed string/number fields are replaced by base64 RSA ciphertext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    #[serde(rename = "encryptedPayload")]
    pub encrypted_payload: Value,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Arbitrary JSON document whose listed fields hold base64 ciphertext.
    #[serde(default)]
    pub payload: Value,
    /// Base64 of a DER-encoded PKCS#8 RSA private key.
    #[serde(default, rename = "llavePrivada")]
    pub llave_privada: Value,
    /// Dotted field paths to decrypt.
    #[serde(default)]
    pub campos: Value,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    #[serde(rename = "decryptedPayload")]
    pub decrypted_payload: Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short human-readable error message.
    pub error: String,
    /// Underlying failure message; present only for operation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalle: Option<String>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] without detail.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detalle: None,
        }
    }

    /// Construct an [`ErrorResponse`] carrying the underlying failure message.
    pub fn with_detail(error: impl Into<String>, detalle: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detalle: Some(detalle.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
