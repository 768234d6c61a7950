//! Common error types shared across crates.

use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Fixed message returned when a required request field is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Faltan campos requeridos";

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::MissingFields`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::DecryptionFailure`] → 500
/// - [`ServiceError::NotFound`] → 404
#[derive(Debug, Error)]
pub enum ServiceError {
    /// `payload`, the key, or `campos` is missing, or `campos` is not an array.
    #[error("missing required request fields")]
    MissingFields,

    /// Key loading or field encryption failed. Carries the underlying message.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// Key loading or field decryption failed. Carries the underlying message.
    #[error("decryption failure: {0}")]
    DecryptionFailure(String),

    /// No route matches the request.
    #[error("not found")]
    NotFound,
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::MissingFields => 400,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::DecryptionFailure(_) => 500,
            ServiceError::NotFound => 404,
        }
    }

    /// Build the wire body for this error.
    ///
    /// Validation errors never carry detail; operation errors expose the
    /// underlying message in `detalle`.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ServiceError::MissingFields => ErrorResponse::new(MISSING_FIELDS_MESSAGE),
            ServiceError::EncryptionFailure(detail) => {
                ErrorResponse::with_detail("Error encriptando", detail)
            }
            ServiceError::DecryptionFailure(detail) => {
                ErrorResponse::with_detail("Error desencriptando", detail)
            }
            ServiceError::NotFound => ErrorResponse::new("Recurso no encontrado"),
        }
    }
}
