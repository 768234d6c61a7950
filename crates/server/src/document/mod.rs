//! Field addressing and per-field transformation of JSON documents.
//!
//! # Module invariants
//!
//! - The caller's document is only ever borrowed; every transform works on a
//!   structural clone and returns it whole or not at all.
//! - Ineligible fields (absent, or of the wrong JSON type) are skipped
//!   silently, never reported.

pub mod path;
pub mod transform;

pub use transform::{decrypt_fields, encrypt_fields, parse_field_paths, TransformError};
