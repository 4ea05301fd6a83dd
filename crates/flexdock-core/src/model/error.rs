//! Error types for model parsing and serialization.

use thiserror::Error;

/// Errors produced at the JSON boundary of the model.
///
/// The transforms themselves ([`crate::count_tabs`],
/// [`crate::limit_to_free_tier`]) are total functions over a typed model
/// and cannot fail; only getting into or out of JSON can.  Callers on the
/// render path are expected to catch `Malformed` and fall back to
/// presenting the unmodified input rather than interrupting rendering.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The JSON document is not a layout model (wrong shape, invalid
    /// JSON text, or an attribute with an uninterpretable type).
    #[error("malformed layout model: {0}")]
    Malformed(#[from] serde_json::Error),
}
