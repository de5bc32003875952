//! Closed error taxonomy for the UMB codec and container layers.
//!
//! Library functions return [`anyhow::Result`], with these variants raised
//! at the point of detection via `anyhow::Error::from` / `?`. The taxonomy
//! exists so callers can match on `error.downcast_ref::<UmbError>()` when
//! they need to distinguish failure kinds (e.g. a CLI choosing an exit
//! code), without forcing every internal call site to thread a concrete
//! error type through.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UmbError {
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    #[error("integer out of range for {ty}: {value}")]
    IntegerOutOfRange { ty: &'static str, value: String },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid CSR vector: {0}")]
    InvalidCsr(String),

    #[error("invalid ranges vector: {0}")]
    InvalidRanges(String),

    #[error("struct codec buffer not aligned to a byte boundary: {0}")]
    BufferNotAligned(String),

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("cannot promote {from} to {to}")]
    CannotPromote { from: String, to: String },

    #[error("missing required archive member: {0}")]
    MissingFile(String),
}
