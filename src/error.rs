//! Error types for the picpdf library.
//!
//! Almost every failure here is *per-document*: a batch never aborts because
//! one of its documents is corrupt, oversized, or unrenderable. Those
//! failures are converted into a human-readable reason and recorded as a
//! `Failed` outcome in the [`crate::output::BatchReport`], so the caller
//! always receives exactly one result per submitted document.
//!
//! The single exception is [`DocumentError::InvalidConfig`], returned as a
//! `Result::Err` from the config builder before any conversion starts.

use thiserror::Error;

/// Everything that can go wrong while flattening a single document.
///
/// Every variant is terminal for the affected document; there are no retries
/// anywhere in the pipeline. A document that fails mid-way never produces a
/// partial artifact.
#[derive(Debug, Error)]
pub enum DocumentError {
    // ── Validation errors (rejected before entering the pipeline) ─────────
    /// The document exceeds the input size ceiling and is rejected without
    /// being parsed.
    #[error("'{name}' is {size} bytes, over the {limit}-byte input limit")]
    Oversized { name: String, size: u64, limit: u64 },

    /// The file name or magic bytes say this is not a PDF.
    #[error("'{name}' is not a PDF file")]
    NotAPdf { name: String },

    // ── Load errors ───────────────────────────────────────────────────────
    /// The document header/trailer/xref is corrupt and cannot be parsed.
    #[error("failed to parse document: {detail}")]
    Parse { detail: String },

    /// The document is password-protected; credentials are not supported.
    #[error("document is encrypted and cannot be flattened")]
    Encrypted,

    /// The document parsed but has no pages. An empty artifact would not be
    /// a meaningful output, so this is reported as a failure.
    #[error("document has no pages")]
    EmptyDocument,

    // ── Page errors (abort the whole containing document) ─────────────────
    /// The rendering backend rejected a page's content stream.
    #[error("rasterisation failed for page {page}: {detail}")]
    Render { page: usize, detail: String },

    /// JPEG encoding of a rendered page failed.
    #[error("JPEG encoding failed for page {page}: {detail}")]
    Encode { page: usize, detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// The output document could not be assembled or serialized.
    #[error("failed to assemble output document: {detail}")]
    Assemble { detail: String },

    // ── Environment errors ────────────────────────────────────────────────
    /// No pdfium library could be bound.
    #[error(
        "failed to bind to pdfium library: {detail}\n\
Set PDFIUM_DYNAMIC_LIB_PATH to the directory containing libpdfium, or\n\
install pdfium as a system library."
    )]
    EngineUnavailable { detail: String },

    /// The conversion was cancelled at a page boundary.
    #[error("conversion cancelled")]
    Cancelled,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed. The only variant surfaced as `Err` to
    /// callers rather than recorded in a batch outcome.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked worker task).
    #[error("internal error: {0}")]
    Internal(String),
}
