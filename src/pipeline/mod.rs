//! Pipeline stages for flattening a PDF into an image-only PDF.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! engine ──▶ flatten ──▶ encode ──▶ assemble
//! (pdfium)  (per page)   (JPEG)    (lopdf)
//! ```
//!
//! 1. [`engine`]   — open the source bytes and rasterise pages; the pdfium
//!    backend runs inside `spawn_blocking` because pdfium is not async-safe
//! 2. [`flatten`]  — drive the per-document state machine: geometry, render,
//!    encode, append; emits stage and percentage progress as it goes
//! 3. [`encode`]   — JPEG-compress each rendered page at the configured
//!    quality
//! 4. [`assemble`] — write each JPEG as a full-bleed image XObject onto a
//!    fresh PDF page whose MediaBox matches the source page in points

pub mod assemble;
pub mod encode;
pub mod engine;
pub mod flatten;
