//! # picpdf
//!
//! Flatten PDF documents into image-only PDFs: every page is rasterised,
//! JPEG-compressed, and written back as a full-bleed image on a page of the
//! same physical size. The output looks identical to the input but carries
//! no text layer, fonts, scripts, or interactive content.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │ validate │──▶│  render  │──▶│  encode  │──▶│ assemble │
//! │ (size,   │   │ (pdfium, │   │  (JPEG)  │   │ (lopdf,  │
//! │  magic)  │   │ per page)│   │          │   │ per page)│
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! Documents in a batch are processed sequentially; a failure in one is
//! recorded and the next document starts fresh. Progress events stream
//! through an optional callback as each page completes.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use picpdf::{convert, ConversionConfig, RenderDpi, SourceDocument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = SourceDocument::from_path("report.pdf").await?;
//!     let config = ConversionConfig::builder()
//!         .dpi(RenderDpi::Dpi150)
//!         .quality(80)
//!         .build()?;
//!
//!     let report = convert(vec![doc], &config).await;
//!     for artifact in report.artifacts() {
//!         tokio::fs::write(&artifact.file_name, &artifact.bytes).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Runtime requirement
//!
//! The pdfium dynamic library must be present at runtime (next to the
//! executable, on the system library path, or pointed to by
//! `PDFIUM_DYNAMIC_LIB_PATH`). Without it every document fails with an
//! engine-unavailable reason; nothing panics.

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;

pub use config::{ConversionConfig, ConversionConfigBuilder, RenderDpi};
pub use convert::{convert, convert_with};
pub use error::DocumentError;
pub use output::{Artifact, BatchReport, BatchSummary, DocumentOutcome, DocumentStats, OutcomeStatus};
pub use pipeline::engine::{PdfiumEngine, RasterEngine, RasterSource};
pub use progress::{
    CancelToken, ConversionProgressCallback, DocumentStage, NoopProgressCallback, ProgressCallback,
};
pub use source::{PageGeometry, PageOrientation, SourceDocument, MAX_INPUT_BYTES};
