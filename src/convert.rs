//! Batch orchestration: validate, convert, and record each document in turn.
//!
//! Documents are processed sequentially in submission order. One failing
//! document never aborts the batch — it is recorded as a failed outcome and
//! the next document starts fresh. The CPU-heavy work for each document runs
//! inside `tokio::task::spawn_blocking`, so the async caller's runtime stays
//! responsive throughout.

use crate::config::ConversionConfig;
use crate::error::DocumentError;
use crate::output::{BatchReport, DocumentOutcome, OutcomeStatus};
use crate::pipeline::engine::{PdfiumEngine, RasterEngine};
use crate::pipeline::flatten::flatten_document;
use crate::progress::{DocumentStage, ProgressEmitter};
use crate::source::SourceDocument;
use std::sync::Arc;
use tracing::{info, warn};

/// Convert a batch of PDF documents into image-flattened PDFs.
///
/// Infallible at the batch level: every submitted document yields exactly
/// one [`DocumentOutcome`] in the returned report, in submission order.
/// Per-document errors (oversized input, corrupt data, encryption, render
/// failures) become `Failed` outcomes; they are also surfaced through the
/// configured progress callback.
///
/// Requires the pdfium dynamic library at runtime; if it cannot be bound,
/// every document fails with an engine-unavailable reason.
pub async fn convert(documents: Vec<SourceDocument>, config: &ConversionConfig) -> BatchReport {
    convert_with(PdfiumEngine::bind, documents, config).await
}

/// [`convert`] with a custom rasterisation backend.
///
/// `engine_factory` is invoked once per document on the blocking worker
/// thread, so backends that are not `Send` (pdfium included) work without
/// crossing threads.
pub async fn convert_with<E, F>(
    engine_factory: F,
    documents: Vec<SourceDocument>,
    config: &ConversionConfig,
) -> BatchReport
where
    E: RasterEngine + 'static,
    F: Fn() -> Result<E, DocumentError> + Send + Sync + 'static,
{
    let total = documents.len();
    info!("Starting batch of {} document(s)", total);

    let emitter = Arc::new(ProgressEmitter::new(config.progress_callback.clone(), total));
    let factory = Arc::new(engine_factory);
    let mut report = BatchReport::with_capacity(total);

    for (index, document) in documents.into_iter().enumerate() {
        let name = document.name.clone();
        emitter.document_started(index, &name);
        emitter.stage(DocumentStage::Pending);

        let result = process_document(&factory, &emitter, document, config).await;

        match result {
            Ok((artifact, stats)) => {
                emitter.document_complete(&stats);
                report.push(DocumentOutcome {
                    name,
                    status: OutcomeStatus::Done { artifact, stats },
                });
            }
            Err(e) => {
                warn!("{}: {}", name, e);
                let reason = e.to_string();
                emitter.document_failed(reason.clone());
                report.push(DocumentOutcome {
                    name,
                    status: OutcomeStatus::Failed { reason },
                });
            }
        }

        // Let other tasks on the runtime breathe between documents.
        tokio::task::yield_now().await;
    }

    emitter.batch_complete(report.succeeded(), report.failed());
    info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    report
}

async fn process_document<E, F>(
    factory: &Arc<F>,
    emitter: &Arc<ProgressEmitter>,
    document: SourceDocument,
    config: &ConversionConfig,
) -> Result<(crate::output::Artifact, crate::output::DocumentStats), DocumentError>
where
    E: RasterEngine + 'static,
    F: Fn() -> Result<E, DocumentError> + Send + Sync + 'static,
{
    if let Some(ref token) = config.cancel {
        if token.is_cancelled() {
            return Err(DocumentError::Cancelled);
        }
    }

    // Cheap checks run before any engine work so a rejected document never
    // touches pdfium.
    document.validate()?;

    let factory = Arc::clone(factory);
    let emitter = Arc::clone(emitter);
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        let engine = factory()?;
        flatten_document(&engine, &document, &config, &emitter)
    })
    .await
    .map_err(|e| DocumentError::Internal(format!("conversion task panicked: {}", e)))?
}
