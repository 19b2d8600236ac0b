//! Per-document conversion: drives one source PDF through the full
//! load → render → encode → assemble sequence.
//!
//! This stage owns the document state machine reported through progress
//! events: `Loading` while parsing, `Rendering {page, total}` per page,
//! `Assembling` while serialising, then `Done` or `Failed` (emitted by the
//! batch driver, which also records the outcome).
//!
//! Percentages follow a fixed allocation: 5 entering load, 10 once parsed,
//! 10 + 85·(page/total) after each rendered page, 95 entering assembly,
//! 100 on completion. Only monotonicity is contractual; the allocation just
//! keeps the bar moving smoothly on render-heavy documents.

use crate::config::ConversionConfig;
use crate::error::DocumentError;
use crate::output::{Artifact, DocumentStats};
use crate::pipeline::assemble::PageWriter;
use crate::pipeline::encode::encode_jpeg;
use crate::pipeline::engine::RasterEngine;
use crate::progress::{DocumentStage, ProgressEmitter};
use crate::source::SourceDocument;
use std::time::Instant;
use tracing::{debug, info};

/// Convert one validated document into a flattened artifact.
///
/// Synchronous and CPU-bound; the batch driver runs it inside
/// `spawn_blocking`. Cancellation is checked between pages only.
pub(crate) fn flatten_document(
    engine: &dyn RasterEngine,
    document: &SourceDocument,
    config: &ConversionConfig,
    emitter: &ProgressEmitter,
) -> Result<(Artifact, DocumentStats), DocumentError> {
    let started = Instant::now();

    emitter.stage(DocumentStage::Loading);
    emitter.document_percent(5.0);

    let source = engine.open(&document.bytes)?;
    let total = source.page_count();
    if total == 0 {
        return Err(DocumentError::EmptyDocument);
    }
    info!("{}: {} pages at {} DPI", document.name, total, config.dpi.as_u32());
    emitter.document_percent(10.0);

    let mut writer = PageWriter::new();
    for page in 1..=total {
        if let Some(ref token) = config.cancel {
            if token.is_cancelled() {
                return Err(DocumentError::Cancelled);
            }
        }

        emitter.stage(DocumentStage::Rendering { page, total });

        let geometry = source.page_geometry(page)?;
        let bitmap = source.rasterize(page, config.dpi, config.max_rendered_pixels)?;
        let (pixel_width, pixel_height) = bitmap.dimensions();
        let jpeg = encode_jpeg(&bitmap, config.quality, page)?;
        debug!(
            "{}: page {}/{} ({:?}) encoded ({} bytes)",
            document.name,
            page,
            total,
            geometry.orientation(),
            jpeg.len()
        );
        writer.add_page(geometry, jpeg, pixel_width, pixel_height)?;

        emitter.document_percent(10.0 + 85.0 * (page as f32 / total as f32));
    }

    emitter.stage(DocumentStage::Assembling);
    emitter.document_percent(95.0);

    let bytes = writer.finish()?;
    let stats = DocumentStats {
        page_count: total,
        input_size: document.len(),
        output_size: bytes.len() as u64,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "{}: flattened {} pages, {} → {} bytes in {} ms",
        document.name,
        stats.page_count,
        stats.input_size,
        stats.output_size,
        stats.elapsed_ms
    );

    Ok((
        Artifact {
            file_name: document.output_name(),
            bytes,
        },
        stats,
    ))
}
