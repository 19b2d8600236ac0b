//! Progress events, cancellation, and the monotonic percentage emitter.
//!
//! Inject an `Arc<dyn ConversionProgressCallback>` via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline works through a batch.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a WebSocket, a database record, or a terminal
//! progress bar — without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` because conversion
//! work runs on a blocking worker thread, not the caller's thread.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Per-document lifecycle stage, reported through
/// [`ConversionProgressCallback::on_stage`].
///
/// Transitions are strictly forward:
/// `Pending → Loading → Rendering → Assembling → Done | Failed`.
/// `Failed` can be entered from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStage {
    /// Queued, not yet started.
    Pending,
    /// Parsing the source bytes.
    Loading,
    /// Rasterising page `page` of `total` (1-indexed).
    Rendering { page: usize, total: usize },
    /// Serialising the assembled output document.
    Assembling,
    /// Finished successfully.
    Done,
    /// Finished with an error.
    Failed,
}

/// Called by the pipeline as it processes documents and pages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events for one batch arrive strictly in order from
/// a single worker at a time; implementations still must be `Send + Sync`
/// because that worker is a blocking thread owned by the runtime.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any document is processed.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called when a document leaves the queue (0-indexed position).
    fn on_document_start(&self, index: usize, name: &str) {
        let _ = (index, name);
    }

    /// Called at every stage transition of a document's state machine.
    fn on_stage(&self, index: usize, stage: DocumentStage) {
        let _ = (index, stage);
    }

    /// Per-document completion percentage, 0–100, non-decreasing.
    fn on_document_progress(&self, index: usize, percent: f32) {
        let _ = (index, percent);
    }

    /// Whole-batch completion percentage, 0–100, non-decreasing; reaches
    /// exactly 100 once every document has finished (success or failure).
    fn on_batch_progress(&self, percent: f32) {
        let _ = percent;
    }

    /// Called when a document finishes successfully.
    fn on_document_complete(&self, index: usize, stats: &crate::output::DocumentStats) {
        let _ = (index, stats);
    }

    /// Called when a document fails; `reason` is human-readable and final.
    fn on_document_failed(&self, index: usize, reason: String) {
        let _ = (index, reason);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, succeeded: usize, failed: usize) {
        let _ = (succeeded, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Cooperative cancellation flag.
///
/// Cloneable; the caller keeps one clone and hands another to the config.
/// The pipeline checks it only at page boundaries — an in-flight page render
/// cannot be interrupted — so cancellation latency is one page's render time.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next page boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Fans progress out to the configured callback while enforcing the
/// monotonicity contract.
///
/// Raw stage percentages can regress when stages overlap (e.g. a rounding
/// artefact between the last page and assembly); the emitter clamps both the
/// per-document and batch values so observers never see progress go
/// backwards.
pub(crate) struct ProgressEmitter {
    callback: Option<ProgressCallback>,
    total_documents: usize,
    state: Mutex<EmitterState>,
}

#[derive(Default)]
struct EmitterState {
    documents_finished: usize,
    current_index: usize,
    last_document_percent: f32,
    last_batch_percent: f32,
}

impl ProgressEmitter {
    pub(crate) fn new(callback: Option<ProgressCallback>, total_documents: usize) -> Self {
        if let Some(ref cb) = callback {
            cb.on_batch_start(total_documents);
        }
        Self {
            callback,
            total_documents,
            state: Mutex::new(EmitterState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, EmitterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn document_started(&self, index: usize, name: &str) {
        {
            let mut state = self.state();
            state.current_index = index;
            state.last_document_percent = 0.0;
        }
        if let Some(ref cb) = self.callback {
            cb.on_document_start(index, name);
        }
    }

    pub(crate) fn stage(&self, stage: DocumentStage) {
        if let Some(ref cb) = self.callback {
            cb.on_stage(self.state().current_index, stage);
        }
    }

    /// Emit a per-document percentage, clamped non-decreasing, and derive the
    /// batch percentage from it.
    pub(crate) fn document_percent(&self, percent: f32) {
        let mut state = self.state();
        let percent = percent.clamp(0.0, 100.0).max(state.last_document_percent);
        state.last_document_percent = percent;
        let index = state.current_index;
        let batch = self.batch_percent(&mut state, percent);
        drop(state);

        if let Some(ref cb) = self.callback {
            cb.on_document_progress(index, percent);
            cb.on_batch_progress(batch);
        }
    }

    pub(crate) fn document_complete(&self, stats: &crate::output::DocumentStats) {
        self.document_percent(100.0);
        self.stage(DocumentStage::Done);
        if let Some(ref cb) = self.callback {
            cb.on_document_complete(self.state().current_index, stats);
        }
        self.state().documents_finished += 1;
    }

    pub(crate) fn document_failed(&self, reason: String) {
        // A failed document still counts as fully processed for batch
        // progress; otherwise a batch with failures could never reach 100.
        self.document_percent(100.0);
        self.stage(DocumentStage::Failed);
        if let Some(ref cb) = self.callback {
            cb.on_document_failed(self.state().current_index, reason);
        }
        self.state().documents_finished += 1;
    }

    pub(crate) fn batch_complete(&self, succeeded: usize, failed: usize) {
        let batch = {
            let mut state = self.state();
            self.batch_percent(&mut state, 100.0)
        };
        if let Some(ref cb) = self.callback {
            cb.on_batch_progress(batch);
            cb.on_batch_complete(succeeded, failed);
        }
    }

    fn batch_percent(&self, state: &mut EmitterState, current_document_percent: f32) -> f32 {
        let percent = if self.total_documents == 0 {
            100.0
        } else {
            (state.documents_finished as f32 * 100.0 + current_document_percent)
                / self.total_documents as f32
        };
        let percent = percent.clamp(0.0, 100.0).max(state.last_batch_percent);
        state.last_batch_percent = percent;
        percent
    }
}
