//! Conversion outcomes: per-document artifacts, stats, and the batch tracker.
//!
//! A [`BatchReport`] holds exactly one [`DocumentOutcome`] per submitted
//! document, in submission order, regardless of how many individually failed.
//! It is built by the pipeline and read-only to the caller once returned.

use serde::{Deserialize, Serialize};

/// Summary statistics for one successfully flattened document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Pages in the source — and, by construction, in the output.
    pub page_count: usize,
    /// Source byte length.
    pub input_size: u64,
    /// Artifact byte length.
    pub output_size: u64,
    /// Wall-clock conversion time in milliseconds.
    pub elapsed_ms: u64,
}

impl DocumentStats {
    /// Elapsed time in seconds, for display.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}

/// A finished output document.
#[derive(Clone)]
pub struct Artifact {
    /// Suggested download name, derived from the source name.
    pub file_name: String,
    /// Serialized PDF bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Terminal state of one document's conversion.
#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    /// Flattening succeeded; the artifact and its stats are available.
    Done {
        artifact: Artifact,
        stats: DocumentStats,
    },
    /// Flattening failed; `reason` is human-readable and final.
    Failed { reason: String },
}

/// The recorded result for one submitted document.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// Source display name.
    pub name: String,
    pub status: OutcomeStatus,
}

impl DocumentOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self.status, OutcomeStatus::Done { .. })
    }

    /// The artifact, if this document succeeded.
    pub fn artifact(&self) -> Option<&Artifact> {
        match &self.status {
            OutcomeStatus::Done { artifact, .. } => Some(artifact),
            OutcomeStatus::Failed { .. } => None,
        }
    }

    /// The failure reason, if this document failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Done { .. } => None,
            OutcomeStatus::Failed { reason } => Some(reason),
        }
    }
}

/// Ordered collection of outcomes for one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, outcome: DocumentOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of submitted documents (equals the number of outcomes).
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcome for the `index`-th submitted document.
    pub fn get(&self, index: usize) -> Option<&DocumentOutcome> {
        self.outcomes.get(index)
    }

    /// All outcomes in submission order.
    pub fn outcomes(&self) -> &[DocumentOutcome] {
        &self.outcomes
    }

    /// All successful artifacts in submission order, for bulk export.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.outcomes.iter().filter_map(|o| o.artifact())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_done()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Serializable per-document summary (no artifact bytes), for display or
    /// structured logging.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            documents: self
                .outcomes
                .iter()
                .map(|o| match &o.status {
                    OutcomeStatus::Done { artifact, stats } => DocumentSummary {
                        name: o.name.clone(),
                        output_name: Some(artifact.file_name.clone()),
                        stats: Some(stats.clone()),
                        error: None,
                    },
                    OutcomeStatus::Failed { reason } => DocumentSummary {
                        name: o.name.clone(),
                        output_name: None,
                        stats: None,
                        error: Some(reason.clone()),
                    },
                })
                .collect(),
        }
    }
}

/// Serializable batch summary: stats and failure reasons, no payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DocumentStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(name: &str) -> DocumentOutcome {
        DocumentOutcome {
            name: name.into(),
            status: OutcomeStatus::Done {
                artifact: Artifact {
                    file_name: format!("{name}_flattened.pdf"),
                    bytes: vec![1, 2, 3],
                },
                stats: DocumentStats {
                    page_count: 2,
                    input_size: 100,
                    output_size: 3,
                    elapsed_ms: 1500,
                },
            },
        }
    }

    fn failed(name: &str, reason: &str) -> DocumentOutcome {
        DocumentOutcome {
            name: name.into(),
            status: OutcomeStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    #[test]
    fn report_preserves_submission_order() {
        let mut report = BatchReport::with_capacity(3);
        report.push(done("a"));
        report.push(failed("b", "corrupt"));
        report.push(done("c"));

        assert_eq!(report.len(), 3);
        assert_eq!(report.get(1).unwrap().name, "b");
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);

        let names: Vec<_> = report.artifacts().map(|a| a.file_name.clone()).collect();
        assert_eq!(names, vec!["a_flattened.pdf", "c_flattened.pdf"]);
    }

    #[test]
    fn summary_serializes_without_payload() {
        let mut report = BatchReport::with_capacity(2);
        report.push(done("a"));
        report.push(failed("b", "document has no pages"));

        let json = serde_json::to_string(&report.summary()).unwrap();
        assert!(json.contains("a_flattened.pdf"));
        assert!(json.contains("no pages"));
        assert!(!json.contains("bytes"));
    }

    #[test]
    fn elapsed_secs_converts_ms() {
        let stats = DocumentStats {
            page_count: 1,
            input_size: 1,
            output_size: 1,
            elapsed_ms: 2500,
        };
        assert_eq!(stats.elapsed_secs(), 2.5);
    }
}
