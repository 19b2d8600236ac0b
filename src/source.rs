//! Source-document identity, page geometry, and pre-pipeline validation.
//!
//! Validation happens *before* a document enters the pipeline: an oversized
//! or non-PDF input is reported as a failed outcome without the parser ever
//! seeing its bytes.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input size ceiling: documents over 200 MiB are rejected up front.
pub const MAX_INPUT_BYTES: u64 = 200 * 1024 * 1024;

/// One document submitted for flattening: a display name plus raw bytes.
///
/// Immutable once submitted; the pipeline owns the bytes exclusively for the
/// duration of the conversion.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Display name, used for reporting and to derive the output file name.
    pub name: String,
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk, using the file name as display name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Input size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Output file name: source name with a trailing `.pdf` stripped
    /// (case-insensitive), suffixed `_flattened.pdf`.
    pub fn output_name(&self) -> String {
        let stem = match self.name.char_indices().rev().nth(3) {
            Some((idx, _)) if self.name[idx..].eq_ignore_ascii_case(".pdf") => &self.name[..idx],
            _ => self.name.as_str(),
        };
        format!("{stem}_flattened.pdf")
    }

    /// Reject inputs that must never reach the parser: oversized files and
    /// files whose name or magic bytes say they are not PDFs.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.len() > MAX_INPUT_BYTES {
            return Err(DocumentError::Oversized {
                name: self.name.clone(),
                size: self.len(),
                limit: MAX_INPUT_BYTES,
            });
        }

        let named_pdf = self
            .name
            .rsplit('.')
            .next()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        // "%PDF-" may sit after a small amount of leading junk; real-world
        // PDFs from mail gateways often do. Probe the first 1 KiB.
        let probe = &self.bytes[..self.bytes.len().min(1024)];
        let has_magic = probe.windows(5).any(|w| w == b"%PDF-");

        if !named_pdf || !has_magic {
            return Err(DocumentError::NotAPdf {
                name: self.name.clone(),
            });
        }

        Ok(())
    }
}

/// Width and height of one page in PDF points (1/72 inch), read at unscaled
/// reference resolution. Determines the output page size; rasterisation DPI
/// never alters it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageGeometry {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    /// `Landscape` iff width strictly exceeds height; ties go to portrait.
    pub fn orientation(&self) -> PageOrientation {
        if self.width_pt > self.height_pt {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        }
    }
}

/// Page orientation, derived independently per page so a mixed-orientation
/// source produces mixed-orientation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}
