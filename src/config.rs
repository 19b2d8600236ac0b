//! Configuration types for PDF flattening.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across a batch and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest, and it gives us one place to
//! validate ranges before any document is touched.

use crate::error::DocumentError;
use crate::progress::{CancelToken, ConversionProgressCallback};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Supported rasterisation resolutions in dots per inch.
///
/// A closed set rather than a free `u32`: the pixel buffer for one page grows
/// with `dpi²`, so an unbounded value would let a single A0 page exhaust
/// memory. 600 DPI is the ceiling — an A4 page at 600 DPI is already a
/// ~35-megapixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderDpi {
    /// Screen resolution; smallest output, soft text.
    Dpi72,
    /// Legacy screen resolution.
    Dpi96,
    /// Print-quality default — sharp text at reasonable file sizes.
    #[default]
    Dpi150,
    Dpi200,
    /// High-quality print.
    Dpi300,
    /// Archival ceiling. Expect multi-hundred-megabyte intermediate buffers
    /// on large page formats.
    Dpi600,
}

impl RenderDpi {
    /// The numeric resolution in dots per inch.
    pub fn as_u32(self) -> u32 {
        match self {
            RenderDpi::Dpi72 => 72,
            RenderDpi::Dpi96 => 96,
            RenderDpi::Dpi150 => 150,
            RenderDpi::Dpi200 => 200,
            RenderDpi::Dpi300 => 300,
            RenderDpi::Dpi600 => 600,
        }
    }

    /// Scale factor relative to the PDF reference resolution (72 pt/inch).
    pub fn scale(self) -> f32 {
        self.as_u32() as f32 / 72.0
    }

    /// Look up a supported resolution by its numeric value.
    pub fn from_u32(dpi: u32) -> Option<Self> {
        match dpi {
            72 => Some(RenderDpi::Dpi72),
            96 => Some(RenderDpi::Dpi96),
            150 => Some(RenderDpi::Dpi150),
            200 => Some(RenderDpi::Dpi200),
            300 => Some(RenderDpi::Dpi300),
            600 => Some(RenderDpi::Dpi600),
            _ => None,
        }
    }
}

/// Configuration for a flattening batch.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`]. Applied uniformly to every page of every
/// document in the batch.
///
/// # Example
/// ```rust
/// use picpdf::{ConversionConfig, RenderDpi};
///
/// let config = ConversionConfig::builder()
///     .dpi(RenderDpi::Dpi300)
///     .quality(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rasterisation resolution. Default: 150 DPI.
    pub dpi: RenderDpi,

    /// JPEG quality, 1–100. Default: 80.
    ///
    /// 80 keeps rendered text visually indistinguishable from the source at
    /// 150 DPI while cutting output size roughly in half compared to 95.
    pub quality: u8,

    /// Maximum rendered dimension (width or height) in pixels. Default: 20 000.
    ///
    /// A safety cap independent of DPI. A 600-DPI render of an A0 poster
    /// would be a 20 000 × 28 000 px buffer; this field caps either
    /// dimension, scaling the other proportionally, so the renderer never
    /// allocates an unbounded pixel buffer.
    pub max_rendered_pixels: u32,

    /// Progress event sink. Default: none.
    pub progress_callback: Option<Arc<dyn ConversionProgressCallback>>,

    /// Cooperative cancellation flag, checked between pages. Default: none.
    pub cancel: Option<CancelToken>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: RenderDpi::default(),
            quality: 80,
            max_rendered_pixels: 20_000,
            progress_callback: None,
            cancel: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("quality", &self.quality)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .field("cancel", &self.cancel.as_ref().map(|_| "<token>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: RenderDpi) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.config.quality = quality.clamp(1, 100);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ConversionProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn cancel(mut self, token: CancelToken) -> Self {
        self.config.cancel = Some(token);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, DocumentError> {
        let c = &self.config;
        if c.quality == 0 || c.quality > 100 {
            return Err(DocumentError::InvalidConfig(format!(
                "quality must be 1–100, got {}",
                c.quality
            )));
        }
        if c.max_rendered_pixels < 100 {
            return Err(DocumentError::InvalidConfig(
                "max_rendered_pixels must be ≥ 100".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, RenderDpi::Dpi150);
        assert_eq!(c.quality, 80);
    }

    #[test]
    fn quality_is_clamped() {
        let c = ConversionConfig::builder().quality(0).build().unwrap();
        assert_eq!(c.quality, 1);
        let c = ConversionConfig::builder().quality(255).build().unwrap();
        assert_eq!(c.quality, 100);
    }

    #[test]
    fn dpi_scale_uses_72pt_reference() {
        assert_eq!(RenderDpi::Dpi150.scale(), 150.0 / 72.0);
        assert_eq!(RenderDpi::Dpi72.scale(), 1.0);
    }

    #[test]
    fn dpi_from_u32_rejects_unsupported() {
        assert_eq!(RenderDpi::from_u32(300), Some(RenderDpi::Dpi300));
        assert_eq!(RenderDpi::from_u32(1200), None);
        assert_eq!(RenderDpi::from_u32(0), None);
    }
}
