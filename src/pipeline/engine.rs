//! Rasterisation backend: open PDF bytes, report page geometry, render pages.
//!
//! ## Why a trait?
//!
//! Batch and state-machine behaviour must be testable without a pdfium
//! binary on the build host. [`RasterEngine`] is the seam: the production
//! implementation is [`PdfiumEngine`]; tests substitute a scripted engine
//! that returns fixed geometries and synthetic bitmaps.
//!
//! ## Why spawn_blocking (in the caller)?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! The engine itself is synchronous; `convert` constructs it inside
//! `tokio::task::spawn_blocking` and keeps all pdfium calls on that thread.

use crate::config::RenderDpi;
use crate::error::DocumentError;
use crate::source::PageGeometry;
use image::RgbImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// Factory for per-document rasterisation sessions.
pub trait RasterEngine {
    /// Parse `bytes` and return a session for reading and rendering its pages.
    ///
    /// Fails with [`DocumentError::Encrypted`] for password-protected input
    /// and [`DocumentError::Parse`] for anything pdfium cannot open.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn RasterSource + 'a>, DocumentError>;
}

/// One open document. Pages are addressed 1-based, matching user-facing
/// page numbers in progress events and error messages.
pub trait RasterSource {
    fn page_count(&self) -> usize;

    /// Unscaled page size in PDF points (1/72 inch).
    fn page_geometry(&self, page: usize) -> Result<PageGeometry, DocumentError>;

    /// Render one page at `dpi`, with the longest edge capped at `max_pixels`.
    fn rasterize(
        &self,
        page: usize,
        dpi: RenderDpi,
        max_pixels: u32,
    ) -> Result<RgbImage, DocumentError>;
}

/// Production engine backed by pdfium.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to the pdfium dynamic library.
    ///
    /// Looks next to the executable first, then falls back to the system
    /// library path. `PDFIUM_DYNAMIC_LIB_PATH` overrides both.
    pub fn bind() -> Result<Self, DocumentError> {
        let bindings = match std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
            Ok(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)),
            Err(_) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| DocumentError::EngineUnavailable {
            detail: format!("{:?}", e),
        })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl RasterEngine for PdfiumEngine {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn RasterSource + 'a>, DocumentError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    DocumentError::Encrypted
                } else {
                    DocumentError::Parse { detail: err_str }
                }
            })?;

        debug!("PDF opened: {} pages", document.pages().len());

        Ok(Box::new(PdfiumSource { document }))
    }
}

struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumSource<'_> {
    fn page(&self, page: usize) -> Result<PdfPage<'_>, DocumentError> {
        let index = page
            .checked_sub(1)
            .ok_or_else(|| DocumentError::Internal("page numbers are 1-based".into()))?;
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| DocumentError::Render {
                page,
                detail: format!("{:?}", e),
            })
    }
}

impl RasterSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_geometry(&self, page: usize) -> Result<PageGeometry, DocumentError> {
        let p = self.page(page)?;
        Ok(PageGeometry {
            width_pt: p.width().value,
            height_pt: p.height().value,
        })
    }

    fn rasterize(
        &self,
        page: usize,
        dpi: RenderDpi,
        max_pixels: u32,
    ) -> Result<RgbImage, DocumentError> {
        let p = self.page(page)?;

        let target_width = (p.width().value * dpi.scale()).ceil() as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width.min(max_pixels as i32))
            .set_maximum_height(max_pixels as i32);

        let bitmap = p
            .render_with_config(&render_config)
            .map_err(|e| DocumentError::Render {
                page,
                detail: format!("{:?}", e),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px at {} DPI",
            page,
            image.width(),
            image.height(),
            dpi.as_u32()
        );

        Ok(image.to_rgb8())
    }
}
