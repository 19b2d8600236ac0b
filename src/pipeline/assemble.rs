//! Output PDF assembly: one full-bleed JPEG per page via lopdf.
//!
//! Each output page reproduces the source page's MediaBox in points, so the
//! flattened document prints at the same physical size as the input. The
//! JPEG bytes are embedded as a `DCTDecode` image XObject unchanged; the
//! content stream scales the unit image square up to the full page.

use crate::error::DocumentError;
use crate::source::PageGeometry;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

/// Incrementally builds the flattened output document.
///
/// Pages appear in the order they are appended. `finish` rejects an empty
/// document: a PDF with zero pages is not viewable and signals an upstream
/// bug rather than a degenerate-but-valid output.
pub struct PageWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Append one page: `jpeg` drawn full-bleed on a page of `geometry`'s
    /// size in points.
    pub fn add_page(
        &mut self,
        geometry: PageGeometry,
        jpeg: Vec<u8>,
        pixel_width: u32,
        pixel_height: u32,
    ) -> Result<(), DocumentError> {
        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixel_width as i64,
                "Height" => pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        // Image XObjects span the unit square; cm scales it to the page.
        let content = format!(
            "q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ",
            geometry.width_pt, geometry.height_pt
        );
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "XObject" => dictionary! {
                "Im0" => Object::Reference(image_id),
            },
        };

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(self.pages_id),
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(geometry.width_pt),
                Object::Real(geometry.height_pt),
            ],
            "Resources" => resources,
            "Contents" => Object::Reference(content_id),
        });

        self.page_ids.push(page_id);
        debug!(
            "Appended page {} ({:.1}x{:.1} pt, {}x{} px)",
            self.page_ids.len(),
            geometry.width_pt,
            geometry.height_pt,
            pixel_width,
            pixel_height
        );
        Ok(())
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Finalise the page tree and serialise the document.
    pub fn finish(mut self) -> Result<Vec<u8>, DocumentError> {
        if self.page_ids.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let count = self.page_ids.len() as i64;

        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(self.pages_id),
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| DocumentError::Assemble {
                detail: e.to_string(),
            })?;
        Ok(bytes)
    }
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_jpeg;
    use image::RgbImage;

    fn sample_jpeg(w: u32, h: u32) -> Vec<u8> {
        encode_jpeg(&RgbImage::from_pixel(w, h, image::Rgb([255, 255, 255])), 80, 1).unwrap()
    }

    #[test]
    fn finish_rejects_empty_document() {
        let writer = PageWriter::new();
        assert!(matches!(
            writer.finish(),
            Err(DocumentError::EmptyDocument)
        ));
    }

    #[test]
    fn output_reloads_with_expected_pages() {
        let mut writer = PageWriter::new();
        writer
            .add_page(
                PageGeometry {
                    width_pt: 595.0,
                    height_pt: 842.0,
                },
                sample_jpeg(10, 14),
                10,
                14,
            )
            .unwrap();
        writer
            .add_page(
                PageGeometry {
                    width_pt: 842.0,
                    height_pt: 595.0,
                },
                sample_jpeg(14, 10),
                14,
                10,
            )
            .unwrap();

        let bytes = writer.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        // First page keeps the portrait A4 MediaBox in points.
        let first = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
        let media_box = first.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 595.0);
        assert_eq!(media_box[3].as_float().unwrap(), 842.0);

        // Second page is landscape.
        let second = doc.get_object(pages[&2]).unwrap().as_dict().unwrap();
        let media_box = second.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 842.0);
        assert_eq!(media_box[3].as_float().unwrap(), 595.0);
    }

    #[test]
    fn embedded_jpeg_survives_unchanged() {
        let jpeg = sample_jpeg(8, 8);
        let mut writer = PageWriter::new();
        writer
            .add_page(
                PageGeometry {
                    width_pt: 200.0,
                    height_pt: 300.0,
                },
                jpeg.clone(),
                8,
                8,
            )
            .unwrap();
        let bytes = writer.finish().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let embedded = doc
            .objects
            .values()
            .find_map(|o| match o {
                Object::Stream(s)
                    if s.dict.get(b"Subtype").ok().and_then(|v| v.as_name().ok())
                        == Some(b"Image".as_slice()) =>
                {
                    Some(s.content.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(embedded, jpeg);
    }
}
