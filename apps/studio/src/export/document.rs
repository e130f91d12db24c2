//! Bitmap → PDF assembly.
//!
//! The page width is always A4's 210 mm. In `Single` mode the whole capture
//! becomes one page whose height follows the bitmap's aspect ratio. In `A4`
//! mode the capture is sliced into 297 mm pages, cutting only between the
//! unbreakable blocks the template declared.

use std::cmp::Reverse;
use std::io::Cursor;
use std::str::FromStr;

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use serde::Serialize;
use tracing::debug;

use crate::export::ExportError;
use crate::layout::fragment::{A4_HEIGHT_MM, A4_WIDTH_MM};

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pagination {
    #[default]
    Single,
    A4,
}

impl FromStr for Pagination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Pagination::Single),
            "a4" => Ok(Pagination::A4),
            other => Err(format!("unknown pagination mode '{other}' (expected single or a4)")),
        }
    }
}

/// An unbreakable vertical range in bitmap pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBlock {
    pub top: u32,
    pub bottom: u32,
}

#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Turns a captured bitmap into a paged document.
pub trait DocumentAssembler: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    fn assemble(&self, bitmap: &RgbImage, blocks: &[PixelBlock]) -> Result<AssembledDocument, ExportError>;
}

pub struct PdfAssembler {
    pagination: Pagination,
    jpeg_quality: u8,
}

impl PdfAssembler {
    pub fn new(pagination: Pagination, jpeg_quality: u8) -> Self {
        Self { pagination, jpeg_quality: jpeg_quality.clamp(1, 100) }
    }
}

impl DocumentAssembler for PdfAssembler {
    fn assemble(&self, bitmap: &RgbImage, blocks: &[PixelBlock]) -> Result<AssembledDocument, ExportError> {
        let (width, height) = bitmap.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::Assembly("empty capture".to_string()));
        }

        let page_width_pt = A4_WIDTH_MM * PT_PER_MM;
        let pt_per_px = page_width_pt / width as f32;
        let slices = match self.pagination {
            Pagination::Single => vec![(0, height)],
            Pagination::A4 => {
                let page_px = (width as f32 * A4_HEIGHT_MM / A4_WIDTH_MM).round() as u32;
                paginate(height, page_px, blocks)
            }
        };

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(slices.len());

        for (index, &(top, bottom)) in slices.iter().enumerate() {
            let slice = image::imageops::crop_imm(bitmap, 0, top, width, bottom - top).to_image();
            let jpeg = encode_jpeg(&slice, self.jpeg_quality)?;
            let slice_height_pt = (bottom - top) as f32 * pt_per_px;
            let page_height_pt = match self.pagination {
                Pagination::Single => slice_height_pt,
                Pagination::A4 => A4_HEIGHT_MM * PT_PER_MM,
            };
            let page_id = add_image_page(
                &mut doc,
                pages_id,
                jpeg,
                (width, bottom - top),
                (page_width_pt, page_height_pt),
                slice_height_pt,
            )?;
            debug!(page = index + 1, top, bottom, "Page assembled");
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(concat!("studio ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Assembly(format!("cannot write document: {e}")))?;
        Ok(AssembledDocument { bytes, page_count })
    }
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(image)
        .map_err(|e| ExportError::Assembly(format!("cannot encode page image: {e}")))?;
    Ok(out.into_inner())
}

/// Adds one page showing `jpeg` across the full width, anchored to the top.
fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    jpeg: Vec<u8>,
    (px_width, px_height): (u32, u32),
    (page_width_pt, page_height_pt): (f32, f32),
    image_height_pt: f32,
) -> Result<ObjectId, ExportError> {
    let image_id = doc.add_object(
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => px_width as i64,
                "Height" => px_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false),
    );

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_width_pt.into(),
                    0.into(),
                    0.into(),
                    image_height_pt.into(),
                    0.into(),
                    (page_height_pt - image_height_pt).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| ExportError::Assembly(format!("cannot encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), page_width_pt.into(), page_height_pt.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    }))
}

/// Splits `[0, total)` into slices no taller than `page`.
///
/// Blocks taller than a page cannot stay whole and are ignored. Each cut is the
/// highest block edge at or above the page limit that splits the fewest of the
/// remaining blocks, which is none whenever such an edge exists.
pub fn paginate(total: u32, page: u32, blocks: &[PixelBlock]) -> Vec<(u32, u32)> {
    if page == 0 || total <= page {
        return vec![(0, total)];
    }
    let fitting: Vec<&PixelBlock> = blocks.iter().filter(|b| b.bottom.saturating_sub(b.top) <= page).collect();
    let splits = |y: u32| fitting.iter().filter(|b| b.top < y && y < b.bottom).count();

    let mut slices = Vec::new();
    let mut start = 0;
    while total - start > page {
        let limit = start + page;
        let cut = std::iter::once(limit)
            .chain(fitting.iter().flat_map(|b| [b.top, b.bottom]))
            .filter(|&y| y > start && y <= limit)
            .min_by_key(|&y| (splits(y), Reverse(y)))
            .unwrap_or(limit);
        slices.push((start, cut));
        start = cut;
    }
    slices.push((start, total));
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(top: u32, bottom: u32) -> PixelBlock {
        PixelBlock { top, bottom }
    }

    #[test]
    fn test_short_content_is_one_slice() {
        assert_eq!(paginate(900, 1000, &[block(100, 500)]), vec![(0, 900)]);
    }

    #[test]
    fn test_cut_moves_above_straddling_block() {
        let blocks = [block(0, 400), block(400, 800), block(800, 1200)];
        assert_eq!(paginate(1200, 1000, &blocks), vec![(0, 800), (800, 1200)]);
    }

    #[test]
    fn test_cut_at_limit_when_clear() {
        let blocks = [block(0, 300), block(1100, 1300)];
        assert_eq!(paginate(2500, 1000, &blocks), vec![(0, 1000), (1000, 2000), (2000, 2500)]);
    }

    #[test]
    fn test_oversized_block_is_split_at_limit() {
        let blocks = [block(0, 2500)];
        assert_eq!(paginate(2500, 1000, &blocks), vec![(0, 1000), (1000, 2000), (2000, 2500)]);
    }

    #[test]
    fn test_oversized_block_does_not_force_cut_through_fitting_one() {
        let blocks = [block(0, 2500), block(900, 1100)];
        assert_eq!(paginate(2500, 1000, &blocks), vec![(0, 900), (900, 1900), (1900, 2500)]);
    }

    #[test]
    fn test_cut_lands_where_both_columns_are_clear() {
        // Left column entries and a right column of rows that never share an edge
        // except at 800.
        let left = [block(0, 380), block(400, 780), block(800, 1180)];
        let right = [block(200, 500), block(500, 790), block(800, 1190)];
        let blocks: Vec<PixelBlock> = left.into_iter().chain(right).collect();
        assert_eq!(paginate(1300, 1000, &blocks), vec![(0, 800), (800, 1300)]);
    }

    #[test]
    fn test_fitting_blocks_never_split() {
        let blocks: Vec<PixelBlock> = (0..30).map(|i| block(i * 170, i * 170 + 150)).collect();
        for (top, bottom) in paginate(30 * 170, 1000, &blocks) {
            assert!(bottom - top <= 1000);
            for b in &blocks {
                assert!(!(b.top < top && top < b.bottom), "cut {top} splits {b:?}");
            }
        }
    }

    #[test]
    fn test_pagination_parses() {
        assert_eq!("single".parse::<Pagination>().unwrap(), Pagination::Single);
        assert_eq!(" A4 ".parse::<Pagination>().unwrap(), Pagination::A4);
        assert!("letter".parse::<Pagination>().is_err());
    }

    fn bitmap(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]))
    }

    fn media_boxes(bytes: &[u8]) -> Vec<Vec<f32>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&id| {
                let page = doc.get_dictionary(id).unwrap();
                page.get(b"MediaBox")
                    .unwrap()
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|o| o.as_float().unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_single_page_height_follows_aspect_ratio() {
        let doc = PdfAssembler::new(Pagination::Single, 90).assemble(&bitmap(100, 300), &[]).unwrap();
        assert_eq!(doc.page_count, 1);
        let boxes = media_boxes(&doc.bytes);
        let width = A4_WIDTH_MM * PT_PER_MM;
        assert!((boxes[0][2] - width).abs() < 0.01);
        assert!((boxes[0][3] - width * 3.0).abs() < 0.01);
    }

    #[test]
    fn test_a4_mode_emits_a4_pages() {
        // 100 px wide → ~141 px per page.
        let blocks = [block(0, 120), block(120, 250), block(250, 300)];
        let doc = PdfAssembler::new(Pagination::A4, 90).assemble(&bitmap(100, 300), &blocks).unwrap();
        assert_eq!(doc.page_count, 3);
        for b in media_boxes(&doc.bytes) {
            assert!((b[3] - A4_HEIGHT_MM * PT_PER_MM).abs() < 0.01);
        }
    }

    #[test]
    fn test_empty_bitmap_is_assembly_error() {
        let err = PdfAssembler::new(Pagination::Single, 90).assemble(&RgbImage::new(0, 0), &[]).unwrap_err();
        assert!(matches!(err, ExportError::Assembly(_)));
    }
}
