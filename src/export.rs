//! The PDF export pipeline.
//!
//! Converts a batch of identical labels into one multi-page document, one
//! 38mm x 25mm landscape page per sticker, visually equivalent to the
//! rendered preview.  The barcode graphic is captured from the preview and
//! rasterized exactly once per export; every page reuses the same raster, so
//! rasterization cost stays constant in the batch size.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use genpdf::elements::PageBreak;
use genpdf::Size;

use crate::barcode::BarcodeGraphic;
use crate::elements::{mm_from_f64, StickerPage};
use crate::error::StickerError;
use crate::fonts;
use crate::layout::{LabelLayout, LABEL_HEIGHT_MM, LABEL_WIDTH_MM};
use crate::model::LabelBatch;

/// Default name of the exported artifact.
pub const EXPORT_FILE_NAME: &str = "stickers.pdf";

/// Default oversampling factor applied when rasterizing the barcode.
///
/// Applied uniformly to both axes; it trades file size for sharpness and
/// makes no promise about sufficiency for every printer DPI.
pub const BARCODE_OVERSAMPLE: u32 = 3;

/// Supplies the barcode graphic already rendered for the current batch.
///
/// The preview implements this; export captures the graphic through the
/// trait so tests can count how often the capture happens.
pub trait BarcodeSource {
    /// The rendered barcode graphic, if one exists.
    fn barcode_graphic(&self) -> Option<&BarcodeGraphic>;
}

/// Builds the multi-page sticker document.
#[derive(Clone, Copy, Debug)]
pub struct ExportPipeline {
    oversample: u32,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self {
            oversample: BARCODE_OVERSAMPLE,
        }
    }
}

impl ExportPipeline {
    /// Creates a pipeline with the default oversampling factor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the barcode oversampling factor.
    pub fn with_oversample(mut self, oversample: u32) -> Self {
        self.oversample = oversample;
        self
    }

    /// Renders the whole batch into PDF bytes.
    ///
    /// Fails with [`StickerError::EmptyBatch`] before any document work when
    /// there is nothing to export, and with
    /// [`StickerError::BarcodeElementMissing`] when the preview has no
    /// rendered barcode graphic.  Any drawing failure aborts the export as a
    /// whole.
    pub fn export(
        &self,
        batch: &LabelBatch,
        source: &dyn BarcodeSource,
    ) -> Result<Vec<u8>, StickerError> {
        if batch.is_empty() {
            return Err(StickerError::EmptyBatch);
        }

        // Captured and rasterized once; every page shares this raster.
        let graphic = source
            .barcode_graphic()
            .ok_or(StickerError::BarcodeElementMissing)?;
        let raster = Arc::new(graphic.rasterize(self.oversample));

        let family = fonts::default_font_family().map_err(StickerError::ExportFailed)?;
        let mut document = genpdf::Document::new(family);
        document.set_title("Stickers");
        document.set_paper_size(Size::new(
            mm_from_f64(LABEL_WIDTH_MM),
            mm_from_f64(LABEL_HEIGHT_MM),
        ));

        for (index, record) in batch.records().iter().enumerate() {
            if index > 0 {
                document.push(PageBreak::new());
            }
            let layout = LabelLayout::of(record);
            document.push(StickerPage::new(&layout, Arc::clone(&raster)));
        }

        let mut bytes = Vec::new();
        document
            .render(&mut bytes)
            .map_err(StickerError::ExportFailed)?;

        debug!(
            "exported {} sticker page(s), {} bytes",
            batch.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Renders the batch and writes the finished document to `path`.
    ///
    /// The file is only written after the whole document rendered
    /// successfully; a failed export never leaves a partial artifact behind.
    pub fn export_to_file(
        &self,
        batch: &LabelBatch,
        source: &dyn BarcodeSource,
        path: &Path,
    ) -> Result<PathBuf, StickerError> {
        let bytes = self.export(batch, source)?;
        fs::write(path, &bytes).map_err(|source| StickerError::Io {
            path: path.to_owned(),
            source,
        })?;
        Ok(path.to_owned())
    }
}
