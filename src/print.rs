//! The print adapter.
//!
//! Wraps the rendered preview markup into a standalone print document with
//! page-sizing rules matching the physical label media, then hands it to a
//! [`PrintSurface`].  The platform print pipeline does the final
//! rasterization on this path; no PDF object is produced and no font
//! measurement is needed, because the document reuses the same class-based
//! style rules the preview is built from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::StickerError;
use crate::layout::{
    FontSizeClass, LABEL_HEIGHT_MM, LABEL_WIDTH_MM, PRICE_GAP_MM, STRIKE_WIDTH_MM,
};
use crate::model::LabelBatch;
use crate::preview::Preview;

/// Delay before the embedded print trigger fires, giving the surface time to
/// finish layout.  Time-based rather than a true readiness signal, so very
/// slow layouts remain a known race.
pub const PRINT_TRIGGER_DELAY_MS: u32 = 250;

/// A destination that can take the finished print document.
pub trait PrintSurface {
    /// Opens the surface with the given document.
    fn open(&mut self, document: &str) -> io::Result<()>;
}

/// A [`PrintSurface`] backed by a file on disk, ready to be opened in a
/// browser.
#[derive(Clone, Debug)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    /// Creates a surface writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path of the surface.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintSurface for FileSurface {
    fn open(&mut self, document: &str) -> io::Result<()> {
        fs::write(&self.path, document)
    }
}

/// Builds the standalone print document for the current preview.
///
/// Fails with [`StickerError::EmptyBatch`] when there is nothing to print.
pub fn print_document(batch: &LabelBatch, preview: &Preview) -> Result<String, StickerError> {
    if batch.is_empty() || preview.sticker_count() == 0 {
        return Err(StickerError::EmptyBatch);
    }

    Ok(format!(
        concat!(
            "<!DOCTYPE html>\n<html><head><title>Print Stickers</title>\n",
            "<style>\n{style}\n</style>\n</head><body>\n{markup}\n",
            r#"<script>setTimeout(function () {{ window.focus(); window.print(); }}, {delay});</script>"#,
            "\n</body></html>\n"
        ),
        style = print_stylesheet(),
        markup = preview.markup(),
        delay = PRINT_TRIGGER_DELAY_MS,
    ))
}

/// Builds the print document and opens it on the given surface.
///
/// Surface creation failure maps to [`StickerError::PopupBlocked`]; the
/// emptiness check runs before any surface is touched.
pub fn print(
    batch: &LabelBatch,
    preview: &Preview,
    surface: &mut dyn PrintSurface,
) -> Result<(), StickerError> {
    let document = print_document(batch, preview)?;
    surface.open(&document).map_err(StickerError::PopupBlocked)?;
    debug!("opened print surface with {} sticker(s)", batch.len());
    Ok(())
}

fn print_stylesheet() -> String {
    format!(
        concat!(
            "@page {{ size: {width}mm {height}mm; margin: 0; }}\n",
            "body {{ margin: 0; -webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n",
            ".sticker-container {{ width: {width}mm; height: {height}mm; box-sizing: border-box; ",
            "page-break-after: always; display: flex; flex-direction: column; ",
            "justify-content: space-between; align-items: center; text-align: center; ",
            "padding: 2mm 0; background-color: white; color: black; overflow: hidden; ",
            "font-family: sans-serif; }}\n",
            ".sku-container, .price-container {{ flex: 0 1 auto; }}\n",
            ".barcode-container {{ flex: 1 1 auto; display: flex; align-items: center; ",
            "justify-content: center; width: 100%; }}\n",
            ".sku-text {{ font-size: {small}pt; font-family: monospace; }}\n",
            ".barcode-svg-container {{ width: 90%; height: 8mm; }}\n",
            ".barcode-svg-container svg {{ width: 100%; height: 100%; }}\n",
            ".price-text {{ line-height: 1; }}\n",
            ".price-run.small {{ font-size: {small}pt; }}\n",
            ".price-run.large {{ font-size: {large}pt; }}\n",
            ".price-run.bold {{ font-weight: bold; }}\n",
            ".price-run.gap-before {{ margin-left: {gap}mm; }}\n",
            ".price-run.strikethrough {{ position: relative; display: inline-block; color: #555; }}\n",
            ".price-run.strikethrough::after {{ content: ''; position: absolute; left: 0; top: 50%; ",
            "right: 0; border-top: {strike}mm solid #000; transform: translateY(-50%); }}\n"
        ),
        width = LABEL_WIDTH_MM,
        height = LABEL_HEIGHT_MM,
        small = FontSizeClass::Small.pt(),
        large = FontSizeClass::Large.pt(),
        gap = PRICE_GAP_MM,
        strike = STRIKE_WIDTH_MM,
    )
}
