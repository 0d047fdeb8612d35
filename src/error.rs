//! Error taxonomy for the stickerpress crate.
//!
//! Every failure a user can trigger maps to one variant here.  The variants
//! are caught at the action boundary (see [`crate::controller`]) and turned
//! into a single short notification; the underlying causes only reach the
//! diagnostic log.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{MAX_QUANTITY, MIN_QUANTITY};

/// All errors surfaced by the sticker pipeline.
#[derive(Debug, Error)]
pub enum StickerError {
    /// Export or print was requested before any stickers were generated.
    #[error("no stickers have been generated yet")]
    EmptyBatch,

    /// The print surface refused to open.
    #[error("print surface could not be opened")]
    PopupBlocked(#[source] io::Error),

    /// Any failure while rasterizing or drawing the exported document.
    #[error("PDF generation failed")]
    ExportFailed(#[source] genpdf::error::Error),

    /// The rendered preview carries no barcode graphic even though a batch
    /// exists.  Indicates a preview/export desync.
    #[error("barcode graphic missing from the rendered preview")]
    BarcodeElementMissing,

    /// Requested sticker count is outside the supported range.
    #[error("quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {0}")]
    InvalidQuantity(u32),

    /// The SKU could not be encoded as a CODE128 symbol.
    #[error("failed to encode {payload:?} as CODE128")]
    Barcode {
        /// The rejected barcode payload.
        payload: String,
        #[source]
        source: barcoders::error::Error,
    },

    /// Writing the finished artifact to disk failed.
    #[error("failed to write {}", path.display())]
    Io {
        /// Destination that could not be written.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StickerError {
    /// Returns `true` when the error means there was simply nothing to do.
    pub fn is_empty_batch(&self) -> bool {
        matches!(self, StickerError::EmptyBatch)
    }
}
