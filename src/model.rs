//! Data structures describing the content of a sticker batch.
//!
//! The types in this module form the in-memory model the rest of the crate
//! consumes: one [`LabelRecord`] per sticker and a [`LabelBatch`] holding the
//! copies produced by a single generation.  They intentionally avoid any
//! reference to the rendering backends so the values can be produced by a
//! form layer, a CLI, or a test without pulling in heavy dependencies.

use crate::error::StickerError;

/// Smallest sticker count a single generation may request.
pub const MIN_QUANTITY: u32 = 1;

/// Largest sticker count a single generation may request.
pub const MAX_QUANTITY: u32 = 100;

/// Content of one sticker.
///
/// The SKU doubles as the display text and the barcode payload.  The sale
/// price is optional; whether it participates in the rendered price block is
/// decided by [`crate::layout::is_active_sale`], never here.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRecord {
    /// Product code; required, non-empty.
    pub sku: String,
    /// Regular price, `>= 0`.
    pub regular_price: f64,
    /// Optional discounted price.
    pub sale_price: Option<f64>,
}

impl LabelRecord {
    /// Creates a record without a sale price.
    pub fn new(sku: impl Into<String>, regular_price: f64) -> Self {
        Self {
            sku: sku.into(),
            regular_price,
            sale_price: None,
        }
    }

    /// Sets the sale price and returns the updated record.
    pub fn with_sale_price(mut self, sale_price: impl Into<Option<f64>>) -> Self {
        self.sale_price = sale_price.into();
        self
    }
}

/// An ordered batch of identical sticker records.
///
/// A batch is created fresh by each generation and replaces the previous one
/// wholesale; it lives in memory only and is never persisted.  The data model
/// does not forbid per-record variation, but [`LabelBatch::generate`] always
/// produces copies of a single input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelBatch {
    records: Vec<LabelRecord>,
}

impl LabelBatch {
    /// Produces a batch of `quantity` copies of `record`.
    ///
    /// Fails with [`StickerError::InvalidQuantity`] when the count is outside
    /// `MIN_QUANTITY..=MAX_QUANTITY`.
    pub fn generate(record: LabelRecord, quantity: u32) -> Result<Self, StickerError> {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(StickerError::InvalidQuantity(quantity));
        }

        Ok(Self {
            records: vec![record; quantity as usize],
        })
    }

    /// Returns the records in generation order.
    pub fn records(&self) -> &[LabelRecord] {
        &self.records
    }

    /// Returns the first record, if any.
    ///
    /// All records within one generation are identical, so the first record
    /// is representative of the whole batch.
    pub fn first(&self) -> Option<&LabelRecord> {
        self.records.first()
    }

    /// Number of stickers in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no stickers.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
