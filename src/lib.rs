//! Sticker sheet generation for retail price labels.
//!
//! Turns a product record (SKU, regular price, optional sale price) into a
//! batch of identical 38mm x 25mm stickers, each carrying the SKU, a CODE128
//! barcode and a price block.  The batch can be previewed as markup, exported
//! as a multi-page PDF via [`export::ExportPipeline`], or sent to a
//! [`print::PrintSurface`] as a self-printing document.

pub mod barcode;
pub mod controller;
pub mod elements;
pub mod error;
pub mod export;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod preview;
pub mod print;

pub use barcode::{BarcodeOptions, BarcodeRenderer, Code128Renderer};
pub use controller::{Notifier, PageController};
pub use error::StickerError;
pub use export::ExportPipeline;
pub use model::{LabelBatch, LabelRecord};
pub use preview::Preview;
