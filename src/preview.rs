//! The rendered sticker preview.
//!
//! A [`Preview`] is a pure function of the current batch: N identical sticker
//! markup blocks derived from the [`crate::layout`] model, plus the barcode
//! vector graphic rendered exactly once and embedded into every block.  The
//! print adapter copies this markup verbatim, and the export pipeline
//! captures the barcode graphic from here, which is what keeps all three
//! outputs in step.

use log::error;

use crate::barcode::{BarcodeGraphic, BarcodeOptions, BarcodeRenderer};
use crate::export::BarcodeSource;
use crate::layout::{FontSizeClass, FontWeight, LabelLayout, PriceRun};
use crate::model::LabelBatch;

/// The rendered preview of one batch.
#[derive(Clone, Debug)]
pub struct Preview {
    markup: String,
    barcode: Option<BarcodeGraphic>,
    sticker_count: usize,
}

impl Preview {
    /// Renders the batch into sticker markup.
    ///
    /// All stickers in a batch share one SKU, so the barcode is rendered a
    /// single time and reused.  A failed barcode encoding is logged and
    /// leaves the preview without a graphic; a later export will then report
    /// the missing barcode instead of silently drawing nothing.
    pub fn render(batch: &LabelBatch, renderer: &dyn BarcodeRenderer) -> Self {
        Self::render_with_options(batch, renderer, BarcodeOptions::default())
    }

    /// Renders the batch with explicit barcode drawing options.
    pub fn render_with_options(
        batch: &LabelBatch,
        renderer: &dyn BarcodeRenderer,
        options: BarcodeOptions,
    ) -> Self {
        let barcode = batch.first().and_then(|record| {
            match renderer.render(&record.sku, options) {
                Ok(graphic) => Some(graphic),
                Err(err) => {
                    error!("barcode generation failed: {err}");
                    None
                }
            }
        });

        let barcode_svg = barcode.as_ref().map(BarcodeGraphic::to_svg);
        let mut markup = String::new();
        for record in batch.records() {
            let layout = LabelLayout::of(record);
            markup.push_str(&sticker_markup(&layout, barcode_svg.as_deref()));
        }

        Self {
            markup,
            barcode,
            sticker_count: batch.len(),
        }
    }

    /// The sticker markup, one block per record.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Number of stickers the preview shows.
    pub fn sticker_count(&self) -> usize {
        self.sticker_count
    }
}

impl BarcodeSource for Preview {
    fn barcode_graphic(&self) -> Option<&BarcodeGraphic> {
        self.barcode.as_ref()
    }
}

fn sticker_markup(layout: &LabelLayout, barcode_svg: Option<&str>) -> String {
    let mut price_block = String::new();
    for run in &layout.price_runs {
        price_block.push_str(&price_run_markup(run));
    }

    format!(
        concat!(
            r#"<div class="sticker-container">"#,
            r#"<div class="sku-container"><div class="sku-text">{sku}</div></div>"#,
            r#"<div class="barcode-container"><div class="barcode-svg-container">{svg}</div></div>"#,
            r#"<div class="price-container"><div class="price-text">{price}</div></div>"#,
            "</div>"
        ),
        sku = escape_html(&layout.identifier_text),
        svg = barcode_svg.unwrap_or(""),
        price = price_block,
    )
}

fn price_run_markup(run: &PriceRun) -> String {
    let mut classes = String::from("price-run");
    classes.push_str(match run.size {
        FontSizeClass::Small => " small",
        FontSizeClass::Large => " large",
    });
    if run.weight == FontWeight::Bold {
        classes.push_str(" bold");
    }
    if run.strikethrough {
        classes.push_str(" strikethrough");
    }
    if run.gap_before {
        classes.push_str(" gap-before");
    }

    format!(
        r#"<span class="{classes}">{text}</span>"#,
        text = escape_html(&run.text)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::Code128Renderer;
    use crate::model::{LabelBatch, LabelRecord};

    fn preview_of(record: LabelRecord, quantity: u32) -> Preview {
        let batch = LabelBatch::generate(record, quantity).unwrap();
        Preview::render(&batch, &Code128Renderer)
    }

    #[test]
    fn renders_one_block_per_sticker() {
        let preview = preview_of(LabelRecord::new("SKU-1", 500.0), 4);
        assert_eq!(preview.sticker_count(), 4);
        assert_eq!(preview.markup().matches("sticker-container").count(), 4);
        assert_eq!(preview.markup().matches("<svg").count(), 4);
    }

    #[test]
    fn plain_price_has_no_strikethrough_run() {
        let preview = preview_of(LabelRecord::new("SKU-1", 500.0), 1);
        assert!(preview.markup().contains("MRP: 500/-"));
        assert!(!preview.markup().contains("strikethrough"));
    }

    #[test]
    fn active_sale_strikes_the_regular_price() {
        let preview = preview_of(LabelRecord::new("SKU-1", 500.0).with_sale_price(400.0), 1);
        let markup = preview.markup();
        assert!(markup.contains("strikethrough"));
        assert!(markup.contains(">500<"));
        assert!(markup.contains("400/-"));
        assert!(markup.contains("gap-before"));
    }

    #[test]
    fn sku_text_is_escaped() {
        let preview = preview_of(LabelRecord::new("A&B<C>", 10.0), 1);
        assert!(preview.markup().contains("SKU: A&amp;B&lt;C&gt;"));
    }

    #[test]
    fn unencodable_sku_leaves_preview_without_graphic() {
        let preview = preview_of(LabelRecord::new("caf\u{00e9}", 10.0), 2);
        assert!(preview.barcode_graphic().is_none());
        assert_eq!(preview.markup().matches("sticker-container").count(), 2);
        assert_eq!(preview.markup().matches("<svg").count(), 0);
    }

    #[test]
    fn empty_batch_renders_nothing() {
        let preview = Preview::render(&LabelBatch::default(), &Code128Renderer);
        assert_eq!(preview.sticker_count(), 0);
        assert!(preview.markup().is_empty());
        assert!(preview.barcode_graphic().is_none());
    }
}
