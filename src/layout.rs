//! The label layout model: the single source of truth for what a sticker
//! looks like.
//!
//! Both the on-screen preview markup and the PDF export derive every visual
//! decision from this module, which is what keeps the two outputs in step:
//! the physical dimensions, the three stacked zones (identifier, barcode,
//! price), the sale-price predicate and the price formatting all live here
//! and nowhere else.

use crate::model::LabelRecord;

/// Physical label width in millimetres (landscape orientation).
pub const LABEL_WIDTH_MM: f64 = 38.0;

/// Physical label height in millimetres.
pub const LABEL_HEIGHT_MM: f64 = 25.0;

/// Baseline of the identifier line, measured from the top edge.
pub const SKU_BASELINE_MM: f64 = 4.5;

/// Vertical center of the price block, measured from the top edge.
pub const PRICE_BASELINE_MM: f64 = 21.5;

/// Fraction of the label width the barcode occupies.
pub const BARCODE_WIDTH_RATIO: f64 = 0.9;

/// Rendered barcode height.
pub const BARCODE_HEIGHT_MM: f64 = 8.0;

/// Horizontal gap between the struck-through regular price and the sale
/// price.
pub const PRICE_GAP_MM: f64 = 2.0;

/// Thickness of the rule struck through a discounted regular price.
pub const STRIKE_WIDTH_MM: f64 = 0.3;

/// Font weight of a rendered text run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font size class of a rendered text run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontSizeClass {
    /// 8pt, used for the identifier line and de-emphasized price runs.
    #[default]
    Small,
    /// 10pt, used for the emphasized price.
    Large,
}

impl FontSizeClass {
    /// Point size the class maps to.
    pub fn pt(self) -> u8 {
        match self {
            FontSizeClass::Small => 8,
            FontSizeClass::Large => 10,
        }
    }
}

/// One styled run inside the price block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceRun {
    /// Text of the run.
    pub text: String,
    /// Font weight.
    pub weight: FontWeight,
    /// Font size class.
    pub size: FontSizeClass,
    /// Whether a horizontal strike is drawn across the run.
    pub strikethrough: bool,
    /// Whether [`PRICE_GAP_MM`] is inserted before the run.
    pub gap_before: bool,
}

impl PriceRun {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    fn large(mut self) -> Self {
        self.size = FontSizeClass::Large;
        self
    }

    fn struck(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    fn after_gap(mut self) -> Self {
        self.gap_before = true;
        self
    }
}

/// Derived visual content of one label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayout {
    /// Identifier line drawn at the top of the label.
    pub identifier_text: String,
    /// Payload encoded into the barcode.
    pub barcode_payload: String,
    /// Ordered runs making up the price block.
    pub price_runs: Vec<PriceRun>,
}

impl LabelLayout {
    /// Computes the layout for one record.
    pub fn of(record: &LabelRecord) -> Self {
        Self {
            identifier_text: format!("SKU: {}", record.sku),
            barcode_payload: record.sku.clone(),
            price_runs: price_runs(record),
        }
    }
}

/// The sale predicate shared by preview, print and export.
///
/// A sale is active iff a sale price is present and strictly positive.
/// Absent, zero, negative and non-finite values all render the regular price
/// alone.
pub fn is_active_sale(record: &LabelRecord) -> bool {
    matches!(record.sale_price, Some(price) if price > 0.0)
}

fn price_runs(record: &LabelRecord) -> Vec<PriceRun> {
    match record.sale_price {
        Some(sale) if is_active_sale(record) => vec![
            PriceRun::new("MRP: "),
            PriceRun::new(format_price(record.regular_price)).struck(),
            PriceRun::new(format!("{}/-", format_price(sale)))
                .bold()
                .large()
                .after_gap(),
        ],
        _ => vec![
            PriceRun::new(format!("MRP: {}/-", format_price(record.regular_price)))
                .bold()
                .large(),
        ],
    }
}

/// Formats a price with thousands separators, keeping up to three fractional
/// digits and trimming trailing zeroes (`1000` becomes `1,000`, `10.5` stays
/// `10.5`).
pub fn format_price(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let scaled = (value.abs() * 1000.0).round() as u64;
    let mut out = group_thousands(scaled / 1000);

    let fraction = scaled % 1000;
    if fraction > 0 {
        let mut digits = format!("{fraction:03}");
        while digits.ends_with('0') {
            digits.pop();
        }
        out.push('.');
        out.push_str(&digits);
    }

    if value < 0.0 && scaled > 0 {
        out.insert(0, '-');
    }
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let offset = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (index + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Measures the width of a text run in its target font and size.
///
/// The export pipeline implements this against the loaded font metrics; tests
/// use fakes so the centering arithmetic stays checkable without a rendering
/// backend.
pub trait TextMeasure {
    /// Width in millimetres of `text` set in the given weight and size.
    fn run_width_mm(&self, text: &str, weight: FontWeight, size: FontSizeClass) -> f64;
}

/// A price run with its resolved horizontal placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedRun {
    /// The run being placed.
    pub run: PriceRun,
    /// Left edge, in millimetres from the label's left edge.
    pub x_mm: f64,
    /// Measured width in millimetres.
    pub width_mm: f64,
}

/// Places the price runs on one baseline, horizontally centering the whole
/// sequence as a single group.
///
/// Each run is measured in its own font and size before any placement
/// happens; centering run-by-run would visibly drift from the preview.
pub fn plan_price_line(
    runs: &[PriceRun],
    page_width_mm: f64,
    measure: &dyn TextMeasure,
) -> Vec<PlacedRun> {
    let widths: Vec<f64> = runs
        .iter()
        .map(|run| measure.run_width_mm(&run.text, run.weight, run.size))
        .collect();

    let total: f64 = widths.iter().sum::<f64>()
        + runs
            .iter()
            .filter(|run| run.gap_before)
            .count() as f64
            * PRICE_GAP_MM;

    let mut cursor = (page_width_mm - total) / 2.0;
    runs.iter()
        .zip(widths)
        .map(|(run, width_mm)| {
            if run.gap_before {
                cursor += PRICE_GAP_MM;
            }
            let placed = PlacedRun {
                run: run.clone(),
                x_mm: cursor,
                width_mm,
            };
            cursor += width_mm;
            placed
        })
        .collect()
}
