//! Custom `genpdf` elements for drawing sticker pages.
//!
//! `genpdf` ships flow-layout primitives; a sticker is the opposite: three
//! zones at fixed offsets on a fixed-size page.  [`StickerPage`] therefore
//! implements [`genpdf::Element`] directly and places the identifier line,
//! the cached barcode raster and the price block itself, measuring each price
//! run in its target font so the block centers as one group exactly like the
//! preview does.

use std::sync::Arc;

use image::GenericImageView;

use genpdf::elements::Image;
use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::FontCache;
use genpdf::style::{Style, StyledString};
use genpdf::{render, Alignment, Context, Element, Mm, Position, RenderResult, Scale};

use crate::layout::{
    plan_price_line, FontSizeClass, FontWeight, LabelLayout, PriceRun, TextMeasure,
    BARCODE_HEIGHT_MM, BARCODE_WIDTH_RATIO, PRICE_BASELINE_MM, SKU_BASELINE_MM,
};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn run_style(base: Style, weight: FontWeight, size: FontSizeClass) -> Style {
    let mut style = base.and(Style::new().with_font_size(size.pt()));
    if weight == FontWeight::Bold {
        style.set_bold();
    }
    style
}

/// Measures run widths against the document's loaded font metrics.
struct CacheMeasure<'a> {
    cache: &'a FontCache,
    base: Style,
}

impl TextMeasure for CacheMeasure<'_> {
    fn run_width_mm(&self, text: &str, weight: FontWeight, size: FontSizeClass) -> f64 {
        let style = run_style(self.base, weight, size);
        mm_to_f64(StyledString::new(text.to_owned(), style).width(self.cache))
    }
}

/// One full sticker page: identifier line, barcode raster, price block.
///
/// The barcode raster is shared across all pages of an export; the element
/// only holds a reference to it.
pub struct StickerPage {
    identifier: String,
    price_runs: Vec<PriceRun>,
    raster: Arc<image::DynamicImage>,
}

impl StickerPage {
    /// Creates a page element for one label layout and the shared barcode
    /// raster.
    pub fn new(layout: &LabelLayout, raster: Arc<image::DynamicImage>) -> Self {
        Self {
            identifier: layout.identifier_text.clone(),
            price_runs: layout.price_runs.clone(),
            raster,
        }
    }

    fn draw_identifier(
        &self,
        context: &Context,
        area: &mut render::Area<'_>,
        base: Style,
        page_width: f64,
    ) -> Result<(), Error> {
        let style = run_style(base, FontWeight::Normal, FontSizeClass::Small);
        let string = StyledString::new(self.identifier.clone(), style);
        let width = mm_to_f64(string.width(&context.font_cache));
        let ascent = mm_to_f64(style.font(&context.font_cache).glyph_height(style.font_size()));

        let x = (page_width - width) / 2.0;
        let top = (SKU_BASELINE_MM - ascent).max(0.0);

        let position = Position::new(mm_from_f64(x), mm_from_f64(top));
        match area.text_section(&context.font_cache, position, style) {
            Some(mut section) => section.print_str(&string.s, style),
            None => Err(Error::new(
                "identifier line does not fit on the label",
                ErrorKind::PageSizeExceeded,
            )),
        }
    }

    fn draw_barcode(
        &self,
        context: &Context,
        area: &render::Area<'_>,
        base: Style,
        page_width: f64,
        page_height: f64,
    ) -> Result<(), Error> {
        let (px_width, px_height) = self.raster.dimensions();
        if px_width == 0 || px_height == 0 {
            return Err(Error::new(
                "barcode raster is empty",
                ErrorKind::InvalidData,
            ));
        }

        let target_width = page_width * BARCODE_WIDTH_RATIO;
        let target_height = BARCODE_HEIGHT_MM;
        let natural_width = f64::from(px_width) * MM_PER_INCH / DEFAULT_IMAGE_DPI;
        let natural_height = f64::from(px_height) * MM_PER_INCH / DEFAULT_IMAGE_DPI;

        let mut image = Image::from_dynamic_image((*self.raster).clone())?;
        image.set_alignment(Alignment::Left);
        image.set_scale(Scale::new(
            target_width / natural_width,
            target_height / natural_height,
        ));

        let mut barcode_area = area.clone();
        barcode_area.add_offset(Position::new(
            mm_from_f64((page_width - target_width) / 2.0),
            mm_from_f64((page_height - target_height) / 2.0),
        ));
        image.render(context, barcode_area, base)?;
        Ok(())
    }

    fn draw_price_block(
        &self,
        context: &Context,
        area: &mut render::Area<'_>,
        base: Style,
        page_width: f64,
    ) -> Result<(), Error> {
        let cache = &context.font_cache;
        let measure = CacheMeasure { cache, base };
        let placed = plan_price_line(&self.price_runs, page_width, &measure);

        let tallest = placed
            .iter()
            .map(|entry| {
                let style = run_style(base, entry.run.weight, entry.run.size);
                mm_to_f64(style.font(cache).glyph_height(style.font_size()))
            })
            .fold(0.0f64, f64::max);

        // The block is vertically centered on the price baseline offset.
        let baseline = PRICE_BASELINE_MM + tallest / 2.0;

        for entry in &placed {
            let style = run_style(base, entry.run.weight, entry.run.size);
            let ascent = mm_to_f64(style.font(cache).glyph_height(style.font_size()));
            let top = baseline - ascent;

            let position = Position::new(mm_from_f64(entry.x_mm), mm_from_f64(top));
            match area.text_section(cache, position, style) {
                Some(mut section) => section.print_str(&entry.run.text, style)?,
                None => {
                    return Err(Error::new(
                        "price block does not fit on the label",
                        ErrorKind::PageSizeExceeded,
                    ))
                }
            }

            if entry.run.strikethrough {
                // Area::draw_line has no thickness control; the markup
                // outputs honor STRIKE_WIDTH_MM, this path draws at the
                // backend default.
                let strike_y = baseline - ascent / 2.0;
                let mut line_style = Style::new();
                if let Some(color) = style.color() {
                    line_style = line_style.with_color(color);
                }
                area.draw_line(
                    vec![
                        Position::new(mm_from_f64(entry.x_mm), mm_from_f64(strike_y)),
                        Position::new(
                            mm_from_f64(entry.x_mm + entry.width_mm),
                            mm_from_f64(strike_y),
                        ),
                    ],
                    line_style,
                );
            }
        }

        Ok(())
    }
}

impl Element for StickerPage {
    fn render(
        &mut self,
        context: &Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let page_width = mm_to_f64(area.size().width);
        let page_height = mm_to_f64(area.size().height);

        self.draw_identifier(context, &mut area, style, page_width)?;
        self.draw_barcode(context, &area, style, page_width, page_height)?;
        self.draw_price_block(context, &mut area, style, page_width)?;

        let mut result = RenderResult::default();
        result.size = area.size();
        Ok(result)
    }
}
