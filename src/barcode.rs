//! CODE128 barcode rendering behind a narrow, injectable interface.
//!
//! The rest of the crate only ever talks to [`BarcodeRenderer`]; the shipped
//! implementation encodes through the `barcoders` crate and keeps the result
//! as a resolution-independent [`BarcodeGraphic`].  The graphic can be
//! emitted as an SVG for the preview and print markup, or rasterized at an
//! oversampling factor for embedding into the exported PDF.

use image::{DynamicImage, GrayImage, Luma};

use barcoders::sym::code128::Code128;

use crate::error::StickerError;

// barcoders selects the CODE128 character set from a prefix on the payload;
// set B covers the printable ASCII range SKUs use.
const CHARSET_B: char = '\u{0181}';

const BAR_LUMA: u8 = 0;
const BACKGROUND_LUMA: u8 = 255;

/// Drawing options for the barcode vector graphic.
///
/// The defaults mirror the preview's symbol proportions: 1.5px modules, 40px
/// bars, no quiet-zone margin (the surrounding layout already provides
/// whitespace), and no human-readable text (the SKU line is drawn
/// separately).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarcodeOptions {
    /// Width of a single module in source pixels.
    pub module_width_px: f64,
    /// Bar height in source pixels.
    pub height_px: u32,
    /// Quiet-zone margin on each side, in source pixels.
    pub margin_px: u32,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            module_width_px: 1.5,
            height_px: 40,
            margin_px: 0,
        }
    }
}

/// Renders a barcode vector graphic from a string payload.
///
/// Injected into whatever component needs it (resolved once at startup)
/// rather than looked up through any ambient global.
pub trait BarcodeRenderer {
    /// Encodes `payload` and returns the scalable graphic.
    fn render(&self, payload: &str, options: BarcodeOptions)
        -> Result<BarcodeGraphic, StickerError>;
}

/// The CODE128 implementation of [`BarcodeRenderer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Code128Renderer;

impl BarcodeRenderer for Code128Renderer {
    fn render(
        &self,
        payload: &str,
        options: BarcodeOptions,
    ) -> Result<BarcodeGraphic, StickerError> {
        let symbol =
            Code128::new(format!("{CHARSET_B}{payload}")).map_err(|source| {
                StickerError::Barcode {
                    payload: payload.to_owned(),
                    source,
                }
            })?;
        Ok(BarcodeGraphic::new(symbol.encode(), options))
    }
}

/// An encoded barcode plus its drawing options.
///
/// Stores the module bit pattern rather than pixels so the same graphic can
/// back both the vector preview and the oversampled export raster.
#[derive(Clone, Debug, PartialEq)]
pub struct BarcodeGraphic {
    modules: Vec<u8>,
    options: BarcodeOptions,
}

impl BarcodeGraphic {
    fn new(modules: Vec<u8>, options: BarcodeOptions) -> Self {
        Self { modules, options }
    }

    /// Intrinsic width of the graphic in source pixels, margins included.
    pub fn width_px(&self) -> f64 {
        self.modules.len() as f64 * self.options.module_width_px
            + f64::from(self.options.margin_px) * 2.0
    }

    /// Intrinsic height of the graphic in source pixels.
    pub fn height_px(&self) -> u32 {
        self.options.height_px
    }

    /// Emits the graphic as a standalone SVG element.
    ///
    /// The element scales to its container (the preview and print stylesheets
    /// size it to 90% label width by 8mm), so only the view box carries the
    /// intrinsic dimensions.
    pub fn to_svg(&self) -> String {
        let width = self.width_px();
        let height = self.height_px();
        let mut svg = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" "#,
                r#"preserveAspectRatio="none" shape-rendering="crispEdges">"#
            ),
            w = width,
            h = height,
        );

        let mut index = 0;
        while index < self.modules.len() {
            if self.modules[index] == 0 {
                index += 1;
                continue;
            }
            let start = index;
            while index < self.modules.len() && self.modules[index] != 0 {
                index += 1;
            }
            let x = f64::from(self.options.margin_px)
                + start as f64 * self.options.module_width_px;
            let bar_width = (index - start) as f64 * self.options.module_width_px;
            svg.push_str(&format!(
                r##"<rect x="{x}" y="0" width="{bar_width}" height="{height}" fill="#000"/>"##
            ));
        }

        svg.push_str("</svg>");
        svg
    }

    /// Rasterizes the graphic at `oversample` times its intrinsic pixel
    /// dimensions.
    ///
    /// The factor is applied uniformly to both axes so the raster stays crisp
    /// when scaled into its final placement; values below 1 are clamped to 1.
    pub fn rasterize(&self, oversample: u32) -> DynamicImage {
        let oversample = oversample.max(1);
        let scale = f64::from(oversample);
        let width = (self.width_px() * scale).round().max(1.0) as u32;
        let height = self.height_px().max(1) * oversample;

        let margin = f64::from(self.options.margin_px);
        let image = GrayImage::from_fn(width, height, |x, _y| {
            let center = (f64::from(x) + 0.5) / scale - margin;
            let module = (center / self.options.module_width_px).floor();
            let dark = module >= 0.0
                && (module as usize) < self.modules.len()
                && self.modules[module as usize] != 0;
            Luma([if dark { BAR_LUMA } else { BACKGROUND_LUMA }])
        });

        DynamicImage::ImageLuma8(image)
    }
}
