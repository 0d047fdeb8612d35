use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use stickerpress::controller::{Notifier, PageController};
use stickerpress::export::EXPORT_FILE_NAME;
use stickerpress::print::FileSurface;
use stickerpress::{Code128Renderer, LabelRecord};

/// Generates retail price sticker sheets from the command line.
///
/// Fonts must be present under `assets/fonts` or provided via the
/// `STICKERPRESS_FONTS_DIR` environment variable before exporting a PDF.
#[derive(Parser)]
#[command(author, version, about = "Sticker sheet generator for retail price labels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sticker batch as a multi-page PDF.
    #[command(name = "export")]
    Export {
        #[command(flatten)]
        product: ProductArgs,

        /// Output path for the PDF.
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },

    /// Write a self-printing sheet that opens the print dialog in a browser.
    #[command(name = "print-sheet", aliases = ["print_sheet", "print"])]
    PrintSheet {
        #[command(flatten)]
        product: ProductArgs,

        /// Output path for the printable page.
        #[arg(long, default_value = "stickers.html")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct ProductArgs {
    /// Product SKU printed on every sticker.
    #[arg(long, value_parser = parse_sku)]
    sku: String,

    /// Regular price.
    #[arg(long, value_parser = parse_price)]
    price: f64,

    /// Sale price; when set and positive, the regular price is struck through.
    #[arg(long, value_parser = parse_price)]
    sale_price: Option<f64>,

    /// Number of identical stickers to generate.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
    quantity: u32,
}

impl ProductArgs {
    fn record(&self) -> LabelRecord {
        LabelRecord::new(&self.sku, self.price).with_sale_price(self.sale_price)
    }
}

fn parse_sku(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("SKU must not be empty".to_owned());
    }
    Ok(trimmed.to_owned())
}

fn parse_price(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|err| format!("not a number: {err}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err("price must be a non-negative number".to_owned());
    }
    Ok(value)
}

/// Prints notifications the way the library would surface them to a user.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, title: &str, description: &str) {
        eprintln!("{title}: {description}");
    }
}

fn main() {
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Export { product, out } => {
            let mut controller = PageController::new(Code128Renderer, StderrNotifier);
            controller.generate(product.record(), product.quantity) && controller.export_to(&out)
        }
        Commands::PrintSheet { product, out } => {
            let mut controller = PageController::new(Code128Renderer, StderrNotifier);
            let mut surface = FileSurface::new(out);
            controller.generate(product.record(), product.quantity)
                && controller.print_to(&mut surface)
        }
    };

    if !ok {
        std::process::exit(1);
    }
}
