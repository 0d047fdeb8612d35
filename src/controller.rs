//! Page-level state and action boundary.
//!
//! [`PageController`] owns the current batch and preview and exposes the
//! named actions the surrounding shell calls into: generate, export, print.
//! Every fallible action is caught here, converted into a single user-facing
//! notification, and logged with its full cause chain; nothing below this
//! layer talks to the user.

use std::error::Error as _;
use std::path::Path;

use log::{error, warn};

use crate::barcode::BarcodeRenderer;
use crate::error::StickerError;
use crate::export::ExportPipeline;
use crate::model::{LabelBatch, LabelRecord};
use crate::preview::Preview;
use crate::print::{self, PrintSurface};

/// Receives user-facing notifications raised at the action boundary.
pub trait Notifier {
    /// Shows a warning with a short title and a longer description.
    fn notify(&mut self, title: &str, description: &str);
}

/// Owns the page state and mediates every user action.
pub struct PageController<R, N> {
    renderer: R,
    notifier: N,
    pipeline: ExportPipeline,
    batch: Option<LabelBatch>,
    preview: Option<Preview>,
    export_busy: bool,
    print_busy: bool,
}

impl<R: BarcodeRenderer, N: Notifier> PageController<R, N> {
    pub fn new(renderer: R, notifier: N) -> Self {
        Self {
            renderer,
            notifier,
            pipeline: ExportPipeline::default(),
            batch: None,
            preview: None,
            export_busy: false,
            print_busy: false,
        }
    }

    /// Replaces the export pipeline, e.g. to change the raster oversample.
    pub fn with_pipeline(mut self, pipeline: ExportPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Current batch, if one has been generated.
    pub fn batch(&self) -> Option<&LabelBatch> {
        self.batch.as_ref()
    }

    /// Current preview, if one has been generated.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn is_export_busy(&self) -> bool {
        self.export_busy
    }

    pub fn is_print_busy(&self) -> bool {
        self.print_busy
    }

    /// Generates a fresh batch and preview, replacing any previous one
    /// wholesale.  Returns `true` on success.
    pub fn generate(&mut self, record: LabelRecord, quantity: u32) -> bool {
        match LabelBatch::generate(record, quantity) {
            Ok(batch) => {
                let preview = Preview::render(&batch, &self.renderer);
                self.batch = Some(batch);
                self.preview = Some(preview);
                true
            }
            Err(err) => {
                log_cause_chain(&err);
                self.notifier
                    .notify("Invalid quantity", &err.to_string());
                false
            }
        }
    }

    /// Renders the batch to a PDF at `path`.  Returns `true` on success;
    /// failures are notified and logged here, never propagated.
    pub fn export_to(&mut self, path: &Path) -> bool {
        if self.export_busy {
            warn!("export already in progress, ignoring");
            return false;
        }
        self.export_busy = true;
        let result = self.run_export(path);
        self.export_busy = false;

        match result {
            Ok(()) => true,
            Err(err) => {
                log_cause_chain(&err);
                let (title, description) = export_notification(&err);
                self.notifier.notify(title, description);
                false
            }
        }
    }

    /// Builds the print document and opens it on `surface`.  Returns `true`
    /// on success; failures are notified and logged here.
    pub fn print_to(&mut self, surface: &mut dyn PrintSurface) -> bool {
        if self.print_busy {
            warn!("print already in progress, ignoring");
            return false;
        }
        self.print_busy = true;
        let result = self.run_print(surface);
        self.print_busy = false;

        match result {
            Ok(()) => true,
            Err(err) => {
                log_cause_chain(&err);
                let (title, description) = print_notification(&err);
                self.notifier.notify(title, description);
                false
            }
        }
    }

    fn run_export(&self, path: &Path) -> Result<(), StickerError> {
        let batch = self.batch.as_ref().ok_or(StickerError::EmptyBatch)?;
        let preview = self.preview.as_ref().ok_or(StickerError::EmptyBatch)?;
        self.pipeline.export_to_file(batch, preview, path)?;
        Ok(())
    }

    fn run_print(&self, surface: &mut dyn PrintSurface) -> Result<(), StickerError> {
        let batch = self.batch.as_ref().ok_or(StickerError::EmptyBatch)?;
        let preview = self.preview.as_ref().ok_or(StickerError::EmptyBatch)?;
        print::print(batch, preview, surface)
    }
}

fn export_notification(err: &StickerError) -> (&'static str, &'static str) {
    if err.is_empty_batch() {
        (
            "No stickers to download",
            "Please generate some stickers first.",
        )
    } else {
        (
            "PDF Generation Failed",
            "Something went wrong while creating the PDF.",
        )
    }
}

fn print_notification(err: &StickerError) -> (&'static str, &'static str) {
    match err {
        StickerError::EmptyBatch => (
            "No stickers to print",
            "Please generate some stickers first.",
        ),
        StickerError::PopupBlocked(_) => (
            "Could not open print window",
            "Please disable your pop-up blocker and try again.",
        ),
        _ => (
            "Print Failed",
            "Something went wrong while preparing the print page.",
        ),
    }
}

fn log_cause_chain(err: &StickerError) {
    error!("{err}");
    let mut cause = err.source();
    while let Some(inner) = cause {
        error!("  caused by: {inner}");
        cause = inner.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::Code128Renderer;
    use std::io;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Vec<(String, String)>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, title: &str, description: &str) {
            self.messages.push((title.to_owned(), description.to_owned()));
        }
    }

    struct CountingSurface {
        opens: usize,
    }

    impl PrintSurface for CountingSurface {
        fn open(&mut self, _document: &str) -> io::Result<()> {
            self.opens += 1;
            Ok(())
        }
    }

    fn controller() -> PageController<Code128Renderer, RecordingNotifier> {
        PageController::new(Code128Renderer, RecordingNotifier::default())
    }

    #[test]
    fn generate_builds_batch_and_preview() {
        let mut controller = controller();
        assert!(controller.generate(LabelRecord::new("SKU-1", 500.0), 7));

        assert_eq!(controller.batch().unwrap().len(), 7);
        assert_eq!(controller.preview().unwrap().sticker_count(), 7);
        assert!(controller.notifier.messages.is_empty());
    }

    #[test]
    fn out_of_range_quantity_notifies_and_keeps_previous_batch() {
        let mut controller = controller();
        assert!(controller.generate(LabelRecord::new("SKU-1", 500.0), 2));
        assert!(!controller.generate(LabelRecord::new("SKU-2", 900.0), 0));

        assert_eq!(controller.batch().unwrap().len(), 2);
        assert_eq!(controller.notifier.messages.len(), 1);
        assert_eq!(controller.notifier.messages[0].0, "Invalid quantity");
    }

    #[test]
    fn export_without_batch_notifies_download_warning() {
        let mut controller = controller();
        let path = std::env::temp_dir().join("stickerpress-controller-test.pdf");

        assert!(!controller.export_to(&path));
        assert_eq!(
            controller.notifier.messages,
            vec![(
                "No stickers to download".to_owned(),
                "Please generate some stickers first.".to_owned()
            )]
        );
        assert!(!path.exists());
    }

    #[test]
    fn print_without_batch_never_touches_the_surface() {
        let mut controller = controller();
        let mut surface = CountingSurface { opens: 0 };

        assert!(!controller.print_to(&mut surface));
        assert_eq!(surface.opens, 0);
        assert_eq!(controller.notifier.messages[0].0, "No stickers to print");
    }

    #[test]
    fn busy_actions_are_ignored_without_notification() {
        let mut controller = controller();
        assert!(controller.generate(LabelRecord::new("SKU-1", 500.0), 1));
        let mut surface = CountingSurface { opens: 0 };

        controller.print_busy = true;
        assert!(!controller.print_to(&mut surface));
        assert_eq!(surface.opens, 0);

        controller.export_busy = true;
        assert!(!controller.export_to(Path::new("unused.pdf")));

        assert!(controller.notifier.messages.is_empty());
    }

    #[test]
    fn print_opens_surface_once_per_call() {
        let mut controller = controller();
        assert!(controller.generate(LabelRecord::new("SKU-1", 500.0), 3));
        let mut surface = CountingSurface { opens: 0 };

        assert!(controller.print_to(&mut surface));
        assert_eq!(surface.opens, 1);
        assert!(!controller.is_print_busy());
    }
}
