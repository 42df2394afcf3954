//! # labelscan
//!
//! Barcode recognition for still images, tuned for shipping-label photographs.
//! Fans each frame out to several independent decode engines, normalizes their
//! heterogeneous outputs into one result model, and computes bounds-safe
//! annotation overlays for an output image.
//!
//! ## Features
//!
//! - **Multi-engine decoding**: a general multi-symbology decoder, a region-probing
//!   2D-matrix decoder and a dedicated 1D pass, each consulted only for the
//!   symbologies it supports
//! - **Low-resolution recovery**: an enhanced preprocessing profile (upscale,
//!   local-contrast equalization, denoise, unsharp mask, adaptive threshold,
//!   morphological cleanup) with a multi-scale decode sweep
//! - **Color-inversion pass**: white-on-black symbols are retried on a
//!   bit-inverted frame when requested per symbology
//! - **Annotated output**: corner-bracketed boxes, numbered markers, clamped
//!   labels and a summary header rendered onto a copy of the original image
//!
//! ## Quick start
//!
//! ```no_run
//! use labelscan::{
//!     configure_for_shipping_labels, Annotator, BarcodeScanner, FrameImage,
//!     RecognitionContext, ScanProfile, ScanSettings,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = RecognitionContext::new();
//! let mut settings = ScanSettings::new();
//! configure_for_shipping_labels(&mut settings);
//!
//! let mut scanner = BarcodeScanner::new(&context, &settings, ScanProfile::Enhanced)?;
//! context.start_new_frame_sequence();
//!
//! let img = image::open("label.jpg")?;
//! let frame = FrameImage::from_dynamic(&img);
//! let outcome = scanner.process_frame(&frame);
//! for result in &outcome.results {
//!     println!("{}: {}", result.symbology, result.text());
//! }
//!
//! let mut canvas = frame.to_rgb();
//! Annotator::new().render(&mut canvas, scanner.last_outcome());
//! canvas.save("label_overlay.png")?;
//!
//! context.end_frame_sequence();
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Everything is single-threaded and synchronous: `process_frame` runs to
//! completion on the calling thread, and an engine call blocks for up to that
//! engine's own internal limit. For parallel throughput use one context +
//! settings + scanner per worker; frames are never shared between scans.

pub mod context;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod preprocess;
pub mod result;
pub mod scanner;
pub mod settings;
pub mod symbology;

mod detail;
mod engine;

pub use context::RecognitionContext;
pub use error::{ScanError, ScanResult};
pub use frame::FrameImage;
pub use overlay::{plan_overlay, Annotator, ColorClass, OverlayPlan, TextMetrics};
pub use preprocess::ScanProfile;
pub use result::{BarcodeResult, BoundingBox, ScanOutcome, ScanStatus};
pub use scanner::BarcodeScanner;
pub use settings::{configure_for_low_resolution, configure_for_shipping_labels, ScanSettings};
pub use symbology::Symbology;
