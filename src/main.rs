use std::{env, error::Error, process::ExitCode};

use labelscan::{
    configure_for_low_resolution, Annotator, BarcodeScanner, FrameImage, RecognitionContext,
    ScanProfile, ScanSettings, ScanStatus,
};

const OUTPUT_FILE: &str = "scan_overlay.png";
const DEBUG_FILE: &str = "scan_debug.png";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} <image_path>", args.first().map(String::as_str).unwrap_or("labelscan"));
        println!("Barcode scanner for low resolution label images");
        return ExitCode::FAILURE;
    }

    // The single catch point: anything unhandled below maps to exit code 1.
    match run(&args[1]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<(), Box<dyn Error>> {
    println!("=== BARCODE SCANNER FOR LOW RESOLUTION IMAGES ===");
    println!("Processing: {path}");

    let context = RecognitionContext::new();
    let mut settings = ScanSettings::new();
    configure_for_low_resolution(&mut settings);

    let mut scanner = BarcodeScanner::new(&context, &settings, ScanProfile::Enhanced)?;

    let img = image::open(path).map_err(|e| format!("could not read the image {path}: {e}"))?;
    let frame = FrameImage::from_dynamic(&img);

    if !context.start_new_frame_sequence() {
        return Err("could not start frame sequence".into());
    }

    let outcome = scanner.process_frame(&frame).clone();

    let mut canvas = frame.to_rgb();
    Annotator::new().render(&mut canvas, &outcome);

    println!("\n=== SCAN RESULTS ===");
    match outcome.status {
        ScanStatus::Success => {
            println!("Found {} barcode(s):", outcome.results.len());
            for (i, result) in outcome.results.iter().enumerate() {
                println!("\nBarcode {}:", i + 1);
                println!("  Data: {}", result.text());
                println!("  Symbology: {}", result.symbology);
                println!(
                    "  Location: ({},{}) {}x{}",
                    result.bounds.x, result.bounds.y, result.bounds.width, result.bounds.height
                );
                println!("  Color inverted: {}", if result.color_inverted { "yes" } else { "no" });
                println!("  Confidence: {:.1}", result.confidence);
                if let Some(details) = &result.details {
                    println!("  Details: {details}");
                }
            }
            println!(
                "\nSummary: 1D {} | 2D {} | inverted {}",
                outcome.linear_count(),
                outcome.matrix_count(),
                outcome.inverted_count()
            );

            canvas.save(OUTPUT_FILE)?;
            println!("Output image saved: {OUTPUT_FILE}");
        }
        status => {
            // Keep whatever was annotated around for debugging, best effort.
            if canvas.save(DEBUG_FILE).is_ok() {
                println!("Debug image saved: {DEBUG_FILE}");
            }
            match status {
                ScanStatus::NoCodesFound => println!("No barcodes found in the image"),
                ScanStatus::ProcessingError => println!("Processing error occurred"),
                ScanStatus::InvalidImage => println!("Invalid image data"),
                ScanStatus::Success => unreachable!(),
            }
        }
    }

    context.end_frame_sequence();
    println!("\nProcessing completed");
    Ok(())
}
