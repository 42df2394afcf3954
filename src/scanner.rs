use image::GrayImage;

use crate::{
    context::RecognitionContext,
    detail,
    engine::{self, DecodeEngine, DecodeRequest, GeneralEngine, LinearEngine, MatrixEngine, RawHit},
    error::{ScanError, ScanResult},
    frame::FrameImage,
    preprocess::{self, ScanProfile},
    result::{payload_text, BarcodeResult, BoundingBox, ScanOutcome, ScanStatus},
    settings::ScanSettings,
};

// Barcode scanner
//------------------------------------------------------------------------------

/// Orchestrates preprocessing, the decode engines and result aggregation for
/// single frames.
///
/// Context and settings are caller-owned and must outlive the scanner; the
/// outcome of the most recent scan is owned by the scanner until the next
/// [`process_frame`] call overwrites it.
///
/// [`process_frame`]: BarcodeScanner::process_frame
pub struct BarcodeScanner<'a> {
    context: &'a RecognitionContext,
    settings: &'a ScanSettings,
    profile: ScanProfile,
    general: GeneralEngine,
    matrix: MatrixEngine,
    linear: LinearEngine,
    last_outcome: ScanOutcome,
}

impl<'a> BarcodeScanner<'a> {
    pub fn new(
        context: &'a RecognitionContext,
        settings: &'a ScanSettings,
        profile: ScanProfile,
    ) -> ScanResult<Self> {
        if !context.is_initialized() {
            return Err(ScanError::ContextNotInitialized);
        }
        println!("Barcode scanner created");
        Ok(Self {
            context,
            settings,
            profile,
            general: GeneralEngine,
            matrix: MatrixEngine::new(),
            linear: LinearEngine,
            last_outcome: ScanOutcome::empty(ScanStatus::NoCodesFound),
        })
    }

    #[inline]
    pub fn profile(&self) -> ScanProfile {
        self.profile
    }

    #[inline]
    pub fn last_outcome(&self) -> &ScanOutcome {
        &self.last_outcome
    }

    /// Scans one frame and replaces the previous outcome.
    ///
    /// Preconditions in order: the frame sequence must be started
    /// (`ProcessingError` otherwise), then the image must be non-empty
    /// (`InvalidImage` otherwise). Engine faults never abort the scan; an
    /// empty merged result list is the valid `NoCodesFound` outcome.
    pub fn process_frame(&mut self, frame: &FrameImage) -> &ScanOutcome {
        if !self.context.is_frame_sequence_started() {
            println!("Error: frame sequence not started");
            self.last_outcome = ScanOutcome::empty(ScanStatus::ProcessingError);
            return &self.last_outcome;
        }
        if frame.is_empty() {
            println!("Error: invalid image data");
            self.last_outcome = ScanOutcome::empty(ScanStatus::InvalidImage);
            return &self.last_outcome;
        }

        println!(
            "Processing frame: {}x{} ({} channels)",
            frame.width(),
            frame.height(),
            frame.channels()
        );

        // The previous scan's results are discarded before the new scan runs.
        self.last_outcome = ScanOutcome::empty(ScanStatus::NoCodesFound);

        let gray = frame.to_gray();
        let mut results = self.scan_pass(&gray, false);

        // Normal-pass results first, inverted-pass results second; a symbol
        // decodable in both passes is reported twice.
        if self.settings.any_color_inversion() {
            println!("Scanning inverted frame...");
            let inverted = preprocess::invert(&gray);
            results.extend(self.scan_pass(&inverted, true));
        }

        println!("Scanning completed, found {} barcode(s)", results.len());
        let status = if results.is_empty() { ScanStatus::NoCodesFound } else { ScanStatus::Success };
        self.last_outcome = ScanOutcome { status, results };
        &self.last_outcome
    }

    /// One full engine sweep over a single (normal or inverted) frame.
    fn scan_pass(&self, gray: &GrayImage, inverted: bool) -> Vec<BarcodeResult> {
        let frame_bounds = BoundingBox::full_frame(gray.width(), gray.height());
        let mut results = Vec::new();

        // The general engine sweeps the preprocessed working image across the
        // profile's scale ladder; hits are not deduplicated across scales.
        let filter = engine::filter_for(&self.general, self.settings);
        if !filter.is_empty() {
            println!("Preparing working image...");
            let (working, applied) = preprocess::run(self.profile, gray);
            for &ladder in self.profile.scale_ladder() {
                let scaled = preprocess::rescale(&working, ladder);
                let hits = self.general.decode(&DecodeRequest {
                    image: &scaled,
                    filter: &filter,
                    try_harder: self.settings.try_harder(),
                    max_codes: self.settings.max_codes_per_frame(),
                });
                println!(
                    "General decoder: {} hit(s) at scale {:.1}",
                    hits.len(),
                    applied * ladder
                );
                self.collect(&mut results, hits, applied * ladder, frame_bounds, inverted);
            }
        }

        // The matrix engine probes the unprocessed grayscale frame.
        let filter = engine::filter_for(&self.matrix, self.settings);
        if !filter.is_empty() {
            let hits = self.matrix.decode(&DecodeRequest {
                image: gray,
                filter: &filter,
                try_harder: self.settings.try_harder(),
                max_codes: self.settings.max_codes_per_frame(),
            });
            println!("Matrix decoder: {} hit(s)", hits.len());
            self.collect(&mut results, hits, 1.0, frame_bounds, inverted);
        }

        // Dedicated linear pass, enhanced profile only.
        if self.profile == ScanProfile::Enhanced {
            let filter = engine::filter_for(&self.linear, self.settings);
            if !filter.is_empty() {
                let hits = self.linear.decode(&DecodeRequest {
                    image: gray,
                    filter: &filter,
                    try_harder: self.settings.try_harder(),
                    max_codes: self.settings.max_codes_per_frame(),
                });
                println!("Linear decoder: {} hit(s)", hits.len());
                self.collect(&mut results, hits, 1.0, frame_bounds, inverted);
            }
        }

        results
    }

    /// Normalizes raw hits into original-image coordinates and appends them
    /// to the pass results.
    fn collect(
        &self,
        results: &mut Vec<BarcodeResult>,
        hits: Vec<RawHit>,
        scale: f64,
        frame_bounds: BoundingBox,
        inverted: bool,
    ) {
        for hit in hits {
            if !hit.valid || hit.payload.is_empty() {
                continue;
            }
            let bounds = match hit.bounds {
                Some(b) => b.descale(scale),
                // Engines that cannot locate a symbol fall back to the whole
                // frame, which is already in original coordinates.
                None => frame_bounds,
            };
            let details = detail::describe(hit.symbology, &payload_text(&hit.payload));
            results.push(BarcodeResult {
                payload: hit.payload,
                symbology: hit.symbology,
                bounds,
                confidence: 1.0,
                color_inverted: inverted,
                details,
            });
        }
    }
}

#[cfg(test)]
mod scanner_tests {
    use super::*;
    use crate::symbology::Symbology;

    fn scanner_fixture<'a>(
        context: &'a RecognitionContext,
        settings: &'a ScanSettings,
    ) -> BarcodeScanner<'a> {
        BarcodeScanner::new(context, settings, ScanProfile::Baseline).unwrap()
    }

    fn hit(payload: &[u8], bounds: Option<BoundingBox>, valid: bool) -> RawHit {
        RawHit { payload: payload.to_vec(), symbology: Symbology::Code128, bounds, valid }
    }

    #[test]
    fn test_collect_descales_and_substitutes_full_frame() {
        let context = RecognitionContext::new();
        let settings = ScanSettings::new();
        let scanner = scanner_fixture(&context, &settings);

        let frame_bounds = BoundingBox::new(0, 0, 100, 80);
        let mut results = Vec::new();
        scanner.collect(
            &mut results,
            vec![
                hit(b"located", Some(BoundingBox::new(20, 20, 40, 40)), true),
                hit(b"unlocated", None, true),
            ],
            2.0,
            frame_bounds,
            false,
        );

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].bounds, BoundingBox::new(10, 10, 20, 20));
        // The full-frame fallback is not descaled.
        assert_eq!(results[1].bounds, frame_bounds);
    }

    #[test]
    fn test_collect_drops_empty_and_invalid_hits() {
        let context = RecognitionContext::new();
        let settings = ScanSettings::new();
        let scanner = scanner_fixture(&context, &settings);

        let mut results = Vec::new();
        scanner.collect(
            &mut results,
            vec![
                hit(b"", Some(BoundingBox::new(0, 0, 5, 5)), true),
                hit(b"bad", Some(BoundingBox::new(0, 0, 5, 5)), false),
                hit(b"ok", Some(BoundingBox::new(0, 0, 5, 5)), true),
            ],
            1.0,
            BoundingBox::new(0, 0, 10, 10),
            false,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text(), "ok");
    }

    #[test]
    fn test_collect_keeps_cross_pass_duplicates_in_order() {
        let context = RecognitionContext::new();
        let settings = ScanSettings::new();
        let scanner = scanner_fixture(&context, &settings);

        let frame_bounds = BoundingBox::new(0, 0, 10, 10);
        let mut results = Vec::new();
        scanner.collect(&mut results, vec![hit(b"same", None, true)], 1.0, frame_bounds, false);
        scanner.collect(&mut results, vec![hit(b"same", None, true)], 1.0, frame_bounds, true);

        // One physical symbol decodable in both passes stays two results:
        // normal first, inverted second.
        assert_eq!(results.len(), 2);
        assert!(!results[0].color_inverted);
        assert!(results[1].color_inverted);
    }

    #[test]
    fn test_process_frame_requires_started_sequence() {
        let context = RecognitionContext::new();
        let settings = ScanSettings::new();
        let mut scanner = scanner_fixture(&context, &settings);

        let frame = FrameImage::new(2, 2, 1, vec![255; 4]).unwrap();
        assert_eq!(scanner.process_frame(&frame).status, ScanStatus::ProcessingError);
    }

    #[test]
    fn test_session_check_precedes_image_check() {
        let context = RecognitionContext::new();
        let settings = ScanSettings::new();
        let mut scanner = scanner_fixture(&context, &settings);

        // Both preconditions are violated; the session check wins.
        let empty = FrameImage::new(0, 0, 1, Vec::new()).unwrap();
        assert_eq!(scanner.process_frame(&empty).status, ScanStatus::ProcessingError);

        context.start_new_frame_sequence();
        assert_eq!(scanner.process_frame(&empty).status, ScanStatus::InvalidImage);
    }

    #[test]
    fn test_blank_frame_finds_nothing() {
        let context = RecognitionContext::new();
        let mut settings = ScanSettings::new();
        settings.set_symbology_enabled(Symbology::Code128, true);
        context.start_new_frame_sequence();

        let mut scanner = scanner_fixture(&context, &settings);
        let frame = FrameImage::new(64, 64, 1, vec![255; 64 * 64]).unwrap();
        let outcome = scanner.process_frame(&frame);
        assert_eq!(outcome.status, ScanStatus::NoCodesFound);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_outcome_is_replaced_per_frame() {
        let context = RecognitionContext::new();
        let settings = ScanSettings::new();
        let mut scanner = scanner_fixture(&context, &settings);

        let frame = FrameImage::new(2, 2, 1, vec![255; 4]).unwrap();
        assert_eq!(scanner.process_frame(&frame).status, ScanStatus::ProcessingError);

        context.start_new_frame_sequence();
        assert_eq!(scanner.process_frame(&frame).status, ScanStatus::NoCodesFound);
        assert_eq!(scanner.last_outcome().status, ScanStatus::NoCodesFound);
    }
}
