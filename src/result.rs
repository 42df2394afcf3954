use std::borrow::Cow;

use crate::symbology::Symbology;

// Bounding box
//------------------------------------------------------------------------------

/// Axis-aligned box in original-image pixel space.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Fallback rectangle covering the whole frame.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width: width as i32, height: height as i32 }
    }

    /// Bounding rectangle of a location polygon.
    ///
    /// None when the polygon is missing or folds to a degenerate rectangle
    /// (e.g. the two collinear endpoints a linear reader reports); callers
    /// substitute the full-frame fallback in that case.
    pub fn from_points<I: IntoIterator<Item = (f32, f32)>>(points: I) -> Option<Self> {
        let mut count = 0usize;
        let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for (x, y) in points {
            count += 1;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if count < 2 {
            return None;
        }
        let folded = Self {
            x: min_x.floor() as i32,
            y: min_y.floor() as i32,
            width: (max_x - min_x).ceil() as i32,
            height: (max_y - min_y).ceil() as i32,
        };
        folded.is_drawable().then_some(folded)
    }

    /// Maps a box from a rescaled working image back into original-image
    /// space by dividing through the effective scale factor.
    pub fn descale(self, factor: f64) -> Self {
        if (factor - 1.0).abs() < f64::EPSILON {
            return self;
        }
        Self {
            x: (f64::from(self.x) / factor).round() as i32,
            y: (f64::from(self.y) / factor).round() as i32,
            width: (f64::from(self.width) / factor).round() as i32,
            height: (f64::from(self.height) / factor).round() as i32,
        }
    }

    #[inline]
    pub const fn is_drawable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// True when the box lies entirely inside a `frame_w` x `frame_h` image.
    pub fn fits_within(&self, frame_w: u32, frame_h: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + self.width <= frame_w as i32
            && self.y + self.height <= frame_h as i32
    }
}

// Payload text
//------------------------------------------------------------------------------

/// Decodes payload bytes for display; malformed sequences are replaced, never
/// dropped, so every payload has a printable form.
pub(crate) fn payload_text(payload: &[u8]) -> Cow<'_, str> {
    let (text, _, _) = encoding_rs::UTF_8.decode(payload);
    text
}

// Barcode result
//------------------------------------------------------------------------------

/// One decoded symbol, normalized to original-image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeResult {
    pub payload: Vec<u8>,
    pub symbology: Symbology,
    pub bounds: BoundingBox,
    /// The engines used here always report 1.0; kept for the result shape,
    /// not a probabilistic signal.
    pub confidence: f64,
    pub color_inverted: bool,
    /// Informational per-symbology notes (check digit, content class).
    pub details: Option<String>,
}

impl BarcodeResult {
    pub fn text(&self) -> Cow<'_, str> {
        payload_text(&self.payload)
    }
}

// Scan outcome
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ScanStatus {
    Success,
    NoCodesFound,
    ProcessingError,
    InvalidImage,
}

/// Status plus the ordered result list of the most recent scan. Owned by the
/// scanner and replaced wholesale at the start of each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub status: ScanStatus,
    pub results: Vec<BarcodeResult>,
}

impl ScanOutcome {
    pub(crate) fn empty(status: ScanStatus) -> Self {
        Self { status, results: Vec::new() }
    }

    pub fn linear_count(&self) -> usize {
        self.results.iter().filter(|r| !r.symbology.is_matrix()).count()
    }

    pub fn matrix_count(&self) -> usize {
        self.results.iter().filter(|r| r.symbology.is_matrix()).count()
    }

    pub fn inverted_count(&self) -> usize {
        self.results.iter().filter(|r| r.color_inverted).count()
    }
}
