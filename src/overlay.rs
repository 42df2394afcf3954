use ab_glyph::{Font, FontVec, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{
        draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
        draw_line_segment_mut, draw_text_mut,
    },
    rect::Rect,
};

use crate::result::{BarcodeResult, BoundingBox, ScanOutcome};

// Palette and layout constants
//------------------------------------------------------------------------------

const LINEAR_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
const MATRIX_COLOR: Rgb<u8> = Rgb([255, 140, 0]);
const INVERTED_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MARKER_RING_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const HEADER_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

const OUTLINE_THICKNESS: i32 = 3;
const CORNER_LEN: f32 = 15.0;
const BRACKET_THICKNESS: i32 = 3;
const LABEL_MARGIN: i32 = 10;
const LABEL_PADDING: i32 = 5;
const MARKER_RADIUS: i32 = 20;
const MARKER_MARGIN: i32 = 25;
const HEADER_HEIGHT: u32 = 80;
const FONT_SCALE: f32 = 16.0;

// Labels longer than LABEL_LIMIT keep LABEL_KEEP chars plus an ellipsis.
const LABEL_LIMIT: usize = 30;
const LABEL_KEEP: usize = 27;

// Color class
//------------------------------------------------------------------------------

/// Three visually distinct annotation categories; inversion overrides the
/// 1D/2D split.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ColorClass {
    Linear,
    Matrix,
    Inverted,
}

impl ColorClass {
    pub fn of(result: &BarcodeResult) -> Self {
        if result.color_inverted {
            Self::Inverted
        } else if result.symbology.is_matrix() {
            Self::Matrix
        } else {
            Self::Linear
        }
    }

    fn rgb(self) -> Rgb<u8> {
        match self {
            Self::Linear => LINEAR_COLOR,
            Self::Matrix => MATRIX_COLOR,
            Self::Inverted => INVERTED_COLOR,
        }
    }
}

// Text metrics
//------------------------------------------------------------------------------

/// Label measurement used by the layout planner: font-backed when a font is
/// loaded, a fixed per-character estimate otherwise, so plans stay
/// deterministic without one.
pub struct TextMetrics<'a> {
    font: Option<&'a FontVec>,
    scale: f32,
}

impl<'a> TextMetrics<'a> {
    pub fn estimate() -> Self {
        Self { font: None, scale: FONT_SCALE }
    }

    pub fn with_font(font: &'a FontVec) -> Self {
        Self { font: Some(font), scale: FONT_SCALE }
    }

    pub(crate) fn measure(&self, text: &str) -> (i32, i32) {
        let height = self.scale.ceil() as i32;
        let width = match self.font {
            Some(font) => {
                let scaled = font.as_scaled(self.scale);
                text.chars().map(|c| scaled.h_advance(scaled.scaled_glyph(c).id)).sum::<f32>()
            }
            None => text.chars().count() as f32 * self.scale * 0.55,
        };
        (width.ceil().max(1.0) as i32, height)
    }
}

// Overlay plan
//------------------------------------------------------------------------------

/// Fully resolved geometry for one annotation. Every coordinate is already
/// clamped into the frame; rendering iterates plans without further checks.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    pub color: ColorClass,
    pub outline: BoundingBox,
    pub label: String,
    /// Top-left corner of the label text box.
    pub label_anchor: (i32, i32),
    /// Absent when the padded background rectangle would clip the frame.
    pub label_background: Option<BoundingBox>,
    pub marker_center: (i32, i32),
    pub ordinal: usize,
}

/// Computes the annotation layout for one result.
///
/// Returns None when the box is non-drawable (zero area) or not entirely
/// inside the frame; such results are skipped by the renderer but stay in the
/// outcome's result list.
pub fn plan_overlay(
    result: &BarcodeResult,
    ordinal: usize,
    frame_w: u32,
    frame_h: u32,
    metrics: &TextMetrics<'_>,
) -> Option<OverlayPlan> {
    let b = result.bounds;
    if !b.is_drawable() || !b.fits_within(frame_w, frame_h) {
        return None;
    }

    let label = label_text(result);
    let (text_w, text_h) = metrics.measure(&label);
    let (w, h) = (frame_w as i32, frame_h as i32);

    // Above the box when there is headroom, below it otherwise; then clamp
    // the text box fully into the frame.
    let anchor_y = if b.y >= text_h + LABEL_MARGIN {
        b.y - LABEL_MARGIN - text_h
    } else {
        b.y + b.height + LABEL_MARGIN
    };
    let anchor_x = b.x.clamp(0, (w - text_w).max(0));
    let anchor_y = anchor_y.clamp(0, (h - text_h).max(0));

    // Background only when the padded rectangle sits entirely inside the
    // frame; no partial fills.
    let background = BoundingBox::new(
        anchor_x - LABEL_PADDING,
        anchor_y - LABEL_PADDING,
        text_w + 2 * LABEL_PADDING,
        text_h + 2 * LABEL_PADDING,
    );
    let label_background = background.fits_within(frame_w, frame_h).then_some(background);

    let marker_center = (
        (b.x - MARKER_RADIUS).clamp(MARKER_MARGIN, (w - MARKER_MARGIN).max(MARKER_MARGIN)),
        (b.y - MARKER_RADIUS).clamp(MARKER_MARGIN, (h - MARKER_MARGIN).max(MARKER_MARGIN)),
    );

    Some(OverlayPlan {
        color: ColorClass::of(result),
        outline: b,
        label,
        label_anchor: (anchor_x, anchor_y),
        label_background,
        marker_center,
        ordinal,
    })
}

fn label_text(result: &BarcodeResult) -> String {
    let class = if result.symbology.is_matrix() { "2D" } else { "1D" };
    let inv = if result.color_inverted { ",INV" } else { "" };
    truncate_label(format!("{class}{inv} {}: {}", result.symbology, result.text()))
}

fn truncate_label(full: String) -> String {
    if full.chars().count() <= LABEL_LIMIT {
        return full;
    }
    let mut kept: String = full.chars().take(LABEL_KEEP).collect();
    kept.push_str("...");
    kept
}

// Annotator
//------------------------------------------------------------------------------

/// Renders overlay plans onto an RGB copy of the original frame.
///
/// The font is optional: label and header text are skipped without one, while
/// boxes, brackets, blends and markers are always drawn.
pub struct Annotator {
    font: Option<FontVec>,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    /// Probes common system font locations for label rendering.
    pub fn new() -> Self {
        Self { font: load_system_font() }
    }

    pub fn with_font(font: Option<FontVec>) -> Self {
        Self { font }
    }

    pub fn metrics(&self) -> TextMetrics<'_> {
        match &self.font {
            Some(font) => TextMetrics::with_font(font),
            None => TextMetrics::estimate(),
        }
    }

    /// Draws annotations for every drawable result plus the header band.
    /// A result without a safe layout is skipped, never an error.
    pub fn render(&self, canvas: &mut RgbImage, outcome: &ScanOutcome) {
        println!("Drawing overlays for {} result(s)...", outcome.results.len());
        let (w, h) = canvas.dimensions();
        let metrics = self.metrics();

        for (i, result) in outcome.results.iter().enumerate() {
            match plan_overlay(result, i + 1, w, h, &metrics) {
                Some(plan) => self.draw_plan(canvas, &plan),
                None => println!("Skipping overlay for result {} (unsafe geometry)", i + 1),
            }
        }

        self.draw_header(canvas, outcome);
    }

    fn draw_plan(&self, canvas: &mut RgbImage, plan: &OverlayPlan) {
        let color = plan.color.rgb();
        let b = plan.outline;
        let (w, h) = canvas.dimensions();

        // Outline, thickened inwards so it cannot leave the frame.
        for t in 0..OUTLINE_THICKNESS {
            let shrunk = BoundingBox::new(b.x + t, b.y + t, b.width - 2 * t, b.height - 2 * t);
            if shrunk.is_drawable() {
                let rect = Rect::at(shrunk.x, shrunk.y)
                    .of_size(shrunk.width as u32, shrunk.height as u32);
                draw_hollow_rect_mut(canvas, rect, color);
            }
        }

        self.draw_corner_brackets(canvas, b, color);

        if let Some(bg) = plan.label_background {
            blend_rect(canvas, bg, color, 0.3);
        }
        if let Some(font) = &self.font {
            draw_text_mut(
                canvas,
                TEXT_COLOR,
                plan.label_anchor.0,
                plan.label_anchor.1,
                FONT_SCALE,
                font,
                &plan.label,
            );
        }

        draw_filled_circle_mut(canvas, plan.marker_center, MARKER_RADIUS, color);
        draw_hollow_circle_mut(canvas, plan.marker_center, MARKER_RADIUS, MARKER_RING_COLOR);
        if let Some(font) = &self.font {
            let ordinal = plan.ordinal.to_string();
            let (tw, th) = self.metrics().measure(&ordinal);
            let x = (plan.marker_center.0 - tw / 2).clamp(0, (w as i32 - tw).max(0));
            let y = (plan.marker_center.1 - th / 2).clamp(0, (h as i32 - th).max(0));
            draw_text_mut(canvas, MARKER_RING_COLOR, x, y, FONT_SCALE, font, &ordinal);
        }
    }

    /// Four 15px L-shaped brackets, thickened towards the box interior.
    fn draw_corner_brackets(&self, canvas: &mut RgbImage, b: BoundingBox, color: Rgb<u8>) {
        let (left, top) = (b.x as f32, b.y as f32);
        let (right, bottom) = ((b.x + b.width - 1) as f32, (b.y + b.height - 1) as f32);

        for t in 0..BRACKET_THICKNESS {
            let (l, r) = (left + t as f32, right - t as f32);
            let (tp, bt) = (top + t as f32, bottom - t as f32);

            draw_line_segment_mut(canvas, (l, tp), (l + CORNER_LEN, tp), color);
            draw_line_segment_mut(canvas, (l, tp), (l, tp + CORNER_LEN), color);

            draw_line_segment_mut(canvas, (r, tp), (r - CORNER_LEN, tp), color);
            draw_line_segment_mut(canvas, (r, tp), (r, tp + CORNER_LEN), color);

            draw_line_segment_mut(canvas, (l, bt), (l + CORNER_LEN, bt), color);
            draw_line_segment_mut(canvas, (l, bt), (l, bt - CORNER_LEN), color);

            draw_line_segment_mut(canvas, (r, bt), (r - CORNER_LEN, bt), color);
            draw_line_segment_mut(canvas, (r, bt), (r, bt - CORNER_LEN), color);
        }
    }

    /// Fixed-height summary band across the top of the frame.
    fn draw_header(&self, canvas: &mut RgbImage, outcome: &ScanOutcome) {
        let (w, h) = canvas.dimensions();
        let band = BoundingBox::new(0, 0, w as i32, HEADER_HEIGHT.min(h) as i32);
        if !band.is_drawable() {
            return;
        }
        blend_rect(canvas, band, HEADER_COLOR, 0.7);

        if let Some(font) = &self.font {
            let summary = format!("Found: {} codes", outcome.results.len());
            let details = format!(
                "1D: {} | 2D: {} | Inverted: {}",
                outcome.linear_count(),
                outcome.matrix_count(),
                outcome.inverted_count()
            );
            draw_text_mut(canvas, TEXT_COLOR, 10, 12, FONT_SCALE * 1.2, font, &summary);
            draw_text_mut(canvas, Rgb([200, 200, 200]), 10, 45, FONT_SCALE, font, &details);
        }
    }
}

/// Blends `color` over the rectangle: `out = (1 - alpha) * base + alpha * color`.
/// Coordinates are clamped to the canvas.
fn blend_rect(canvas: &mut RgbImage, rect: BoundingBox, color: Rgb<u8>, alpha: f32) {
    let (w, h) = canvas.dimensions();
    let x0 = rect.x.clamp(0, w as i32) as u32;
    let y0 = rect.y.clamp(0, h as i32) as u32;
    let x1 = (rect.x + rect.width).clamp(0, w as i32) as u32;
    let y1 = (rect.y + rect.height).clamp(0, h as i32) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let px = canvas.get_pixel_mut(x, y);
            for (channel, overlay) in px.0.iter_mut().zip(color.0) {
                *channel = ((1.0 - alpha) * *channel as f32 + alpha * overlay as f32)
                    .round()
                    .clamp(0.0, 255.0) as u8;
            }
        }
    }
}

fn load_system_font() -> Option<FontVec> {
    const FONT_PATHS: [&str; 3] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in FONT_PATHS {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                return Some(font);
            }
        }
    }
    println!("No system font found, overlay text will be skipped");
    None
}
