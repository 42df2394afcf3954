use proptest::prelude::*;
use test_case::test_case;

use labelscan::{
    plan_overlay, BarcodeResult, BoundingBox, OverlayPlan, Symbology, TextMetrics,
};

const FRAME_W: u32 = 640;
const FRAME_H: u32 = 480;

fn result(sym: Symbology, bounds: BoundingBox, inverted: bool, payload: &str) -> BarcodeResult {
    BarcodeResult {
        payload: payload.as_bytes().to_vec(),
        symbology: sym,
        bounds,
        confidence: 1.0,
        color_inverted: inverted,
        details: None,
    }
}

/// Mirrors `TextMetrics::estimate`: 16 px glyphs at 0.55 advance.
fn estimate_measure(label: &str) -> (i32, i32) {
    ((label.chars().count() as f32 * 16.0 * 0.55).ceil().max(1.0) as i32, 16)
}

fn assert_plan_in_bounds(plan: &OverlayPlan) {
    let (anchor_x, anchor_y) = plan.label_anchor;
    let (tw, th) = estimate_measure(&plan.label);
    assert!(anchor_x >= 0 && anchor_y >= 0, "negative label anchor: {plan:?}");
    assert!(anchor_x + tw <= FRAME_W as i32, "label leaves frame: {plan:?}");
    assert!(anchor_y + th <= FRAME_H as i32, "label leaves frame: {plan:?}");

    if let Some(bg) = plan.label_background {
        assert!(bg.fits_within(FRAME_W, FRAME_H), "clipping background: {plan:?}");
        // The text box sits inside its own background.
        assert!(bg.x <= anchor_x && bg.y <= anchor_y);
        assert!(anchor_x + tw <= bg.x + bg.width);
        assert!(anchor_y + th <= bg.y + bg.height);
    }

    let (cx, cy) = plan.marker_center;
    assert!(cx >= 25 && cy >= 25, "marker too close to origin: {plan:?}");
    assert!(cx <= FRAME_W as i32 - 25 && cy <= FRAME_H as i32 - 25);
}

// Property: any fully-inside-frame box yields a plan whose label geometry
// never goes negative nor exceeds the frame.
proptest! {
    #[test]
    fn proptest_label_geometry_stays_inside_frame(
        x in 0i32..600,
        y in 0i32..440,
        w in 1i32..320,
        h in 1i32..240,
        payload in "[A-Z0-9-]{1,40}",
        inverted in any::<bool>(),
    ) {
        let bounds = BoundingBox::new(x, y, w.min(FRAME_W as i32 - x), h.min(FRAME_H as i32 - y));
        prop_assume!(bounds.is_drawable() && bounds.fits_within(FRAME_W, FRAME_H));

        let r = result(Symbology::Code128, bounds, inverted, &payload);
        let metrics = TextMetrics::estimate();
        let plan = plan_overlay(&r, 1, FRAME_W, FRAME_H, &metrics).unwrap();
        assert_plan_in_bounds(&plan);
    }
}

// Unit cases
//------------------------------------------------------------------------------

#[test_case(BoundingBox::new(0, 0, 0, 50); "zero width")]
#[test_case(BoundingBox::new(0, 0, 50, 0); "zero height")]
#[test_case(BoundingBox::new(-5, 10, 50, 50); "negative origin")]
#[test_case(BoundingBox::new(620, 10, 50, 50); "past right edge")]
#[test_case(BoundingBox::new(10, 460, 50, 50); "past bottom edge")]
fn test_unsafe_boxes_produce_no_plan(bounds: BoundingBox) {
    let r = result(Symbology::QrCode, bounds, false, "data");
    assert!(plan_overlay(&r, 1, FRAME_W, FRAME_H, &TextMetrics::estimate()).is_none());
}

#[test]
fn test_ordinal_is_carried_through() {
    let r = result(Symbology::QrCode, BoundingBox::new(100, 100, 80, 80), false, "data");
    let plan = plan_overlay(&r, 7, FRAME_W, FRAME_H, &TextMetrics::estimate()).unwrap();
    assert_eq!(plan.ordinal, 7);
}

#[test]
fn test_corner_box_keeps_marker_on_margin_grid() {
    let r = result(Symbology::Code128, BoundingBox::new(0, 80, 30, 30), false, "x");
    let plan = plan_overlay(&r, 1, FRAME_W, FRAME_H, &TextMetrics::estimate()).unwrap();
    assert_eq!(plan.marker_center, (25, 60));
}
