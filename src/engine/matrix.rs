use std::time::{Duration, Instant};

use super::{DecodeEngine, DecodeRequest, RawHit};
use crate::{result::BoundingBox, symbology::Symbology};

// 2D-matrix region engine
//------------------------------------------------------------------------------

/// Region-probing matrix decoder.
///
/// Probes at most `max_codes` candidate regions and stops once the wall-clock
/// budget runs out. Both limits are hard: a region that fails to decode is
/// skipped, never retried.
pub(crate) struct MatrixEngine {
    budget: Duration,
}

impl MatrixEngine {
    pub(crate) fn new() -> Self {
        Self { budget: Duration::from_secs(2) }
    }
}

static SUPPORTED: [Symbology; 1] = [Symbology::QrCode];

impl DecodeEngine for MatrixEngine {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn supported(&self) -> &'static [Symbology] {
        &SUPPORTED
    }

    fn decode(&self, request: &DecodeRequest<'_>) -> Vec<RawHit> {
        let deadline = Instant::now() + self.budget;
        let mut prepared = rqrr::PreparedImage::prepare(request.image.clone());
        let grids = prepared.detect_grids();

        let mut hits = Vec::new();
        for grid in grids.iter().take(request.max_codes) {
            if Instant::now() >= deadline {
                break;
            }
            let Ok((_, content)) = grid.decode() else { continue };
            let bounds =
                BoundingBox::from_points(grid.bounds.iter().map(|p| (p.x as f32, p.y as f32)));
            hits.push(RawHit {
                payload: content.into_bytes(),
                symbology: Symbology::QrCode,
                bounds,
                valid: true,
            });
        }
        hits
    }
}
