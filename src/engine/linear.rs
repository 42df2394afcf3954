use rxing::{
    common::HybridBinarizer, oned::MultiFormatOneDReader, BinaryBitmap, Luma8LuminanceSource,
    Reader,
};

use super::{general, DecodeEngine, DecodeRequest, RawHit};
use crate::symbology::Symbology;

// Dedicated 1D engine
//------------------------------------------------------------------------------

/// Focused linear-symbol pass used by the enhanced profile. Yields at most
/// one hit per call; broad multi-hit coverage stays with the general engine.
pub(crate) struct LinearEngine;

static SUPPORTED: [Symbology; 7] = [
    Symbology::Code128,
    Symbology::Code39,
    Symbology::Code93,
    Symbology::Ean8,
    Symbology::Ean13,
    Symbology::UpcA,
    Symbology::UpcE,
];

impl DecodeEngine for LinearEngine {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn supported(&self) -> &'static [Symbology] {
        &SUPPORTED
    }

    fn decode(&self, request: &DecodeRequest<'_>) -> Vec<RawHit> {
        let (width, height) = request.image.dimensions();
        let source = Luma8LuminanceSource::new(request.image.as_raw().clone(), width, height);
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));
        let hints = general::build_hints(request);

        let mut reader = MultiFormatOneDReader::new(&hints);
        match reader.decode_with_hints(&mut bitmap, &hints) {
            Ok(result) => vec![general::to_raw_hit(&result)],
            Err(_) => Vec::new(),
        }
    }
}
