use std::collections::{HashMap, HashSet};

use rxing::{
    common::HybridBinarizer,
    multi::{GenericMultipleBarcodeReader, MultipleBarcodeReader},
    BarcodeFormat, BinaryBitmap, DecodeHintType, DecodeHintValue, DecodingHintDictionary,
    Luma8LuminanceSource, MultiFormatReader, RXingResult,
};

use super::{DecodeEngine, DecodeRequest, RawHit};
use crate::{result::BoundingBox, symbology::Symbology};

// General multi-symbology engine
//------------------------------------------------------------------------------

/// ZXing-family decoder covering every supported symbology. The symbology
/// filter and the try-harder flag travel in the hint dictionary; rotation
/// tolerance rides on try-harder in this engine's linear readers.
pub(crate) struct GeneralEngine;

impl DecodeEngine for GeneralEngine {
    fn name(&self) -> &'static str {
        "general"
    }

    fn supported(&self) -> &'static [Symbology] {
        &Symbology::ALL
    }

    fn decode(&self, request: &DecodeRequest<'_>) -> Vec<RawHit> {
        let (width, height) = request.image.dimensions();
        let source = Luma8LuminanceSource::new(request.image.as_raw().clone(), width, height);
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));
        let hints = build_hints(request);

        let mut reader = GenericMultipleBarcodeReader::new(MultiFormatReader::default());
        match reader.decode_multiple_with_hints(&mut bitmap, &hints) {
            // The engine caps nothing itself; the result cap is ours.
            Ok(results) => results.iter().take(request.max_codes).map(to_raw_hit).collect(),
            // Not-found and genuine engine faults both collapse to "no hits".
            Err(_) => Vec::new(),
        }
    }
}

pub(crate) fn build_hints(request: &DecodeRequest<'_>) -> DecodingHintDictionary {
    let formats: HashSet<BarcodeFormat> = request.filter.iter().map(|s| to_format(*s)).collect();
    HashMap::from([
        (DecodeHintType::POSSIBLE_FORMATS, DecodeHintValue::PossibleFormats(formats)),
        (DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(request.try_harder)),
    ])
}

pub(crate) fn to_raw_hit(result: &RXingResult) -> RawHit {
    let symbology = from_format(result.getBarcodeFormat());
    RawHit {
        payload: result.getText().as_bytes().to_vec(),
        symbology: symbology.unwrap_or(Symbology::Code128),
        bounds: BoundingBox::from_points(
            result.getRXingResultPoints().iter().map(|p| (p.x, p.y)),
        ),
        // A format outside our symbology set is reported invalid and dropped
        // during normalization.
        valid: symbology.is_some(),
    }
}

fn to_format(sym: Symbology) -> BarcodeFormat {
    match sym {
        Symbology::Code128 => BarcodeFormat::CODE_128,
        Symbology::Code39 => BarcodeFormat::CODE_39,
        Symbology::Code93 => BarcodeFormat::CODE_93,
        Symbology::Ean8 => BarcodeFormat::EAN_8,
        Symbology::Ean13 => BarcodeFormat::EAN_13,
        Symbology::UpcA => BarcodeFormat::UPC_A,
        Symbology::UpcE => BarcodeFormat::UPC_E,
        Symbology::QrCode => BarcodeFormat::QR_CODE,
        Symbology::DataMatrix => BarcodeFormat::DATA_MATRIX,
        Symbology::Pdf417 => BarcodeFormat::PDF_417,
        Symbology::Aztec => BarcodeFormat::AZTEC,
    }
}

fn from_format(format: &BarcodeFormat) -> Option<Symbology> {
    match format {
        BarcodeFormat::CODE_128 => Some(Symbology::Code128),
        BarcodeFormat::CODE_39 => Some(Symbology::Code39),
        BarcodeFormat::CODE_93 => Some(Symbology::Code93),
        BarcodeFormat::EAN_8 => Some(Symbology::Ean8),
        BarcodeFormat::EAN_13 => Some(Symbology::Ean13),
        BarcodeFormat::UPC_A => Some(Symbology::UpcA),
        BarcodeFormat::UPC_E => Some(Symbology::UpcE),
        BarcodeFormat::QR_CODE => Some(Symbology::QrCode),
        BarcodeFormat::DATA_MATRIX => Some(Symbology::DataMatrix),
        BarcodeFormat::PDF_417 => Some(Symbology::Pdf417),
        BarcodeFormat::AZTEC => Some(Symbology::Aztec),
        _ => None,
    }
}

#[cfg(test)]
mod general_tests {
    use super::*;

    #[test]
    fn test_format_mapping_round_trip() {
        for sym in Symbology::ALL {
            assert_eq!(from_format(&to_format(sym)), Some(sym));
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert_eq!(from_format(&BarcodeFormat::MAXICODE), None);
    }
}
