use image::GrayImage;

use crate::{result::BoundingBox, settings::ScanSettings, symbology::Symbology};

pub(crate) mod general;
pub(crate) mod linear;
pub(crate) mod matrix;

pub(crate) use general::GeneralEngine;
pub(crate) use linear::LinearEngine;
pub(crate) use matrix::MatrixEngine;

// Decode capability interface
//------------------------------------------------------------------------------

/// One adapter per external decode engine.
///
/// Engine-specific hint dictionaries, probe caps, time budgets and coordinate
/// conventions stay inside the adapters; the orchestrator only ever sees
/// [`RawHit`]s in working-image coordinates.
pub(crate) trait DecodeEngine {
    fn name(&self) -> &'static str;

    fn supported(&self) -> &'static [Symbology];

    /// Best effort: engine faults are absorbed and yield an empty list, never
    /// an error or a panic.
    fn decode(&self, request: &DecodeRequest<'_>) -> Vec<RawHit>;
}

/// One decode attempt against one working image.
pub(crate) struct DecodeRequest<'a> {
    pub image: &'a GrayImage,
    /// Enabled symbologies already intersected with the engine's supported
    /// set; engines are never invoked with an empty filter.
    pub filter: &'a [Symbology],
    pub try_harder: bool,
    pub max_codes: usize,
}

/// Engine output before normalization. `bounds` is in the working image's
/// coordinate space; None means the engine reported no usable location.
#[derive(Debug, Clone)]
pub(crate) struct RawHit {
    pub payload: Vec<u8>,
    pub symbology: Symbology,
    pub bounds: Option<BoundingBox>,
    pub valid: bool,
}

/// Enabled symbologies this engine can contribute; an empty result means the
/// engine is skipped entirely for the pass.
pub(crate) fn filter_for(engine: &dyn DecodeEngine, settings: &ScanSettings) -> Vec<Symbology> {
    engine.supported().iter().copied().filter(|s| settings.is_symbology_enabled(*s)).collect()
}
