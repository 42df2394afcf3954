use crate::symbology::Symbology;

// Scan settings
//------------------------------------------------------------------------------

/// Caller-owned scanner configuration.
///
/// Per-symbology flags live in fixed arrays indexed by [`Symbology`], so every
/// known symbology always has an explicit entry; there is no "missing key"
/// state. The caller mutates settings between scans and keeps them untouched
/// while a frame is being processed.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    enabled: [bool; Symbology::COUNT],
    color_inverted: [bool; Symbology::COUNT],
    max_codes_per_frame: usize,
    search_whole_image: bool,
    try_harder: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSettings {
    /// All symbologies start disabled; one code per frame.
    pub fn new() -> Self {
        Self {
            enabled: [false; Symbology::COUNT],
            color_inverted: [false; Symbology::COUNT],
            max_codes_per_frame: 1,
            search_whole_image: false,
            try_harder: false,
        }
    }

    pub fn set_symbology_enabled(&mut self, sym: Symbology, enabled: bool) {
        self.enabled[sym.index()] = enabled;
    }

    /// Requests a second, bit-inverted decode pass for `sym`.
    pub fn set_color_inverted(&mut self, sym: Symbology, inverted: bool) {
        self.color_inverted[sym.index()] = inverted;
    }

    pub fn set_max_codes_per_frame(&mut self, max_codes: usize) {
        assert!(max_codes >= 1, "max codes per frame must be at least 1");
        self.max_codes_per_frame = max_codes;
    }

    pub fn set_search_whole_image(&mut self, search: bool) {
        self.search_whole_image = search;
    }

    pub fn set_try_harder(&mut self, try_harder: bool) {
        self.try_harder = try_harder;
    }

    #[inline]
    pub fn is_symbology_enabled(&self, sym: Symbology) -> bool {
        self.enabled[sym.index()]
    }

    #[inline]
    pub fn is_color_inverted(&self, sym: Symbology) -> bool {
        self.color_inverted[sym.index()]
    }

    #[inline]
    pub fn max_codes_per_frame(&self) -> usize {
        self.max_codes_per_frame
    }

    /// Advisory: engines that support windowed scans may restrict their search
    /// area when this is off.
    #[inline]
    pub fn search_whole_image(&self) -> bool {
        self.search_whole_image
    }

    #[inline]
    pub fn try_harder(&self) -> bool {
        self.try_harder
    }

    pub fn enabled_symbologies(&self) -> Vec<Symbology> {
        Symbology::ALL.iter().copied().filter(|s| self.is_symbology_enabled(*s)).collect()
    }

    /// True when at least one *enabled* symbology requests color inversion;
    /// gates the whole inverted decode pass.
    pub fn any_color_inversion(&self) -> bool {
        Symbology::ALL
            .iter()
            .any(|s| self.is_symbology_enabled(*s) && self.is_color_inverted(*s))
    }
}

// Presets
//------------------------------------------------------------------------------
// Convenience setter sequences, not separate configuration paths.

/// Symbologies commonly found on shipping labels, with inversion retries for
/// the two that print white-on-black on some carriers.
pub fn configure_for_shipping_labels(settings: &mut ScanSettings) {
    println!("Configuring scanner for shipping labels...");

    settings.set_symbology_enabled(Symbology::Code128, true);
    settings.set_symbology_enabled(Symbology::Code39, true);
    settings.set_symbology_enabled(Symbology::Ean13, true);
    settings.set_symbology_enabled(Symbology::Ean8, true);
    settings.set_symbology_enabled(Symbology::DataMatrix, true);
    settings.set_symbology_enabled(Symbology::QrCode, true);

    settings.set_color_inverted(Symbology::Code128, true);
    settings.set_color_inverted(Symbology::Ean13, true);

    settings.set_max_codes_per_frame(10);
    settings.set_search_whole_image(true);
    settings.set_try_harder(true);
}

/// Maximum-recall preset for low-resolution input: every common symbology,
/// inversion everywhere, generous result cap.
pub fn configure_for_low_resolution(settings: &mut ScanSettings) {
    println!("Configuring scanner for low resolution input...");

    for sym in [
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::DataMatrix,
        Symbology::QrCode,
    ] {
        settings.set_symbology_enabled(sym, true);
        settings.set_color_inverted(sym, true);
    }

    settings.set_max_codes_per_frame(20);
    settings.set_search_whole_image(true);
    settings.set_try_harder(true);
}

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ScanSettings::new();
        for sym in Symbology::ALL {
            assert!(!settings.is_symbology_enabled(sym));
            assert!(!settings.is_color_inverted(sym));
        }
        assert_eq!(settings.max_codes_per_frame(), 1);
        assert!(!settings.search_whole_image());
        assert!(!settings.try_harder());
    }

    #[test]
    fn test_setters_round_trip() {
        let mut settings = ScanSettings::new();
        settings.set_symbology_enabled(Symbology::QrCode, true);
        settings.set_color_inverted(Symbology::Code128, true);
        settings.set_max_codes_per_frame(5);
        settings.set_search_whole_image(true);
        settings.set_try_harder(true);

        assert!(settings.is_symbology_enabled(Symbology::QrCode));
        assert!(!settings.is_symbology_enabled(Symbology::Code128));
        assert!(settings.is_color_inverted(Symbology::Code128));
        assert_eq!(settings.max_codes_per_frame(), 5);
        assert!(settings.search_whole_image());
        assert!(settings.try_harder());
    }

    #[test]
    #[should_panic(expected = "max codes per frame")]
    fn test_zero_max_codes_rejected() {
        ScanSettings::new().set_max_codes_per_frame(0);
    }

    #[test]
    fn test_inversion_gate_requires_enabled_symbology() {
        let mut settings = ScanSettings::new();
        settings.set_color_inverted(Symbology::Code128, true);
        // Requested but not enabled: the inverted pass must not run.
        assert!(!settings.any_color_inversion());

        settings.set_symbology_enabled(Symbology::Code128, true);
        assert!(settings.any_color_inversion());
    }

    #[test]
    fn test_shipping_label_preset() {
        let mut settings = ScanSettings::new();
        configure_for_shipping_labels(&mut settings);

        let enabled = settings.enabled_symbologies();
        assert_eq!(enabled.len(), 6);
        assert!(enabled.contains(&Symbology::Code128));
        assert!(enabled.contains(&Symbology::QrCode));
        assert!(!enabled.contains(&Symbology::Pdf417));

        assert!(settings.is_color_inverted(Symbology::Code128));
        assert!(settings.is_color_inverted(Symbology::Ean13));
        assert!(!settings.is_color_inverted(Symbology::QrCode));
        assert_eq!(settings.max_codes_per_frame(), 10);
        assert!(settings.try_harder());
    }

    #[test]
    fn test_low_resolution_preset() {
        let mut settings = ScanSettings::new();
        configure_for_low_resolution(&mut settings);

        assert_eq!(settings.enabled_symbologies().len(), 7);
        assert!(settings.any_color_inversion());
        assert_eq!(settings.max_codes_per_frame(), 20);
    }
}
