//! Caffeine level classification.

use crate::{StatusBand, StatusBands};

/// Pick the band for a caffeine level
///
/// Returns the first band whose inclusive bound covers `level`. Levels past
/// every bound fall into the last band.
///
/// # Panics
/// Panics if `bands` is empty. Configured tables are rejected by
/// `StatusBands::validate` before they get here.
pub fn classify(level: f64, bands: &StatusBands) -> &StatusBand {
    bands
        .bands
        .iter()
        .find(|band| band.max_level.map_or(true, |max| level <= max))
        .or_else(|| bands.bands.last())
        .expect("status band table is empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BandLevel;

    fn level_of(level: f64) -> BandLevel {
        classify(level, &StatusBands::default()).level
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(level_of(0.0), BandLevel::VeryLow);
        assert_eq!(level_of(50.0), BandLevel::VeryLow);
        assert_eq!(level_of(50.01), BandLevel::Low);
        assert_eq!(level_of(150.0), BandLevel::Low);
        assert_eq!(level_of(150.5), BandLevel::Moderate);
        assert_eq!(level_of(300.0), BandLevel::Moderate);
        assert_eq!(level_of(300.01), BandLevel::High);
    }

    #[test]
    fn test_high_is_catch_all() {
        assert_eq!(level_of(9999.0), BandLevel::High);
        assert_eq!(level_of(10000.0), BandLevel::High);
        assert_eq!(level_of(f64::MAX), BandLevel::High);
    }

    #[test]
    fn test_fully_bounded_table_falls_back_to_last() {
        let mut bands = StatusBands::default();
        bands.bands[3].max_level = Some(9999.0);
        assert_eq!(classify(10000.0, &bands).level, BandLevel::High);
    }

    #[test]
    fn test_band_carries_metadata() {
        let bands = StatusBands::default();
        let band = classify(400.0, &bands);
        assert_eq!(band.color, "#e11d48");
        assert!(band.description.starts_with("High caffeine"));
    }
}
