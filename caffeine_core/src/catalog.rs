//! Default drink catalog and status band table.
//!
//! Both are plain values handed to the analytics, so tests and
//! configuration can substitute their own.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<DrinkCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static DrinkCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of built-in drinks
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> DrinkCatalog {
    DrinkCatalog::new(vec![
        DrinkOption::new("Masala Chai (240 ml)", 40.0, 15.0),
        DrinkOption::new("Filter Coffee (240 ml)", 60.0, 25.0),
        DrinkOption::new("Instant Coffee (1 tsp)", 65.0, 10.0),
        DrinkOption::new("Black Tea (240 ml)", 45.0, 12.0),
        DrinkOption::new("Green Tea (240 ml)", 30.0, 20.0),
        DrinkOption::new("Red Bull (250 ml)", 75.0, 99.0),
        DrinkOption::new("Monster Energy (500 ml)", 160.0, 130.0),
        DrinkOption::new("Matcha Tea (240 ml)", 70.0, 85.0),
        DrinkOption::new("Sting Energy Drink (250 ml)", 50.0, 50.0),
    ])
}

/// The four built-in status bands, lowest first
pub fn default_status_bands() -> StatusBands {
    StatusBands {
        bands: vec![
            StatusBand {
                level: BandLevel::VeryLow,
                color: "#2563eb".into(),
                background: "#dbeafe".into(),
                description: "Very low caffeine - no noticeable effect on alertness.".into(),
                max_level: Some(50.0),
            },
            StatusBand {
                level: BandLevel::Low,
                color: "#047857".into(),
                background: "#d1fae5".into(),
                description:
                    "Mild caffeine levels - light alertness boost with minimal side effects."
                        .into(),
                max_level: Some(150.0),
            },
            StatusBand {
                level: BandLevel::Moderate,
                color: "#b45309".into(),
                background: "#fef3c7".into(),
                description: "Moderate caffeine intake - noticeable focus improvement and possible restlessness.".into(),
                max_level: Some(300.0),
            },
            StatusBand {
                level: BandLevel::High,
                color: "#e11d48".into(),
                background: "#ffe4e6".into(),
                description: "High caffeine levels - may cause jitteriness, rapid heartbeat, or trouble concentrating.".into(),
                max_level: None,
            },
        ],
    }
}

impl DrinkCatalog {
    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (idx, drink) in self.drinks.iter().enumerate() {
            if drink.name.trim().is_empty() {
                errors.push(format!("Drink #{} has empty name", idx));
            }
            if !drink.caffeine_mg.is_finite() || drink.caffeine_mg < 0.0 {
                errors.push(format!(
                    "Drink '{}' has invalid caffeine {}",
                    drink.name, drink.caffeine_mg
                ));
            }
            if !drink.cost.is_finite() || drink.cost < 0.0 {
                errors.push(format!(
                    "Drink '{}' has invalid cost {}",
                    drink.name, drink.cost
                ));
            }
            if self.drinks[..idx].iter().any(|d| d.name == drink.name) {
                errors.push(format!("Drink '{}' is listed more than once", drink.name));
            }
        }

        errors
    }
}

impl StatusBands {
    /// Validate band ordering
    ///
    /// Bounds must increase strictly and only the last band may be unbounded.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.bands.is_empty() {
            errors.push("Status band table is empty".to_string());
            return errors;
        }

        let last = self.bands.len() - 1;
        let mut previous: Option<f64> = None;
        for (idx, band) in self.bands.iter().enumerate() {
            match band.max_level {
                Some(max) => {
                    if let Some(prev) = previous {
                        if max <= prev {
                            errors.push(format!(
                                "Band {:?} bound {} is not above previous bound {}",
                                band.level, max, prev
                            ));
                        }
                    }
                    previous = Some(max);
                }
                None if idx != last => {
                    errors.push(format!(
                        "Band {:?} is unbounded but is not the last band",
                        band.level
                    ));
                }
                None => {}
            }
        }

        errors
    }
}
