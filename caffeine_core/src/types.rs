//! Core domain types for the caffeine tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Consumption records (one logged beverage each)
//! - Drink options and the drink catalog used for caffeine fallback
//! - Status bands used to classify a caffeine level

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Consumption Records
// ============================================================================

/// One logged beverage event
///
/// `id` is assigned at storage time and only used to de-duplicate the log
/// against its archive. Analytics look at `name`, `caffeine_mg`, `cost`
/// and `consumed_at`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub caffeine_mg: Option<f64>,
    #[serde(default)]
    pub cost: f64,
    pub consumed_at: DateTime<Utc>,
}

impl ConsumptionRecord {
    /// Create a new record with a fresh storage id
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        caffeine_mg: Option<f64>,
        cost: f64,
        consumed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            caffeine_mg,
            cost,
            consumed_at,
        }
    }

    /// Check the record invariants before it enters history
    ///
    /// The analytics assume these hold and do not re-check them.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRecord("drink name is empty".into()));
        }
        if let Some(mg) = self.caffeine_mg {
            if !mg.is_finite() || mg < 0.0 {
                return Err(Error::InvalidRecord(format!(
                    "caffeine for '{}' must be a non-negative number, got {}",
                    self.name, mg
                )));
            }
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(Error::InvalidRecord(format!(
                "cost for '{}' must be a non-negative number, got {}",
                self.name, self.cost
            )));
        }
        Ok(())
    }

    /// Caffeine in this dose, falling back to the catalog by name
    pub fn caffeine_with(&self, catalog: &DrinkCatalog) -> f64 {
        self.caffeine_mg
            .unwrap_or_else(|| catalog.caffeine_for(&self.name))
    }
}

// ============================================================================
// Drink Catalog
// ============================================================================

/// A drink the user can pick when logging
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrinkOption {
    pub name: String,
    pub caffeine_mg: f64,
    pub cost: f64,
}

impl DrinkOption {
    pub fn new(name: impl Into<String>, caffeine_mg: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            caffeine_mg,
            cost,
        }
    }
}

/// Ordered list of drink options, looked up by exact name
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DrinkCatalog {
    pub drinks: Vec<DrinkOption>,
}

impl DrinkCatalog {
    pub fn new(drinks: Vec<DrinkOption>) -> Self {
        Self { drinks }
    }

    /// Find a drink by exact name
    pub fn find(&self, name: &str) -> Option<&DrinkOption> {
        self.drinks.iter().find(|d| d.name == name)
    }

    /// Default caffeine for a drink name, or 0 when the catalog has no match
    pub fn caffeine_for(&self, name: &str) -> f64 {
        self.find(name).map(|d| d.caffeine_mg).unwrap_or(0.0)
    }

    /// Merge user drinks over a base catalog
    ///
    /// User drinks come first; base drinks whose name a user drink already
    /// uses are hidden.
    pub fn merged(user: &[DrinkOption], base: &DrinkCatalog) -> DrinkCatalog {
        let mut drinks: Vec<DrinkOption> = user.to_vec();
        for drink in &base.drinks {
            if !user.iter().any(|u| u.name == drink.name) {
                drinks.push(drink.clone());
            }
        }
        DrinkCatalog { drinks }
    }

    pub fn len(&self) -> usize {
        self.drinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }
}

// ============================================================================
// Status Bands
// ============================================================================

/// Severity level of a caffeine reading
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BandLevel {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl BandLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BandLevel::VeryLow => "very_low",
            BandLevel::Low => "low",
            BandLevel::Moderate => "moderate",
            BandLevel::High => "high",
        }
    }
}

/// One severity band with its display metadata
///
/// `max_level` is an inclusive upper bound in mg; `None` means unbounded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusBand {
    pub level: BandLevel,
    pub color: String,
    pub background: String,
    pub description: String,
    #[serde(default)]
    pub max_level: Option<f64>,
}

/// Ordered set of status bands, lowest first
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusBands {
    pub bands: Vec<StatusBand>,
}

impl Default for StatusBands {
    fn default() -> Self {
        crate::catalog::default_status_bands()
    }
}
