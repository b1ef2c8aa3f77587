//! First-order caffeine elimination.
//!
//! Caffeine is modelled as a single dose decaying with a fixed half-life:
//! `remaining = dose * 0.5^(elapsed_hours / half_life_hours)`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default caffeine half-life in hours
pub const DEFAULT_HALF_LIFE_HOURS: f64 = 5.0;

/// Default maximum age of a dose still counted in the current level
pub const DEFAULT_LOOKBACK_HOURS: f64 = 48.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Decay parameters shared by the level estimator and the time series
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DecayModel {
    #[serde(default = "default_half_life_hours")]
    pub half_life_hours: f64,

    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: f64,
}

impl Default for DecayModel {
    fn default() -> Self {
        Self {
            half_life_hours: DEFAULT_HALF_LIFE_HOURS,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

fn default_half_life_hours() -> f64 {
    DEFAULT_HALF_LIFE_HOURS
}

fn default_lookback_hours() -> f64 {
    DEFAULT_LOOKBACK_HOURS
}

impl DecayModel {
    /// Remaining active caffeine from `dose_mg` after `elapsed`
    ///
    /// Negative durations are treated as zero.
    pub fn remaining(&self, dose_mg: f64, elapsed: Duration) -> f64 {
        let hours = (elapsed.num_milliseconds().max(0) as f64) / MILLIS_PER_HOUR;
        dose_mg * 0.5_f64.powf(hours / self.half_life_hours)
    }

    /// Look-back window as a chrono duration
    pub fn lookback(&self) -> Duration {
        Duration::milliseconds((self.lookback_hours * MILLIS_PER_HOUR) as i64)
    }
}

/// Remaining caffeine using the default 5 hour half-life
pub fn decay(dose_mg: f64, elapsed: Duration) -> f64 {
    DecayModel::default().remaining(dose_mg, elapsed)
}
