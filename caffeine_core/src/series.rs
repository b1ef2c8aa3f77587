//! Decayed caffeine level over a rolling window, for charting.
//!
//! Every call walks the whole window again; there is no state kept between
//! calls, so a periodic refresh is just another call with a later `now`.

use crate::{ConsumptionRecord, DecayModel, DrinkCatalog};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Window and sampling parameters for the caffeine chart
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChartWindow {
    /// How far before `now` the chart starts
    #[serde(default = "default_past_hours")]
    pub past_hours: f64,

    /// How far after `now` the chart projects the decay
    #[serde(default)]
    pub future_hours: f64,

    /// Records older than this (relative to `now`) are not considered at all
    #[serde(default = "default_prefilter_hours")]
    pub prefilter_hours: f64,

    /// Sampling step
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
}

impl Default for ChartWindow {
    fn default() -> Self {
        Self {
            past_hours: default_past_hours(),
            future_hours: 0.0,
            prefilter_hours: default_prefilter_hours(),
            interval_minutes: default_interval_minutes(),
        }
    }
}

fn default_past_hours() -> f64 {
    24.0
}

fn default_prefilter_hours() -> f64 {
    24.0
}

fn default_interval_minutes() -> u32 {
    5
}

/// Longest past, future or pre-filter window a config may ask for (one week)
pub const MAX_WINDOW_HOURS: f64 = 168.0;

fn hours(h: f64) -> Option<Duration> {
    Duration::try_milliseconds((h * 3_600_000.0) as i64)
}

/// One sample of the chart
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub at: DateTime<Utc>,
    /// `HH:MM` (UTC) label for the x axis
    pub label: String,
    pub level: f64,
}

/// Sample the decayed caffeine level across the chart window
///
/// Returns an empty vector when no record survives the pre-filter; callers
/// treat that as "nothing to plot". A zero sampling interval, or a window
/// that does not fit the representable date range, also yields an empty
/// series.
pub fn time_series(
    history: &[ConsumptionRecord],
    now: DateTime<Utc>,
    window: &ChartWindow,
    model: &DecayModel,
    catalog: &DrinkCatalog,
) -> Vec<SeriesPoint> {
    let Some((cutoff, start, end)) = window_bounds(now, window) else {
        tracing::warn!("Chart window {:?} is out of range", window);
        return Vec::new();
    };

    let doses: Vec<(DateTime<Utc>, f64)> = history
        .iter()
        .filter(|record| record.consumed_at >= cutoff)
        .map(|record| (record.consumed_at, record.caffeine_with(catalog)))
        .collect();

    if doses.is_empty() || window.interval_minutes == 0 {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(window.interval_minutes));

    let mut points = Vec::new();
    let mut t = start;
    while t <= end {
        let level = doses
            .iter()
            .filter(|(consumed_at, _)| *consumed_at <= t)
            .map(|(consumed_at, mg)| model.remaining(*mg, t - *consumed_at))
            .fold(0.0, |acc, mg| acc + mg);

        points.push(SeriesPoint {
            at: t,
            label: t.format("%H:%M").to_string(),
            level,
        });
        t += step;
    }

    points
}

/// Pre-filter cutoff, first sample and last sample for `window` at `now`
fn window_bounds(
    now: DateTime<Utc>,
    window: &ChartWindow,
) -> Option<(DateTime<Utc>, DateTime<Utc>, DateTime<Utc>)> {
    let cutoff = now.checked_sub_signed(hours(window.prefilter_hours)?)?;
    let start = now.checked_sub_signed(hours(window.past_hours)?)?;
    let end = now.checked_add_signed(hours(window.future_hours)?)?;
    Some((cutoff, start, end))
}
