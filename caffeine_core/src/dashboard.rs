//! Dashboard analytics: everything derived from the history in one pass.
//!
//! The dashboard recomputes from scratch on every call:
//! - Current level and its status band
//! - Chart series over the configured window
//! - Daily statistics and top drinks

use crate::{
    classify, current_level, daily_stats, time_series, top_drinks, ChartWindow,
    ConsumptionRecord, DailyStats, DecayModel, DrinkCatalog, SeriesPoint, StatusBand,
    StatusBands, TopDrink,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Parameters the analytics depend on
#[derive(Clone, Debug, Default)]
pub struct AnalyticsConfig {
    pub decay: DecayModel,
    pub chart: ChartWindow,
    pub status: StatusBands,
}

/// Everything the dashboard shows, derived from one history snapshot
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DerivedAnalytics {
    pub computed_at: DateTime<Utc>,
    pub current_level: f64,
    pub status: StatusBand,
    pub series: Vec<SeriesPoint>,
    pub stats: DailyStats,
    pub top_drinks: Vec<TopDrink>,
}

/// Entry point for computing dashboard analytics
pub struct Dashboard;

impl Dashboard {
    /// Compute all derived analytics for `history` at `now`
    pub fn compute(
        history: &[ConsumptionRecord],
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
        catalog: &DrinkCatalog,
    ) -> DerivedAnalytics {
        let level = current_level(history, now, &config.decay, catalog);
        let status = classify(level, &config.status).clone();
        let series = time_series(history, now, &config.chart, &config.decay, catalog);

        tracing::debug!(
            "Computed dashboard for {} records: level={:.2}mg band={} points={}",
            history.len(),
            level,
            status.level.as_str(),
            series.len()
        );

        DerivedAnalytics {
            computed_at: now,
            current_level: level,
            status,
            series,
            stats: daily_stats(history, catalog),
            top_drinks: top_drinks(history),
        }
    }
}
