//! Daily aggregate statistics over the full history.
//!
//! Records are bucketed by UTC calendar date.

use crate::{ConsumptionRecord, DrinkCatalog};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Averages and totals shown on the dashboard, as two-decimal strings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyStats {
    pub daily_caffeine: String,
    pub daily_cost: String,
    pub average_coffees: String,
    pub total_cost: String,
    /// Distinct days with any record (divisor of `average_coffees`)
    pub days_with_records: usize,
    /// Days whose caffeine total is above zero (divisor of both daily averages)
    pub days_with_caffeine: usize,
}

#[derive(Default)]
struct DayTotals {
    caffeine: f64,
    count: usize,
}

/// Compute daily statistics
///
/// `daily_cost` divides the total cost by the number of days with caffeine,
/// not by the number of days with records, so zero-caffeine days add cost
/// without adding to the divisor.
pub fn daily_stats(history: &[ConsumptionRecord], catalog: &DrinkCatalog) -> DailyStats {
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    let mut total_cost = 0.0;

    for record in history {
        let day = days.entry(record.consumed_at.date_naive()).or_default();
        day.caffeine += record.caffeine_with(catalog);
        day.count += 1;
        total_cost += record.cost;
    }

    let caffeine_days: Vec<f64> = days
        .values()
        .map(|d| d.caffeine)
        .filter(|caffeine| *caffeine > 0.0)
        .collect();
    let total_caffeine: f64 = caffeine_days.iter().fold(0.0, |acc, mg| acc + mg);
    let total_records: usize = days.values().map(|d| d.count).sum();

    DailyStats {
        daily_caffeine: fixed2(ratio(total_caffeine, caffeine_days.len())),
        daily_cost: fixed2(ratio(total_cost, caffeine_days.len())),
        average_coffees: fixed2(ratio(total_records as f64, days.len())),
        total_cost: fixed2(total_cost),
        days_with_records: days.len(),
        days_with_caffeine: caffeine_days.len(),
    }
}

fn ratio(total: f64, divisor: usize) -> f64 {
    if divisor == 0 {
        0.0
    } else {
        total / divisor as f64
    }
}

fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}
