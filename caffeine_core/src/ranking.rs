//! Most frequently logged drinks.

use crate::ConsumptionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many drinks the ranking returns
pub const TOP_DRINKS: usize = 3;

/// How many recent timestamps are attached to each ranked drink
pub const RECENT_TIMESTAMPS: usize = 3;

/// A ranked drink with its share of all records
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TopDrink {
    pub name: String,
    pub count: usize,
    /// Share of all records, e.g. `"40.00%"`
    pub percentage: String,
    /// Most recent consumption times, newest first
    pub recent: Vec<DateTime<Utc>>,
}

struct Tally<'a> {
    name: &'a str,
    count: usize,
    times: Vec<DateTime<Utc>>,
}

/// Rank drinks by how often they were logged
///
/// Equal counts keep the order in which the names first appear in
/// `history`.
pub fn top_drinks(history: &[ConsumptionRecord]) -> Vec<TopDrink> {
    let mut tallies: Vec<Tally<'_>> = Vec::new();

    for record in history {
        match tallies.iter_mut().find(|t| t.name == record.name) {
            Some(tally) => {
                tally.count += 1;
                tally.times.push(record.consumed_at);
            }
            None => tallies.push(Tally {
                name: &record.name,
                count: 1,
                times: vec![record.consumed_at],
            }),
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    tallies.sort_by(|a, b| b.count.cmp(&a.count));

    let total = history.len() as f64;
    tallies
        .into_iter()
        .take(TOP_DRINKS)
        .map(|mut tally| {
            tally.times.sort_by(|a, b| b.cmp(a));
            tally.times.truncate(RECENT_TIMESTAMPS);
            TopDrink {
                name: tally.name.to_string(),
                count: tally.count,
                percentage: format!("{:.2}%", tally.count as f64 / total * 100.0),
                recent: tally.times,
            }
        })
        .collect()
}
