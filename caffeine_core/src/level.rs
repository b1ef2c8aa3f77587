//! Current caffeine level estimate.

use crate::{ConsumptionRecord, DecayModel, DrinkCatalog};
use chrono::{DateTime, Utc};

/// Estimate the caffeine currently active at `now`
///
/// Sums the decayed contribution of every record consumed within the
/// model's look-back window (inclusive). Records logged after `now` do not
/// count yet. The result is rounded to two decimals.
pub fn current_level(
    history: &[ConsumptionRecord],
    now: DateTime<Utc>,
    model: &DecayModel,
    catalog: &DrinkCatalog,
) -> f64 {
    let lookback = model.lookback();

    // Folded from +0.0 so an empty history reads as 0.00, not -0.00
    let total = history
        .iter()
        .filter_map(|record| {
            let age = now - record.consumed_at;
            if age < chrono::Duration::zero() || age > lookback {
                return None;
            }
            Some(model.remaining(record.caffeine_with(catalog), age))
        })
        .fold(0.0, |acc, mg| acc + mg);

    round2(total)
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_catalog;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0).unwrap()
    }

    fn dose(mg: Option<f64>, name: &str, hours_ago: i64) -> ConsumptionRecord {
        ConsumptionRecord::new("u", name, mg, 0.0, now() - Duration::hours(hours_ago))
    }

    #[test]
    fn test_empty_history_is_zero() {
        let level = current_level(&[], now(), &DecayModel::default(), &build_default_catalog());
        assert_eq!(level, 0.0);
        assert!(!level.is_sign_negative());
        assert_eq!(format!("{:.2}", level), "0.00");
    }

    #[test]
    fn test_only_expired_records_is_positive_zero() {
        let history = vec![dose(Some(100.0), "Espresso", 72)];
        let level = current_level(&history, now(), &DecayModel::default(), &build_default_catalog());
        assert!(!level.is_sign_negative());
        assert_eq!(format!("{:.2}", level), "0.00");
    }

    #[test]
    fn test_single_dose_after_one_half_life() {
        let history = vec![dose(Some(100.0), "Espresso", 5)];
        let level = current_level(&history, now(), &DecayModel::default(), &build_default_catalog());
        assert_eq!(level, 50.0);
    }

    #[test]
    fn test_records_outside_lookback_ignored() {
        let history = vec![dose(Some(1000.0), "Espresso", 49), dose(Some(100.0), "Espresso", 0)];
        let level = current_level(&history, now(), &DecayModel::default(), &build_default_catalog());
        assert_eq!(level, 100.0);
    }

    #[test]
    fn test_record_exactly_at_lookback_counts() {
        let history = vec![dose(Some(1024.0), "Espresso", 48)];
        let level = current_level(&history, now(), &DecayModel::default(), &build_default_catalog());
        // 48h is 9.6 half-lives
        assert!(level > 0.0);
    }

    #[test]
    fn test_future_records_ignored() {
        let mut record = dose(Some(100.0), "Espresso", 0);
        record.consumed_at = now() + Duration::hours(1);
        let level = current_level(&[record], now(), &DecayModel::default(), &build_default_catalog());
        assert_eq!(level, 0.0);
    }

    #[test]
    fn test_missing_caffeine_uses_catalog() {
        let history = vec![
            dose(None, "Filter Coffee (240 ml)", 0),
            dose(None, "Unknown Brew", 0),
        ];
        let level = current_level(&history, now(), &DecayModel::default(), &build_default_catalog());
        assert_eq!(level, 60.0);
    }

    #[test]
    fn test_level_non_increasing_over_time() {
        let history = vec![dose(Some(200.0), "Espresso", 0)];
        let model = DecayModel::default();
        let catalog = build_default_catalog();

        let mut previous = f64::MAX;
        for minutes in (0..=48 * 60).step_by(30) {
            let level = current_level(&history, now() + Duration::minutes(minutes), &model, &catalog);
            assert!(level <= previous, "level rose at +{}min", minutes);
            previous = level;
        }
    }

    #[test]
    fn test_idempotent() {
        let history = vec![dose(Some(75.0), "Red Bull", 3), dose(None, "Matcha Tea (240 ml)", 7)];
        let model = DecayModel::default();
        let catalog = build_default_catalog();

        let a = current_level(&history, now(), &model, &catalog);
        let b = current_level(&history, now(), &model, &catalog);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
