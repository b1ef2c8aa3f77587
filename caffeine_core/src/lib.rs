#![forbid(unsafe_code)]

//! Core domain model and analytics for the Zarurat-e-Coffee caffeine tracker.
//!
//! This crate provides:
//! - Domain types (consumption records, drink options, status bands)
//! - Caffeine estimation (decay, current level, time series)
//! - History analytics (daily statistics, top drinks)
//! - Persistence collaborators (WAL, CSV archive, custom drink list)
//! - Periodic refresh scheduling

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod decay;
pub mod level;
pub mod series;
pub mod stats;
pub mod ranking;
pub mod status;
pub mod format;
pub mod dashboard;
pub mod wal;
pub mod csv_rollup;
pub mod history;
pub mod drinklist;
pub mod refresh;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use decay::{decay, DecayModel};
pub use level::current_level;
pub use series::{time_series, ChartWindow, SeriesPoint};
pub use stats::{daily_stats, DailyStats};
pub use ranking::{top_drinks, TopDrink};
pub use status::classify;
pub use format::time_since;
pub use dashboard::{AnalyticsConfig, Dashboard, DerivedAnalytics};
pub use wal::{JsonlSink, RecordSink};
pub use history::load_history;
pub use drinklist::UserDrinkList;
pub use refresh::RefreshTask;
