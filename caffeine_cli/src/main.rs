use caffeine_core::history::for_user;
use caffeine_core::*;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "zarurat")]
#[command(about = "Caffeine intake tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference instant for all calculations (RFC 3339, defaults to the system clock)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a drink
    Log {
        /// Drink name (matched against your drink list and the defaults)
        name: String,

        /// Caffeine in mg (defaults to the drink list value)
        #[arg(long)]
        caffeine: Option<f64>,

        /// Cost (defaults to the drink list value)
        #[arg(long)]
        cost: Option<f64>,

        /// When the drink was consumed (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Show the current caffeine level and status (default)
    Status,

    /// Show daily averages and total spend
    Stats,

    /// Show the three most logged drinks
    Top,

    /// Show the caffeine level over the chart window
    Chart {
        /// Print the series as JSON
        #[arg(long)]
        json: bool,
    },

    /// List logged drinks, newest first
    History,

    /// List the drinks available for logging
    Drinks,

    /// Save a custom drink to your drink list
    AddDrink {
        name: String,

        #[arg(long, default_value_t = 0.0)]
        caffeine: f64,

        #[arg(long, default_value_t = 0.0)]
        cost: f64,
    },

    /// Show the whole dashboard
    Dashboard {
        /// Print the analytics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh the dashboard periodically
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,

        /// Seconds between refreshes (defaults to the config value)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Roll up the drink log to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// File locations under the data directory
#[derive(Clone)]
struct Paths {
    wal_dir: PathBuf,
    wal: PathBuf,
    csv: PathBuf,
    drink_list: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            wal: wal_dir.join("drinks.wal"),
            wal_dir,
            csv: data_dir.join("history.csv"),
            drink_list: data_dir.join("drinks.json"),
        }
    }
}

fn main() -> Result<()> {
    caffeine_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => {
            let config = Config::load()?;
            config.validate()?;
            config
        }
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths::new(&data_dir);

    // The only place the system clock is read
    let now = cli.now.unwrap_or_else(Utc::now);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Log {
            name,
            caffeine,
            cost,
            at,
        } => cmd_log(&paths, &config, now, name, caffeine, cost, at),
        Commands::Status => cmd_status(&paths, &config, now),
        Commands::Stats => cmd_stats(&paths, &config),
        Commands::Top => cmd_top(&paths, &config, now),
        Commands::Chart { json } => cmd_chart(&paths, &config, now, json),
        Commands::History => cmd_history(&paths, &config, now),
        Commands::Drinks => cmd_drinks(&paths),
        Commands::AddDrink {
            name,
            caffeine,
            cost,
        } => cmd_add_drink(&paths, name, caffeine, cost),
        Commands::Dashboard { json } => cmd_dashboard(&paths, &config, now, json),
        Commands::Watch { ticks, interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.refresh.interval());
            cmd_watch(paths, config, cli.now, ticks, interval)
        }
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

/// Merged catalog: the user's drinks over the defaults
fn load_catalog(paths: &Paths) -> Result<DrinkCatalog> {
    let list = UserDrinkList::load(&paths.drink_list)?;
    let catalog = list.catalog(get_default_catalog());

    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::warn!("Drink list problem: {}", error);
        }
    }
    Ok(catalog)
}

/// History for the configured user, oldest first
fn load_user_history(paths: &Paths, config: &Config) -> Result<Vec<ConsumptionRecord>> {
    let records = load_history(&paths.wal, &paths.csv)?;
    Ok(for_user(&records, &config.user.id).cloned().collect())
}

fn cmd_log(
    paths: &Paths,
    config: &Config,
    now: DateTime<Utc>,
    name: String,
    caffeine: Option<f64>,
    cost: Option<f64>,
    at: Option<DateTime<Utc>>,
) -> Result<()> {
    let catalog = load_catalog(paths)?;
    let known = catalog.find(&name);

    if known.is_none() && caffeine.is_none() {
        tracing::warn!("'{}' is not in the drink list; logging without caffeine", name);
    }

    let record = ConsumptionRecord::new(
        config.user.id.clone(),
        name.trim(),
        caffeine.or_else(|| known.map(|d| d.caffeine_mg)),
        cost.or_else(|| known.map(|d| d.cost)).unwrap_or(0.0),
        at.unwrap_or(now),
    );

    // Validates before writing
    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&record)?;

    println!(
        "✓ Logged {} ({:.0} mg, {:.2})",
        record.name,
        record.caffeine_with(&catalog),
        record.cost
    );

    let history = load_user_history(paths, config)?;
    let level = current_level(&history, now, &config.decay, &catalog);
    println!("  Current caffeine level: {:.2} mg", level);
    Ok(())
}

fn cmd_status(paths: &Paths, config: &Config, now: DateTime<Utc>) -> Result<()> {
    let catalog = load_catalog(paths)?;
    let history = load_user_history(paths, config)?;

    let level = current_level(&history, now, &config.decay, &catalog);
    let band = classify(level, &config.status);

    println!("Current caffeine level: {:.2} mg", level);
    println!("Status: {}", band.level.as_str());
    println!("  {}", band.description);
    Ok(())
}

fn cmd_stats(paths: &Paths, config: &Config) -> Result<()> {
    let catalog = load_catalog(paths)?;
    let history = load_user_history(paths, config)?;
    print_stats(&daily_stats(&history, &catalog));
    Ok(())
}

fn print_stats(stats: &DailyStats) {
    println!("Daily Stats");
    println!("  Avg. caffeine: {} mg", stats.daily_caffeine);
    println!("  Daily spend:   {}", stats.daily_cost);
    println!("  Drinks/day:    {}", stats.average_coffees);
    println!("  Total spend:   {}", stats.total_cost);
}

fn cmd_top(paths: &Paths, config: &Config, now: DateTime<Utc>) -> Result<()> {
    let history = load_user_history(paths, config)?;
    print_top(&top_drinks(&history), now);
    Ok(())
}

fn print_top(top: &[TopDrink], now: DateTime<Utc>) {
    println!("Top Drinks");
    if top.is_empty() {
        println!("  No drinks logged yet.");
        return;
    }
    for (idx, drink) in top.iter().enumerate() {
        let cups = if drink.count == 1 { "cup" } else { "cups" };
        println!(
            "  {}. {} - {} {} ({})",
            idx + 1,
            drink.name,
            drink.count,
            cups,
            drink.percentage
        );
        let recent: Vec<String> = drink
            .recent
            .iter()
            .map(|at| format!("{} ago", time_since(now, *at)))
            .collect();
        println!("     {}", recent.join(", "));
    }
}

fn cmd_chart(paths: &Paths, config: &Config, now: DateTime<Utc>, json: bool) -> Result<()> {
    let catalog = load_catalog(paths)?;
    let history = load_user_history(paths, config)?;
    let series = time_series(&history, now, &config.chart, &config.decay, &catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }
    print_chart(&series);
    Ok(())
}

fn print_chart(series: &[SeriesPoint]) {
    if series.is_empty() {
        println!("Nothing to plot - no drinks in the chart window.");
        return;
    }

    const WIDTH: f64 = 40.0;
    let peak = series.iter().map(|p| p.level).fold(0.0, f64::max);

    println!("Caffeine Level (mg)");
    for point in series {
        let bar = if peak > 0.0 {
            (point.level / peak * WIDTH).round() as usize
        } else {
            0
        };
        println!("  {} {:>8.2} {}", point.label, point.level, "#".repeat(bar));
    }
}

fn cmd_history(paths: &Paths, config: &Config, now: DateTime<Utc>) -> Result<()> {
    let history = load_user_history(paths, config)?;

    println!("Drink History");
    if history.is_empty() {
        println!("  No drinks logged yet.");
        return Ok(());
    }
    for record in history.iter().rev() {
        println!(
            "  {} - {:.2} - {} ago",
            record.name,
            record.cost,
            time_since(now, record.consumed_at)
        );
    }
    Ok(())
}

fn cmd_drinks(paths: &Paths) -> Result<()> {
    let catalog = load_catalog(paths)?;
    for drink in &catalog.drinks {
        println!(
            "  {:<32} {:>6.0} mg {:>8.2}",
            drink.name, drink.caffeine_mg, drink.cost
        );
    }
    Ok(())
}

fn cmd_add_drink(paths: &Paths, name: String, caffeine: f64, cost: f64) -> Result<()> {
    let list = UserDrinkList::update(&paths.drink_list, |list| {
        list.add(DrinkOption::new(name.clone(), caffeine, cost))
    })?;

    println!(
        "✓ Saved {} to your drink list ({} custom drinks)",
        name.trim(),
        list.drinks.len()
    );
    Ok(())
}

fn cmd_dashboard(paths: &Paths, config: &Config, now: DateTime<Utc>, json: bool) -> Result<()> {
    let catalog = load_catalog(paths)?;
    let history = load_user_history(paths, config)?;
    let analytics = Dashboard::compute(&history, now, &config.analytics(), &catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
    } else {
        print_dashboard(&analytics);
    }
    Ok(())
}

fn print_dashboard(analytics: &DerivedAnalytics) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  CURRENT CAFFEINE LEVEL: {:>9.2} mg   │", analytics.current_level);
    println!("╰─────────────────────────────────────────╯");
    println!("  {}", analytics.status.description);
    println!();
    print_stats(&analytics.stats);
    println!();
    print_top(&analytics.top_drinks, analytics.computed_at);
    println!();
    match (analytics.series.first(), analytics.series.last()) {
        (Some(first), Some(last)) => {
            let peak = analytics
                .series
                .iter()
                .map(|p| p.level)
                .fold(0.0, f64::max);
            println!(
                "Chart {} - {}: {} points, peak {:.2} mg",
                first.label,
                last.label,
                analytics.series.len(),
                peak
            );
        }
        _ => println!("Chart: nothing to plot"),
    }
}

fn cmd_watch(
    paths: Paths,
    config: Config,
    fixed_now: Option<DateTime<Utc>>,
    ticks: Option<u64>,
    interval: Duration,
) -> Result<()> {
    if ticks == Some(0) {
        return Ok(());
    }

    // Catch a broken drink list before the task starts
    load_catalog(&paths)?;

    let task = RefreshTask::spawn(interval, move |tick| {
        let now = fixed_now.unwrap_or_else(Utc::now);
        let refreshed = load_catalog(&paths).and_then(|catalog| {
            let history = load_user_history(&paths, &config)?;
            Ok(Dashboard::compute(&history, now, &config.analytics(), &catalog))
        });

        match refreshed {
            Ok(analytics) => {
                println!("[refresh {}] {}", tick + 1, now.format("%Y-%m-%d %H:%M:%S"));
                print_dashboard(&analytics);
            }
            Err(e) => tracing::warn!("Refresh failed: {}", e),
        }

        ticks.map_or(true, |limit| tick + 1 < limit)
    });

    let ran = task.join();
    tracing::info!("Watch finished after {} refreshes", ran);
    Ok(())
}

fn cmd_rollup(paths: &Paths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = caffeine_core::csv_rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} drinks to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = caffeine_core::csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}
