// src/main.rs

//! # eventlens
//!
//! Loads the configured event CSV (from the session cache when fresh), applies the
//! type, country, week and search selections given on the command line, and prints
//! the resulting dashboard: type histogram, location table, timeline summary and the
//! event feed. The same view can be emitted as JSON or the feed exported as CSV.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use EventLens::config::{load_dashboard_config, substitute_env_vars, DashboardConfig};
use EventLens::dashboard::{Dashboard, DashboardView};
use EventLens::data_model::{FilterState, SortColumn, SortDirection, SortSpec};
use EventLens::loader::load_dashboard;
use EventLens::pipeline::writers::{BaseWriter, CsvWriter};
use EventLens::source::PayloadCache;

/// Command-line arguments for the dashboard CLI.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the dashboard YAML configuration. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured data source (URL, file:// URL or local path).
    #[arg(short, long)]
    source: Option<String>,

    /// Only events of this type code (e.g. ECON).
    #[arg(long = "type")]
    event_type: Option<String>,

    /// Only events listing this location code.
    #[arg(long)]
    country: Option<String>,

    /// Only events whose first-event date falls in the week starting on this Sunday (YYYY-MM-DD).
    #[arg(long)]
    week: Option<String>,

    /// Free-text search over the configured text fields.
    #[arg(long)]
    search: Option<String>,

    /// Sort the event feed by this column.
    #[arg(long, value_enum)]
    sort: Option<SortColumn>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Maximum number of feed and location rows to print.
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Export the displayed events as CSV. A directory gets a dated default file name.
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Print the full dashboard view as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Ignore the session cache and fetch the payload again.
    #[arg(long)]
    no_cache: bool,

    /// Remove the cached payload before loading.
    #[arg(long)]
    clear_cache: bool,

    /// Validate the configuration and exit.
    #[arg(long)]
    validate_config: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        if let Some(event_type) = &self.event_type {
            state = state.toggle_type(event_type);
        }
        if let Some(country) = &self.country {
            state = state.toggle_country(country);
        }
        if let Some(week) = &self.week {
            state = state.toggle_week(week);
        }
        if let Some(query) = &self.search {
            state = state.with_search(query.as_str());
        }
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        state.with_sort(self.sort.map(|column| SortSpec { column, direction }))
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => load_dashboard_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(source) = &args.source {
        config.data.source.url = substitute_env_vars(source);
    }
    Ok(config)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn export_events(
    dashboard: &Dashboard,
    state: &FilterState,
    target: &Path,
) -> anyhow::Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(dashboard.export_filename(Local::now().date_naive()))
    } else {
        target.to_path_buf()
    };
    let rows = dashboard.export_rows(state);
    let mut writer = CsvWriter::create(&path, dashboard.export_headers())
        .with_context(|| format!("Failed to create export file {}", path.display()))?;
    writer.write_rows(&rows)?;
    writer.close()?;
    info!(rows = rows.len(), path = %path.display(), "Exported events");
    Ok(path)
}

fn print_view(dashboard: &Dashboard, view: &DashboardView, limit: usize) {
    let config = dashboard.config();

    println!("Event types");
    for (event_type, count) in view.type_counts.iter() {
        let code = event_type.code();
        if let Some(display) = config.type_display(code) {
            println!("  {:<6} {:<14} {:>6}", code, display.label, count);
        }
    }

    println!();
    println!("Locations ({} total)", view.locations.len());
    println!(
        "  {:<24} {:>6} {:>5} {:>5} {:>5} {:>5} {:>9}",
        "Location", "Total", "ECON", "SEC", "DIP", "INFO", "Goldstein"
    );
    for stats in view.locations.iter().take(limit) {
        println!(
            "  {:<24} {:>6} {:>5} {:>5} {:>5} {:>5} {:>9.2}",
            config.country_name(&stats.location),
            stats.total,
            stats.counts.econ,
            stats.counts.sec,
            stats.counts.dip,
            stats.counts.info,
            stats.avg_goldstein
        );
    }

    let window = dashboard.plot_window();
    let visible = window.visible(&view.timeline).len();
    println!();
    println!(
        "Timeline: {} of {} points between {} and {}",
        visible,
        view.timeline.len(),
        window.start.date(),
        window.end.date()
    );

    println!();
    if view.is_empty() {
        println!("No events match the current filters.");
        return;
    }
    println!("Events ({} shown of {})", view.events.len().min(limit), view.events.len());
    for e in view.events.iter().take(limit) {
        let locations = e
            .locations
            .iter()
            .map(|code| config.country_name(code))
            .join(", ");
        println!(
            "  {:<10} {:<5} {} [{}]",
            e.event.date, e.event.event_type, e.event.title, locations
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = load_config(&args)?;
    if args.validate_config {
        config.validate().context("Configuration is invalid")?;
        println!("Configuration is valid.");
        return Ok(());
    }

    if args.clear_cache {
        let cache = PayloadCache::from_config(&config.data.source.caching);
        cache.clear().await;
        info!(path = %cache.path().display(), "Cleared payload cache");
    }

    let config = Arc::new(config);
    let spinner = create_spinner("Loading events");
    let loaded = tokio::select! {
        result = load_dashboard(Arc::clone(&config), !args.no_cache) => result,
        _ = tokio::signal::ctrl_c() => {
            spinner.abandon_with_message("Load cancelled");
            warn!("Interrupted before the dataset finished loading; nothing was applied.");
            return Ok(());
        }
    };

    let dashboard = match loaded {
        Ok(dashboard) => {
            spinner.finish_with_message(format!("Loaded {} events", dashboard.dataset().len()));
            dashboard
        }
        Err(e) => {
            spinner.abandon_with_message("Load failed");
            error!("Failed to load dataset: {}", e);
            return Err(e).context("Dataset could not be loaded");
        }
    };

    let state = args.filter_state();
    let view = dashboard.view(&state);

    if let Some(target) = &args.export {
        let path = export_events(&dashboard, &state, target)?;
        eprintln!("Exported {} events to {}", view.events.len(), path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&dashboard, &view, args.limit);
    }
    Ok(())
}
