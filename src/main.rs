//! CLI entry point for the stop frequency tool.
//!
//! Provides subcommands for computing trips per hour at every stop of a feed
//! and for inspecting a feed's tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use stop_frequency::{
    config::Settings,
    feed::{Feed, FeedSource},
    logging,
    output::{append_summary, print_json, print_pretty, write_results},
    params::{ArgsProvider, InteractiveProvider, ParameterProvider},
    pipeline::CountStrategy,
    render::render_map,
    stats::RunSummary,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stop_frequency")]
#[command(about = "Scheduled trips per hour at every stop of a GTFS feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count visits per stop for a date and time window and draw them on a map
    Compute {
        /// GTFS directory, zip archive, or URL of a zip archive
        #[arg(value_name = "FEED")]
        feed: String,

        /// Service date (YYYY-MM-DD or YYYYMMDD)
        #[arg(short, long)]
        date: Option<String>,

        /// Window start (HH:MM:SS)
        #[arg(short, long)]
        start: Option<String>,

        /// Window end (HH:MM:SS, may exceed 24:00:00 for late-night service)
        #[arg(short, long)]
        end: Option<String>,

        /// Prompt for date and window instead of reading them from arguments
        #[arg(short, long, default_value_t = false)]
        interactive: bool,

        /// HTML map to write (defaults to STOP_FREQUENCY_MAP or Output/map.html)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Optional: CSV file to write per-stop results to
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Optional: CSV file to append the run summary to
        #[arg(long)]
        history: Option<PathBuf>,

        /// Log the run summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Always count visits in parallel, regardless of feed size
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Load a feed and report its tables without computing
    Inspect {
        /// GTFS directory, zip archive, or URL of a zip archive
        #[arg(value_name = "FEED")]
        feed: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env()?;
    let _file_guard = logging::init(&settings.log_file_path)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            feed,
            date,
            start,
            end,
            interactive,
            map,
            csv,
            history,
            json,
            parallel,
        } => {
            // Parameters are validated before the feed is touched.
            let args = ArgsProvider::new(date, start, end);
            let mut provider: Box<dyn ParameterProvider> = if interactive || args.is_empty() {
                Box::new(InteractiveProvider::new(io::stdin().lock(), io::stdout()))
            } else {
                Box::new(args)
            };
            let params = match provider.parameters() {
                Ok(params) => params,
                Err(e) => {
                    error!(error = %e, "Invalid parameters");
                    return Err(e.into());
                }
            };
            info!(
                date = %params.date,
                weekday = params.date.weekday_name(),
                window_start = %params.window.start(),
                window_end = %params.window.end(),
                "Parameters accepted"
            );

            let loaded = Feed::load(&FeedSource::from_arg(&feed))?;
            let strategy = if parallel {
                CountStrategy::Parallel
            } else {
                settings.count_strategy()
            };
            let report = loaded.compute(&params, strategy);

            let map_path = map.unwrap_or_else(|| settings.map_path.clone());
            render_map(&map_path, &loaded, &report.result, &params)?;

            if let Some(csv) = csv {
                write_results(&csv, &loaded, &report.result)?;
            }

            let summary = RunSummary::from_report(&params, &loaded, &report).with_feed(&feed);
            if let Some(history) = history {
                append_summary(&history, &summary)?;
            }
            if json {
                print_json(&summary)?;
            } else {
                print_pretty(&summary);
            }

            info!(
                stops = summary.stops_reported,
                served_pct = summary.served_pct(),
                map = %map_path.display(),
                "Done"
            );
        }
        Commands::Inspect { feed } => {
            let loaded = Feed::load(&FeedSource::from_arg(&feed))?;
            let summary = RunSummary::from_feed(&loaded).with_feed(&feed);

            info!(
                trips = summary.trips,
                stop_times = summary.stop_times,
                stops = summary.stops,
                calendar = summary.has_calendar,
                calendar_dates = summary.has_calendar_dates,
                frequencies = summary.has_frequencies,
                "Feed summary"
            );
            print_json(&summary)?;
        }
    }

    Ok(())
}
