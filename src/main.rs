//! CLI entry point for the bikeshare explorer.
//!
//! Without filter flags it runs the interactive session; with `--city` it
//! prints a single report and exits.

use anyhow::Result;
use bikeshare_explorer::city::City;
use bikeshare_explorer::filters::{DayFilter, Filters, MonthFilter};
use bikeshare_explorer::session::{Session, run_report};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data by city, month and day", long_about = None)]
struct Cli {
    /// Directory containing chicago.csv, new_york_city.csv and washington.csv
    #[arg(short = 'd', long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Report on this city without prompting (chicago, "new york", washington)
    #[arg(long)]
    city: Option<City>,

    /// Month filter used with --city: all, january .. june
    #[arg(long, default_value = "all")]
    month: MonthFilter,

    /// Day filter used with --city: all, monday .. sunday
    #[arg(long, default_value = "all")]
    day: DayFilter,

    /// Print the --city report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: stderr (quiet by default, prompts share the terminal) + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    info!(data_dir = %cli.data_dir.display(), "Starting bikeshare explorer");

    match cli.city {
        Some(city) => {
            let filters = Filters {
                city,
                month: cli.month,
                day: cli.day,
            };
            let stdout = std::io::stdout();
            run_report(&mut stdout.lock(), &cli.data_dir, &filters, cli.json)?;
        }
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut session = Session::new(stdin.lock(), stdout.lock(), cli.data_dir);
            let end = session.run()?;
            info!(?end, cycles = session.cycles(), "Exiting");
        }
    }

    Ok(())
}
