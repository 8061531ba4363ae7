//! CLI entry point for the poll reader.
//!
//! Loads a poll CSV from the data directory and prints the highest single
//! result, the likely-voter averages and the change across the poll history.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, builder::RangedU64ValueParser};
use poll_reader::{
    config::{DEFAULT_DATA_FILE, Settings},
    loader,
    output::{append_record, print_json, print_pretty, render_report},
    stats::{HISTORY_WINDOW, PollSummary},
    table::PollTable,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "poll_reader")]
#[command(about = "Summarise election polling data from a CSV file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the highest result, likely-voter averages and history change
    Report {
        /// Poll CSV, relative to POLL_DATA_DIR unless absolute
        #[arg(value_name = "FILE", default_value = DEFAULT_DATA_FILE)]
        file: PathBuf,

        /// Number of polls at each end of the file to compare
        #[arg(
            short,
            long,
            default_value_t = HISTORY_WINDOW,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        window: usize,

        /// Also log the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append the summary to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a poll CSV and report any malformed line
    Validate {
        /// Poll CSV, relative to POLL_DATA_DIR unless absolute
        #[arg(value_name = "FILE", default_value = DEFAULT_DATA_FILE)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("poll_reader.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

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

    match cli.command {
        Commands::Report {
            file,
            window,
            json,
            output,
        } => {
            let raw = loader::load(settings.resolve(&file))?;
            let table = PollTable::from_lines(&raw.lines).with_context(|| {
                format!("failed to build poll table from {}", raw.path.display())
            })?;

            if table.len() < window {
                warn!(
                    rows = table.len(),
                    window, "Fewer rows than the history window, comparing all rows"
                );
            }

            let source = raw.path.display().to_string();
            let summary = PollSummary::from_table(&source, &table, window)?;
            print_pretty(&summary);
            print!("{}", render_report(&summary));

            if json {
                print_json(&summary)?;
            }
            if let Some(output) = output {
                append_record(&output, &summary)?;
                info!(output = %output.display(), "Summary appended");
            }
        }
        Commands::Validate { file } => {
            let raw = loader::load(settings.resolve(&file))?;
            let mut table = PollTable::new();
            table
                .parse(&raw.lines)
                .with_context(|| format!("{} is not a valid poll file", raw.path.display()))?;

            for (sample_type, count) in table.sample_type_counts() {
                info!(%sample_type, count, "Sample type");
            }
            info!(path = %raw.path.display(), rows = table.len(), "Poll file is valid");
        }
    }

    Ok(())
}
