//! CLI entry point for the turnstile rater.
//!
//! Provides subcommands for building a station timeline, ranking stations on
//! a given day, ranking stations over a time-of-day window, and listing the
//! weekly files covering a date range.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use turnstile_rater::{
    analyzers::analyzer::{Analysis, analyze},
    analyzers::types::StationKey,
    config::{PipelineConfig, TimeWindow},
    files::weekly_file_names,
    output::{ReportOptions, report_rows, write_csv},
    parser::read_batch,
};

#[derive(Parser)]
#[command(name = "turnstile_rater")]
#[command(about = "Rank transit stations by turnstile exit rates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily exit rates of one station across the loaded dates
    Timeline {
        /// Station name, e.g. "LEXINGTON-53 ST"
        #[arg(long)]
        station: String,

        /// Line designators in any order, e.g. "6EM"
        #[arg(long)]
        lines: String,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Stations with the highest mean hourly exit rate on one date
    BusiestDay {
        /// Date to rank (MM/DD/YYYY or YYYY-MM-DD); defaults to the config's target_date
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Number of stations to return
        #[arg(short = 'n', long)]
        top: Option<usize>,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Stations with the most exits inside a time-of-day window
    Peak {
        /// First hour included in the window
        #[arg(long)]
        start_hour: Option<u32>,

        /// First hour excluded from the window
        #[arg(long)]
        end_hour: Option<u32>,

        /// Number of stations to return
        #[arg(short = 'n', long)]
        top: Option<usize>,

        #[command(flatten)]
        input: InputArgs,
    },
    /// List the weekly files covering a date range
    Files {
        /// Directory holding turnstile_YYMMDD.txt files
        #[arg(short = 'd', long)]
        data_dir: PathBuf,

        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,

        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Turnstile files to read
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Directory of weekly files; used with --from and --to instead of FILE
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// First date of the range (MM/DD/YYYY or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// End of the range, exclusive
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// JSON pipeline config
    #[arg(short, long)]
    config: Option<String>,

    /// CSV file to write results to
    #[arg(short, long)]
    output: Option<String>,

    /// Maximum rows to print
    #[arg(long, default_value_t = 100)]
    max_rows: usize,

    /// Print results as pretty JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl InputArgs {
    fn load_config(&self) -> Result<PipelineConfig> {
        match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config from {path}")),
            None => Ok(PipelineConfig::default()),
        }
    }

    fn paths(&self) -> Result<Vec<PathBuf>> {
        if !self.files.is_empty() {
            return Ok(self.files.clone());
        }
        match (&self.data_dir, self.from, self.to) {
            (Some(dir), Some(from), Some(to)) => Ok(weekly_file_names(dir, from, to)),
            _ => bail!("pass input files, or --data-dir with --from and --to"),
        }
    }

    fn run_pipeline(&self, config: &PipelineConfig) -> Result<Analysis> {
        let paths = self.paths()?;
        info!(files = paths.len(), "Reading turnstile files");
        let readings = read_batch(&paths)?;
        Ok(analyze(&readings, config))
    }

    fn report<T>(&self, title: &str, rows: &[T]) -> Result<()>
    where
        T: std::fmt::Display + serde::Serialize,
    {
        report_rows(
            title,
            rows,
            &ReportOptions {
                max_rows: self.max_rows,
                json: self.json,
            },
        )?;
        if let Some(path) = &self.output {
            write_csv(path, rows)?;
            info!(path = %path, rows = rows.len(), "Results written");
        }
        Ok(())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|e| format!("invalid date {s:?}: {e}"))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/turnstile_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("turnstile_rater.log"));

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
        Commands::Timeline {
            station,
            lines,
            input,
        } => {
            let config = input.load_config()?;
            let analysis = input.run_pipeline(&config)?;
            let key = StationKey::new(&station, &lines);

            let timeline = analysis.timeline(&key);
            input.report(&format!("Timeline for {key}"), &timeline)?;
        }
        Commands::BusiestDay { date, top, input } => {
            let config = input.load_config()?;
            let Some(date) = date.or(config.target_date) else {
                bail!("no --date given and no target_date in config");
            };
            let analysis = input.run_pipeline(&config)?;

            let ranked = analysis.busiest_on(date, top.unwrap_or(config.top_n));
            input.report(&format!("Busiest stations on {date}"), &ranked)?;
        }
        Commands::Peak {
            start_hour,
            end_hour,
            top,
            input,
        } => {
            let mut config = input.load_config()?;
            config.time_window = TimeWindow::new(
                start_hour.unwrap_or(config.time_window.start_hour),
                end_hour.unwrap_or(config.time_window.end_hour),
            );
            config.validate()?;
            let analysis = input.run_pipeline(&config)?;

            let window = config.time_window;
            let ranked = analysis.busiest_in_window(&window, top.unwrap_or(config.top_n));
            input.report(
                &format!(
                    "Busiest stations between {}:00 and {}:00",
                    window.start_hour, window.end_hour
                ),
                &ranked,
            )?;
        }
        Commands::Files { data_dir, from, to } => {
            let files = weekly_file_names(&data_dir, from, to);
            info!(count = files.len(), "Weekly files");
            for file in &files {
                info!(path = %file.display(), exists = file.exists(), "File");
            }
        }
    }

    Ok(())
}
