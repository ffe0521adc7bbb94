//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::bar::DailyBar;
use crate::domain::config_validation::{
    validate_data_config, validate_simulation_config, DEFAULT_CONTRIBUTION, DEFAULT_MULTIPLIER,
    DEFAULT_TARGET_DAY,
};
use crate::domain::error::DcasimError;
use crate::domain::integrity::check_series;
use crate::domain::run::run_simulation;
use crate::domain::simulate::DcaPolicy;
use crate::domain::summary::RunSummary;
use crate::domain::validation::validate_series;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "dcasim", about = "Dollar-cost-averaging simulator with leveraged comparison")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation and write the augmented series
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Read this CSV file directly instead of [data] dir/symbol
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        contribution: Option<f64>,
        #[arg(long)]
        target_day: Option<u32>,
        #[arg(long)]
        multiplier: Option<f64>,
        /// Also write the plain-text comparison report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Check a daily series for date gaps and duplicates
    Check {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            input,
            output,
            symbol,
            contribution,
            target_day,
            multiplier,
            report,
        } => run_simulate(
            &config,
            input.as_deref(),
            output.as_deref(),
            symbol.as_deref(),
            contribution,
            target_day,
            multiplier,
            report.as_deref(),
        ),
        Command::Check {
            input,
            config,
            symbol,
        } => run_check(input.as_deref(), config.as_ref(), symbol.as_deref()),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DcasimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the DCA policy from config, with CLI overrides taking precedence.
pub fn build_policy(
    config: &dyn ConfigPort,
    contribution: Option<f64>,
    target_day: Option<u32>,
) -> DcaPolicy {
    DcaPolicy {
        contribution: contribution
            .unwrap_or_else(|| config.get_double("simulation", "contribution", DEFAULT_CONTRIBUTION)),
        target_day: target_day
            .unwrap_or_else(|| config.get_int("simulation", "target_day", DEFAULT_TARGET_DAY) as u32),
    }
}

pub fn resolve_multiplier(config: &dyn ConfigPort, multiplier: Option<f64>) -> f64 {
    multiplier.unwrap_or_else(|| config.get_double("leverage", "multiplier", DEFAULT_MULTIPLIER))
}

fn config_dates(config: &dyn ConfigPort) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let parse = |key: &str| {
        config
            .get_string("data", key)
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
    };
    (parse("start_date"), parse("end_date"))
}

fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
    input: Option<&Path>,
) -> Option<String> {
    if let Some(s) = symbol_override {
        return Some(s.to_uppercase());
    }
    if let Some(s) = config.get_string("data", "symbol") {
        return Some(s.trim().to_uppercase());
    }
    // Direct-file mode: take the stem before the `_daily` suffix.
    input.and_then(|p| p.file_stem()).map(|stem| {
        let stem = stem.to_string_lossy();
        stem.strip_suffix("_daily").unwrap_or(&stem).to_uppercase()
    })
}

fn fetch_bars(
    config: &dyn ConfigPort,
    input: Option<&Path>,
    symbol: &str,
) -> Result<Vec<DailyBar>, DcasimError> {
    let (start, end) = config_dates(config);

    match input {
        Some(path) => {
            let mut bars = CsvAdapter::read_file(path)?;
            bars.retain(|b| {
                start.is_none_or(|s| b.date >= s) && end.is_none_or(|e| b.date <= e)
            });
            Ok(bars)
        }
        None => {
            let dir = config
                .get_string("data", "dir")
                .ok_or_else(|| DcasimError::ConfigMissing {
                    section: "data".into(),
                    key: "dir".into(),
                })?;
            CsvAdapter::new(PathBuf::from(dir)).fetch_daily(symbol, start, end)
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_simulate(
    config_path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    symbol_override: Option<&str>,
    contribution: Option<f64>,
    target_day: Option<u32>,
    multiplier: Option<f64>,
    report: Option<&Path>,
) -> ExitCode {
    // Stage 1: load and validate config.
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_simulation_config(&config).and_then(|()| validate_data_config(&config))
    {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: resolve policy, multiplier, symbol.
    let policy = build_policy(&config, contribution, target_day);
    let multiplier = resolve_multiplier(&config, multiplier);
    let symbol = match resolve_symbol(symbol_override, &config, input) {
        Some(s) => s,
        None => {
            eprintln!("error: symbol is required (use --symbol or set [data] symbol)");
            return ExitCode::from(2);
        }
    };

    if let Some(c) = contribution {
        if !c.is_finite() || c <= 0.0 {
            eprintln!("error: --contribution must be positive");
            return ExitCode::from(2);
        }
    }
    if let Some(d) = target_day {
        if !(1..=31).contains(&d) {
            eprintln!("error: --target-day must be between 1 and 31");
            return ExitCode::from(2);
        }
    }
    if !multiplier.is_finite() {
        eprintln!("error: --multiplier must be a finite number");
        return ExitCode::from(2);
    }

    // Stage 3: fetch and validate the series.
    let bars = match fetch_bars(&config, input, &symbol) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let bars = match validate_series(bars, &symbol) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Simulating {}: {} bars, {} to {}",
        symbol,
        bars.len(),
        bars.first().map(|b| b.date.to_string()).unwrap_or_default(),
        bars.last().map(|b| b.date.to_string()).unwrap_or_default(),
    );
    eprintln!(
        "  Policy: {} per month on day >= {}, leverage {}x",
        policy.contribution, policy.target_day, multiplier
    );

    // Stage 4: run the pipeline.
    let run = match run_simulation(bars, policy, multiplier) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let summary = RunSummary::compute(&run);

    // Stage 5: write the augmented series.
    let output = output.map(Path::to_path_buf).or_else(|| {
        config.get_string("data", "output").map(PathBuf::from)
    });
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{symbol}_daily_with_dca.csv")));

    if let Err(e) = CsvAdapter::write_augmented(&run, &output) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 6: summary to stderr, optional report file.
    eprintln!();
    eprint!("{}", TextReportAdapter::render(&summary, &symbol));

    if let Some(report_path) = report {
        if let Err(e) =
            TextReportAdapter.write(&summary, &symbol, &report_path.display().to_string())
        {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", report_path.display());
    }

    eprintln!("\nAugmented series written to: {}", output.display());
    ExitCode::SUCCESS
}

pub fn run_check(
    input: Option<&Path>,
    config_path: Option<&PathBuf>,
    symbol: Option<&str>,
) -> ExitCode {
    let bars = match input {
        Some(path) => match CsvAdapter::read_file(path) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => {
            let config_path = match config_path {
                Some(p) => p,
                None => {
                    eprintln!("error: check requires --input or --config with --symbol");
                    return ExitCode::from(1);
                }
            };
            let config = match load_config(config_path) {
                Ok(c) => c,
                Err(code) => return code,
            };
            let symbol = match resolve_symbol(symbol, &config, None) {
                Some(s) => s,
                None => {
                    eprintln!("error: symbol is required (use --symbol or set [data] symbol)");
                    return ExitCode::from(2);
                }
            };
            match fetch_bars(&config, None, &symbol) {
                Ok(bars) => bars,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }
    };

    let report = check_series(&bars);

    eprintln!("Records: {}", report.total_records);
    if let (Some(start), Some(end)) = (report.start, report.end) {
        eprintln!("Range:   {} to {}", start, end);
    }

    if report.gaps.is_empty() {
        eprintln!("No date gaps found.");
    } else {
        eprintln!(
            "{} gaps ({} missing calendar days):",
            report.gaps.len(),
            report.missing_day_total()
        );
        for gap in &report.gaps {
            eprintln!(
                "  {} -> {} ({} missing)",
                gap.before, gap.after, gap.missing_days
            );
        }
    }

    if report.duplicates.is_empty() {
        eprintln!("No duplicate dates found.");
        ExitCode::SUCCESS
    } else {
        eprintln!("Duplicate dates:");
        for date in &report.duplicates {
            eprintln!("  {date}");
        }
        ExitCode::from(4)
    }
}

pub fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match resolve_symbol(symbol, &config, None) {
        Some(s) => s,
        None => {
            eprintln!("error: symbol is required (use --symbol or set [data] symbol)");
            return ExitCode::from(2);
        }
    };

    let dir = match config.get_string("data", "dir") {
        Some(d) => d,
        None => {
            eprintln!("error: missing config key [data] dir");
            return ExitCode::from(2);
        }
    };

    let adapter = CsvAdapter::new(PathBuf::from(dir));
    match adapter.get_data_range(&symbol) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", symbol);
            ExitCode::from(5)
        }
        Err(e) => {
            eprintln!("error querying {}: {}", symbol, e);
            (&e).into()
        }
    }
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let policy = build_policy(&config, None, None);
    eprintln!(
        "Policy: {} per month on day >= {}, leverage {}x",
        policy.contribution,
        policy.target_day,
        resolve_multiplier(&config, None)
    );
    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}
