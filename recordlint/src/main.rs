//! Data quality validation tool.
//!
//! This binary reads a CSV file of records, runs the recordlint detectors
//! over it and writes a validation report.
//!
//! # Guarantees
//! - Input files are only read, never modified
//! - Reports go to stdout or a named file; logs go to stderr

mod ingest;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use recordlint_core::{RULES, Validator, ValidatorConfig, logging::init_logging};
use tracing::info;

use crate::output::OutputFormat;

/// Exit code used when `--fail-on-high` finds HIGH severity issues.
const HIGH_SEVERITY_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "recordlint")]
#[command(about = "Data quality validation for tabular records")]
#[command(version)]
#[command(long_about = "
recordlint - Logical data quality validation

This tool finds defects that type and format checks miss:
- Duplicate emails and phone numbers across records
- Rounded or clustered ages and defaulted dates
- Join dates in the future, before founding or before birth
- Monthly bulk import spikes and out-of-range ages

COLUMN DETECTION:
- email, age: exact column names (case-insensitive)
- phone, birth/dob, join/hire/start: substring match
- any column containing 'date' is checked for clustering

EXAMPLES:
  recordlint validate employees.csv
  recordlint validate --format summary --founding-year 2004 employees.csv
  recordlint validate --format csv --output issues.csv employees.csv
  recordlint rules
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CSV file of records
    Validate(ValidateArgs),
    /// List the validation rules
    Rules,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input CSV file
    #[arg(help = "CSV file with a header row")]
    pub input: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json", help = "Report format")]
    pub format: OutputFormat,

    /// Output file path
    #[arg(short, long, help = "Output file path (defaults to stdout)")]
    pub output: Option<PathBuf>,

    /// Validator configuration file
    #[arg(short, long, help = "JSON file with validator settings")]
    pub config: Option<PathBuf>,

    /// Company founding year
    #[arg(
        long,
        env = "RECORDLINT_FOUNDING_YEAR",
        help = "Year the company was founded; earlier join dates are flagged"
    )]
    pub founding_year: Option<i32>,

    /// Phone region
    #[arg(
        long,
        env = "RECORDLINT_PHONE_REGION",
        help = "Default region for phone numbers without a country code (e.g. US, GB)"
    )]
    pub phone_region: Option<String>,

    /// Reference date
    #[arg(
        long,
        env = "RECORDLINT_REFERENCE_DATE",
        help = "Date treated as today, YYYY-MM-DD (defaults to the current date)"
    )]
    pub reference_date: Option<NaiveDate>,

    /// Exit non-zero on HIGH severity issues
    #[arg(long, help = "Exit with status 2 when any HIGH severity issue is found")]
    pub fail_on_high: bool,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Rules => {
            list_rules();
            Ok(ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    })
}

/// Validates one CSV file and writes the report.
fn run_validate(args: &ValidateArgs) -> anyhow::Result<ExitCode> {
    let config = build_config(args)?;
    let validator = Validator::try_new(config)?;

    info!("Reading {}", args.input.display());
    let table = ingest::read_table(&args.input)?;
    info!(
        "Loaded {} records with {} columns",
        table.row_count(),
        table.columns().len()
    );

    let report = validator.validate(&table);
    let rendered = output::render(&report, args.format)?;
    output::write_output(&rendered, args.output.as_deref())?;

    if let Some(path) = &args.output {
        info!("✓ Report saved to {}", path.display());
    }
    if report.validation_passed {
        info!("✓ Validation passed");
    } else {
        info!(
            "Validation failed with {} HIGH severity issues",
            report.summary.high_severity_issues
        );
    }

    if args.fail_on_high && report.summary.high_severity_issues > 0 {
        return Ok(ExitCode::from(HIGH_SEVERITY_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the validator configuration; flags override the config file.
fn build_config(args: &ValidateArgs) -> anyhow::Result<ValidatorConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ValidatorConfig::new(),
    };

    // Out-of-range years reach Validator::try_new unclamped
    if let Some(year) = args.founding_year {
        config.company_founding_year = year;
    }
    if let Some(region) = &args.phone_region {
        config = config.with_phone_region(region.as_str());
    }
    if let Some(date) = args.reference_date {
        config = config.with_reference_date(date);
    }

    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<ValidatorConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ValidatorConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Prints every rule with its severity and family.
fn list_rules() {
    println!("Validation rules:");
    println!();
    for rule in RULES {
        let scope = if rule.per_column { " (per column)" } else { "" };
        println!(
            "  {:<6}  {:<22}  {}{}",
            rule.severity.as_str(),
            rule.family.to_string(),
            rule.name,
            scope
        );
    }
    println!();
    println!("Column detection:");
    println!("  email            exact name 'email'");
    println!("  age              exact name 'age'");
    println!("  phone            name contains 'phone'");
    println!("  birth date       name contains 'birth' or 'dob'");
    println!("  join date        name contains 'join', 'hire' or 'start'");
    println!("  date clustering  name contains 'date'");
}
