//! Lens CLI - Command-line interface for Correlation Lens
//!
//! Commands:
//! - analyze: Correlate two columns and print the interpreted report
//! - validate: List the records the inclusion rules would drop
//! - config: Print a configuration file for a threshold preset
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use correlation_lens::encoder::{AnalysisReport, ReportEncoder};
use correlation_lens::filter::filter_valid;
use correlation_lens::sources::TextSource;
use correlation_lens::{
    AnalysisConfig, AnalysisError, CorrelationAnalyzer, InputFormat, ThresholdTable, LENS_VERSION,
    PRODUCER_NAME,
};
use tracing::{debug, info};

/// Lens - On-device correlation analysis for paired numeric data
#[derive(Parser)]
#[command(name = "lens")]
#[command(version = LENS_VERSION)]
#[command(about = "Correlate two numeric columns and interpret the result", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate two columns and print the interpreted report
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input layout
        #[arg(long, default_value = "json")]
        input_format: InputLayout,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Threshold preset (overrides the configuration file)
        #[arg(long)]
        thresholds: Option<ThresholdPreset>,

        /// Name of the x variable used in explanations
        #[arg(long)]
        x_label: Option<String>,

        /// Name of the y variable used in explanations
        #[arg(long)]
        y_label: Option<String>,

        /// List every rejected record in the report
        #[arg(long)]
        show_rejections: bool,
    },

    /// List the records the inclusion rules would drop
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input layout
        #[arg(long, default_value = "json")]
        input_format: InputLayout,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a configuration file
    Config {
        /// Threshold preset
        #[arg(long, default_value = "standard")]
        preset: ThresholdPreset,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputLayout {
    /// JSON array of {x, y, label?, group?} records
    Json,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON object of parallel columns {x: [..], y: [..], labels?, groups?}
    Columns,
}

impl From<InputLayout> for InputFormat {
    fn from(layout: InputLayout) -> Self {
        match layout {
            InputLayout::Json => InputFormat::Json,
            InputLayout::Ndjson => InputFormat::Ndjson,
            InputLayout::Columns => InputFormat::Columns,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable text
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThresholdPreset {
    /// strong > 0.7, moderate > 0.3
    Standard,
    /// strong > 0.5, moderate > 0.3
    Lenient,
}

impl From<ThresholdPreset> for ThresholdTable {
    fn from(preset: ThresholdPreset) -> Self {
        match preset {
            ThresholdPreset::Standard => ThresholdTable::STANDARD,
            ThresholdPreset::Lenient => ThresholdTable::LENIENT,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), LensCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
            config,
            thresholds,
            x_label,
            y_label,
            show_rejections,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(preset) = thresholds {
                config.thresholds = preset.into();
            }
            if let Some(x) = x_label {
                config.labels.x = Some(x);
            }
            if let Some(y) = y_label {
                config.labels.y = Some(y);
            }
            cmd_analyze(
                &input,
                &output,
                input_format.into(),
                output_format,
                config,
                show_rejections,
            )
        }

        Commands::Validate {
            input,
            input_format,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            cmd_validate(&input, input_format.into(), &config, json)
        }

        Commands::Config { preset } => cmd_config(preset),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: AnalysisConfig,
    show_rejections: bool,
) -> Result<(), LensCliError> {
    let source = TextSource::new(read_input(input)?, input_format);

    let analyzer = CorrelationAnalyzer::new(config)?
        .with_encoder(ReportEncoder::new().include_rejections(show_rejections));

    let analysis = analyzer.analyze_source(&source)?;
    if analysis.outcome.total() == 0 {
        return Err(LensCliError::NoRecords);
    }

    let report = analyzer.report(&analysis);
    let output_data = format_output(&report, output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
        info!(path = %output.display(), "report written");
    }

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    config: &AnalysisConfig,
    json: bool,
) -> Result<(), LensCliError> {
    let records = input_format.parse(&read_input(input)?)?;
    let outcome = filter_valid(&records, &config.inclusion_policy());

    let report = ValidationReport {
        total_records: outcome.total(),
        valid_records: outcome.retained(),
        invalid_records: outcome.dropped(),
        errors: outcome
            .rejections
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                label: r.label.clone(),
                error: r.reason.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nRejected:");
            for err in &report.errors {
                println!(
                    "  - Record {} (index {}): {}",
                    err.label.as_deref().unwrap_or("unlabeled"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_records > 0 {
        Err(LensCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_config(preset: ThresholdPreset) -> Result<(), LensCliError> {
    let config = AnalysisConfig::default().with_thresholds(preset.into());
    println!("{}", config.to_json()?);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), LensCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "lens_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Lens version {}", LENS_VERSION),
    });

    if let Some(config_path) = config {
        if config_path.exists() {
            match AnalysisConfig::load(config_path) {
                Ok(cfg) => checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid (strong > {}, moderate > {}, x {}, y {})",
                        cfg.thresholds.strong,
                        cfg.thresholds.moderate,
                        rule_text(cfg.x_rule.strictly_positive),
                        rule_text(cfg.y_rule.strictly_positive),
                    ),
                }),
                Err(e) => checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Invalid config: {}", e),
                }),
            }
        } else {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults will be used".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass --input <file>)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: LENS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Lens Doctor Report");
        println!("==================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(LensCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn rule_text(strictly_positive: bool) -> &'static str {
    if strictly_positive {
        "> 0"
    } else {
        ">= 0"
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, LensCliError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Ok(AnalysisConfig::load(path)?)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn read_input(input: &Path) -> Result<String, LensCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn format_output(report: &AnalysisReport, format: OutputFormat) -> Result<String, LensCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Text => Ok(report.to_text()),
    }
}

// Error types

#[derive(Debug)]
enum LensCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for LensCliError {
    fn from(e: io::Error) -> Self {
        LensCliError::Io(e)
    }
}

impl From<AnalysisError> for LensCliError {
    fn from(e: AnalysisError) -> Self {
        LensCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for LensCliError {
    fn from(e: serde_json::Error) -> Self {
        LensCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<LensCliError> for CliError {
    fn from(e: LensCliError) -> Self {
        match e {
            LensCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            LensCliError::Analysis(AnalysisError::InvalidConfig(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'lens config' for a valid starting point".to_string()),
            },
            LensCliError::Analysis(
                e @ (AnalysisError::MissingColumn(_) | AnalysisError::LengthMismatch { .. }),
            ) => CliError {
                code: "COLUMN_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Column tables need x and y arrays of equal length".to_string()),
            },
            LensCliError::Analysis(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check --input-format matches the input layout".to_string()),
            },
            LensCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            LensCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            LensCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed the inclusion rules", count),
                hint: Some("Fix or remove the listed records, or relax the rules".to_string()),
            },
            LensCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    label: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
