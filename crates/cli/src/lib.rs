use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use sensore_frames::{FrameDecoder, PreflightValidator};
use sensore_metrics::MetricsCalculator;
use sensore_protocol::{output_schemas, serialize_json, IngestReport, ValidationResult};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWrite;

pub mod pipeline;
pub mod settings;
pub mod sink;

use pipeline::IngestPipeline;
use settings::Settings;
use sink::JsonLinesSink;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "sensore")]
#[command(about = "Pressure-mat frame ingestion and metrics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Settings file (TOML); falls back to SENSORE_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pre-flight checks on a CSV upload
    Validate(ValidateArgs),

    /// Decode a CSV upload and write one metric record per frame
    Ingest(IngestArgs),

    /// Print the metrics of a single frame
    Metrics(MetricsArgs),

    /// Print JSON schemas of the output records
    Schema,
}

#[derive(Args)]
struct ValidateArgs {
    /// CSV file to check
    file: PathBuf,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct IngestArgs {
    /// CSV file to ingest
    file: PathBuf,

    /// Where to write JSON-lines records ("-" for stdout)
    #[arg(long, short = 'o', default_value = "-")]
    output: String,

    /// Decode without the pre-flight checks
    #[arg(long)]
    skip_preflight: bool,

    /// Print the ingest report as JSON
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct MetricsArgs {
    /// CSV file to decode
    file: PathBuf,

    /// Frame number, starting at 1
    #[arg(long, short = 'f', default_value_t = 1)]
    frame: usize,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // keep stdout clean for machine-readable output
    let json_output = match &cli.command {
        Commands::Validate(args) => args.json,
        Commands::Ingest(args) => args.json || args.output == "-",
        Commands::Metrics(args) => args.json,
        Commands::Schema => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate(args) => run_validate(args, &settings).await?,
        Commands::Ingest(args) => run_ingest(args, settings).await?,
        Commands::Metrics(args) => run_metrics(args, &settings).await?,
        Commands::Schema => print_stdout(&serde_json::to_string_pretty(&output_schemas())?)?,
    }

    Ok(())
}

async fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<()> {
    let validator = PreflightValidator::new(settings.preflight.clone());
    let result = validator.validate_file(&args.file).await;

    if args.json {
        print_stdout(&serialize_json(&result, true)?)?;
    } else {
        print_validation(&result);
    }

    if !result.is_valid {
        std::process::exit(1);
    }
    Ok(())
}

fn print_validation(result: &ValidationResult) {
    let status = if result.is_valid { "valid" } else { "invalid" };
    eprintln!(
        "{}: {status} ({} rows, ~{} frames, {:.2} MB)",
        result.file_name, result.total_rows, result.estimated_frames, result.file_size_mb
    );
    for error in &result.errors {
        eprintln!("  error: {error}");
    }
    for warning in &result.warnings {
        eprintln!("  warning: {warning}");
    }
}

async fn run_ingest(args: IngestArgs, mut settings: Settings) -> Result<()> {
    if args.skip_preflight {
        settings.ingest.run_preflight = false;
    }

    let records_to_stdout = args.output == "-";
    let writer: Box<dyn AsyncWrite + Unpin + Send> = if records_to_stdout {
        Box::new(tokio::io::stdout())
    } else {
        let file = tokio::fs::File::create(&args.output)
            .await
            .with_context(|| format!("Failed to create output file {}", args.output))?;
        Box::new(file)
    };

    let mut pipeline = IngestPipeline::new(settings, JsonLinesSink::new(writer))?;
    let report = pipeline.run(&args.file).await?;

    if args.json {
        let output = serialize_json(&report, args.pretty)?;
        if records_to_stdout {
            eprintln!("{output}");
        } else {
            print_stdout(&output)?;
        }
    } else {
        print_report(&report);
    }

    if report.aborted {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &IngestReport) {
    eprintln!(
        "Processed {} of {} frames from {} ({} failed)",
        report.processed_frames, report.total_frames, report.file_name, report.failed_frames
    );
    if let Some(summary) = &report.summary {
        eprintln!(
            "mean peak={:.2} mean contact={:.2}% mean cov={:.4} max peak={:.0}",
            summary.mean_peak_pressure_index,
            summary.mean_contact_area_percent,
            summary.mean_cov,
            summary.max_peak_pressure_index
        );
    }
    for error in &report.errors {
        eprintln!("  {error}");
    }
}

async fn run_metrics(args: MetricsArgs, settings: &Settings) -> Result<()> {
    let calculator = MetricsCalculator::new(settings.metrics)?;
    let parsed = decode(&args.file).await?;

    if args.frame == 0 || args.frame > parsed.frame_count() {
        bail!(
            "Frame {} out of range: {} has {} frames",
            args.frame,
            args.file.display(),
            parsed.frame_count()
        );
    }
    let parsed_frame = &parsed.frames[args.frame - 1];
    let record = calculator.compute(&parsed_frame.frame, parsed_frame.frame_number() as i64);

    if args.json {
        print_stdout(&serialize_json(&record, true)?)?;
    } else {
        print_stdout(&format!(
            "Frame {} (rows {}-{}): peak={} contact={}% cov={}",
            record.frame_id,
            parsed_frame.row_start,
            parsed_frame.row_end,
            record.peak_pressure_index,
            record.contact_area_percent,
            record.cov
        ))?;
    }
    Ok(())
}

async fn decode(path: &Path) -> Result<sensore_frames::ParseResult> {
    let parsed = FrameDecoder::new()
        .decode_file(path)
        .await
        .map_err(|err| anyhow::anyhow!("Error parsing CSV: {err}"))?;
    log::debug!("{}", parsed.message());
    Ok(parsed)
}
