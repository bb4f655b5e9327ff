//! codecsweep - Parameter sweep benchmarking for compression codecs
//!
//! Runs a codec over every combination of its tuning parameters on one input
//! file and reports the fastest, leanest and tightest configurations.

mod display;
mod input;
mod json_output;
mod progress;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codecsweep_codecs::CodecRegistry;
use codecsweep_config::{
    build_params, build_space, Config, ConfigLoader, OutputFormat, RangeOverrides,
};
use codecsweep_engine::{ProfileSampler, SweepConfig, SweepRunner, TrackingAllocator};
use codecsweep_types::{CellTimeout, CodecFamily, WorkerCount};
use console::style;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::display::{display_error, display_warning, print_profile, print_report};
use crate::json_output::{ProfileJson, SweepReportJson};
use crate::progress::SweepProgress;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new();

/// Every point failed, so there is nothing to report
const EXIT_ALL_FAILED: u8 = 2;

/// codecsweep - Parameter sweep benchmarking for compression codecs
#[derive(Parser)]
#[command(
    name = "codecsweep",
    version = env!("CARGO_PKG_VERSION"),
    about = "Parameter sweep benchmarking for compression codecs",
    long_about = "codecsweep measures a compression codec over every combination of its\n\
                  tuning parameters and reports the best configuration for time, peak\n\
                  memory, compression percentage and compression ratio."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep a codec over a parameter grid
    Sweep {
        /// Codec family
        #[arg(value_enum)]
        family: FamilyArg,
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        ranges: RangeArgs,
        /// Grid cells evaluated concurrently (0 = all cores)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Deadline per grid cell in seconds
        #[arg(long)]
        timeout: Option<f64>,
        /// Run one untimed sample before the sweep
        #[arg(long)]
        warmup: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// List failed points with their errors
        #[arg(long)]
        show_failures: bool,
    },
    /// Measure a single parameter set
    Profile {
        /// Codec family
        #[arg(value_enum)]
        family: FamilyArg,
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        ranges: RangeArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

/// Per-axis range expressions
#[derive(Args, Clone, Default)]
struct RangeArgs {
    /// Brotli quality, e.g. `0..12` or `5`
    #[arg(long)]
    quality: Option<String>,
    /// Brotli modes, e.g. `generic,text`
    #[arg(long)]
    mode: Option<String>,
    /// Brotli window bits, e.g. `10..=24`
    #[arg(long)]
    window_bits: Option<String>,
    /// Gzip, LZ4 or Zstd level, e.g. `1..10` or `-5..0`
    #[arg(long, allow_hyphen_values = true)]
    level: Option<String>,
    /// LZ4 block sizes, e.g. `max64kb,max4mb`
    #[arg(long)]
    block_size: Option<String>,
}

impl From<RangeArgs> for RangeOverrides {
    fn from(args: RangeArgs) -> Self {
        Self {
            quality: args.quality,
            mode: args.mode,
            window_bits: args.window_bits,
            level: args.level,
            block_size: args.block_size,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum FamilyArg {
    Brotli,
    Gzip,
    Lz4,
    Zstd,
    Snappy,
}

impl From<FamilyArg> for CodecFamily {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::Brotli => CodecFamily::Brotli,
            FamilyArg::Gzip => CodecFamily::Gzip,
            FamilyArg::Lz4 => CodecFamily::Lz4,
            FamilyArg::Zstd => CodecFamily::Zstd,
            FamilyArg::Snappy => CodecFamily::Snappy,
        }
    }
}

/// How long exit waits for blocking work left behind by timed-out cells
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(cli.debug, cli.quiet, cli.verbose) {
        display_error(&format!("{:#}", error));
        return ExitCode::FAILURE;
    }

    info!("codecsweep v{} starting", env!("CARGO_PKG_VERSION"));

    match run_to_completion(run(cli)).and_then(|result| result) {
        Ok(code) => code,
        Err(error) => {
            display_error(&format!("{:#}", error));
            ExitCode::FAILURE
        }
    }
}

/// Drive `future` on a fresh runtime, then shut it down without waiting on
/// codec calls that outlived their deadline
fn run_to_completion<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    Ok(output)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let quiet = cli.quiet;
    let config_path = cli.config;

    match cli.command {
        Commands::Sweep {
            family,
            input,
            ranges,
            workers,
            timeout,
            warmup,
            json,
            show_failures,
        } => {
            let config = load_config(config_path.as_deref())?;
            let options = SweepOptions {
                family: family.into(),
                input,
                ranges: ranges.into(),
                workers,
                timeout,
                warmup,
                json,
                show_failures,
                quiet,
            };
            sweep_command(&config, options).await
        }
        Commands::Profile {
            family,
            input,
            ranges,
            json,
        } => {
            let config = load_config(config_path.as_deref())?;
            profile_command(&config, family.into(), &input, &ranges.into(), json).await
        }
        Commands::Config { default } => {
            config_command(config_path.as_deref(), default)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(debug: bool, quiet: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).context("Invalid log filter")?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => ConfigLoader::load_default().context("Failed to load configuration"),
    }
}

struct SweepOptions {
    family: CodecFamily,
    input: PathBuf,
    ranges: RangeOverrides,
    workers: Option<usize>,
    timeout: Option<f64>,
    warmup: bool,
    json: bool,
    show_failures: bool,
    quiet: bool,
}

impl SweepOptions {
    /// Command line flags over the configuration file
    fn sweep_config(&self, config: &Config) -> Result<SweepConfig> {
        let workers = match self.workers {
            Some(0) => WorkerCount::available(),
            Some(count) => WorkerCount::new(count).map_err(anyhow::Error::msg)?,
            None => config.sweep.workers,
        };

        let cell_timeout = match self.timeout {
            Some(secs) => Some(
                CellTimeout::from_secs_f64(secs)
                    .map_err(anyhow::Error::msg)
                    .context("Invalid --timeout")?,
            ),
            None => config.sweep.cell_timeout()?,
        };

        Ok(SweepConfig {
            workers,
            cell_timeout,
            warmup: self.warmup || config.sweep.warmup,
        })
    }
}

async fn sweep_command(config: &Config, options: SweepOptions) -> Result<ExitCode> {
    let space = build_space(options.family, &config.ranges, &options.ranges)
        .context("Invalid parameter ranges")?;
    let runner = SweepRunner::new(options.sweep_config(config)?);
    let json = options.json || config.output.format == OutputFormat::Json;

    let data = input::load_input(&options.input)?;

    if !options.quiet && !json {
        println!(
            "{} Sweeping {} over {} ({} combinations)",
            style("→").green().bold(),
            style(options.family).cyan(),
            style(options.input.display()).cyan(),
            style(space.cardinality()).yellow()
        );
    }

    let mut progress = SweepProgress::new(space.cardinality() as u64, options.quiet || json);
    let report = runner
        .run(
            &space,
            CodecRegistry::shared(options.family),
            Arc::from(data),
            |point| progress.observe(point),
        )
        .await?;
    progress.finish_and_clear();

    if json {
        let document = SweepReportJson::new(&report, &options.input);
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else if !options.quiet || report.all_failed() {
        print_report(
            &report,
            &options.input,
            config.output.memory_unit,
            options.show_failures,
        );
    }

    if report.all_failed() {
        if !json {
            display_warning(&format!(
                "All {} points failed; no optimal parameters to report",
                progress.failed()
            ));
        }
        return Ok(ExitCode::from(EXIT_ALL_FAILED));
    }

    Ok(ExitCode::SUCCESS)
}

async fn profile_command(
    config: &Config,
    family: CodecFamily,
    input: &Path,
    ranges: &RangeOverrides,
    json: bool,
) -> Result<ExitCode> {
    let params = build_params(family, ranges).context("Invalid parameters")?;
    let json = json || config.output.format == OutputFormat::Json;
    let data = input::load_input(input)?;

    let measured = tokio::task::spawn_blocking(move || {
        let adapter = CodecRegistry::adapter_for(family);
        ProfileSampler::new(adapter.as_ref()).sample(&data, params)
    })
    .await
    .context("Profiling worker failed")?;

    match measured {
        Ok(result) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ProfileJson::new(&result, input))?
                );
            } else {
                print_profile(&result, input, config.output.memory_unit);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) if error.is_point_failure() => {
            display_error(&error.to_string());
            Ok(ExitCode::from(EXIT_ALL_FAILED))
        }
        Err(error) => Err(error.into()),
    }
}

fn config_command(path: Option<&Path>, default: bool) -> Result<()> {
    let config = if default {
        println!("{} Default configuration:", style("⚙").blue().bold());
        Config::default()
    } else {
        println!("{} Current configuration:", style("⚙").blue().bold());
        load_config(path)?
    };

    print!("{}", ConfigLoader::to_yaml(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Instant;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_abandoned_blocking_work_does_not_delay_exit() {
        let started = Instant::now();
        let value = run_to_completion(async {
            drop(tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_secs(5));
            }));
            7
        })
        .unwrap();

        assert_eq!(value, 7);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_sweep_arguments_parse() {
        let cli = Cli::try_parse_from([
            "codecsweep",
            "--quiet",
            "sweep",
            "lz4",
            "--input",
            "data.bin",
            "--level",
            "-5..0",
            "--block-size",
            "max64kb",
            "--workers",
            "4",
            "--timeout",
            "2.5",
        ])
        .unwrap();

        assert!(cli.quiet);
        let Commands::Sweep {
            family,
            ranges,
            workers,
            timeout,
            ..
        } = cli.command
        else {
            panic!("expected sweep");
        };
        assert_eq!(CodecFamily::from(family), CodecFamily::Lz4);
        assert_eq!(ranges.level.as_deref(), Some("-5..0"));
        assert_eq!(ranges.block_size.as_deref(), Some("max64kb"));
        assert_eq!(workers, Some(4));
        assert_eq!(timeout, Some(2.5));
    }

    fn options(workers: Option<usize>, timeout: Option<f64>) -> SweepOptions {
        SweepOptions {
            family: CodecFamily::Gzip,
            input: PathBuf::from("data.bin"),
            ranges: RangeOverrides::default(),
            workers,
            timeout,
            warmup: false,
            json: false,
            show_failures: false,
            quiet: true,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.sweep.cell_timeout_secs = Some(10.0);
        config.sweep.warmup = true;

        let sweep = options(Some(3), Some(0.5)).sweep_config(&config).unwrap();
        assert_eq!(sweep.workers.get(), 3);
        assert_eq!(
            sweep.cell_timeout.map(CellTimeout::get),
            Some(Duration::from_millis(500))
        );
        assert!(sweep.warmup);

        let sweep = options(None, None).sweep_config(&config).unwrap();
        assert!(sweep.workers.is_sequential());
        assert_eq!(
            sweep.cell_timeout.map(CellTimeout::get),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let config = Config::default();
        assert!(options(Some(10_000), None).sweep_config(&config).is_err());
        assert!(options(None, Some(-1.0)).sweep_config(&config).is_err());
        assert!(options(None, Some(1e20)).sweep_config(&config).is_err());
    }
}
