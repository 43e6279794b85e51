//! MomentumLab CLI — classify price series into BUY/SELL/HOLD signals.
//!
//! Commands:
//! - `classify` — classify one CSV file and print or write the result
//! - `batch` — classify many CSV files in parallel
//! - `synthetic` — write a deterministic random-walk series as CSV
//! - `show-config` — print the effective configuration as TOML
//!
//! Logs go to stderr; stdout carries only the requested output.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use momentumlab_core::ClassifierMode;
use momentumlab_runner::{
    export_series_csv, generate_synthetic, render, run_single, write_output, BatchRunner,
    ClassificationResult, OutputFormat, Runner, RunnerConfig, SyntheticOptions,
};

#[derive(Parser)]
#[command(
    name = "momentumlab",
    about = "MomentumLab CLI — MACD/RSI signal classification"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one `timestamp,close` CSV file.
    Classify {
        /// Input CSV file.
        input: PathBuf,

        #[command(flatten)]
        settings: Settings,

        /// Write output here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Classify many CSV files.
    Batch {
        /// Input CSV files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        settings: Settings,

        /// Write one artifact per input into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Run inputs one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Write a deterministic synthetic series as CSV.
    Synthetic {
        /// Symbol; also seeds the random walk.
        #[arg(long, default_value = "SYNTH")]
        symbol: String,

        /// Number of bars.
        #[arg(long, default_value_t = 390)]
        bars: usize,

        /// Minutes between bars.
        #[arg(long, default_value_t = 1)]
        interval_minutes: i64,

        /// Start timestamp. Defaults to 2024-01-02 09:30:00.
        #[arg(long)]
        start: Option<String>,

        /// Write CSV here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration (file + flags) as TOML.
    ShowConfig {
        #[command(flatten)]
        settings: Settings,
    },
}

/// Config file plus per-key overrides. Flags win over the file.
#[derive(Args)]
struct Settings {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Classifier mode: override or ma_confluence.
    #[arg(long)]
    mode: Option<ClassifierMode>,

    #[arg(long)]
    fast_window: Option<usize>,

    #[arg(long)]
    slow_window: Option<usize>,

    #[arg(long)]
    signal_window: Option<usize>,

    #[arg(long)]
    rsi_window: Option<usize>,

    #[arg(long)]
    short_ma_window: Option<usize>,

    #[arg(long)]
    long_ma_window: Option<usize>,

    /// RSI below this is oversold.
    #[arg(long)]
    oversold: Option<f64>,

    /// RSI above this is overbought.
    #[arg(long)]
    overbought: Option<f64>,

    /// Output format: summary, json or csv.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Embed the per-bar indicator frame in JSON output.
    #[arg(long, default_value_t = false)]
    include_indicators: bool,
}

impl Settings {
    fn resolve(&self) -> Result<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::from_file(path)?,
            None => RunnerConfig::default(),
        };

        let strategy = &mut config.strategy;
        if let Some(mode) = self.mode {
            strategy.mode = mode;
        }
        let windows = &mut strategy.windows;
        for (flag, slot) in [
            (self.fast_window, &mut windows.fast_window),
            (self.slow_window, &mut windows.slow_window),
            (self.signal_window, &mut windows.signal_window),
            (self.rsi_window, &mut windows.rsi_window),
            (self.short_ma_window, &mut windows.short_ma_window),
            (self.long_ma_window, &mut windows.long_ma_window),
        ] {
            if let Some(value) = flag {
                *slot = value;
            }
        }
        if let Some(oversold) = self.oversold {
            strategy.thresholds.oversold = oversold;
        }
        if let Some(overbought) = self.overbought {
            strategy.thresholds.overbought = overbought;
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.output.include_indicators |= self.include_indicators;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Classify {
            input,
            settings,
            output,
        } => run_classify(&input, &settings, output.as_deref()),
        Commands::Batch {
            inputs,
            settings,
            output_dir,
            sequential,
        } => run_batch(&inputs, &settings, output_dir.as_deref(), sequential),
        Commands::Synthetic {
            symbol,
            bars,
            interval_minutes,
            start,
            output,
        } => run_synthetic(&symbol, bars, interval_minutes, start.as_deref(), output.as_deref()),
        Commands::ShowConfig { settings } => {
            print!("{}", settings.resolve()?.to_toml()?);
            Ok(())
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the `info` default.
fn init_logging(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn emit(result: &ClassificationResult, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let text = render(result, format)?;
    match output {
        Some(path) => {
            write_output(path, &text)?;
            info!(path = %path.display(), format = %format, "wrote result");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn run_classify(input: &Path, settings: &Settings, output: Option<&Path>) -> Result<()> {
    let config = settings.resolve()?;
    let result =
        run_single(input, &config).with_context(|| format!("classifying {}", input.display()))?;
    emit(&result, config.output.format, output)
}

fn run_batch(
    inputs: &[PathBuf],
    settings: &Settings,
    output_dir: Option<&Path>,
    sequential: bool,
) -> Result<()> {
    let config = settings.resolve()?;
    let format = config.output.format;
    let batch = BatchRunner::new(Runner::new(&config)?).with_parallelism(!sequential);
    let results = batch.run_files(inputs);

    let mut failures: Vec<(PathBuf, String)> = results
        .failed()
        .map(|(path, err)| (path.clone(), err.to_string()))
        .collect();

    if let Some(dir) = output_dir {
        let ext = match format {
            OutputFormat::Summary => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        let succeeded: Vec<(&PathBuf, &ClassificationResult)> = results
            .entries()
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok().map(|r| (&e.input, r)))
            .collect();
        let stems = artifact_stems(succeeded.iter().map(|(_, r)| r.symbol.as_str()));
        for ((input, result), stem) in succeeded.iter().zip(stems) {
            if stem != result.symbol {
                warn!(input = %input.display(), artifact = %stem, "duplicate symbol, renamed artifact");
            }
            let path = dir.join(format!("{stem}.{ext}"));
            if let Err(e) = emit(result, format, Some(&path)) {
                failures.push(((*input).clone(), format!("{e:#}")));
            }
        }
    } else {
        println!(
            "{:<12} {:>8} {:>8} {:>6} {:>6} {:>6}",
            "Symbol", "Bars", "Current", "Buy", "Sell", "Hold"
        );
        println!("{}", "-".repeat(51));
        for r in results.succeeded() {
            println!(
                "{:<12} {:>8} {:>8} {:>6} {:>6} {:>6}",
                r.symbol,
                r.bar_count,
                r.current_signal.map(|s| s.as_str()).unwrap_or("n/a"),
                r.counts.buy,
                r.counts.sell,
                r.counts.hold
            );
        }
    }

    for (path, err) in &failures {
        error!(input = %path.display(), error = %err, "batch input failed");
    }
    if !failures.is_empty() {
        bail!("{} of {} input(s) failed", failures.len(), results.len());
    }
    Ok(())
}

/// One artifact file stem per symbol, in order.
///
/// A symbol that appears once keeps its name. Repeated symbols (same file
/// stem in different directories) become `SYMBOL-1`, `SYMBOL-2`, ... skipping
/// any name already taken.
fn artifact_stems<'a>(symbols: impl Iterator<Item = &'a str>) -> Vec<String> {
    let symbols: Vec<&str> = symbols.collect();
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for symbol in &symbols {
        *occurrences.entry(*symbol).or_default() += 1;
    }

    let mut taken: HashSet<String> = symbols
        .iter()
        .filter(|s| occurrences[*s] == 1)
        .map(|s| s.to_string())
        .collect();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();

    symbols
        .iter()
        .map(|&symbol| {
            if occurrences[symbol] == 1 {
                return symbol.to_string();
            }
            let n = next_suffix.entry(symbol).or_insert(0);
            loop {
                *n += 1;
                let stem = format!("{symbol}-{n}");
                if taken.insert(stem.clone()) {
                    return stem;
                }
            }
        })
        .collect()
}

fn run_synthetic(
    symbol: &str,
    bars: usize,
    interval_minutes: i64,
    start: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    if interval_minutes <= 0 {
        bail!("--interval-minutes must be positive (got {interval_minutes})");
    }
    let interval = chrono::Duration::try_minutes(interval_minutes)
        .with_context(|| format!("--interval-minutes {interval_minutes} is out of range"))?;
    let mut opts = SyntheticOptions {
        bars,
        interval,
        ..SyntheticOptions::default()
    };
    if let Some(raw) = start {
        opts.start = momentumlab_runner::parse_timestamp(raw)
            .with_context(|| format!("unrecognized --start timestamp '{raw}'"))?;
    }

    let series = generate_synthetic(symbol, &opts)?;
    let text = export_series_csv(&series)?;
    match output {
        Some(path) => {
            write_output(path, &text)?;
            info!(symbol, bars, path = %path.display(), "wrote synthetic series");
        }
        None => print!("{text}"),
    }
    Ok(())
}
