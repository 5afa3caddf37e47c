use clap::{Parser, ValueEnum};
use pid_core::utils::{ConfigError, Controller, ControllerConfig, Gains, Pid, PidCommand, PidMode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path} (line {line}): {source}")]
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg
{
    /// output is the change in actuation
    Inc,
    /// output is the absolute actuation
    Pos,
}

impl From<ModeArg> for PidMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Inc => PidMode::Incremental,
            ModeArg::Pos => PidMode::Positional,
        }
    }
}

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// controller variant
    #[clap(long, value_enum, default_value = "inc")]
    mode: ModeArg,
    /// setpoint
    #[clap(long, default_value_t = 50.0)]
    target: f64,
    #[clap(long, default_value_t = 0.2)]
    kp: f64,
    #[clap(long, default_value_t = 0.5)]
    ki: f64,
    #[clap(long, default_value_t = 0.0)]
    kd: f64,
    /// clamp outputs into [0, MAX]
    #[clap(long)]
    output_max: Option<f64>,
    /// JSON controller config; replaces the controller flags above
    #[clap(long)]
    config: Option<PathBuf>,
    /// JSON-lines file of `{"at": <cycle>, "pc": ...}` commands
    #[clap(long)]
    commands: Option<PathBuf>,
    /// first measured value, before the first step
    #[clap(long, default_value_t = 2.1)]
    start: f64,
    /// measured value increment per cycle
    #[clap(long, default_value_t = 1.3)]
    step: f64,
    /// stop once the measured value exceeds this
    #[clap(long, default_value_t = 125.0)]
    stop: f64,
}

/// A command to apply before cycle `at` (cycles count from 1).
#[derive(Debug, Deserialize)]
struct ScheduledCommand {
    at: u64,
    #[serde(flatten)]
    command: PidCommand,
}

fn read(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(opts: &Opts) -> Result<ControllerConfig, AppError> {
    match &opts.config {
        Some(path) => serde_json::from_str(&read(path)?).map_err(|source| AppError::Json {
            path: path.clone(),
            line: source.line(),
            source,
        }),
        None => Ok(ControllerConfig {
            mode: opts.mode.into(),
            target: opts.target,
            gains: Gains::new(opts.kp, opts.ki, opts.kd),
            output_max: opts.output_max,
        }),
    }
}

fn load_schedule(path: &Path) -> Result<BTreeMap<u64, Vec<PidCommand>>, AppError> {
    let mut schedule: BTreeMap<u64, Vec<PidCommand>> = BTreeMap::new();
    for (idx, line) in read(path)?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: ScheduledCommand =
            serde_json::from_str(line).map_err(|source| AppError::Json {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        schedule.entry(entry.at).or_default().push(entry.command);
    }
    Ok(schedule)
}

/// Run the ramp against the controller, printing each output.
///
/// Returns the number of cycles executed.
fn run(
    pid: &mut Pid,
    opts: &Opts,
    schedule: &mut BTreeMap<u64, Vec<PidCommand>>,
) -> Result<u64, AppError> {
    let mut measured = opts.start;
    let mut actuation = 0.0;
    let mut cycle = 0u64;

    loop {
        measured += opts.step;
        if measured > opts.stop {
            break;
        }
        cycle += 1;

        if let Some(cmds) = schedule.remove(&cycle) {
            for cmd in cmds {
                info!(cycle, ?cmd, "applying command");
                pid.ex_command(cmd)?;
            }
        }

        let out = pid.calculate(measured);
        actuation = match pid.mode() {
            PidMode::Incremental => actuation + out,
            PidMode::Positional => out,
        };
        info!(cycle, measured, out, actuation, "cycle");
        println!("out = {:.6}", out);
    }

    if !schedule.is_empty() {
        warn!(
            pending = schedule.len(),
            "commands scheduled past the last cycle were not applied"
        );
    }
    Ok(cycle)
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let config = load_config(&opts)?;
    let mut schedule = match &opts.commands {
        Some(path) => load_schedule(path)?,
        None => BTreeMap::new(),
    };

    let mut pid = Pid::from_config(&config)?;
    info!(mode = ?pid.mode(), setpoint = pid.target(), gains = ?pid.gains(), "controller ready");

    let cycles = run(&mut pid, &opts, &mut schedule)?;
    debug!(cycles, "ramp finished");
    Ok(())
}
