mod clock;
mod logging;
mod ticker;
mod timer;
mod ui;
mod view;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use crate::clock::{SelectedClock, parse_anchor_datetime, select_clock};
use crate::ticker::{REFRESH_PERIOD, Ticker};
use crate::timer::calculator::compute_duration;
use crate::timer::model::{Locale, TargetTime, TimerConfig, load_timer_config};
use crate::timer::state::TimerState;
use crate::view::{DisplaySnapshot, render_text};

const DEFAULT_CONFIG_FILE: &str = "ricetimer.json";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLocale {
    Zh,
    En,
}

impl From<CliLocale> for Locale {
    fn from(value: CliLocale) -> Self {
        match value {
            CliLocale::Zh => Locale::Zh,
            CliLocale::En => Locale::En,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ricetimer",
    version,
    about = "Works out the rice-cooker delay timer for a finish time tomorrow"
)]
struct Cli {
    /// JSON config; defaults to ./ricetimer.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Finish time tomorrow, HH:MM.
    #[arg(long, conflicts_with = "preset")]
    target: Option<TargetTime>,

    /// Start from the preset with this label.
    #[arg(long)]
    preset: Option<String>,

    #[arg(long, value_enum)]
    locale: Option<CliLocale>,

    /// Pretend the local clock reads this datetime at startup.
    #[arg(long)]
    at: Option<String>,

    /// Print the current result and exit.
    #[arg(long, conflicts_with_all = ["json", "watch"])]
    once: bool,

    /// Print the current result as JSON and exit.
    #[arg(long, conflicts_with = "watch")]
    json: bool,

    /// Print a refreshed result once per second, N times.
    #[arg(long, value_name = "N")]
    watch: Option<u32>,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level)?;

    if cli.watch == Some(0) {
        bail!("--watch must be greater than zero");
    }

    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(locale) = cli.locale {
        config.locale = locale.into();
    }

    let initial_target = match (cli.target, cli.preset.as_deref()) {
        (Some(target), _) => target,
        (None, Some(label)) => {
            config
                .find_preset(label)
                .ok_or_else(|| anyhow!("unknown preset '{label}'"))?
                .target
        }
        (None, None) => config.default_target,
    };
    let state = TimerState::new(initial_target);

    let anchor = cli
        .at
        .as_deref()
        .map(parse_anchor_datetime)
        .transpose()?;
    let clock = select_clock(anchor)?;
    info!(
        clock = clock.label,
        target = %initial_target,
        locale = ?config.locale,
        total_minutes = compute_duration(&clock.clock.now(), initial_target).total_minutes,
        "ricetimer starting"
    );

    if cli.once {
        print!("{}", render_text(&snapshot_now(&clock, &state, &config)));
        return Ok(());
    }
    if cli.json {
        let snapshot = snapshot_now(&clock, &state, &config);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if let Some(count) = cli.watch {
        return watch(&clock, &state, &config, count);
    }

    ui::app::run_gui(clock, state, config)
}

fn resolve_config(path: Option<&Path>) -> Result<TimerConfig> {
    if let Some(path) = path {
        return load_timer_config(path)
            .with_context(|| format!("failed to load {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        load_timer_config(default_path)
            .with_context(|| format!("failed to load {}", default_path.display()))
    } else {
        debug!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
        Ok(TimerConfig::default())
    }
}

fn snapshot_now(
    clock: &SelectedClock,
    state: &TimerState,
    config: &TimerConfig,
) -> DisplaySnapshot {
    let now = clock.clock.now();
    DisplaySnapshot::build(&now, &Local, state, &config.presets, config.locale)
}

fn watch(
    clock: &SelectedClock,
    state: &TimerState,
    config: &TimerConfig,
    count: u32,
) -> Result<()> {
    let mut ticker = Ticker::new(REFRESH_PERIOD);
    for index in 0..count {
        ticker.wait();
        let snapshot = snapshot_now(clock, state, config);
        debug!(
            tick = ticker.ticks(),
            skipped = ticker.skipped(),
            total_minutes = snapshot.duration.total_minutes,
            "refreshed"
        );
        if index > 0 {
            println!();
        }
        print!("{}", render_text(&snapshot));
    }
    Ok(())
}
