use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TARGET: TargetTime = TargetTime {
    hour: 7,
    minute: 0,
};

const DEFAULT_PRESET_TIMES: [(u32, u32); 5] = [(6, 0), (6, 30), (7, 0), (7, 30), (8, 0)];

/// Rejected target-time input. Every variant is an invalid-argument condition.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TargetTimeError {
    #[error("hour {0} out of range, expected 0-23")]
    InvalidHour(u32),
    #[error("minute {0} out of range, expected 0-59")]
    InvalidMinute(u32),
    #[error("invalid time '{0}', expected HH:MM")]
    Malformed(String),
}

/// Wall-clock time of day, always interpreted as falling on the next calendar day.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct TargetTime {
    hour: u32,
    minute: u32,
}

impl TargetTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, TargetTimeError> {
        if hour > 23 {
            return Err(TargetTimeError::InvalidHour(hour));
        }
        if minute > 59 {
            return Err(TargetTimeError::InvalidMinute(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    pub fn with_hour(self, hour: u32) -> Result<Self, TargetTimeError> {
        Self::new(hour, self.minute)
    }

    pub fn with_minute(self, minute: u32) -> Result<Self, TargetTimeError> {
        Self::new(self.hour, minute)
    }
}

impl Default for TargetTime {
    fn default() -> Self {
        DEFAULT_TARGET
    }
}

impl fmt::Display for TargetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TargetTime {
    type Err = TargetTimeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let malformed = || TargetTimeError::Malformed(input.to_string());
        let (hour_text, minute_text) = trimmed.split_once(':').ok_or_else(malformed)?;
        if hour_text.is_empty() || hour_text.len() > 2 || minute_text.len() != 2 {
            return Err(malformed());
        }
        let hour = hour_text.parse::<u32>().map_err(|_| malformed())?;
        let minute = minute_text.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Preset {
    pub label: String,
    pub target: TargetTime,
}

impl Preset {
    pub fn new(label: impl Into<String>, target: TargetTime) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

pub fn default_presets() -> Vec<Preset> {
    DEFAULT_PRESET_TIMES
        .iter()
        .filter_map(|&(hour, minute)| TargetTime::new(hour, minute).ok())
        .map(|target| Preset::new(target.to_string(), target))
        .collect()
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

#[derive(Debug, Clone)]
pub struct TimerConfig {
    #[allow(dead_code)]
    pub version: u32,
    pub locale: Locale,
    pub default_target: TargetTime,
    pub presets: Vec<Preset>,
    pub gui_font: Option<PathBuf>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            locale: Locale::default(),
            default_target: DEFAULT_TARGET,
            presets: default_presets(),
            gui_font: None,
        }
    }
}

impl TimerConfig {
    pub fn find_preset(&self, label: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.label == label)
    }
}

pub fn load_timer_config(path: &Path) -> Result<TimerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read config file {}", path.display()))?;
    parse_timer_config_text(&content)
}

pub fn parse_timer_config_text(content: &str) -> Result<TimerConfig> {
    let raw = serde_json::from_str::<TimerConfigFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != 1 {
        bail!(
            "unsupported config version {}; expected version 1",
            raw.version
        );
    }

    let default_target = match raw.default_target.as_deref() {
        Some(text) => text
            .parse::<TargetTime>()
            .context("invalid default_target")?,
        None => DEFAULT_TARGET,
    };

    let presets = match raw.presets {
        Some(files) => parse_presets(files)?,
        None => default_presets(),
    };

    Ok(TimerConfig {
        version: raw.version,
        locale: raw.locale.unwrap_or_default(),
        default_target,
        presets,
        gui_font: raw.gui_font,
    })
}

fn parse_presets(files: Vec<PresetFile>) -> Result<Vec<Preset>> {
    let mut labels = HashSet::new();
    let mut presets = Vec::with_capacity(files.len());
    for preset in files {
        let label = preset.label.trim().to_string();
        if label.is_empty() {
            bail!("preset label must not be empty");
        }
        if !labels.insert(label.clone()) {
            bail!("duplicate preset label found: {label}");
        }
        let target = preset
            .time
            .parse::<TargetTime>()
            .with_context(|| format!("invalid time for preset '{label}'"))?;
        presets.push(Preset { label, target });
    }
    Ok(presets)
}

#[derive(Debug, Deserialize)]
struct TimerConfigFile {
    version: u32,
    #[serde(default)]
    locale: Option<Locale>,
    #[serde(default)]
    default_target: Option<String>,
    #[serde(default)]
    presets: Option<Vec<PresetFile>>,
    #[serde(default)]
    gui_font: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct PresetFile {
    label: String,
    time: String,
}
