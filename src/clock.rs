use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Wall time pinned to a chosen start, then advanced by the monotonic clock.
pub struct AnchoredClock {
    wall_anchor: DateTime<Local>,
    monotonic_anchor: Instant,
}

impl AnchoredClock {
    pub fn new(wall_anchor: DateTime<Local>) -> Self {
        Self {
            wall_anchor,
            monotonic_anchor: Instant::now(),
        }
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = self.monotonic_anchor.elapsed();
        let elapsed = chrono::Duration::from_std(elapsed).unwrap_or(chrono::Duration::zero());
        self.wall_anchor + elapsed
    }
}

pub struct SelectedClock {
    pub clock: Box<dyn Clock>,
    pub label: &'static str,
}

pub fn select_clock(anchor: Option<NaiveDateTime>) -> Result<SelectedClock> {
    match anchor {
        None => Ok(SelectedClock {
            clock: Box::new(SystemClock),
            label: "SYSTEM",
        }),
        Some(naive) => {
            let wall_anchor = match Local.from_local_datetime(&naive) {
                LocalResult::Single(dt) => dt,
                LocalResult::Ambiguous(first, _second) => first,
                LocalResult::None => {
                    return Err(anyhow!(
                        "local time {naive} does not exist in this timezone"
                    ));
                }
            };
            Ok(SelectedClock {
                clock: Box::new(AnchoredClock::new(wall_anchor)),
                label: "ANCHORED",
            })
        }
    }
}

pub fn parse_anchor_datetime(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
        .with_context(|| format!("invalid datetime '{input}', expected YYYY-MM-DDTHH:MM[:SS]"))
}
