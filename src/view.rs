use std::fmt::{self, Write as _};

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::Serialize;

use crate::timer::calculator::{DelayDuration, compute_duration_in_tz, progress_percent};
use crate::timer::model::{Locale, Preset, TargetTime};
use crate::timer::state::TimerState;

const WEEKDAYS_ZH: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];
const PROGRESS_BAR_WIDTH: usize = 24;

/// Everything the presentation layer shows for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DisplaySnapshot {
    pub current_time: String,
    pub current_date: String,
    pub timeline_now: String,
    pub target_time: String,
    pub hours_text: String,
    pub minutes_text: String,
    pub duration: DelayDuration,
    pub summary: String,
    pub progress_percent: f64,
    pub active_preset: Option<String>,
    pub locale: Locale,
}

impl DisplaySnapshot {
    pub fn build<Tz>(
        now: &DateTime<Tz>,
        timezone: &Tz,
        state: &TimerState,
        presets: &[Preset],
        locale: Locale,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Copy + fmt::Display,
    {
        let target = state.target();
        let duration = compute_duration_in_tz(now, target, timezone);
        Self {
            current_time: format!(
                "{:02}:{:02}:{:02}",
                now.hour(),
                now.minute(),
                now.second()
            ),
            current_date: format_date(now, locale),
            timeline_now: format!("{:02}:{:02}", now.hour(), now.minute()),
            target_time: target.to_string(),
            hours_text: format!("{:02}", duration.hours),
            minutes_text: format!("{:02}", duration.minutes),
            duration,
            summary: summary_sentence(target, duration, locale),
            progress_percent: progress_percent(duration.total_minutes),
            active_preset: state
                .active_preset(presets)
                .map(|preset| preset.label.clone()),
            locale,
        }
    }
}

pub fn format_date<Tz>(now: &DateTime<Tz>, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match locale {
        Locale::Zh => format!(
            "{}年{}月{}日 星期{}",
            now.year(),
            now.month(),
            now.day(),
            WEEKDAYS_ZH[now.weekday().num_days_from_sunday() as usize]
        ),
        Locale::En => now.format("%A, %B %d %Y").to_string(),
    }
}

pub fn summary_sentence(target: TargetTime, duration: DelayDuration, locale: Locale) -> String {
    match locale {
        Locale::Zh => format!(
            "从现在到明天 {target}，共需定时 {} 分钟",
            duration.total_minutes
        ),
        Locale::En => format!(
            "From now until tomorrow {target}, set the timer for {} minutes",
            duration.total_minutes
        ),
    }
}

pub struct Labels {
    pub current_time: &'static str,
    pub target: &'static str,
    pub tomorrow: &'static str,
    pub delay: &'static str,
    pub hours: &'static str,
    pub minutes: &'static str,
    pub total: &'static str,
    pub presets: &'static str,
    pub timeline: &'static str,
}

pub fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::Zh => Labels {
            current_time: "当前时间",
            target: "完成时间",
            tomorrow: "明天",
            delay: "定时时长",
            hours: "小时",
            minutes: "分钟",
            total: "共",
            presets: "快捷选择",
            timeline: "时间线",
        },
        Locale::En => Labels {
            current_time: "Current time",
            target: "Ready at",
            tomorrow: "tomorrow",
            delay: "Timer delay",
            hours: "h",
            minutes: "min",
            total: "total",
            presets: "Presets",
            timeline: "Timeline",
        },
    }
}

pub fn render_text(snapshot: &DisplaySnapshot) -> String {
    let labels = labels(snapshot.locale);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {}  {}",
        labels.current_time, snapshot.current_time, snapshot.current_date
    );
    let _ = writeln!(
        out,
        "{}: {} {}",
        labels.target, labels.tomorrow, snapshot.target_time
    );
    let _ = writeln!(
        out,
        "{}: {} {} {} {} ({} {} {})",
        labels.delay,
        snapshot.hours_text,
        labels.hours,
        snapshot.minutes_text,
        labels.minutes,
        labels.total,
        snapshot.duration.total_minutes,
        labels.minutes
    );
    let _ = writeln!(out, "{}", snapshot.summary);
    let _ = writeln!(
        out,
        "{}: {} [{}] {} {}%",
        labels.timeline,
        snapshot.timeline_now,
        progress_bar(snapshot.progress_percent),
        snapshot.target_time,
        snapshot.progress_percent.round() as u32
    );
    out
}

fn progress_bar(percent: f64) -> String {
    let share = percent.clamp(0.0, 100.0) / 100.0;
    let filled = (share * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let mut bar = "#".repeat(filled);
    bar.push_str(&".".repeat(PROGRESS_BAR_WIDTH - filled));
    bar
}
