use chrono::{
    DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use serde::Serialize;

use crate::timer::model::TargetTime;

const MS_PER_MINUTE: i64 = 60_000;
pub const PROGRESS_SPAN_MINUTES: u32 = 24 * 60;

/// Delay to dial into the cooker. `total_minutes == hours * 60 + minutes` always holds.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct DelayDuration {
    pub hours: u32,
    pub minutes: u32,
    pub total_minutes: u32,
}

impl DelayDuration {
    pub fn from_total_minutes(total_minutes: u32) -> Self {
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
            total_minutes,
        }
    }
}

pub fn compute_duration(now: &DateTime<Local>, target: TargetTime) -> DelayDuration {
    compute_duration_in_tz(now, target, &Local)
}

/// Minutes from `now` until `target` on the calendar day after `now`, rounded up.
pub fn compute_duration_in_tz<Tz>(
    now: &DateTime<Tz>,
    target: TargetTime,
    timezone: &Tz,
) -> DelayDuration
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let Some(candidate) = next_day_target_in_tz(now, target, timezone) else {
        return DelayDuration::default();
    };
    let diff_ms = candidate.signed_duration_since(*now).num_milliseconds();
    let total_minutes = u32::try_from(ceil_minutes(diff_ms)).unwrap_or(u32::MAX);
    DelayDuration::from_total_minutes(total_minutes)
}

/// The instant the cooker should finish: tomorrow (relative to `now`) at the target time.
///
/// `None` only when the calendar runs out of representable days.
pub fn next_day_target_in_tz<Tz>(
    now: &DateTime<Tz>,
    target: TargetTime,
    timezone: &Tz,
) -> Option<DateTime<Tz>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let tomorrow = now.date_naive().checked_add_days(Days::new(1))?;
    let time = NaiveTime::from_hms_opt(target.hour(), target.minute(), 0)?;
    resolve_local_datetime(timezone, tomorrow.and_time(time))
}

/// Share of a 24h span already covered, as shown on the timeline bar.
pub fn progress_percent(total_minutes: u32) -> f64 {
    let ratio = f64::from(total_minutes) / f64::from(PROGRESS_SPAN_MINUTES);
    100.0 - ratio.min(1.0) * 100.0
}

fn ceil_minutes(diff_ms: i64) -> i64 {
    let whole = diff_ms.div_euclid(MS_PER_MINUTE);
    let rounded = if diff_ms.rem_euclid(MS_PER_MINUTE) > 0 {
        whole + 1
    } else {
        whole
    };
    rounded.max(0)
}

fn resolve_local_datetime<Tz>(timezone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(first, _second) => Some(first),
        LocalResult::None => {
            // Skipped by a forward transition: read the wall time with the offset
            // in force before the jump, which lands past the gap.
            let before = naive.checked_sub_days(Days::new(1))?;
            let offset = timezone.from_local_datetime(&before).earliest()?.offset().fix();
            let utc = naive - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
            Some(timezone.from_utc_datetime(&utc))
        }
    }
}
