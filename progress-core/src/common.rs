use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::error::{Result, StatsError};

/// The next time the clock hits `hour` o'clock, in seconds since epoch.
///
/// If it's 1 am and the day starts at 4 am, that's 4 am today.
pub fn next_day_cutoff<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Result<i64> {
    if hour > 23 {
        return Err(StatsError::invalid_argument(
            "cutoff_hour",
            format!("must be between 0 and 23, got {hour}"),
        ));
    }

    let today = now.date_naive();
    let days = [Some(today), today.succ_opt()];

    for day in days.into_iter().flatten() {
        if let Some(cutoff) = at_hour(&now.timezone(), day, hour) {
            if cutoff > *now {
                return Ok(cutoff.timestamp());
            }
        }
    }

    Err(StatsError::invalid_argument(
        "cutoff_hour",
        format!("no {hour}:00 after {}", now.naive_local()),
    ))
}

/// The local day cutoff right now.
pub fn local_day_cutoff(hour: u32) -> Result<i64> {
    next_day_cutoff(&Local::now(), hour)
}

fn at_hour<Tz: TimeZone>(tz: &Tz, day: NaiveDate, hour: u32) -> Option<DateTime<Tz>> {
    let time = day.and_hms_opt(hour, 0, 0)?;
    // skipped by a dst change, take the first valid hour after
    tz.from_local_datetime(&time)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(time + chrono::Duration::hours(1))).earliest())
}
