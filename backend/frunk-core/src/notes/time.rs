//! "5 min ago" style timestamps for the note list.
//!
//! The server stamps notes with naive local wall-clock time, so a timestamp
//! without an offset is read in the viewer's zone. Timestamps that carry `Z`
//! or an explicit offset are taken as written.

use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Describe `timestamp` relative to `now` in the local zone.
pub fn relative_time(timestamp: &str, now: SystemTime) -> String {
    relative_time_in(timestamp, now, &Local)
}

/// Describe `timestamp` relative to `now`, reading offset-less stamps in `zone`.
pub fn relative_time_in<Tz>(timestamp: &str, now: SystemTime, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(time) = parse_timestamp(timestamp.trim(), zone) else {
        return String::from("invalid time");
    };

    let elapsed = DateTime::<Utc>::from(now)
        .signed_duration_since(time)
        .num_seconds();
    // Clock skew puts the timestamp in the future
    if elapsed < MINUTE {
        return String::from("just now");
    }

    if elapsed < HOUR {
        format!("{} min ago", elapsed / MINUTE)
    } else if elapsed < DAY {
        format!("{} h ago", elapsed / HOUR)
    } else if elapsed < WEEK {
        format!("{} d ago", elapsed / DAY)
    } else {
        time.with_timezone(zone).format("%Y-%m-%d %H:%M").to_string()
    }
}

fn parse_timestamp<Tz: TimeZone>(timestamp: &str, zone: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(with_offset.with_timezone(&Utc));
    }

    let naive: NaiveDateTime = timestamp.parse().ok()?;
    // A skipped DST hour has no local reading
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
