use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone};

use tribe_types::{Message, Timestamp};

/// Consecutive same-author messages at most this far apart share a header.
pub const GROUP_WINDOW_MS: i64 = 5 * 60 * 1000;

fn local_datetime<Tz: TimeZone>(ts: Timestamp, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(ts).single()
}

/// Calendar date of `ts` in `tz`.
pub fn local_date<Tz: TimeZone>(ts: Timestamp, tz: &Tz) -> Option<NaiveDate> {
    local_datetime(ts, tz).map(|dt| dt.date_naive())
}

fn same_day<Tz: TimeZone>(a: Timestamp, b: Timestamp, tz: &Tz) -> bool {
    match (local_date(a, tz), local_date(b, tz)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// `HH:MM` in `tz`.
pub fn format_time<Tz>(ts: Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    local_datetime(ts, tz)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// "Today", "Yesterday", or `M/D/YYYY`, relative to `now`.
pub fn format_date<Tz: TimeZone>(ts: Timestamp, now: Timestamp, tz: &Tz) -> String {
    let Some(date) = local_date(ts, tz) else {
        return String::new();
    };

    let today = local_date(now, tz);
    if today == Some(date) {
        return "Today".to_string();
    }
    if today.and_then(|d| d.pred_opt()) == Some(date) {
        return "Yesterday".to_string();
    }
    date.format("%-m/%-d/%Y").to_string()
}

/// A separator goes before the first message and wherever the local date changes.
pub fn should_show_date_separator<Tz: TimeZone>(
    current: &Message,
    previous: Option<&Message>,
    tz: &Tz,
) -> bool {
    match previous {
        None => true,
        Some(previous) => !same_day(current.sent_at, previous.sent_at, tz),
    }
}

/// Same author, same local date, and no more than [`GROUP_WINDOW_MS`] apart.
pub fn should_group_message<Tz: TimeZone>(
    current: &Message,
    previous: Option<&Message>,
    tz: &Tz,
) -> bool {
    let Some(previous) = previous else {
        return false;
    };

    if current.author_uuid != previous.author_uuid {
        return false;
    }

    if current.sent_at - previous.sent_at > GROUP_WINDOW_MS {
        return false;
    }

    same_day(current.sent_at, previous.sent_at, tz)
}
