use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

/// Parse a server timestamp. Accepts RFC 3339, naive ISO datetimes (read as UTC) and bare dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    let utc = FixedOffset::east_opt(0)?;
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return utc.from_local_datetime(&naive).single();
        }
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

/// Order two timestamps by instant, falling back to string order when either fails to parse.
pub fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

pub fn format_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

pub fn format_time(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn format_date_time(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_default()
}

/// "Today", "Yesterday", or the formatted date.
pub fn smart_date(value: &str) -> String {
    smart_date_on(value, Local::now().date_naive())
}

pub fn smart_date_on(value: &str, today: NaiveDate) -> String {
    let Some(dt) = parse_timestamp(value) else {
        return String::new();
    };
    let date = dt.date_naive();
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        dt.format("%b %d, %Y").to_string()
    }
}

/// Coarse distance to now, e.g. "3 hours ago".
pub fn relative_time(value: &str) -> String {
    relative_time_at(value, Utc::now())
}

pub fn relative_time_at(value: &str, now: DateTime<Utc>) -> String {
    let Some(dt) = parse_timestamp(value) else {
        return String::new();
    };
    let delta = now.signed_duration_since(dt.with_timezone(&Utc));
    let (past, delta) = if delta < Duration::zero() {
        (false, -delta)
    } else {
        (true, delta)
    };

    let phrase = if delta < Duration::minutes(1) {
        "less than a minute".to_string()
    } else if delta < Duration::hours(1) {
        plural(delta.num_minutes(), "minute")
    } else if delta < Duration::days(1) {
        plural(delta.num_hours(), "hour")
    } else if delta < Duration::days(30) {
        plural(delta.num_days(), "day")
    } else if delta < Duration::days(365) {
        plural(delta.num_days() / 30, "month")
    } else {
        plural(delta.num_days() / 365, "year")
    };

    if past {
        format!("{} ago", phrase)
    } else {
        format!("in {}", phrase)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Yesterday,
    Week,
    Month,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(Period::Today),
            "yesterday" => Ok(Period::Yesterday),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Inclusive `YYYY-MM-DD` bounds for `period`, counted back from `today`.
pub fn date_range(period: Period, today: NaiveDate) -> DateRange {
    let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    let start = match period {
        Period::Today => today,
        Period::Yesterday => today - Duration::days(1),
        Period::Week => today - Duration::days(7),
        Period::Month => today - Duration::days(30),
    };
    let end = match period {
        Period::Yesterday => start,
        _ => today,
    };
    DateRange {
        start: fmt(start),
        end: fmt(end),
    }
}
