//! Natural-language scheduling expression parsing.
//!
//! Three deliberately separate parsers feed three consumption contexts:
//! calendar event start ([`parse_scheduled_time`]), event duration
//! ([`parse_duration`]), and task due date ([`parse_due_date`]). They share
//! vocabulary but differ in fallback defaults and in how "today" is
//! treated, so they are not merged.
//!
//! The scheduled-time and duration parsers are total: any input resolves
//! to a concrete value via documented fallbacks. The due-date parser is
//! the only one allowed to give up (`None`), which callers treat as
//! "no due date" rather than an error.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// `H[:MM]` with an optional am/pm suffix, anywhere in the text
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").unwrap());

/// `<weekday> H[:MM][am|pm]`
static WEEKDAY_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
    )
    .unwrap()
});

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(next|this)\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});

/// Duration formats, checked in order; first match wins
static HOURS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*hours?\b").unwrap());
static MINUTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*minutes?\b").unwrap());
static SHORT_HOURS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*h\b").unwrap());
static SHORT_MINUTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*m\b").unwrap());

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

const DEFAULT_TOMORROW_HOUR: u32 = 9;
const DEFAULT_TODAY_HOUR: u32 = 14;
const DEFAULT_DURATION_MINUTES: i64 = 15;

/// Convert a free-form scheduling-time string into an absolute timestamp.
///
/// Never fails; the fallback chain always produces a concrete instant:
/// strict ISO 8601, "tomorrow", `<weekday> <time>`, "today", "asap"/
/// "urgent" (now + 1h), and finally now + 2h for anything unparseable.
/// Naive ISO datetimes are interpreted as UTC.
pub fn parse_scheduled_time(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let trimmed = text.trim();

    // Strict ISO 8601 first: an explicit timestamp wins over keywords
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return naive.and_utc();
    }

    let lower = trimmed.to_lowercase();

    if lower.contains("tomorrow") {
        let time = match_time(&lower)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(DEFAULT_TOMORROW_HOUR, 0, 0).unwrap());
        let date = now.date_naive() + Duration::days(1);
        return date.and_time(time).and_utc();
    }

    if let Some(caps) = WEEKDAY_TIME_RE.captures(&lower) {
        let weekday = parse_weekday(&caps[1]).unwrap_or(Weekday::Mon);
        let time = build_time(
            caps[2].parse().unwrap_or(DEFAULT_TOMORROW_HOUR),
            caps.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
            caps.get(4).map(|m| m.as_str()),
        );
        // Next occurrence with today excluded: a matching today rolls +7
        let mut days_ahead = days_until(now.date_naive().weekday(), weekday);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        let date = now.date_naive() + Duration::days(days_ahead);
        return date.and_time(time).and_utc();
    }

    if lower.contains("today") {
        let time = match_time(&lower)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(DEFAULT_TODAY_HOUR, 0, 0).unwrap());
        let mut scheduled = now.date_naive().and_time(time).and_utc();
        if scheduled <= now {
            // That moment has already passed; same time tomorrow
            scheduled += Duration::days(1);
        }
        return scheduled;
    }

    if lower.contains("asap") || lower.contains("urgent") {
        return now + Duration::hours(1);
    }

    warn!(text = trimmed, "unparseable scheduled time, falling back to now + 2h");
    now + Duration::hours(2)
}

/// Convert a free-form duration string into a concrete duration.
///
/// Null/empty and unparseable inputs both resolve to 15 minutes. Formats
/// are checked in order: `<N> hour(s)`, `<N> minute(s)`, `<N>h`, `<N>m`.
pub fn parse_duration(text: Option<&str>) -> Duration {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Duration::minutes(DEFAULT_DURATION_MINUTES),
    };

    for (re, per_hour) in [
        (&*HOURS_RE, true),
        (&*MINUTES_RE, false),
        (&*SHORT_HOURS_RE, true),
        (&*SHORT_MINUTES_RE, false),
    ] {
        if let Some(caps) = re.captures(text) {
            let amount = caps[1].parse::<i64>().ok();
            let duration = amount.and_then(|n| {
                if per_hour {
                    Duration::try_hours(n)
                } else {
                    Duration::try_minutes(n)
                }
            });
            if let Some(duration) = duration {
                return duration;
            }
        }
    }

    debug!(text, "unparseable duration, falling back to 15 minutes");
    Duration::minutes(DEFAULT_DURATION_MINUTES)
}

/// Parse a relative due-date phrase into a calendar date.
///
/// Recognizes "tomorrow", "next <weekday>" (strictly after today),
/// "this <weekday>" (today allowed), strict `YYYY-MM-DD`, and a few
/// generic date formats. Returns `None` when nothing matches; this is a
/// recoverable miss, not an error.
pub fn parse_due_date(text: Option<&str>, now: DateTime<Utc>) -> Option<NaiveDate> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return None,
    };
    let lower = text.to_lowercase();
    let today = now.date_naive();

    if lower.contains("tomorrow") {
        return Some(today + Duration::days(1));
    }

    if let Some(caps) = WEEKDAY_RE.captures(&lower) {
        let weekday = parse_weekday(&caps[2])?;
        let mut days_ahead = days_until(today.weekday(), weekday);
        // "next friday" on a Friday means a week out; "this friday" means today
        if days_ahead == 0 && &caps[1] == "next" {
            days_ahead = 7;
        }
        return Some(today + Duration::days(days_ahead));
    }

    if ISO_DATE_RE.is_match(text) {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
    }

    // Generic formats as a last resort
    for format in ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    warn!(text, "unparseable due date, leaving task without one");
    None
}

/// Days from `from` until the next `to`, 0 when they match
fn days_until(from: Weekday, to: Weekday) -> i64 {
    let from = i64::from(from.num_days_from_monday());
    let to = i64::from(to.num_days_from_monday());
    (to - from).rem_euclid(7)
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Find an `H[:MM][am|pm]` expression anywhere in the text
fn match_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_RE.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    if hour > 23 {
        return None;
    }
    let minute: u32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some(build_time(hour, minute, caps.get(3).map(|m| m.as_str())))
}

fn build_time(hour: u32, minute: u32, meridiem: Option<&str>) -> NaiveTime {
    let hour = match meridiem.map(str::to_lowercase).as_deref() {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}
