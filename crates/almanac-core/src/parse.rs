use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::format;
use crate::zone;

#[derive(Debug, Clone)]
pub enum ValueInput {
    Instant(DateTime<Tz>),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ParseOptions<'a> {
    pub zone: Tz,
    pub format: Option<&'a str>,
    pub extra_formats: &'a [String],
}

impl ParseOptions<'_> {
    pub fn for_zone(zone: Tz) -> Self {
        Self {
            zone,
            format: None,
            extra_formats: &[],
        }
    }
}

struct ClockTime {
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
}

#[tracing::instrument(skip_all, fields(zone = %opts.zone))]
pub fn parse_value(
    input: Option<&ValueInput>,
    opts: &ParseOptions<'_>,
    now: DateTime<Utc>,
) -> Option<DateTime<Tz>> {
    for pattern in opts.extra_formats {
        assert!(
            format::valid_pattern(pattern),
            "invalid strftime pattern in extra formats: {pattern}"
        );
    }
    match input? {
        ValueInput::Instant(instant) => Some(instant.with_timezone(&opts.zone)),
        ValueInput::Text(raw) => parse_text(raw, opts, now),
    }
}

fn parse_text(raw: &str, opts: &ParseOptions<'_>, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(pattern) = opts.format
        && let Some(parsed) = format::parse_exact(token, pattern, opts.zone)
    {
        return Some(parsed);
    }

    if let Some(clock) = parse_clock_24h(token) {
        return clock_today(clock, opts.zone, now);
    }

    if let Some(clock) = parse_clock_12h(token) {
        return clock_today(clock, opts.zone, now);
    }

    for known in format::COMMON_FORMATS {
        if let Some(parsed) = format::parse_exact(token, known.pattern, opts.zone) {
            return Some(parsed);
        }
    }

    for pattern in opts.extra_formats {
        if let Some(parsed) = format::parse_exact(token, pattern, opts.zone) {
            return Some(parsed);
        }
    }

    if let Some(parsed) = parse_native(token, opts.zone) {
        return Some(parsed);
    }

    tracing::debug!(input = token, zone = %opts.zone, "exhausted every parsing strategy for input");
    None
}

fn clock_today(clock: ClockTime, zone: Tz, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
    let today = zone::today_in(zone, now);
    let local = today.and_hms_milli_opt(clock.hour, clock.minute, clock.second, clock.millisecond)?;
    Some(zone::resolve_wall_clock(zone, local))
}

fn parse_clock_24h(token: &str) -> Option<ClockTime> {
    let clock_re = Regex::new(
        r"^(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2})(?:\.(?P<fraction>\d{1,3}))?)?$",
    )
    .ok()?;
    let captures = clock_re.captures(token)?;

    let hour = captures.name("hour")?.as_str().parse::<u32>().ok()?;
    let minute = captures.name("minute")?.as_str().parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    let second = match captures.name("second") {
        Some(matched) => {
            let second = matched.as_str().parse::<u32>().ok()?;
            if second > 59 {
                return None;
            }
            second
        }
        None => 0,
    };

    let millisecond = match captures.name("fraction") {
        Some(matched) => pad_fraction_millis(matched.as_str())?,
        None => 0,
    };

    Some(ClockTime {
        hour,
        minute,
        second,
        millisecond,
    })
}

fn parse_clock_12h(token: &str) -> Option<ClockTime> {
    let clock_re = Regex::new(
        r"(?i)^(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2}))?\s*(?P<period>[ap]m)$",
    )
    .ok()?;
    let captures = clock_re.captures(token)?;

    let raw_hour = captures.name("hour")?.as_str().parse::<u32>().ok()?;
    let minute = captures.name("minute")?.as_str().parse::<u32>().ok()?;
    if raw_hour == 0 || raw_hour > 12 || minute > 59 {
        return None;
    }

    let second = match captures.name("second") {
        Some(matched) => {
            let second = matched.as_str().parse::<u32>().ok()?;
            if second > 59 {
                return None;
            }
            second
        }
        None => 0,
    };

    let period = captures.name("period")?.as_str().to_ascii_lowercase();
    let hour = match period.as_str() {
        "am" => {
            if raw_hour == 12 {
                0
            } else {
                raw_hour
            }
        }
        "pm" => {
            if raw_hour == 12 {
                12
            } else {
                raw_hour + 12
            }
        }
        _ => return None,
    };

    Some(ClockTime {
        hour,
        minute,
        second,
        millisecond: 0,
    })
}

fn pad_fraction_millis(raw: &str) -> Option<u32> {
    format!("{raw:0<3}").parse::<u32>().ok()
}

fn parse_native(token: &str, zone: Tz) -> Option<DateTime<Tz>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(token) {
        return Some(parsed.with_timezone(&zone));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(token) {
        return Some(parsed.with_timezone(&zone));
    }

    if let Ok(parsed) = token.parse::<NaiveDateTime>() {
        return Some(zone::resolve_wall_clock(zone, parsed));
    }

    if let Ok(parsed) = token.parse::<NaiveDate>() {
        let midnight = parsed.and_hms_opt(0, 0, 0)?;
        return Some(zone::resolve_wall_clock(zone, midnight));
    }

    None
}
