use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use serde::Deserialize;

const TIMEZONE_ENV_VAR: &str = "ALMANAC_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str = "ALMANAC_TIME_CONFIG";
const TIMEZONE_CONFIG_FILE: &str = "almanac-time.toml";
const DEFAULT_OFFSET_LABEL: &str = "UTC+0";

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
    timezone: Option<String>,
    time: Option<TimezoneSection>,
}

#[derive(Debug, Deserialize)]
struct TimezoneSection {
    timezone: Option<String>,
}

pub fn default_zone() -> &'static Tz {
    static DEFAULT_TZ: OnceLock<Tz> = OnceLock::new();
    DEFAULT_TZ.get_or_init(resolve_default_zone)
}

fn resolve_default_zone() -> Tz {
    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR)
        && let Some(tz) = parse_zone_name(&raw, TIMEZONE_ENV_VAR)
    {
        return tz;
    }

    if let Some(path) = zone_config_path()
        && let Some(tz) = load_zone_from_file(&path)
    {
        return tz;
    }

    chrono_tz::UTC
}

fn zone_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(TIMEZONE_CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(TIMEZONE_CONFIG_FILE))
}

fn load_zone_from_file(path: &Path) -> Option<Tz> {
    if !path.exists() {
        tracing::debug!(file = %path.display(), "zone config file not found");
        return None;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(file = %path.display(), error = %err, "failed reading zone config file");
            return None;
        }
    };

    let parsed = match toml::from_str::<TimezoneConfig>(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!(file = %path.display(), error = %err, "failed parsing zone config file");
            return None;
        }
    };

    let timezone = parsed
        .timezone
        .or_else(|| parsed.time.and_then(|section| section.timezone));
    let Some(timezone) = timezone else {
        tracing::warn!(file = %path.display(), "zone config had no timezone field");
        return None;
    };

    parse_zone_name(timezone.as_str(), &format!("file:{}", path.display()))
}

fn parse_zone_name(raw: &str, source: &str) -> Option<Tz> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::warn!(source, "zone source was empty");
        return None;
    }

    match trimmed.parse::<Tz>() {
        Ok(tz) => {
            tracing::debug!(source, timezone = %trimmed, "resolved timezone");
            Some(tz)
        }
        Err(err) => {
            tracing::error!(source, timezone = %trimmed, error = %err, "failed to parse timezone id");
            None
        }
    }
}

pub fn resolve_zone(raw: Option<&str>) -> Tz {
    match raw {
        Some(name) => parse_zone_name(name, "configuration").unwrap_or_else(|| *default_zone()),
        None => *default_zone(),
    }
}

pub fn normalize(instant: Option<&DateTime<Tz>>, zone: Option<Tz>, now: DateTime<Utc>) -> DateTime<Tz> {
    match (instant, zone) {
        (Some(instant), Some(zone)) => instant.with_timezone(&zone),
        (Some(instant), None) => *instant,
        (None, Some(zone)) => now.with_timezone(&zone),
        (None, None) => now.with_timezone(default_zone()),
    }
}

pub fn today_in(zone: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&zone).date_naive()
}

pub fn resolve_wall_clock(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(resolved) => resolved,
        LocalResult::Ambiguous(first, second) => {
            tracing::warn!(
                %local,
                zone = %zone,
                first = %first,
                second = %second,
                "ambiguous local datetime; using earliest"
            );
            if first <= second { first } else { second }
        }
        LocalResult::None => {
            for step in [30_i64, 60, 90, 120] {
                if let Some(shifted) = local.checked_add_signed(Duration::minutes(step))
                    && let LocalResult::Single(resolved) = zone.from_local_datetime(&shifted)
                {
                    tracing::warn!(
                        %local,
                        zone = %zone,
                        shifted = %shifted,
                        "local datetime falls in a zone gap; shifted forward"
                    );
                    return resolved;
                }
            }
            tracing::warn!(%local, zone = %zone, "local datetime unresolvable in zone; interpreting as UTC");
            Utc.from_utc_datetime(&local).with_timezone(&zone)
        }
    }
}

pub fn offset_label(zone: Option<&str>) -> String {
    let Some(raw) = zone else {
        return DEFAULT_OFFSET_LABEL.to_string();
    };

    let trimmed = raw.trim();
    let Ok(zone) = trimmed.parse::<Tz>() else {
        tracing::debug!(timezone = %trimmed, "unknown timezone id; using default offset label");
        return DEFAULT_OFFSET_LABEL.to_string();
    };

    let offset = zone.offset_from_utc_datetime(&Utc::now().naive_utc());
    let minutes = offset.base_utc_offset().num_minutes();
    let sign = if minutes < 0 { '-' } else { '+' };
    let hours = minutes.abs() / 60;
    let remainder = minutes.abs() % 60;
    if remainder == 0 {
        format!("UTC{sign}{hours}")
    } else {
        format!("UTC{sign}{hours}:{remainder:02}")
    }
}
