use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Date,
    DateTime,
    Zoned,
}

#[derive(Debug, Clone, Copy)]
pub struct KnownFormat {
    pub pattern: &'static str,
    pub kind: FormatKind,
}

pub const COMMON_FORMATS: &[KnownFormat] = &[
    KnownFormat {
        pattern: "%Y-%m-%d",
        kind: FormatKind::Date,
    },
    KnownFormat {
        pattern: "%Y/%m/%d",
        kind: FormatKind::Date,
    },
    KnownFormat {
        pattern: "%m/%d/%Y",
        kind: FormatKind::Date,
    },
    KnownFormat {
        pattern: "%d/%m/%Y",
        kind: FormatKind::Date,
    },
    KnownFormat {
        pattern: "%d-%m-%Y",
        kind: FormatKind::Date,
    },
    KnownFormat {
        pattern: "%B %d, %Y",
        kind: FormatKind::Date,
    },
    KnownFormat {
        pattern: "%Y-%m-%d %H:%M",
        kind: FormatKind::DateTime,
    },
    KnownFormat {
        pattern: "%Y-%m-%dT%H:%M",
        kind: FormatKind::DateTime,
    },
    KnownFormat {
        pattern: "%Y-%m-%d %H:%M:%S",
        kind: FormatKind::DateTime,
    },
    KnownFormat {
        pattern: "%Y-%m-%dT%H:%M:%S",
        kind: FormatKind::DateTime,
    },
    KnownFormat {
        pattern: "%m/%d/%Y %H:%M",
        kind: FormatKind::DateTime,
    },
    KnownFormat {
        pattern: "%d/%m/%Y %H:%M",
        kind: FormatKind::DateTime,
    },
    KnownFormat {
        pattern: "%Y-%m-%dT%H:%M:%S%:z",
        kind: FormatKind::Zoned,
    },
    KnownFormat {
        pattern: "%Y-%m-%d %H:%M:%S %z",
        kind: FormatKind::Zoned,
    },
];

pub const DISPLAY_WITH_TIME: &str = "%B %-d, %Y %I:%M %p";
pub const DISPLAY_DATE_ONLY: &str = "%B %-d, %Y";
pub const DISPLAY_TIME_ONLY: &str = "%I:%M %p";

const ZONED_TOKENS: &[&str] = &["%z", "%:z", "%#z", "%Z"];
const TIME_TOKENS: &[&str] = &["%H", "%I", "%M", "%S", "%p", "%P", "%R", "%T"];

pub fn valid_pattern(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

pub fn classify_pattern(pattern: &str) -> FormatKind {
    if ZONED_TOKENS.iter().any(|token| pattern.contains(token)) {
        return FormatKind::Zoned;
    }
    if TIME_TOKENS.iter().any(|token| pattern.contains(token)) {
        return FormatKind::DateTime;
    }
    FormatKind::Date
}

pub fn parse_exact(token: &str, pattern: &str, zone: Tz) -> Option<DateTime<Tz>> {
    match classify_pattern(pattern) {
        FormatKind::Zoned => DateTime::parse_from_str(token, pattern)
            .ok()
            .map(|parsed| parsed.with_timezone(&zone)),
        FormatKind::DateTime => NaiveDateTime::parse_from_str(token, pattern)
            .ok()
            .map(|parsed| zone::resolve_wall_clock(zone, parsed)),
        FormatKind::Date => {
            let date = NaiveDate::parse_from_str(token, pattern).ok()?;
            let midnight = date.and_hms_opt(0, 0, 0)?;
            Some(zone::resolve_wall_clock(zone, midnight))
        }
    }
}

pub fn format_value(value: &DateTime<Tz>, pattern: &str) -> String {
    value.format(pattern).to_string()
}

pub fn display_value(value: Option<&DateTime<Tz>>, pattern: &str) -> String {
    match value {
        Some(value) => format_value(value, pattern),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};

    use super::{
        COMMON_FORMATS, DISPLAY_DATE_ONLY, DISPLAY_TIME_ONLY, DISPLAY_WITH_TIME, FormatKind,
        classify_pattern, display_value, format_value, parse_exact, valid_pattern,
    };

    #[test]
    fn pattern_validation_scans_strftime_items() {
        assert!(valid_pattern("%Y-%m-%d"));
        assert!(valid_pattern(DISPLAY_WITH_TIME));
        for known in COMMON_FORMATS {
            assert!(valid_pattern(known.pattern), "{}", known.pattern);
        }
        assert!(!valid_pattern("%Q-not-a-pattern"));
        assert!(!valid_pattern("%"));
    }

    #[test]
    fn patterns_classify_by_their_tokens() {
        assert_eq!(classify_pattern("%Y-%m-%d"), FormatKind::Date);
        assert_eq!(classify_pattern("%B %d, %Y"), FormatKind::Date);
        assert_eq!(classify_pattern("%Y-%m-%d %H:%M"), FormatKind::DateTime);
        assert_eq!(classify_pattern("%d/%m/%Y %R"), FormatKind::DateTime);
        assert_eq!(classify_pattern("%Y-%m-%dT%H:%M:%S%:z"), FormatKind::Zoned);
        assert_eq!(classify_pattern("%a %b %e %T %Z %Y"), FormatKind::Zoned);
    }

    #[test]
    fn common_formats_round_trip_through_their_own_pattern() {
        let sample = Utc
            .with_ymd_and_hms(2024, 6, 5, 14, 30, 45)
            .single()
            .expect("valid sample")
            .with_timezone(&chrono_tz::UTC);

        for known in COMMON_FORMATS {
            let rendered = format_value(&sample, known.pattern);
            let reparsed = parse_exact(&rendered, known.pattern, chrono_tz::UTC)
                .unwrap_or_else(|| panic!("reparse {}", known.pattern));
            assert_eq!(format_value(&reparsed, known.pattern), rendered, "{}", known.pattern);
            assert_eq!(reparsed.date_naive(), sample.date_naive(), "{}", known.pattern);
            if known.kind != FormatKind::Date {
                assert_eq!(reparsed.hour(), sample.hour(), "{}", known.pattern);
                assert_eq!(reparsed.minute(), sample.minute(), "{}", known.pattern);
            }
        }
    }

    #[test]
    fn date_patterns_resolve_to_midnight() {
        let parsed = parse_exact("2024-06-05", "%Y-%m-%d", chrono_tz::America::New_York)
            .expect("parse date");
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn zoned_patterns_preserve_the_instant() {
        let parsed = parse_exact(
            "2024-06-05T14:30:45+05:30",
            "%Y-%m-%dT%H:%M:%S%:z",
            chrono_tz::UTC,
        )
        .expect("parse zoned");
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn display_patterns_render_without_zero_padding_the_day() {
        let value = Utc
            .with_ymd_and_hms(2024, 6, 15, 14, 30, 0)
            .single()
            .expect("valid value")
            .with_timezone(&chrono_tz::UTC);

        assert_eq!(format_value(&value, DISPLAY_WITH_TIME), "June 15, 2024 02:30 PM");
        assert_eq!(format_value(&value, DISPLAY_DATE_ONLY), "June 15, 2024");
        assert_eq!(format_value(&value, DISPLAY_TIME_ONLY), "02:30 PM");

        let narrow = Utc
            .with_ymd_and_hms(2024, 6, 5, 9, 5, 0)
            .single()
            .expect("valid value")
            .with_timezone(&chrono_tz::UTC);
        assert_eq!(format_value(&narrow, DISPLAY_DATE_ONLY), "June 5, 2024");

        assert_eq!(display_value(None, DISPLAY_WITH_TIME), "");
        assert_eq!(
            display_value(Some(&value), DISPLAY_DATE_ONLY),
            "June 15, 2024"
        );
    }
}
