//! Text formats shared by the store files, the CLI and the web templates.
//!
//! Durations and timestamps are written to disk through [`format_iso_duration`]
//! and [`format_timestamp`] only, and read back through their `parse_*`
//! counterparts, so a value survives a write/read cycle unchanged.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeDelta, Utc};

use crate::config::DisplayTimezone;

const DURATION_PREFIX: &str = "PT";

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;

/// Filesystem-safe identifier for a title.
pub fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "_").replace(':', "-")
}

/// Current time as an offset datetime pinned to UTC.
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(text.trim())
        .map_err(|e| format!("invalid timestamp '{}': {}", text, e))
}

/// Parses a user duration expression such as `30m`, `2h` or `1h30m`.
///
/// Shorthand input gets the `PT` marker prepended and is upper-cased before
/// being read as an ISO-8601 duration. Full expressions (`PT1H`) are accepted
/// too, and an empty expression is a zero duration.
pub fn parse_duration(input: &str) -> Result<TimeDelta, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(TimeDelta::zero());
    }

    let upper = trimmed.to_uppercase();
    let (sign, unsigned) = match upper.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", upper.as_str()),
    };
    if unsigned.starts_with('P') {
        parse_iso_duration(&upper)
    } else {
        parse_iso_duration(&format!("{}{}{}", sign, DURATION_PREFIX, unsigned))
    }
}

pub fn parse_iso_duration(text: &str) -> Result<TimeDelta, String> {
    let invalid = || format!("invalid duration '{}'", text);

    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let mut body = rest.strip_prefix(DURATION_PREFIX).ok_or_else(invalid)?;
    if body.is_empty() {
        return Err(invalid());
    }

    let mut total: i128 = 0;
    // H, M, S must appear in that order, each at most once.
    let mut last_rank = 0;
    while !body.is_empty() {
        let split = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let (number, tail) = body.split_at(split);
        let mut chars = tail.chars();
        let unit = chars.next().ok_or_else(invalid)?;
        body = chars.as_str();

        let (rank, unit_nanos) = match unit {
            'H' => (1, NANOS_PER_HOUR),
            'M' => (2, NANOS_PER_MINUTE),
            'S' => (3, NANOS_PER_SECOND),
            _ => return Err(invalid()),
        };
        if rank <= last_rank || number.is_empty() {
            return Err(invalid());
        }
        last_rank = rank;

        total += component_nanos(number, unit_nanos).ok_or_else(invalid)?;
    }

    if negative {
        total = -total;
    }
    let nanos = i64::try_from(total).map_err(|_| invalid())?;
    Ok(TimeDelta::nanoseconds(nanos))
}

fn component_nanos(number: &str, unit_nanos: i128) -> Option<i128> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;

    if !fraction.is_empty() {
        let digits = &fraction[..fraction.len().min(18)];
        let scale = 10i128.checked_pow(digits.len() as u32)?;
        let value: i128 = digits.parse().ok()?;
        nanos = nanos.checked_add(value.checked_mul(unit_nanos)? / scale)?;
    }
    Some(nanos)
}

/// ISO-8601 text for a duration, e.g. `PT1H30M`; zero is `PT0S`.
pub fn format_iso_duration(duration: &TimeDelta) -> String {
    let total = i128::from(duration.num_seconds()) * NANOS_PER_SECOND
        + i128::from(duration.subsec_nanos());
    if total == 0 {
        return format!("{}0S", DURATION_PREFIX);
    }

    let sign = if total < 0 { "-" } else { "" };
    let mut rest = total.abs();
    let hours = rest / NANOS_PER_HOUR;
    rest %= NANOS_PER_HOUR;
    let minutes = rest / NANOS_PER_MINUTE;
    rest %= NANOS_PER_MINUTE;
    let seconds = rest / NANOS_PER_SECOND;
    let nanos = rest % NANOS_PER_SECOND;

    let mut out = format!("{}{}", sign, DURATION_PREFIX);
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if seconds > 0 || nanos > 0 {
        if nanos > 0 {
            let fraction = format!("{:09}", nanos);
            out.push_str(&format!("{}.{}S", seconds, fraction.trim_end_matches('0')));
        } else {
            out.push_str(&format!("{}S", seconds));
        }
    }
    out
}

/// Display form of a duration: the ISO text without its `PT` marker, empty for zero.
pub fn format_duration(duration: &TimeDelta) -> String {
    if duration.is_zero() {
        return String::new();
    }
    format_iso_duration(duration).replacen(DURATION_PREFIX, "", 1)
}

pub fn format_cost(value: f64, cost_symbol: &str) -> String {
    format!("{}{:.2}", cost_symbol, value)
}

pub fn format_weight(value: f64) -> String {
    format!("{:.1}", value)
}

/// Turns a slug-ish string into a display title: `benchy_v2` -> `Benchy V2`.
pub fn format_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut previous_alpha = false;
    for c in title.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}

pub fn relative_datetime(dt: Option<&DateTime<FixedOffset>>) -> String {
    let Some(dt) = dt else {
        return "N/A".to_string();
    };
    let elapsed = Utc::now().signed_duration_since(dt.with_timezone(&Utc));
    let formatter = timeago::Formatter::new();
    formatter.convert(elapsed.to_std().unwrap_or_default())
}

pub fn format_datetime(dt: Option<&DateTime<FixedOffset>>, timezone: &DisplayTimezone) -> String {
    let Some(dt) = dt else {
        return "N/A".to_string();
    };
    let shifted = match timezone {
        DisplayTimezone::Utc => dt.with_timezone(&Utc).fixed_offset(),
        DisplayTimezone::Local => dt.with_timezone(&Local).fixed_offset(),
        DisplayTimezone::Fixed(offset) => dt.with_timezone(offset),
        DisplayTimezone::Named(tz) => dt.with_timezone(tz).fixed_offset(),
    };
    format_timestamp(&shifted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_replaces_separators() {
        assert_eq!(slugify("Benchy Boat"), "benchy_boat");
        assert_eq!(slugify("Part 2: Lid"), "part_2-_lid");
    }

    #[test]
    fn parses_shorthand_durations() {
        assert_eq!(parse_duration("30m").unwrap(), TimeDelta::minutes(30));
        assert_eq!(parse_duration("2h").unwrap(), TimeDelta::hours(2));
        assert_eq!(
            parse_duration("1h30m").unwrap(),
            TimeDelta::hours(1) + TimeDelta::minutes(30)
        );
        assert_eq!(parse_duration("1.5h").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_duration("PT45S").unwrap(), TimeDelta::seconds(45));
        assert_eq!(parse_duration("").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("30m2h").is_err());
        assert!(parse_iso_duration("PT").is_err());
        assert!(parse_iso_duration("1H").is_err());
    }

    #[test]
    fn formats_iso_durations() {
        assert_eq!(format_iso_duration(&TimeDelta::zero()), "PT0S");
        assert_eq!(
            format_iso_duration(&(TimeDelta::hours(1) + TimeDelta::minutes(30))),
            "PT1H30M"
        );
        assert_eq!(format_iso_duration(&TimeDelta::milliseconds(1500)), "PT1.5S");
        assert_eq!(format_iso_duration(&TimeDelta::minutes(-5)), "-PT5M");
    }

    #[test]
    fn formats_durations_beyond_nanosecond_range() {
        let long = TimeDelta::seconds(i64::MAX / 1_000_000_000 + 1);
        assert_eq!(format_iso_duration(&long), "PT2562047H47M17S");
        assert_eq!(format_iso_duration(&-long), "-PT2562047H47M17S");
        let max = format_iso_duration(&TimeDelta::MAX);
        assert!(max.starts_with("PT2562047788015H"), "{}", max);
    }

    #[test]
    fn iso_duration_text_reads_back_identically() {
        for delta in [
            TimeDelta::zero(),
            TimeDelta::hours(26) + TimeDelta::seconds(7),
            TimeDelta::nanoseconds(123_456_789),
            TimeDelta::minutes(-90),
        ] {
            let text = format_iso_duration(&delta);
            assert_eq!(parse_iso_duration(&text).unwrap(), delta, "{}", text);
        }
    }

    #[test]
    fn display_duration_drops_marker() {
        assert_eq!(format_duration(&TimeDelta::minutes(90)), "1H30M");
        assert_eq!(format_duration(&TimeDelta::zero()), "");
    }

    #[test]
    fn timestamps_keep_offset_and_subseconds() {
        let text = "2020-01-01T10:30:00.125+02:00";
        let parsed = parse_timestamp(text).unwrap();
        assert_eq!(format_timestamp(&parsed), text);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn formats_display_values() {
        assert_eq!(format_cost(2.0, "$"), "$2.00");
        assert_eq!(format_cost(1.234, "€"), "€1.23");
        assert_eq!(format_weight(12.34), "12.3");
        assert_eq!(format_title("benchy_boat v2"), "Benchy Boat V2");
        assert_eq!(relative_datetime(None), "N/A");
    }

    #[test]
    fn converts_datetimes_to_display_timezone() {
        let dt = parse_timestamp("2020-01-01T00:00:00+00:00").unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_datetime(Some(&dt), &DisplayTimezone::Fixed(offset)),
            "2020-01-01T02:00:00+02:00"
        );
        assert_eq!(
            format_datetime(Some(&dt), &DisplayTimezone::Utc),
            "2020-01-01T00:00:00+00:00"
        );
        let paris = DisplayTimezone::Named(chrono_tz::Europe::Paris);
        assert_eq!(
            format_datetime(Some(&dt), &paris),
            "2020-01-01T01:00:00+01:00"
        );
        let summer = parse_timestamp("2020-07-01T00:00:00+00:00").unwrap();
        assert_eq!(
            format_datetime(Some(&summer), &paris),
            "2020-07-01T02:00:00+02:00"
        );
    }
}
