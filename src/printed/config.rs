use chrono::FixedOffset;
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ROOT: &str = "./printed/";
pub const DEFAULT_COST_SYMBOL: &str = "$";
pub const DEFAULT_TIMEZONE: &str = "UTC";

pub const ROOT_ENV: &str = "PRINTED_PATH";
pub const COST_SYMBOL_ENV: &str = "COST_SYMBOL";
pub const TIMEZONE_ENV: &str = "TIMEZONE";

/// Timezone that timestamps are shown in. Stored values keep their own offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayTimezone {
    #[default]
    Utc,
    Local,
    Fixed(FixedOffset),
    /// An IANA zone such as `Europe/Paris`, daylight saving included.
    Named(Tz),
}

impl FromStr for DisplayTimezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "utc" | "z" | "etc/utc" => return Ok(DisplayTimezone::Utc),
            "local" => return Ok(DisplayTimezone::Local),
            _ => {}
        }

        if let Some(offset) = parse_offset(value) {
            return Ok(DisplayTimezone::Fixed(offset));
        }
        value.parse::<Tz>().map(DisplayTimezone::Named).map_err(|_| {
            format!(
                "Unsupported timezone '{}' (use UTC, local, an IANA name like Europe/Paris, or an offset like +02:00)",
                value
            )
        })
    }
}

impl fmt::Display for DisplayTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayTimezone::Utc => write!(f, "UTC"),
            DisplayTimezone::Local => write!(f, "local"),
            DisplayTimezone::Fixed(offset) => write!(f, "{}", offset),
            DisplayTimezone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Presentation settings shared by the CLI tables and the web templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub cost_symbol: String,
    pub timezone: DisplayTimezone,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cost_symbol: DEFAULT_COST_SYMBOL.to_string(),
            timezone: DisplayTimezone::Utc,
        }
    }
}

impl DisplayConfig {
    pub fn new(cost_symbol: impl Into<String>, timezone: DisplayTimezone) -> Self {
        Self {
            cost_symbol: cost_symbol.into(),
            timezone,
        }
    }
}
