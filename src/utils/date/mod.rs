// Date utility functions
// Local (zone-less) timestamp parsing and formatting for the schedule wire format

use chrono::{NaiveDate, NaiveDateTime, ParseError};

/// Outbound timestamp format. No zone suffix: values are device-local.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Day key format used for grouping and for the persisted last-viewed day.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a local timestamp as sent by the backend.
///
/// Both `T` and space separators are accepted. A trailing zone designator is
/// dropped without converting: the wall-clock digits are kept as-is.
pub fn parse_local_timestamp(raw: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = strip_zone_suffix(raw.trim());
    let mut last_error = None;
    for format in ACCEPTED_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
            Ok(value) => return Ok(value),
            Err(err) => last_error = Some(err),
        }
    }
    match last_error {
        Some(err) => Err(err),
        None => NaiveDateTime::parse_from_str(trimmed, LOCAL_TIMESTAMP_FORMAT),
    }
}

pub fn format_local_timestamp(value: &NaiveDateTime) -> String {
    value.format(LOCAL_TIMESTAMP_FORMAT).to_string()
}

pub fn parse_day_key(raw: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = raw.trim();
    // Some rows carry a full timestamp in the day column.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DAY_KEY_FORMAT)
}

pub fn format_day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

/// Format minutes since midnight as `H:MM`, wrapping past midnight.
pub fn minutes_to_clock_label(total_minutes: i64) -> String {
    let wrapped = total_minutes.rem_euclid(24 * 60);
    format!("{}:{:02}", wrapped / 60, wrapped % 60)
}

/// Wall-clock time left until the next local midnight.
pub fn time_until_midnight(now: NaiveDateTime) -> std::time::Duration {
    now.date()
        .succ_opt()
        .map(|next| next.and_time(chrono::NaiveTime::MIN) - now)
        .and_then(|left| left.to_std().ok())
        .unwrap_or_default()
}

fn strip_zone_suffix(value: &str) -> &str {
    let value = value.strip_suffix('Z').unwrap_or(value);
    let bytes = value.as_bytes();
    let len = bytes.len();
    // "+HH:MM" / "-HH:MM" after the time portion (date alone is 10 chars)
    if len > 16 && (bytes[len - 6] == b'+' || bytes[len - 6] == b'-') && bytes[len - 3] == b':' {
        return &value[..len - 6];
    }
    value
}

/// Serde adapters for the loosely typed schedule rows.
pub mod serde_local {
    use super::{format_local_timestamp, parse_day_key, parse_local_timestamp};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Unparseable values become `None` so a single bad row can't sink the
    /// whole schedule; layout skips blocks without a usable span.
    pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|value| match parse_local_timestamp(&value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("Ignoring unparseable timestamp '{}': {}", value, err);
                None
            }
        }))
    }

    pub fn serialize_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&format_local_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|value| parse_day_key(&value).ok()))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LooseBool {
        Bool(bool),
        Int(i64),
    }

    /// Accepts `true`/`false`, `0`/`1`, or null (treated as false).
    pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<LooseBool> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(LooseBool::Bool(value)) => value,
            Some(LooseBool::Int(value)) => value != 0,
            None => false,
        })
    }
}
