use crate::error::TypeError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

/// Resolve an IANA timezone name.
pub fn parse_timezone(tz: &str) -> Result<Tz, TypeError> {
    tz.parse::<Tz>()
        .map_err(|_| TypeError::UnknownTimezone(tz.to_string()))
}

/// Half-open UTC interval [midnight(day, tz), midnight(day, tz) + 24h).
///
/// Midnight falling inside a DST gap resolves to the first valid local
/// time of the day.
pub fn day_window(day: NaiveDate, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>), TypeError> {
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TypeError::InvalidDayStart(day.to_string(), tz.to_string()))?;

    let start_local = tz
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(|| TypeError::InvalidDayStart(day.to_string(), tz.to_string()))?;

    let start = start_local.with_timezone(&Utc);
    Ok((start, start + Duration::hours(24)))
}

/// Today's calendar date as observed in the given timezone.
pub fn today_in_tz(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Deserialize an optional event timestamp, accepting RFC 3339 instants and
/// naive ISO-8601 times (treated as UTC).
pub fn deserialize_flexible_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(text) => parse_flexible_timestamp(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub fn parse_flexible_timestamp(text: &str) -> Result<DateTime<Utc>, TypeError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    text.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| TypeError::InvalidTimestamp(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    #[test]
    fn test_utc_day_window_is_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = day_window(day, Tz::UTC).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(end - start, Duration::hours(24));
    }

    #[test]
    fn test_pacific_morning_utc_belongs_to_previous_local_day() {
        // 2024-03-10T07:30:00Z is 2024-03-09 23:30 in Vancouver.
        let instant = DateTime::parse_from_rfc3339("2024-03-10T07:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let tz: Tz = "America/Vancouver".parse().unwrap();

        let previous = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let (start, end) = day_window(previous, tz).unwrap();
        assert!(start <= instant && instant < end);

        let same = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, _) = day_window(same, tz).unwrap();
        assert!(instant < start);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
        assert!(parse_timezone("America/Vancouver").is_ok());
    }

    #[test]
    fn test_naive_timestamp_is_treated_as_utc() {
        let parsed = parse_flexible_timestamp("2024-03-10T07:30:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-10T07:30:00+00:00");
    }

    #[test]
    fn test_offset_timestamp_is_converted_to_utc() {
        let parsed = parse_flexible_timestamp("2024-03-10T07:30:00-08:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-10T15:30:00+00:00");
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        assert!(parse_flexible_timestamp("yesterday-ish").is_err());
    }
}
