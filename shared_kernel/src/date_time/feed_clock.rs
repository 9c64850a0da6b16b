use anyhow::anyhow;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("failed to parse {raw:?} as `YYYY-MM-DD HH:MM:SS`: {source}")]
    Unparseable {
        raw: String,
        source: chrono::ParseError,
    },
    #[error("{raw:?} is ambiguous or nonexistent in timezone {timezone}")]
    InvalidLocalTime { raw: String, timezone: Tz },
}

/// Resolves feed-local creation timestamps into UTC instants.
///
/// The feed reports `createdon` as a wall-clock time in a fixed timezone, and
/// the instant the record actually appeared trails that stated time by a
/// constant. The corrected instant is `createdon` resolved in the configured
/// timezone plus `creation_offset`. Every age computation must go through
/// [`FeedClock::normalize_creation_time`] so the correction is applied
/// uniformly. Both the timezone and the offset are configuration, not
/// hard-codes, since the upstream feed has changed behavior before.
#[derive(Clone, Copy, Debug)]
pub struct FeedClock {
    timezone: Tz,
    creation_offset: Duration,
}

impl FeedClock {
    pub fn new(timezone: &str, creation_offset_minutes: i64) -> anyhow::Result<Self> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|err| anyhow!("{timezone} is not a recognized timezone identifier: {err}"))?;
        Ok(Self {
            timezone,
            creation_offset: Duration::minutes(creation_offset_minutes),
        })
    }

    /// The reference instant for one evaluation cycle.
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    pub fn normalize_creation_time(&self, raw: &str) -> Result<DateTime<Utc>, TimestampError> {
        let naive = NaiveDateTime::parse_from_str(raw, FEED_TIMESTAMP_FORMAT).map_err(|source| {
            TimestampError::Unparseable {
                raw: raw.to_owned(),
                source,
            }
        })?;
        let local = self
            .timezone
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| TimestampError::InvalidLocalTime {
                raw: raw.to_owned(),
                timezone: self.timezone,
            })?;
        Ok(local.with_timezone(&Utc) + self.creation_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn creation_time_is_resolved_in_the_configured_timezone_and_offset_corrected() {
        let clock = FeedClock::new("Asia/Kolkata", 330).unwrap();
        let normalized = clock
            .normalize_creation_time("2025-03-01 10:00:00")
            .unwrap();
        // 10:00 IST is 04:30 UTC; the +5h30m correction lands back on 10:00 UTC.
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(normalized, expected);
    }

    #[test]
    fn a_zero_offset_clock_applies_no_correction() {
        let clock = FeedClock::new("Asia/Kolkata", 0).unwrap();
        let normalized = clock
            .normalize_creation_time("2025-03-01 10:00:00")
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 4, 30, 0).unwrap();
        assert_eq!(normalized, expected);
    }

    #[rstest]
    #[case("")]
    #[case("2025-13-01 10:00:00")]
    #[case("01-03-2025 10:00:00")]
    #[case("2025-03-01T10:00:00")]
    #[case("2025-03-01 10:61:00")]
    fn malformed_timestamps_are_rejected(#[case] raw: &str) {
        let clock = FeedClock::new("Asia/Kolkata", 330).unwrap();
        let result = clock.normalize_creation_time(raw);
        assert!(matches!(result, Err(TimestampError::Unparseable { .. })));
    }

    #[test]
    fn unknown_timezone_identifiers_are_rejected_at_construction() {
        assert!(FeedClock::new("Asia/Atlantis", 330).is_err());
    }
}
