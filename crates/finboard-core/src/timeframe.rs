//! Timeframe resolution
//!
//! Maps a symbolic timeframe token (`7d`, `30d`, `90d`, `1y`) to a concrete
//! half-open date range ending "now", plus the immediately preceding
//! comparison range of identical length. "Now" is an explicit parameter so
//! every downstream computation is reproducible in tests.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default token applied when a timeframe is absent or unrecognized
pub const DEFAULT_TOKEN: &str = "30d";

/// Symbolic timeframe tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// `7d`
    Week,
    /// `30d`
    #[default]
    Month,
    /// `90d`
    Quarter,
    /// `1y`
    Year,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::Year => "1y",
        }
    }

    /// Lenient parse: unrecognized or absent tokens fall back to 30 days
    /// rather than erroring.
    pub fn parse(token: Option<&str>) -> Self {
        match token.map(|t| t.trim().to_lowercase()).as_deref() {
            Some("7d") => Self::Week,
            Some("30d") => Self::Month,
            Some("90d") => Self::Quarter,
            Some("1y") => Self::Year,
            _ => Self::Month,
        }
    }

    /// Span of the timeframe in days
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }

    /// Resolve to concrete current and comparison ranges at the given instant
    pub fn resolve(&self, now: DateTime<Utc>) -> ResolvedTimeframe {
        // Half-open [start, end): end is the day after "now" so today's
        // transactions are included.
        let end = now.date_naive() + Duration::days(1);
        let start = end - Duration::days(self.days());
        let current = DateRange { start, end };
        let comparison = DateRange {
            start: start - Duration::days(self.days()),
            end: start,
        };
        ResolvedTimeframe {
            timeframe: *self,
            current,
            comparison,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Last calendar day inside the range, for display
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }
}

/// A timeframe resolved against a concrete instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimeframe {
    pub timeframe: Timeframe,
    /// The requested window, ending "now"
    pub current: DateRange,
    /// Equal-length window immediately preceding `current`
    pub comparison: DateRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!(Timeframe::parse(Some("7d")), Timeframe::Week);
        assert_eq!(Timeframe::parse(Some("30d")), Timeframe::Month);
        assert_eq!(Timeframe::parse(Some("90d")), Timeframe::Quarter);
        assert_eq!(Timeframe::parse(Some("1y")), Timeframe::Year);
        assert_eq!(Timeframe::parse(Some(" 1Y ")), Timeframe::Year);
    }

    #[test]
    fn test_parse_unrecognized_defaults_to_30d() {
        assert_eq!(Timeframe::parse(Some("banana")), Timeframe::Month);
        assert_eq!(Timeframe::parse(Some("")), Timeframe::Month);
        assert_eq!(Timeframe::parse(None), Timeframe::Month);

        let now = at(2026, 8, 27);
        let lenient = Timeframe::parse(Some("banana")).resolve(now);
        let explicit = Timeframe::parse(Some("30d")).resolve(now);
        assert_eq!(lenient, explicit);
    }

    #[test]
    fn test_resolve_spans() {
        let now = at(2026, 8, 27);
        let r = Timeframe::Week.resolve(now);
        assert_eq!(r.current.days(), 7);
        assert_eq!(r.current.end, NaiveDate::from_ymd_opt(2026, 8, 28).unwrap());
        assert_eq!(r.current.start, NaiveDate::from_ymd_opt(2026, 8, 21).unwrap());
        // Today is inside the range, the end bound is not
        assert!(r.current.contains(now.date_naive()));
        assert!(!r.current.contains(r.current.end));
    }

    #[test]
    fn test_comparison_period_is_adjacent_and_equal_length() {
        let now = at(2026, 8, 27);
        for tf in [
            Timeframe::Week,
            Timeframe::Month,
            Timeframe::Quarter,
            Timeframe::Year,
        ] {
            let r = tf.resolve(now);
            assert_eq!(r.comparison.end, r.current.start, "{}", tf);
            assert_eq!(r.comparison.days(), r.current.days(), "{}", tf);
        }
    }

    #[test]
    fn test_resolution_is_deterministic_for_fixed_now() {
        let now = at(2026, 2, 1);
        assert_eq!(Timeframe::Quarter.resolve(now), Timeframe::Quarter.resolve(now));
    }
}
