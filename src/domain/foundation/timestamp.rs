//! UTC instants.
//!
//! Every transition takes an explicit `now`, so the arithmetic here is
//! all the domain needs: shifting by days or seconds and counting whole
//! days between two instants.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Strictly later than `other`.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Complete days from `self` until `later`, truncated toward zero.
    ///
    /// Negative when `later` is in the past.
    pub fn whole_days_until(&self, later: &Timestamp) -> i64 {
        later.0.signed_duration_since(self.0).num_days()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> Timestamp {
        let dt = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Timestamp::from_datetime(dt)
    }

    #[test]
    fn day_shifts_cancel_out() {
        let ts = noon();
        assert_eq!(ts.add_days(30).minus_days(30), ts);
        assert_eq!(ts.add_days(30).to_string(), "2026-03-31T12:00:00+00:00");
    }

    #[test]
    fn whole_days_truncate_partial_days() {
        let start = noon();
        assert_eq!(start.whole_days_until(&start.add_days(30)), 30);
        assert_eq!(start.whole_days_until(&start.add_days(1).add_secs(-1)), 0);
        assert_eq!(start.whole_days_until(&start.minus_days(2)), -2);
    }

    #[test]
    fn is_after_is_strict() {
        let ts = noon();
        assert!(ts.add_secs(1).is_after(&ts));
        assert!(!ts.is_after(&ts));
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let json = serde_json::to_string(&noon()).unwrap();
        assert_eq!(json, "\"2026-03-01T12:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, noon());
    }
}
