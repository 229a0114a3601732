//! Millisecond-precision timestamp type
//!
//! Document timestamps (`createdAt`, `updatedAt`) are stored on disk as plain
//! integers: milliseconds since the Unix epoch. `Timestamp` wraps that integer
//! so the engine never does raw arithmetic on it.
//!
//! ```
//! use schooldesk_core::Timestamp;
//! use serde_json::json;
//!
//! assert_eq!(Timestamp::from_json(&json!(1_000.0)), Some(Timestamp::from_millis(1_000)));
//! assert_eq!(Timestamp::from_json(&json!("yesterday")), None);
//! ```

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since Unix epoch
///
/// Serializes as a bare integer, matching the on-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create a timestamp for the current moment
    ///
    /// Returns epoch if the system clock is before the Unix epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as u64)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since Unix epoch
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Lenient read of a stored timestamp value
    ///
    /// Accepts integer or floating point milliseconds (fractions truncate).
    /// Zero, negative and non-numeric values count as absent.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let millis = match value.as_u64() {
            Some(m) => m,
            None => {
                let f = value.as_f64()?;
                if !f.is_finite() || f < 0.0 {
                    return None;
                }
                f as u64
            }
        };
        (millis > 0).then_some(Timestamp(millis))
    }

    /// Current time, but never earlier than `floor`
    ///
    /// Used when refreshing `updatedAt` so a clock step backwards cannot make a
    /// document look older than its previous write.
    pub fn now_at_least(floor: Timestamp) -> Self {
        Self::now().max(floor)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Timestamp::from_millis(millis)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<Timestamp> for serde_json::Value {
    fn from(ts: Timestamp) -> Self {
        serde_json::Value::from(ts.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_epoch() {
        assert_eq!(Timestamp::EPOCH.as_millis(), 0);
        assert_eq!(Timestamp::default(), Timestamp::EPOCH);
    }

    #[test]
    fn test_timestamp_now_is_after_2020() {
        // 2020-01-01 in milliseconds
        assert!(Timestamp::now().as_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_now_at_least_respects_floor() {
        let far_future = Timestamp::from_millis(u64::MAX / 2);
        assert_eq!(Timestamp::now_at_least(far_future), far_future);
        assert!(Timestamp::now_at_least(Timestamp::EPOCH) > Timestamp::EPOCH);
    }

    #[test]
    fn test_from_json_is_lenient() {
        use serde_json::json;
        assert_eq!(Timestamp::from_json(&json!(10)), Some(Timestamp::from_millis(10)));
        assert_eq!(
            Timestamp::from_json(&json!(1_700_000_000_000.0)),
            Some(Timestamp::from_millis(1_700_000_000_000))
        );
        assert_eq!(Timestamp::from_json(&json!(20.7)), Some(Timestamp::from_millis(20)));
        assert_eq!(Timestamp::from_json(&json!(0)), None);
        assert_eq!(Timestamp::from_json(&json!(-5)), None);
        assert_eq!(Timestamp::from_json(&json!(null)), None);
        assert_eq!(Timestamp::from_json(&json!("30")), None);
    }

    #[test]
    fn test_serializes_as_integer() {
        let ts = Timestamp::from_millis(42);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "42");
        let back: Timestamp = serde_json::from_str("42").unwrap();
        assert_eq!(back, ts);
    }
}
