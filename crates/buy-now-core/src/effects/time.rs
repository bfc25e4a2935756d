//! Time and randomness effect interfaces

use chrono::{DateTime, SecondsFormat};

/// Wall-clock time source
pub trait PhysicalTimeEffects {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;

    /// Current time as an ISO 8601 UTC timestamp with millisecond precision
    fn now_iso(&self) -> String {
        iso_timestamp(self.now_ms())
    }
}

/// Entropy for instance identifiers. Not required to be cryptographic.
pub trait RandomEffects {
    /// Next pseudo-random value
    fn random_u64(&self) -> u64;
}

/// Format epoch milliseconds the way browsers print `Date#toISOString`
pub fn iso_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_matches_browser_format() {
        assert_eq!(iso_timestamp(1_699_999_999_999), "2023-11-14T22:13:19.999Z");
        assert_eq!(iso_timestamp(0), "1970-01-01T00:00:00.000Z");
    }
}
