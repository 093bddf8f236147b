//! # Farm Timers
//!
//! "Time until ready" reports for Sunflower Land farms.
//!
//! ## Architecture
//!
//! - **validate**: Untrusted farm JSON to a typed [`models::FarmDocument`]
//! - **catalog**: Growth and regeneration durations, display icons
//! - **calculate**: Seconds until each occupied plot is ready
//! - **report**: Bucketing, duration formatting and order summaries
//! - **fetch**: Community API client
//! - **cooldown**: Per-caller rate limiting
//! - **bot**: `!farm <id>` command handling
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod bot;
pub mod calculate;
pub mod catalog;
pub mod config;
pub mod cooldown;
pub mod fetch;
pub mod models;
pub mod report;
pub mod validate;

pub use report::{report_from_value, FarmReport};
pub use validate::{validate, ValidationError};

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    num.checked_mul(multiplier).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(parse_duration("6h"), Some(Duration::from_secs(21600)));
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration("30m"), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_parse_duration_seconds() {
        assert_eq!(parse_duration("90s"), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_parse_duration_default_seconds() {
        assert_eq!(parse_duration("120"), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert_eq!(parse_duration("abc"), None);
    }

    #[test]
    fn test_parse_duration_empty() {
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_parse_duration_zero() {
        assert_eq!(parse_duration("0s"), Some(Duration::from_secs(0)));
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert_eq!(parse_duration("18446744073709551615h"), None);
    }

    #[test]
    fn test_parse_duration_inner_space() {
        assert_eq!(parse_duration("45 s"), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_parse_duration_large() {
        assert_eq!(parse_duration("9999h"), Some(Duration::from_secs(35996400)));
    }
}
