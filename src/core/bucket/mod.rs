//! # Bucket Module
//!
//! Formats date-bucket folder names.
//!
//! A bucket is the destination subfolder a file lands in, named purely
//! from its resolved timestamp and the configured granularity. Formatting
//! is deterministic and has no side effects; buckets themselves are
//! created lazily by the engine on first use.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How fine-grained the date buckets are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketGranularity {
    /// One folder per day, e.g. `20221228`
    #[default]
    Day,
    /// One folder per month, e.g. `202212`
    Month,
    /// One folder per year, e.g. `2022`
    Year,
}

impl BucketGranularity {
    fn format_str(self) -> &'static str {
        match self {
            BucketGranularity::Day => "%Y%m%d",
            BucketGranularity::Month => "%Y%m",
            BucketGranularity::Year => "%Y",
        }
    }
}

impl std::fmt::Display for BucketGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketGranularity::Day => write!(f, "day"),
            BucketGranularity::Month => write!(f, "month"),
            BucketGranularity::Year => write!(f, "year"),
        }
    }
}

/// Format the bucket folder name for a timestamp
pub fn bucket_name(timestamp: DateTime<Local>, granularity: BucketGranularity) -> String {
    timestamp.format(granularity.format_str()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Local> {
        Local.with_ymd_and_hms(2022, 12, 28, 10, 0, 0).unwrap()
    }

    #[test]
    fn day_granularity_formats_yyyymmdd() {
        assert_eq!(bucket_name(sample(), BucketGranularity::Day), "20221228");
    }

    #[test]
    fn month_granularity_formats_yyyymm() {
        assert_eq!(bucket_name(sample(), BucketGranularity::Month), "202212");
    }

    #[test]
    fn year_granularity_formats_yyyy() {
        assert_eq!(bucket_name(sample(), BucketGranularity::Year), "2022");
    }

    #[test]
    fn default_granularity_is_day() {
        assert_eq!(BucketGranularity::default(), BucketGranularity::Day);
    }

    #[test]
    fn naming_is_deterministic() {
        let ts = sample();
        assert_eq!(
            bucket_name(ts, BucketGranularity::Day),
            bucket_name(ts, BucketGranularity::Day)
        );
    }

    #[test]
    fn single_digit_month_and_day_are_zero_padded() {
        let ts = Local.with_ymd_and_hms(2023, 1, 5, 8, 30, 0).unwrap();
        assert_eq!(bucket_name(ts, BucketGranularity::Day), "20230105");
        assert_eq!(bucket_name(ts, BucketGranularity::Month), "202301");
    }
}
