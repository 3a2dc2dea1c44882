// src/models/sort.rs

//! Listing sort orders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Time window for `top` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
        }
    }
}

/// Sort order of a subreddit listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Hot,
    Top,
    New,
    Rising,
    Controversial,
    TopOver(TimeFilter),
}

impl SortMode {
    /// Listing endpoint segment (`/r/{sub}/{segment}`).
    pub fn endpoint(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::Top | SortMode::TopOver(_) => "top",
            SortMode::New => "new",
            SortMode::Rising => "rising",
            SortMode::Controversial => "controversial",
        }
    }

    /// Value of the `t` query parameter, if any.
    pub fn time_filter(&self) -> Option<TimeFilter> {
        match self {
            SortMode::TopOver(filter) => Some(*filter),
            _ => None,
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_lowercase().as_str() {
            "hot" => SortMode::Hot,
            "top" => SortMode::Top,
            "new" => SortMode::New,
            "rising" | "ris" => SortMode::Rising,
            "controversial" | "con" => SortMode::Controversial,
            "tophour" => SortMode::TopOver(TimeFilter::Hour),
            "topday" => SortMode::TopOver(TimeFilter::Day),
            "topweek" => SortMode::TopOver(TimeFilter::Week),
            "topmonth" => SortMode::TopOver(TimeFilter::Month),
            "topyear" => SortMode::TopOver(TimeFilter::Year),
            other => {
                return Err(format!(
                    "unknown sort '{other}' (expected hot, top, new, rising, controversial, \
                     tophour, topday, topweek, topmonth or topyear)"
                ));
            }
        };
        Ok(mode)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::TopOver(filter) => write!(f, "top{}", filter.as_str()),
            other => f.write_str(other.endpoint()),
        }
    }
}

impl Serialize for SortMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_aliases() {
        assert_eq!("ris".parse::<SortMode>(), Ok(SortMode::Rising));
        assert_eq!("con".parse::<SortMode>(), Ok(SortMode::Controversial));
        assert_eq!("HOT".parse::<SortMode>(), Ok(SortMode::Hot));
    }

    #[test]
    fn test_top_over_period() {
        let mode: SortMode = "topweek".parse().unwrap();
        assert_eq!(mode.endpoint(), "top");
        assert_eq!(mode.time_filter(), Some(TimeFilter::Week));
        assert_eq!(mode.to_string(), "topweek");
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!("best".parse::<SortMode>().is_err());
    }
}
