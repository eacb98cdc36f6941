use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Kline bucket sizes accepted by the futures API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute1,
    Minute3,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
    Month1,
}

impl Interval {
    pub const ALL: [Interval; 15] = [
        Interval::Minute1,
        Interval::Minute3,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Hour2,
        Interval::Hour4,
        Interval::Hour6,
        Interval::Hour8,
        Interval::Hour12,
        Interval::Day1,
        Interval::Day3,
        Interval::Week1,
        Interval::Month1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute3 => "3m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour2 => "2h",
            Interval::Hour4 => "4h",
            Interval::Hour6 => "6h",
            Interval::Hour8 => "8h",
            Interval::Hour12 => "12h",
            Interval::Day1 => "1d",
            Interval::Day3 => "3d",
            Interval::Week1 => "1w",
            Interval::Month1 => "1M",
        }
    }

    /// Nominal length in seconds. A month counts as 30 days.
    pub fn duration_secs(&self) -> i64 {
        match self {
            Interval::Minute1 => 60,
            Interval::Minute3 => 180,
            Interval::Minute5 => 300,
            Interval::Minute15 => 900,
            Interval::Minute30 => 1_800,
            Interval::Hour1 => 3_600,
            Interval::Hour2 => 7_200,
            Interval::Hour4 => 14_400,
            Interval::Hour6 => 21_600,
            Interval::Hour8 => 28_800,
            Interval::Hour12 => 43_200,
            Interval::Day1 => 86_400,
            Interval::Day3 => 259_200,
            Interval::Week1 => 604_800,
            Interval::Month1 => 2_592_000,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_secs() * 1_000
    }

    /// Granularity used when estimating how many candles of this size are still
    /// to form before some future instant.
    pub fn reference_ms(&self) -> i64 {
        self.duration_ms()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == trimmed)
            .ok_or_else(|| Error::invalid_input(format!("unsupported interval: {value}")))
    }
}
