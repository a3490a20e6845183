//! Historical bar types.
//!
//! A `BarRequest` describes one outstanding historical query; the
//! historical channel answers it with a stream of `Bar` values.

use crate::time::{compact_date, compact_time};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarInterval {
    /// One bar per trading day.
    Daily,
    /// Fixed-length intraday bars, in seconds.
    Intraday(u32),
}

impl BarInterval {
    /// One-minute bars.
    pub const MINUTE: Self = Self::Intraday(60);
    /// Five-minute bars.
    pub const FIVE_MINUTE: Self = Self::Intraday(300);
    /// Hourly bars.
    pub const HOUR: Self = Self::Intraday(3600);

    pub fn is_daily(&self) -> bool {
        matches!(self, Self::Daily)
    }

    /// Bar length in seconds; `None` for daily bars.
    pub fn seconds(&self) -> Option<u32> {
        match self {
            Self::Daily => None,
            Self::Intraday(secs) => Some(*secs),
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "DAY"),
            Self::Intraday(secs) => write!(f, "{secs}s"),
        }
    }
}

/// One OHLCV candle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument symbol (uppercase).
    pub symbol: String,
    /// Bar granularity.
    pub interval: BarInterval,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    /// Compact session date, `yyyymmdd`.
    pub date: u32,
    /// Compact bar time, `HHmmss`.
    pub time: u32,
}

impl Bar {
    /// Build a bar from a parsed response timestamp.
    pub fn at(
        symbol: impl Into<String>,
        interval: BarInterval,
        stamp: NaiveDateTime,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            open,
            high,
            low,
            close,
            volume,
            date: compact_date(stamp.date()),
            time: compact_time(stamp.time()),
        }
    }
}

/// One historical bar query as issued by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarRequest {
    /// Instrument symbol (uppercase).
    pub symbol: String,
    /// Requested granularity.
    pub interval: BarInterval,
    /// Inclusive range start.
    pub start: NaiveDateTime,
    /// Inclusive range end.
    pub end: NaiveDateTime,
    /// Identity of the requesting client; echoed on every resulting bar.
    pub client: String,
}

impl BarRequest {
    pub fn new(
        symbol: &str,
        interval: BarInterval,
        start: NaiveDateTime,
        end: NaiveDateTime,
        client: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            interval,
            start,
            end,
            client: client.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_interval_seconds() {
        assert_eq!(BarInterval::Daily.seconds(), None);
        assert_eq!(BarInterval::FIVE_MINUTE.seconds(), Some(300));
        assert!(BarInterval::Daily.is_daily());
        assert!(!BarInterval::MINUTE.is_daily());
    }

    #[test]
    fn test_bar_at_splits_timestamp() {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 35, 0)
            .unwrap();
        let bar = Bar::at(
            "IBM",
            BarInterval::FIVE_MINUTE,
            stamp,
            dec!(10),
            dec!(11),
            dec!(9.5),
            dec!(10.5),
            1200,
        );
        assert_eq!(bar.date, 20240102);
        assert_eq!(bar.time, 93500);
        assert_eq!(bar.high, dec!(11));
    }

    #[test]
    fn test_request_uppercases_symbol() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let req = BarRequest::new("spy ", BarInterval::Daily, start, start, "client-1");
        assert_eq!(req.symbol, "SPY");
    }
}
