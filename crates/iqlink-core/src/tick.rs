//! Live quote/trade snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One quote/trade snapshot from the live feed.
///
/// The upstream protocol carries no per-record timestamp at this
/// granularity, so `time` is the wall-clock time at which the record
/// was processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol (uppercase).
    pub symbol: String,
    /// Reporting exchange.
    pub exchange: String,
    /// Processing timestamp.
    pub time: DateTime<Utc>,
    /// Last trade price.
    pub last: Decimal,
    /// Last trade size.
    pub size: u32,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Size at the best bid.
    pub bid_size: u32,
    /// Size at the best ask.
    pub ask_size: u32,
}

impl Tick {
    /// Quoted spread: ask - bid.
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}
