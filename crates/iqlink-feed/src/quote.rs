//! Quote channel handler.
//!
//! Parses live tick records, de-duplicates within each read batch,
//! updates the day-extremes cache, and emits ticks.

use crate::error::{FeedError, FeedResult};
use crate::EventSender;
use chrono::Utc;
use iqlink_core::{BridgeEvent, Tick};
use iqlink_net::{ChunkHandler, LineBuffer};
use iqlink_registry::SubscriptionRegistry;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// A record with fewer fields than this is not a quote.
const MIN_QUOTE_FIELDS: usize = 15;

// Fixed positional layout of a quote record.
const F_TYPE: usize = 0;
const F_SYMBOL: usize = 1;
const F_EXCHANGE: usize = 2;
const F_LAST: usize = 3;
const F_TRADE_SIZE: usize = 7;
const F_DAY_LOW: usize = 8;
const F_DAY_HIGH: usize = 9;
const F_BID: usize = 10;
const F_ASK: usize = 11;
const F_BID_SIZE: usize = 12;
const F_ASK_SIZE: usize = 13;

struct ParsedQuote {
    tick: Tick,
    day_high: Option<Decimal>,
    day_low: Option<Decimal>,
}

/// Tick parser for the live quote channel.
pub struct QuoteHandler {
    registry: Arc<SubscriptionRegistry>,
    events: EventSender,
    lines: LineBuffer,
}

impl QuoteHandler {
    pub fn new(registry: Arc<SubscriptionRegistry>, events: EventSender) -> Self {
        Self {
            registry,
            events,
            lines: LineBuffer::new(),
        }
    }

    /// Process one read's worth of completed records.
    ///
    /// The feed may emit superseding updates for one symbol within a
    /// single read, so the batch is scanned newest-first with a
    /// per-batch set keyed by symbol: the first record seen for a
    /// symbol wins and earlier ones are discarded. Last-wins-per-batch
    /// is the intended policy, not an optimization.
    fn process_batch(&mut self, batch: &[String]) {
        let mut emitted: HashSet<String> = HashSet::new();

        for line in batch.iter().rev() {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < MIN_QUOTE_FIELDS {
                continue;
            }
            if !matches!(fields[F_TYPE], "P" | "Q") {
                continue;
            }
            if emitted.contains(fields[F_SYMBOL]) {
                // Superseded by a later record in this batch.
                continue;
            }

            match parse_quote(&fields) {
                Ok(parsed) => {
                    if let Some(slot) = self.registry.slot(&parsed.tick.symbol) {
                        self.registry
                            .record_extremes(slot, parsed.day_high, parsed.day_low);
                    }
                    emitted.insert(parsed.tick.symbol.clone());
                    let _ = self.events.send(BridgeEvent::Tick(parsed.tick));
                }
                Err(e) => {
                    // One bad record never poisons the stream.
                    warn!(record = %line, error = %e, "Dropping quote record");
                }
            }
        }
    }
}

impl ChunkHandler for QuoteHandler {
    fn on_chunk(&mut self, chunk: &str) {
        let batch = self.lines.push(chunk);
        if !batch.is_empty() {
            self.process_batch(&batch);
        }
    }
}

fn parse_quote(fields: &[&str]) -> FeedResult<ParsedQuote> {
    let decimal = |field: &'static str, value: &str| -> FeedResult<Decimal> {
        value.trim().parse().map_err(|_| FeedError::InvalidField {
            field,
            value: value.to_string(),
        })
    };
    let size = |field: &'static str, value: &str| -> FeedResult<u32> {
        value.trim().parse().map_err(|_| FeedError::InvalidField {
            field,
            value: value.to_string(),
        })
    };

    let tick = Tick {
        symbol: fields[F_SYMBOL].to_string(),
        exchange: fields[F_EXCHANGE].to_string(),
        // The protocol carries no timestamp at this granularity.
        time: Utc::now(),
        last: decimal("last", fields[F_LAST])?,
        size: size("trade size", fields[F_TRADE_SIZE])?,
        bid: decimal("bid", fields[F_BID])?,
        ask: decimal("ask", fields[F_ASK])?,
        bid_size: size("bid size", fields[F_BID_SIZE])?,
        ask_size: size("ask size", fields[F_ASK_SIZE])?,
    };

    // Extremes parse failures are tolerated; that field's cache update
    // is simply skipped for this record.
    Ok(ParsedQuote {
        tick,
        day_high: fields[F_DAY_HIGH].trim().parse().ok(),
        day_low: fields[F_DAY_LOW].trim().parse().ok(),
    })
}
