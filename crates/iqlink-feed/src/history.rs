//! Historical channel handler.
//!
//! Outbound, bar-request commands carry an allocated correlation id as
//! their trailing token. Inbound, the daemon streams bar records that
//! echo the id in their first field, ending each exchange with an
//! `!ENDMSG!` sentinel line. Responses arrive asynchronously and may
//! interleave across requests, so every record is matched back to its
//! pending request before a bar is published.

use crate::error::{FeedError, FeedResult};
use crate::request_id::RequestIdAllocator;
use crate::EventSender;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dashmap::DashMap;
use iqlink_core::{Bar, BarInterval, BarRequest, BridgeEvent};
use iqlink_net::{ChannelHandle, ChunkHandler};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

/// End-of-stream sentinel in historical responses.
pub const END_OF_STREAM: &str = "!ENDMSG!";

/// A record with fewer fields than this is protocol noise; the
/// sentinel line is filtered out by this check.
const MIN_BAR_FIELDS: usize = 8;

/// One outstanding historical query.
///
/// Entries stay in the map for the life of the connection: a
/// correlation id remains valid until the channel goes down, so
/// completed requests are not evicted.
#[derive(Debug, Clone)]
pub struct PendingBarRequest {
    pub id: u32,
    pub symbol: String,
    pub interval: BarInterval,
    /// Identity of the requesting client, echoed on each bar.
    pub client: String,
}

/// Shared id → request correlation map.
///
/// Inserted on the requesting context, read on the historical channel
/// task.
pub type PendingRequests = Arc<DashMap<u32, PendingBarRequest>>;

/// Outbound side: issues bar requests on the historical channel.
pub struct HistoryClient {
    ids: Arc<RequestIdAllocator>,
    pending: PendingRequests,
    handle: ChannelHandle,
}

impl HistoryClient {
    pub fn new(
        ids: Arc<RequestIdAllocator>,
        pending: PendingRequests,
        handle: ChannelHandle,
    ) -> Self {
        Self {
            ids,
            pending,
            handle,
        }
    }

    /// Allocate an id, record the pending request, and send the command.
    ///
    /// The map entry is inserted before the send so a response can
    /// never observe a missing mapping. Returns the allocated id.
    pub fn request_bars(&self, request: &BarRequest) -> u32 {
        let id = self.ids.next_id();
        let command = build_bar_command(request, id);

        self.pending.insert(
            id,
            PendingBarRequest {
                id,
                symbol: request.symbol.clone(),
                interval: request.interval,
                client: request.client.clone(),
            },
        );
        self.handle.send(command);
        debug!(symbol = %request.symbol, id, "Requested historical bars");
        id
    }
}

/// Build the wire command for a bar request.
///
/// Daily bars use one command template, intraday bars another; the
/// allocated id is always the trailing token.
pub fn build_bar_command(request: &BarRequest, id: u32) -> String {
    match request.interval {
        BarInterval::Daily => format!(
            "HDT,{},{},,1,{}\r\n",
            request.symbol,
            request.start.format("%Y%m%d"),
            id
        ),
        BarInterval::Intraday(seconds) => format!(
            "HIT,{},{},{} {},{} {},,000000,235959,1,{}\r\n",
            request.symbol,
            seconds,
            request.start.format("%Y%m%d"),
            request.start.format("%H%M%S"),
            request.end.format("%Y%m%d"),
            request.end.format("%H%M%S"),
            id
        ),
    }
}

/// Inbound side: reassembles streamed bar responses.
///
/// This handler keeps its own carry-over buffer on top of the socket
/// read loop: a logical record can end anywhere in a read, and the
/// line terminator is the only segmentation signal at both layers.
pub struct HistoryHandler {
    pending: PendingRequests,
    events: EventSender,
    carry: String,
}

impl HistoryHandler {
    pub fn new(pending: PendingRequests, events: EventSender) -> Self {
        Self {
            pending,
            events,
            carry: String::new(),
        }
    }

    /// Bytes held over from the previous read.
    pub fn carry(&self) -> &str {
        &self.carry
    }

    fn process_record(&self, record: &str) {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() < MIN_BAR_FIELDS {
            // Sentinel lines, blanks, and partial fragments land here.
            return;
        }
        let Ok(id) = fields[0].trim().parse::<u32>() else {
            return;
        };
        let Some(request) = self.pending.get(&id) else {
            debug!(id, "Bar record for unknown request id");
            return;
        };

        match parse_bar(&fields, &request) {
            Ok(bar) => {
                let _ = self.events.send(BridgeEvent::Bar {
                    bar,
                    client: request.client.clone(),
                });
            }
            Err(e) => warn!(record, error = %e, "Dropping bar record"),
        }
    }
}

impl ChunkHandler for HistoryHandler {
    fn on_chunk(&mut self, chunk: &str) {
        // Prepend the previous read's partial record before splitting.
        let raw = if self.carry.is_empty() {
            chunk.to_string()
        } else {
            format!("{}{}", self.carry, chunk)
        };

        let segments: Vec<&str> = raw.split(['\r', '\n']).collect();
        for segment in &segments {
            self.process_record(segment);
        }

        // The sentinel ends the stream for every active request in this
        // exchange; otherwise the trailing segment is an incomplete
        // record and becomes the new carry-over.
        let last = segments.last().copied().unwrap_or("");
        if last.contains(END_OF_STREAM) {
            self.carry.clear();
        } else {
            self.carry = last.to_string();
        }
    }
}

fn parse_bar(fields: &[&str], request: &PendingBarRequest) -> FeedResult<Bar> {
    let decimal = |field: &'static str, value: &str| -> FeedResult<Decimal> {
        value.trim().parse().map_err(|_| FeedError::InvalidField {
            field,
            value: value.to_string(),
        })
    };

    let stamp = parse_timestamp(fields[1])?;
    let high = decimal("high", fields[2])?;
    let low = decimal("low", fields[3])?;
    let open = decimal("open", fields[4])?;
    let close = decimal("close", fields[5])?;
    let volume: i64 = fields[7]
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidField {
            field: "volume",
            value: fields[7].to_string(),
        })?;

    Ok(Bar::at(
        request.symbol.clone(),
        request.interval,
        stamp,
        open,
        high,
        low,
        close,
        volume,
    ))
}

/// Response timestamps normally arrive as `yyyy-mm-dd HH:MM:SS`;
/// compact and date-only forms also occur.
fn parse_timestamp(value: &str) -> FeedResult<NaiveDateTime> {
    let value = value.trim();
    if let Ok(stamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(stamp);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(value, "%Y%m%d %H%M%S") {
        return Ok(stamp);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(FeedError::InvalidField {
        field: "timestamp",
        value: value.to_string(),
    })
}
