//! Protocol handlers for the three feed channels.
//!
//! - `AdminHandler`: registration/login handshake on the admin channel
//! - `QuoteHandler`: live tick parsing with per-batch de-duplication
//! - `HistoryClient` / `HistoryHandler`: historical bar requests and
//!   streamed response reassembly, correlated by request id
//!
//! Handlers consume raw chunks from their channel's read loop and
//! publish `BridgeEvent`s on the outbound event channel.

pub mod admin;
pub mod error;
pub mod history;
pub mod quote;
pub mod request_id;

pub use admin::{AdminHandler, AdminSettings};
pub use error::{FeedError, FeedResult};
pub use history::{
    build_bar_command, HistoryClient, HistoryHandler, PendingBarRequest, PendingRequests,
    END_OF_STREAM,
};
pub use quote::QuoteHandler;
pub use request_id::RequestIdAllocator;

use iqlink_core::BridgeEvent;
use tokio::sync::mpsc;

/// Sender half of the outbound event stream.
///
/// Unbounded so handlers can publish from inside a read loop without
/// ever blocking it.
pub type EventSender = mpsc::UnboundedSender<BridgeEvent>;
/// Receiver half of the outbound event stream.
pub type EventReceiver = mpsc::UnboundedReceiver<BridgeEvent>;

/// Create the outbound event channel.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
