//! Outbound bridge events.

use crate::bar::Bar;
use crate::tick::Tick;
use serde::{Deserialize, Serialize};

/// Event published by the protocol engine to the downstream layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BridgeEvent {
    /// Live quote/trade snapshot from the quote channel.
    Tick(Tick),
    /// Historical bar, tagged with the client that requested it.
    Bar { bar: Bar, client: String },
    /// Admin handshake outcome; fired once when registration succeeds.
    Connected(bool),
}
