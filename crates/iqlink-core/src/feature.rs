//! Capability surface advertised to downstream clients.

use serde::{Deserialize, Serialize};

/// A feature the bridge supports, answerable via the capability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    LiveData,
    TickNotify,
    BrokerName,
    RegisterStock,
    Version,
    BarRequest,
    BarResponse,
    DayHigh,
    DayLow,
}

impl Feature {
    /// Everything this bridge implements.
    pub fn supported() -> &'static [Feature] {
        &[
            Feature::LiveData,
            Feature::TickNotify,
            Feature::BrokerName,
            Feature::RegisterStock,
            Feature::Version,
            Feature::BarRequest,
            Feature::BarResponse,
            Feature::DayHigh,
            Feature::DayLow,
        ]
    }
}
