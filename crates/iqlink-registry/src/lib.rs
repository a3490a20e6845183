//! Watched-symbol registry for the iqlink feed bridge.
//!
//! Tracks the set of subscribed symbols, assigns each a dense cache
//! slot, and holds the per-slot day-high/day-low extremes reported by
//! the feed.

pub mod registry;

pub use registry::{AddOutcome, SubscriptionRegistry, HIGH_UNSET, LOW_UNSET};
