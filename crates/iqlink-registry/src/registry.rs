//! Subscription registry with slot assignment and extremes cache.
//!
//! Subscriptions arrive from the application while the quote channel
//! concurrently reads and writes the extremes cache, so all mutation
//! happens inside one writer-exclusive critical section. Slots are
//! append-only and never compacted; an assigned slot stays valid for
//! the life of the process.

use iqlink_core::{Basket, Security};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Sentinel for a day-high the feed has not reported yet.
pub const HIGH_UNSET: Decimal = Decimal::MIN;
/// Sentinel for a day-low the feed has not reported yet.
pub const LOW_UNSET: Decimal = Decimal::MAX;

/// Result of a subscription attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Dense cache slot assigned to the symbol.
    pub slot: usize,
    /// `true` when this call created the subscription. The caller sends
    /// the outbound watch command exactly when this is set, which keeps
    /// the command at-most-once per symbol.
    pub newly_added: bool,
}

#[derive(Debug, Default)]
struct RegistryInner {
    slots: HashMap<String, usize>,
    basket: Basket,
    highs: Vec<Decimal>,
    lows: Vec<Decimal>,
}

/// Set of watched symbols plus their day-extremes cache.
///
/// The extremes mirror the feed's own reported fields verbatim: each
/// successful parse overwrites the slot with the latest reported value.
/// No running max/min is computed locally.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: RwLock<RegistryInner>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a security.
    ///
    /// Idempotent: a symbol already present keeps its slot and causes
    /// no side effect. A new symbol gets the next slot, sentinel
    /// extremes entries, and a seat in the basket.
    pub fn add(&self, security: Security) -> AddOutcome {
        let mut inner = self.inner.write();

        if let Some(&slot) = inner.slots.get(&security.symbol) {
            return AddOutcome {
                slot,
                newly_added: false,
            };
        }

        let slot = inner.highs.len();
        inner.slots.insert(security.symbol.clone(), slot);
        inner.highs.push(HIGH_UNSET);
        inner.lows.push(LOW_UNSET);
        debug!(symbol = %security.symbol, slot, "Added subscription");
        inner.basket.add(security);

        AddOutcome {
            slot,
            newly_added: true,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.inner.read().slots.contains_key(symbol)
    }

    /// Cache slot for a symbol, if registered.
    pub fn slot(&self, symbol: &str) -> Option<usize> {
        self.inner.read().slots.get(symbol).copied()
    }

    /// Store the feed-reported extremes for a slot.
    ///
    /// Each `Some` overwrites the slot verbatim; `None` (a field that
    /// failed to parse) leaves the previous value in place. Out-of-range
    /// slots are ignored.
    pub fn record_extremes(&self, slot: usize, high: Option<Decimal>, low: Option<Decimal>) {
        let mut inner = self.inner.write();
        if slot >= inner.highs.len() {
            return;
        }
        if let Some(high) = high {
            inner.highs[slot] = high;
        }
        if let Some(low) = low {
            inner.lows[slot] = low;
        }
    }

    /// Latest reported day-high, `None` until the feed reports one.
    pub fn day_high(&self, symbol: &str) -> Option<Decimal> {
        let inner = self.inner.read();
        let slot = *inner.slots.get(symbol)?;
        let value = inner.highs[slot];
        (value != HIGH_UNSET).then_some(value)
    }

    /// Latest reported day-low, `None` until the feed reports one.
    pub fn day_low(&self, symbol: &str) -> Option<Decimal> {
        let inner = self.inner.read();
        let slot = *inner.slots.get(symbol)?;
        let value = inner.lows[slot];
        (value != LOW_UNSET).then_some(value)
    }

    /// Snapshot of the basket in subscription order.
    pub fn basket(&self) -> Basket {
        self.inner.read().basket.clone()
    }

    /// Symbols in subscription order.
    pub fn symbols(&self) -> Vec<String> {
        self.inner.read().basket.symbols()
    }

    pub fn len(&self) -> usize {
        self.inner.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_is_idempotent() {
        let registry = SubscriptionRegistry::new();

        let first = registry.add(Security::stock("MSFT"));
        assert!(first.newly_added);
        assert_eq!(first.slot, 0);

        let second = registry.add(Security::stock("MSFT"));
        assert!(!second.newly_added);
        assert_eq!(second.slot, 0);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.basket().len(), 1);
    }

    #[test]
    fn test_slots_are_dense_and_stable() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.add(Security::stock("A")).slot, 0);
        assert_eq!(registry.add(Security::stock("B")).slot, 1);
        assert_eq!(registry.add(Security::stock("C")).slot, 2);

        // Re-adding never moves an assigned slot.
        assert_eq!(registry.add(Security::stock("B")).slot, 1);
        assert_eq!(registry.slot("C"), Some(2));
        assert_eq!(registry.slot("Z"), None);
    }

    #[test]
    fn test_extremes_unset_until_reported() {
        let registry = SubscriptionRegistry::new();
        registry.add(Security::stock("GE"));

        assert_eq!(registry.day_high("GE"), None);
        assert_eq!(registry.day_low("GE"), None);
        assert_eq!(registry.day_high("UNKNOWN"), None);
    }

    #[test]
    fn test_extremes_mirror_feed_not_running_max() {
        let registry = SubscriptionRegistry::new();
        let slot = registry.add(Security::stock("GE")).slot;

        registry.record_extremes(slot, Some(dec!(15.5)), Some(dec!(14.0)));
        assert_eq!(registry.day_high("GE"), Some(dec!(15.5)));

        // A lower reported high replaces the stored value; the cache is
        // not a locally computed maximum.
        registry.record_extremes(slot, Some(dec!(15.2)), None);
        assert_eq!(registry.day_high("GE"), Some(dec!(15.2)));
        assert_eq!(registry.day_low("GE"), Some(dec!(14.0)));
    }

    #[test]
    fn test_record_extremes_ignores_unknown_slot() {
        let registry = SubscriptionRegistry::new();
        registry.record_extremes(99, Some(dec!(1)), Some(dec!(1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_subscribes_assign_unique_slots() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(SubscriptionRegistry::new());
        let mut handles = vec![];
        for i in 0..8 {
            let r = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                r.add(Security::stock(&format!("SYM{i}")));
                r.add(Security::stock("SHARED"));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 9);
        let mut slots: Vec<usize> = registry
            .symbols()
            .iter()
            .map(|s| registry.slot(s).unwrap())
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..9).collect::<Vec<_>>());
    }
}
