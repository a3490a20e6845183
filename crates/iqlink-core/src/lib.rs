//! Core domain types for the iqlink feed bridge.
//!
//! This crate provides the types shared by every layer of the bridge:
//! - `Tick`, `Bar`: market data events produced by the protocol engine
//! - `Order`, `Imbalance`: wire records exchanged at the collaborator boundary
//! - `Security`, `Basket`: the instruments a session is watching
//! - `BridgeEvent`: the outbound event stream consumed by downstream layers

pub mod bar;
pub mod error;
pub mod event;
pub mod feature;
pub mod imbalance;
pub mod order;
pub mod security;
pub mod tick;
pub mod time;

pub use bar::{Bar, BarInterval, BarRequest};
pub use error::{CoreError, CoreResult};
pub use event::BridgeEvent;
pub use feature::Feature;
pub use imbalance::Imbalance;
pub use order::{Order, OrderSide};
pub use security::{Basket, Currency, Security, SecurityType};
pub use tick::Tick;
