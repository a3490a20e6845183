//! Order wire record.
//!
//! The bridge does not route orders; it only serializes and parses the
//! comma-joined record exchanged with the downstream layer. The layout
//! is strictly positional:
//!
//! `symbol,side,size,price,stop,comment,exchange,account,security-type,currency`
//!
//! where `side` is the literal `true` (buy) or `false` (sell) and
//! `size` is always unsigned.

use crate::error::{CoreError, CoreResult};
use crate::security::{Currency, SecurityType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fields in a serialized order record.
const ORDER_FIELDS: usize = 10;

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }
}

/// An order to buy or sell a quantity of an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Instrument symbol (uppercase).
    pub symbol: String,
    pub side: OrderSide,
    /// Unsigned quantity.
    pub size: u32,
    /// Limit price; zero for market orders.
    pub price: Decimal,
    /// Stop price; zero when not a stop order.
    pub stop: Decimal,
    pub comment: String,
    pub exchange: String,
    pub account: String,
    pub security_type: SecurityType,
    pub currency: Currency,
}

impl Order {
    /// A market order with default routing.
    pub fn market(symbol: &str, side: OrderSide, size: u32) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            side,
            size,
            price: Decimal::ZERO,
            stop: Decimal::ZERO,
            comment: String::new(),
            exchange: String::new(),
            account: String::new(),
            security_type: SecurityType::Stock,
            currency: Currency::Usd,
        }
    }

    pub fn is_market(&self) -> bool {
        self.price.is_zero() && self.stop.is_zero()
    }

    pub fn is_limit(&self) -> bool {
        !self.price.is_zero()
    }

    pub fn is_stop(&self) -> bool {
        !self.stop.is_zero()
    }

    /// Quantity with buy positive, sell negative.
    pub fn signed_size(&self) -> i64 {
        let size = i64::from(self.size);
        if self.side.is_buy() {
            size
        } else {
            -size
        }
    }

    /// Serialize to the positional wire record.
    pub fn serialize(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.symbol,
            if self.side.is_buy() { "true" } else { "false" },
            self.size,
            self.price,
            self.stop,
            self.comment,
            self.exchange,
            self.account,
            self.security_type,
            self.currency,
        )
    }

    /// Parse the positional wire record.
    ///
    /// Records with fewer than ten fields are rejected outright.
    pub fn parse(record: &str) -> CoreResult<Self> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() < ORDER_FIELDS {
            return Err(CoreError::MalformedRecord(record.to_string()));
        }

        let side = match fields[1] {
            "true" => OrderSide::Buy,
            "false" => OrderSide::Sell,
            other => {
                return Err(CoreError::InvalidField {
                    field: "side",
                    value: other.to_string(),
                })
            }
        };
        let size: i64 = fields[2].parse().map_err(|_| CoreError::InvalidField {
            field: "size",
            value: fields[2].to_string(),
        })?;
        let price: Decimal = fields[3].parse().map_err(|_| CoreError::InvalidField {
            field: "price",
            value: fields[3].to_string(),
        })?;
        let stop: Decimal = fields[4].parse().map_err(|_| CoreError::InvalidField {
            field: "stop",
            value: fields[4].to_string(),
        })?;

        Ok(Self {
            symbol: fields[0].to_uppercase(),
            side,
            size: size.unsigned_abs() as u32,
            price,
            stop,
            comment: fields[5].to_string(),
            exchange: fields[6].to_string(),
            account: fields[7].to_string(),
            security_type: fields[8].parse()?,
            currency: fields[9].parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip() {
        let order = Order {
            symbol: "GOOG".to_string(),
            side: OrderSide::Sell,
            size: 250,
            price: dec!(101.25),
            stop: dec!(99.5),
            comment: "scale out".to_string(),
            exchange: "ARCA".to_string(),
            account: "ACCT7".to_string(),
            security_type: SecurityType::Stock,
            currency: Currency::Usd,
        };

        let parsed = Order::parse(&order.serialize()).unwrap();
        assert_eq!(parsed, order);
    }

    #[test]
    fn test_market_order_flags() {
        let order = Order::market("ibm", OrderSide::Buy, 100);
        assert_eq!(order.symbol, "IBM");
        assert!(order.is_market());
        assert!(!order.is_limit());
        assert!(!order.is_stop());
        assert_eq!(order.signed_size(), 100);
    }

    #[test]
    fn test_signed_size_sell_is_negative() {
        let order = Order::market("IBM", OrderSide::Sell, 300);
        assert_eq!(order.signed_size(), -300);
    }

    #[test]
    fn test_parse_rejects_short_record() {
        assert!(matches!(
            Order::parse("IBM,true,100,0,0"),
            Err(CoreError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_side() {
        let record = "IBM,maybe,100,0,0,,,,STK,USD";
        assert!(matches!(
            Order::parse(record),
            Err(CoreError::InvalidField { field: "side", .. })
        ));
    }

    #[test]
    fn test_parse_takes_size_magnitude() {
        let record = "IBM,false,-100,0,0,,,,STK,USD";
        let order = Order::parse(record).unwrap();
        assert_eq!(order.size, 100);
        assert_eq!(order.signed_size(), -100);
    }
}
