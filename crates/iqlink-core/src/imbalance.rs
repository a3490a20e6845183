//! Order imbalance wire record.
//!
//! Positional layout:
//! `symbol,exchange,this-size,this-time,prior-size,prior-time`

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

const IMBALANCE_FIELDS: usize = 6;

/// An exchange order imbalance announcement, paired with the prior one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imbalance {
    pub symbol: String,
    pub exchange: String,
    /// Current imbalance; positive buy-side, negative sell-side.
    pub this_size: i32,
    /// Compact announcement time, `HHmmss`.
    pub this_time: u32,
    /// Previous imbalance for the same symbol.
    pub prev_size: i32,
    /// Compact time of the previous announcement.
    pub prev_time: u32,
}

impl Imbalance {
    pub fn is_valid(&self) -> bool {
        !self.symbol.is_empty()
    }

    pub fn has_imbalance(&self) -> bool {
        self.this_size != 0
    }

    pub fn had_imbalance(&self) -> bool {
        self.prev_size != 0
    }

    /// Serialize to the positional wire record.
    pub fn serialize(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.symbol, self.exchange, self.this_size, self.this_time, self.prev_size, self.prev_time,
        )
    }

    /// Parse the positional wire record.
    pub fn parse(record: &str) -> CoreResult<Self> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() < IMBALANCE_FIELDS {
            return Err(CoreError::MalformedRecord(record.to_string()));
        }

        let int = |field: &'static str, value: &str| -> CoreResult<i32> {
            value.parse().map_err(|_| CoreError::InvalidField {
                field,
                value: value.to_string(),
            })
        };
        let time = |field: &'static str, value: &str| -> CoreResult<u32> {
            value.parse().map_err(|_| CoreError::InvalidField {
                field,
                value: value.to_string(),
            })
        };

        Ok(Self {
            symbol: fields[0].to_string(),
            exchange: fields[1].to_string(),
            this_size: int("imbalance size", fields[2])?,
            this_time: time("imbalance time", fields[3])?,
            prev_size: int("prior imbalance size", fields[4])?,
            prev_time: time("prior imbalance time", fields[5])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let imb = Imbalance {
            symbol: "NYX".to_string(),
            exchange: "NYSE".to_string(),
            this_size: -25_000,
            this_time: 155000,
            prev_size: 12_000,
            prev_time: 154500,
        };
        let parsed = Imbalance::parse(&imb.serialize()).unwrap();
        assert_eq!(parsed, imb);
    }

    #[test]
    fn test_flags() {
        let imb = Imbalance {
            symbol: "GE".to_string(),
            exchange: "NYSE".to_string(),
            this_size: 500,
            this_time: 160000,
            prev_size: 0,
            prev_time: 0,
        };
        assert!(imb.is_valid());
        assert!(imb.has_imbalance());
        assert!(!imb.had_imbalance());
    }

    #[test]
    fn test_parse_rejects_short_record() {
        assert!(Imbalance::parse("GE,NYSE,500").is_err());
    }
}
