//! Securities and baskets.
//!
//! A `Basket` is the ordered set of instruments a session is watching.
//! It only ever grows; duplicate symbols are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Instrument class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    Stock,
    Option,
    Future,
    Index,
    Forex,
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Stock => "STK",
            Self::Option => "OPT",
            Self::Future => "FUT",
            Self::Index => "IDX",
            Self::Forex => "FX",
        };
        write!(f, "{tag}")
    }
}

impl FromStr for SecurityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STK" => Ok(Self::Stock),
            "OPT" => Ok(Self::Option),
            "FUT" => Ok(Self::Future),
            "IDX" => Ok(Self::Index),
            "FX" => Ok(Self::Forex),
            other => Err(CoreError::InvalidField {
                field: "security type",
                value: other.to_string(),
            }),
        }
    }
}

/// Settlement currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
        };
        write!(f, "{tag}")
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            other => Err(CoreError::InvalidField {
                field: "currency",
                value: other.to_string(),
            }),
        }
    }
}

/// A tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    /// Instrument symbol (uppercase).
    pub symbol: String,
    /// Listing exchange, empty when unspecified.
    pub exchange: String,
    pub security_type: SecurityType,
}

impl Security {
    /// A plain stock with no exchange qualifier.
    pub fn stock(symbol: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            exchange: String::new(),
            security_type: SecurityType::Stock,
        }
    }
}

/// Ordered collection of watched instruments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    securities: Vec<Security>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated symbol list into a basket of stocks.
    /// Empty entries are skipped.
    pub fn from_symbol_list(list: &str) -> Self {
        let mut basket = Self::new();
        for sym in list.split(',') {
            if !sym.trim().is_empty() {
                basket.add(Security::stock(sym));
            }
        }
        basket
    }

    /// Append a security; returns `false` if its symbol is already present.
    pub fn add(&mut self, security: Security) -> bool {
        if self.contains(&security.symbol) {
            return false;
        }
        self.securities.push(security);
        true
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.securities.iter().any(|s| s.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Security> {
        self.securities.iter()
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> Vec<String> {
        self.securities.iter().map(|s| s.symbol.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a Basket {
    type Item = &'a Security;
    type IntoIter = std::slice::Iter<'a, Security>;

    fn into_iter(self) -> Self::IntoIter {
        self.securities.iter()
    }
}
