// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Interned-string identifier types for the trading domain model.

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use marketsim_core::correctness::{check_valid_string, FAILED};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

macro_rules! identifier {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[repr(C)]
        #[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Ustr);

        impl $name {
            /// Creates a new identifier with correctness checking.
            ///
            /// # Errors
            ///
            /// Returns an error if `value` is not a valid string.
            pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
                let value = value.as_ref();
                check_valid_string(value, stringify!(value))?;
                Ok(Self(Ustr::from(value)))
            }

            /// Creates a new identifier.
            ///
            /// # Panics
            ///
            /// Panics if `value` is not a valid string.
            pub fn new<T: AsRef<str>>(value: T) -> Self {
                Self::new_checked(value).expect(FAILED)
            }

            /// Returns the inner identifier value.
            #[must_use]
            pub fn inner(&self) -> Ustr {
                self.0
            }

            /// Returns the inner identifier value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}", self.0.as_str())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

identifier!(AccountId, "A valid account ID (assigned by the venue).");
identifier!(ClientOrderId, "A valid client order ID (assigned by the trading system).");
identifier!(PositionId, "A valid position ID (assigned by the venue or derived).");
identifier!(StrategyId, "A valid strategy ID.");
identifier!(Symbol, "A valid ticker symbol ID for a tradable instrument.");
identifier!(TradeId, "A valid trade match ID (assigned by the venue).");
identifier!(TraderId, "A valid trader ID.");
identifier!(Venue, "A valid trading venue ID.");
identifier!(VenueOrderId, "A valid venue order ID (assigned by the venue).");

impl Default for TraderId {
    fn default() -> Self {
        Self::new("TRADER-000")
    }
}

impl Default for StrategyId {
    fn default() -> Self {
        Self::new("S-001")
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new("SIM-001")
    }
}

/// Represents a valid instrument ID, being a symbol and venue combination.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentId {
    /// The instruments ticker symbol.
    pub symbol: Symbol,
    /// The instruments trading venue.
    pub venue: Venue,
}

impl InstrumentId {
    /// Creates a new [`InstrumentId`] instance.
    #[must_use]
    pub const fn new(symbol: Symbol, venue: Venue) -> Self {
        Self { symbol, venue }
    }
}

impl FromStr for InstrumentId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((symbol, venue)) => {
                check_valid_string(symbol, "symbol")?;
                check_valid_string(venue, "venue")?;
                Ok(Self {
                    symbol: Symbol::new(symbol),
                    venue: Venue::new(venue),
                })
            }
            None => anyhow::bail!(
                "Error parsing `InstrumentId` from '{s}': missing '.' separator between symbol and venue"
            ),
        }
    }
}

impl From<&str> for InstrumentId {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}.{}\"", self.symbol, self.venue)
    }
}

impl Display for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_string_reprs() {
        let id = ClientOrderId::new("O-20240101-001");
        assert_eq!(id.as_str(), "O-20240101-001");
        assert_eq!(format!("{id}"), "O-20240101-001");
        assert_eq!(format!("{id:?}"), "\"O-20240101-001\"");
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_empty_identifier_panics() {
        let _ = Venue::new("");
    }

    #[rstest]
    fn test_instrument_id_parse() {
        let id = InstrumentId::from("ETHUSDT-PERP.BINANCE");
        assert_eq!(id.symbol, Symbol::new("ETHUSDT-PERP"));
        assert_eq!(id.venue, Venue::new("BINANCE"));
        assert_eq!(id.to_string(), "ETHUSDT-PERP.BINANCE");
    }

    #[rstest]
    fn test_instrument_id_parse_failure() {
        let result = InstrumentId::from_str("ETHUSDT");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("missing '.' separator"));
    }

    #[rstest]
    fn test_interned_equality() {
        let a = Venue::new("BINANCE");
        let b = Venue::from("BINANCE");
        assert_eq!(a, b);
        assert_eq!(a.inner(), b.inner());
    }
}
