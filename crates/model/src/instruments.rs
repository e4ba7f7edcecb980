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

//! Instrument definitions the simulated venue can trade.
//!
//! Immutable after load; the matching engine only reads identifier, currency,
//! precision, increment and fee metadata.

use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    identifiers::{InstrumentId, Symbol, Venue},
    types::{Currency, Price, Quantity},
};

/// A tradable instrument with the metadata the venue requires for matching
/// and commission calculation.
#[enum_dispatch]
pub trait Instrument: 'static + Send {
    /// Returns the instrument ID.
    fn id(&self) -> InstrumentId;
    /// Returns the raw venue symbol.
    fn raw_symbol(&self) -> Symbol;
    /// Returns the base currency (if applicable).
    fn base_currency(&self) -> Option<Currency>;
    /// Returns the quote currency.
    fn quote_currency(&self) -> Currency;
    /// Returns the number of decimal places for prices.
    fn price_precision(&self) -> u8;
    /// Returns the number of decimal places for quantities.
    fn size_precision(&self) -> u8;
    /// Returns the minimum price increment (tick size).
    fn price_increment(&self) -> Price;
    /// Returns the minimum size increment.
    fn size_increment(&self) -> Quantity;
    /// Returns the contract multiplier.
    fn multiplier(&self) -> Quantity;
    /// Returns the fee rate for passive executions.
    fn maker_fee(&self) -> Decimal;
    /// Returns the fee rate for aggressive executions.
    fn taker_fee(&self) -> Decimal;
    /// Returns `true` if the instrument is a derivative.
    fn is_derivative(&self) -> bool;

    /// Returns the venue of the instrument.
    fn venue(&self) -> Venue {
        self.id().venue
    }
}

/// Represents a spot currency pair (e.g. AUD/USD).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// The instrument ID.
    pub id: InstrumentId,
    /// The raw/local symbol at the venue.
    pub raw_symbol: Symbol,
    /// The base currency.
    pub base_currency: Currency,
    /// The quote currency.
    pub quote_currency: Currency,
    /// The price decimal precision.
    pub price_precision: u8,
    /// The trading size decimal precision.
    pub size_precision: u8,
    /// The minimum price increment (tick size).
    pub price_increment: Price,
    /// The minimum size increment.
    pub size_increment: Quantity,
    /// The fee rate for liquidity makers as a percentage of order value.
    pub maker_fee: Decimal,
    /// The fee rate for liquidity takers as a percentage of order value.
    pub taker_fee: Decimal,
}

impl Instrument for CurrencyPair {
    fn id(&self) -> InstrumentId {
        self.id
    }

    fn raw_symbol(&self) -> Symbol {
        self.raw_symbol
    }

    fn base_currency(&self) -> Option<Currency> {
        Some(self.base_currency)
    }

    fn quote_currency(&self) -> Currency {
        self.quote_currency
    }

    fn price_precision(&self) -> u8 {
        self.price_precision
    }

    fn size_precision(&self) -> u8 {
        self.size_precision
    }

    fn price_increment(&self) -> Price {
        self.price_increment
    }

    fn size_increment(&self) -> Quantity {
        self.size_increment
    }

    fn multiplier(&self) -> Quantity {
        Quantity::from(1)
    }

    fn maker_fee(&self) -> Decimal {
        self.maker_fee
    }

    fn taker_fee(&self) -> Decimal {
        self.taker_fee
    }

    fn is_derivative(&self) -> bool {
        false
    }
}

/// Represents a crypto perpetual futures contract ("perpetual swap").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CryptoPerpetual {
    /// The instrument ID.
    pub id: InstrumentId,
    /// The raw/local symbol at the venue.
    pub raw_symbol: Symbol,
    /// The base currency.
    pub base_currency: Currency,
    /// The quote currency.
    pub quote_currency: Currency,
    /// The settlement currency.
    pub settlement_currency: Currency,
    /// The price decimal precision.
    pub price_precision: u8,
    /// The trading size decimal precision.
    pub size_precision: u8,
    /// The minimum price increment (tick size).
    pub price_increment: Price,
    /// The minimum size increment.
    pub size_increment: Quantity,
    /// The contract multiplier.
    pub multiplier: Quantity,
    /// The fee rate for liquidity makers as a percentage of order value.
    pub maker_fee: Decimal,
    /// The fee rate for liquidity takers as a percentage of order value.
    pub taker_fee: Decimal,
}

impl Instrument for CryptoPerpetual {
    fn id(&self) -> InstrumentId {
        self.id
    }

    fn raw_symbol(&self) -> Symbol {
        self.raw_symbol
    }

    fn base_currency(&self) -> Option<Currency> {
        Some(self.base_currency)
    }

    fn quote_currency(&self) -> Currency {
        self.quote_currency
    }

    fn price_precision(&self) -> u8 {
        self.price_precision
    }

    fn size_precision(&self) -> u8 {
        self.size_precision
    }

    fn price_increment(&self) -> Price {
        self.price_increment
    }

    fn size_increment(&self) -> Quantity {
        self.size_increment
    }

    fn multiplier(&self) -> Quantity {
        self.multiplier
    }

    fn maker_fee(&self) -> Decimal {
        self.maker_fee
    }

    fn taker_fee(&self) -> Decimal {
        self.taker_fee
    }

    fn is_derivative(&self) -> bool {
        true
    }
}

/// A tagged union over all instrument types.
#[enum_dispatch(Instrument)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InstrumentAny {
    CurrencyPair(CurrencyPair),
    CryptoPerpetual(CryptoPerpetual),
}

#[cfg(any(test, feature = "stubs"))]
pub mod stubs {
    //! Instrument fixtures for testing.

    use rust_decimal_macros::dec;

    use super::*;

    #[must_use]
    pub fn currency_pair_audusd() -> CurrencyPair {
        CurrencyPair {
            id: InstrumentId::from("AUD/USD.SIM"),
            raw_symbol: Symbol::new("AUD/USD"),
            base_currency: Currency::AUD(),
            quote_currency: Currency::USD(),
            price_precision: 5,
            size_precision: 0,
            price_increment: Price::from("0.00001"),
            size_increment: Quantity::from(1),
            maker_fee: dec!(0.0002),
            taker_fee: dec!(0.0004),
        }
    }

    #[must_use]
    pub fn crypto_perpetual_ethusdt() -> CryptoPerpetual {
        CryptoPerpetual {
            id: InstrumentId::from("ETHUSDT-PERP.BINANCE"),
            raw_symbol: Symbol::new("ETHUSDT"),
            base_currency: Currency::ETH(),
            quote_currency: Currency::USDT(),
            settlement_currency: Currency::USDT(),
            price_precision: 2,
            size_precision: 3,
            price_increment: Price::from("0.01"),
            size_increment: Quantity::from("0.001"),
            multiplier: Quantity::from(1),
            maker_fee: dec!(0.0002),
            taker_fee: dec!(0.0004),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{stubs::*, *};

    #[rstest]
    fn test_currency_pair() {
        let instrument = InstrumentAny::CurrencyPair(currency_pair_audusd());
        assert_eq!(instrument.id(), InstrumentId::from("AUD/USD.SIM"));
        assert_eq!(instrument.quote_currency(), Currency::USD());
        assert_eq!(instrument.price_increment(), Price::from("0.00001"));
        assert!(!instrument.is_derivative());
    }

    #[rstest]
    fn test_crypto_perpetual() {
        let instrument = InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt());
        assert_eq!(instrument.venue(), Venue::new("BINANCE"));
        assert_eq!(instrument.size_precision(), 3);
        assert!(instrument.is_derivative());
    }
}
