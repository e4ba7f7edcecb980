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

//! Represents a medium of exchange in a specified denomination.

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use marketsim_core::correctness::{check_in_range_inclusive_u8, check_valid_string, FAILED};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::enums::CurrencyType;

/// Represents a medium of exchange in a specified denomination with a fixed
/// decimal precision.
#[repr(C)]
#[derive(Clone, Copy, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// The currency code as an uppercase string.
    pub code: Ustr,
    /// The currency decimal precision.
    pub precision: u8,
    /// The currency name.
    pub name: Ustr,
    /// The currency type, denoting its category.
    pub currency_type: CurrencyType,
}

impl Currency {
    /// Creates a new [`Currency`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `code` or `name` are invalid strings, or if
    /// `precision` is invalid.
    pub fn new_checked<T: AsRef<str>>(
        code: T,
        precision: u8,
        name: T,
        currency_type: CurrencyType,
    ) -> anyhow::Result<Self> {
        let code = code.as_ref();
        let name = name.as_ref();
        check_valid_string(code, "code")?;
        check_valid_string(name, "name")?;
        check_in_range_inclusive_u8(precision, 0, 9, "precision")?;

        Ok(Self {
            code: Ustr::from(code),
            precision,
            name: Ustr::from(name),
            currency_type,
        })
    }

    /// Creates a new [`Currency`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Currency::new_checked`] for more details.
    pub fn new<T: AsRef<str>>(code: T, precision: u8, name: T, currency_type: CurrencyType) -> Self {
        Self::new_checked(code, precision, name, currency_type).expect(FAILED)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn AUD() -> Self {
        Self::new("AUD", 2, "Australian dollar", CurrencyType::Fiat)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn EUR() -> Self {
        Self::new("EUR", 2, "Euro", CurrencyType::Fiat)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn USD() -> Self {
        Self::new("USD", 2, "United States dollar", CurrencyType::Fiat)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn BTC() -> Self {
        Self::new("BTC", 8, "Bitcoin", CurrencyType::Crypto)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn ETH() -> Self {
        Self::new("ETH", 8, "Ether", CurrencyType::Crypto)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDT() -> Self {
        Self::new("USDT", 8, "Tether", CurrencyType::Crypto)
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUD" => Ok(Self::AUD()),
            "EUR" => Ok(Self::EUR()),
            "USD" => Ok(Self::USD()),
            "BTC" => Ok(Self::BTC()),
            "ETH" => Ok(Self::ETH()),
            "USDT" => Ok(Self::USDT()),
            _ => anyhow::bail!("Unknown currency code: {s}"),
        }
    }
}

impl From<&str> for Currency {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(code={}, precision={}, name={}, currency_type={})",
            stringify!(Currency),
            self.code,
            self.precision,
            self.name,
            self.currency_type,
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
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
    fn test_predefined_fiat() {
        let usd = Currency::USD();
        assert_eq!(usd.code.as_str(), "USD");
        assert_eq!(usd.precision, 2);
        assert_eq!(usd.currency_type, CurrencyType::Fiat);
    }

    #[rstest]
    fn test_predefined_crypto() {
        let eth = Currency::ETH();
        assert_eq!(eth.precision, 8);
        assert_eq!(eth.currency_type, CurrencyType::Crypto);
    }

    #[rstest]
    fn test_equality_by_code() {
        let a = Currency::USD();
        let b = Currency::new("USD", 2, "United States dollar", CurrencyType::Fiat);
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_from_str() {
        assert_eq!(Currency::from("USDT"), Currency::USDT());
        assert!(Currency::from_str("XYZ").is_err());
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_invalid_precision_panics() {
        let _ = Currency::new("XBT", 10, "Test", CurrencyType::Crypto);
    }
}
