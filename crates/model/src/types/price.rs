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

//! Represents a price in a market with a specified precision.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use marketsim_core::correctness::{check_in_range_inclusive_f64, FAILED};
use serde::{Deserialize, Serialize};

use super::fixed::{check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64, FIXED_SCALAR};

/// The raw signed fixed-point mantissa type backing a [`Price`].
pub type PriceRaw = i64;

/// The maximum valid price value that can be represented.
pub const PRICE_MAX: f64 = 9_223_372_036.0;

/// The minimum valid price value that can be represented.
pub const PRICE_MIN: f64 = -9_223_372_036.0;

/// The maximum raw price integer value.
pub const PRICE_RAW_MAX: PriceRaw = (PRICE_MAX * FIXED_SCALAR) as PriceRaw;

/// The minimum raw price integer value.
pub const PRICE_RAW_MIN: PriceRaw = (PRICE_MIN * FIXED_SCALAR) as PriceRaw;

/// Represents a price in a market with a specified precision.
///
/// The number of decimal places may vary. For certain asset classes, prices
/// may have negative values (e.g. options under certain conditions).
#[repr(C)]
#[derive(Clone, Copy, Default, Eq, Serialize, Deserialize)]
pub struct Price {
    /// The raw fixed-point mantissa, with `precision` defining the number of decimal places.
    pub raw: PriceRaw,
    /// The number of decimal places.
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is outside [`PRICE_MIN`, `PRICE_MAX`] or if
    /// `precision` exceeds the fixed-point maximum.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, PRICE_MIN, PRICE_MAX, "value")?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Price::new_checked`] for more details.
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] instance from the given `raw` fixed-point mantissa.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds the fixed-point maximum.
    pub fn from_raw(raw: PriceRaw, precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw, precision }
    }

    /// Creates a new [`Price`] instance with a value of zero with the given `precision`.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw: 0, precision }
    }

    /// Creates a new [`Price`] instance with the maximum representable value.
    #[must_use]
    pub fn max(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self {
            raw: PRICE_RAW_MAX,
            precision,
        }
    }

    /// Creates a new [`Price`] instance with the minimum representable value.
    #[must_use]
    pub fn min(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self {
            raw: PRICE_RAW_MIN,
            precision,
        }
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if the value of this instance is positive (> 0).
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the value of this instance as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let float_from_input = value
            .parse::<f64>()
            .map_err(|e| format!("Error parsing `input` string '{value}' as `f64`: {e}"))?;
        let precision = value.split('.').nth(1).map_or(0, |decimals| decimals.len() as u8);
        Self::new_checked(float_from_input, precision).map_err(|e| e.to_string())
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self.raw.checked_add(rhs.raw).expect("Overflow occurred when adding `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Price {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", stringify!(Price), self)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
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
    fn test_new() {
        let price = Price::new(100.50, 2);
        assert_eq!(price.precision, 2);
        assert_eq!(price.as_f64(), 100.50);
        assert_eq!(price.to_string(), "100.50");
    }

    #[rstest]
    fn test_from_str_infers_precision() {
        let price = Price::from("1500.0025");
        assert_eq!(price.precision, 4);
        assert_eq!(price.as_f64(), 1500.0025);
    }

    #[rstest]
    fn test_equality_ignores_precision() {
        assert_eq!(Price::from("1.0"), Price::from("1.00"));
        assert!(Price::from("1.01") > Price::from("1.00"));
        assert!(Price::from("0.99") < Price::from("1.00"));
    }

    #[rstest]
    fn test_add_sub_increment() {
        let price = Price::from("100.00");
        let increment = Price::from("0.01");
        assert_eq!(price + increment, Price::from("100.01"));
        assert_eq!(price - increment, Price::from("99.99"));
    }

    #[rstest]
    fn test_min_max_bounds() {
        assert!(Price::max(2) > Price::from("9000000000.00"));
        assert!(Price::min(2) < Price::from("-9000000000.00"));
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_value_out_of_range_panics() {
        let _ = Price::new(PRICE_MAX * 2.0, 2);
    }

    #[rstest]
    fn test_negative_prices_supported() {
        let price = Price::from("-0.25");
        assert!(!price.is_positive());
        assert_eq!(price.to_string(), "-0.25");
    }
}
