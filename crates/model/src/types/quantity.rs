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

//! Represents a quantity with a non-negative value and a specified precision.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use marketsim_core::correctness::{check_in_range_inclusive_f64, FAILED};
use serde::{Deserialize, Serialize};

use super::fixed::{check_fixed_precision, f64_to_fixed_u64, fixed_u64_to_f64, FIXED_SCALAR};

/// The raw unsigned fixed-point mantissa type backing a [`Quantity`].
pub type QuantityRaw = u64;

/// The maximum valid quantity value that can be represented.
pub const QUANTITY_MAX: f64 = 18_446_744_073.0;

/// The maximum raw quantity integer value.
pub const QUANTITY_RAW_MAX: QuantityRaw = (QUANTITY_MAX * FIXED_SCALAR) as QuantityRaw;

/// Represents a quantity with a non-negative value and a specified precision.
///
/// Used for order sizes, fill sizes and position sizes.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// The raw fixed-point mantissa, with `precision` defining the number of decimal places.
    pub raw: QuantityRaw,
    /// The number of decimal places.
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is negative or exceeds [`QUANTITY_MAX`], or
    /// if `precision` exceeds the fixed-point maximum.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, 0.0, QUANTITY_MAX, "value")?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_u64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Quantity::new_checked`] for more details.
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Quantity`] instance from the given `raw` fixed-point mantissa.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds the fixed-point maximum.
    pub fn from_raw(raw: QuantityRaw, precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw, precision }
    }

    /// Creates a new [`Quantity`] instance with a value of zero with the given `precision`.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw: 0, precision }
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
        fixed_u64_to_f64(self.raw)
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let float_from_input = value
            .parse::<f64>()
            .map_err(|e| format!("Error parsing `input` string '{value}' as `f64`: {e}"))?;
        let precision = value.split('.').nth(1).map_or(0, |decimals| decimals.len() as u8);
        Self::new_checked(float_from_input, precision).map_err(|e| e.to_string())
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self::new(f64::from(value), 0)
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Quantity`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Quantity`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", stringify!(Quantity), self)
    }
}

impl Display for Quantity {
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
        let qty = Quantity::new(10.005, 3);
        assert_eq!(qty.precision, 3);
        assert_eq!(qty.as_f64(), 10.005);
        assert_eq!(qty.to_string(), "10.005");
    }

    #[rstest]
    fn test_zero() {
        let qty = Quantity::zero(2);
        assert!(qty.is_zero());
        assert!(!qty.is_positive());
    }

    #[rstest]
    fn test_from_integer() {
        assert_eq!(Quantity::from(10), Quantity::new(10.0, 0));
        assert_eq!(Quantity::from("10.50"), Quantity::new(10.5, 2));
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_negative_value_panics() {
        let _ = Quantity::new(-1.0, 0);
    }

    #[rstest]
    fn test_arithmetic() {
        let a = Quantity::from("10.0");
        let b = Quantity::from("2.5");
        assert_eq!(a + b, Quantity::from("12.5"));
        assert_eq!(a - b, Quantity::from("7.5"));
    }

    #[rstest]
    #[should_panic(expected = "Underflow occurred when subtracting `Quantity`")]
    fn test_sub_underflow_panics() {
        let _ = Quantity::from(1) - Quantity::from(2);
    }

    #[rstest]
    fn test_ordering() {
        assert!(Quantity::from(2) > Quantity::from(1));
        assert_eq!(Quantity::from("5").min(Quantity::from("3")), Quantity::from("3"));
    }
}
