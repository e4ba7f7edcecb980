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

//! Condition checks for function and method preconditions.
//!
//! A failed check produces a descriptive `anyhow::Error`; callers on fatal
//! construction paths convert this to a panic with `.expect(FAILED)`.

use std::fmt::{Debug, Display};

/// Standard message prefix for failed condition panics.
pub const FAILED: &str = "Condition failed";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error if `predicate` is false.
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the string `s` is not empty or whitespace.
///
/// # Errors
///
/// Returns an error if `s` is empty or all whitespace.
pub fn check_valid_string<T: AsRef<str>>(s: T, param: &str) -> anyhow::Result<()> {
    let s = s.as_ref();
    if s.trim().is_empty() {
        anyhow::bail!("invalid string for '{param}', was empty")
    }
    Ok(())
}

/// Checks the values are equal.
///
/// # Errors
///
/// Returns an error if `lhs` is not equal to `rhs`.
pub fn check_equal<T: PartialEq + Debug + Display>(
    lhs: T,
    rhs: T,
    lhs_param: &str,
    rhs_param: &str,
) -> anyhow::Result<()> {
    if lhs != rhs {
        anyhow::bail!("'{lhs_param}' value of {lhs} was not equal to '{rhs_param}' value of {rhs}")
    }
    Ok(())
}

/// Checks the `value` is within range [`l`, `r`].
///
/// # Errors
///
/// Returns an error if `value` is outside the inclusive range.
pub fn check_in_range_inclusive_f64(
    value: f64,
    l: f64,
    r: f64,
    param: &str,
) -> anyhow::Result<()> {
    if value.is_nan() || value.is_infinite() || value < l || value > r {
        anyhow::bail!("invalid f64 for '{param}' not in range [{l}, {r}], was {value}")
    }
    Ok(())
}

/// Checks the `value` is within range [`l`, `r`].
///
/// # Errors
///
/// Returns an error if `value` is outside the inclusive range.
pub fn check_in_range_inclusive_u8(value: u8, l: u8, r: u8, param: &str) -> anyhow::Result<()> {
    if value < l || value > r {
        anyhow::bail!("invalid u8 for '{param}' not in range [{l}, {r}], was {value}")
    }
    Ok(())
}

/// Checks the slice is not empty.
///
/// # Errors
///
/// Returns an error if `slice` is empty.
pub fn check_slice_not_empty<T>(slice: &[T], param: &str) -> anyhow::Result<()> {
    if slice.is_empty() {
        anyhow::bail!("the '{param}' slice `&[{}]` was empty", std::any::type_name::<T>())
    }
    Ok(())
}

/// Checks the `value` is positive.
///
/// # Errors
///
/// Returns an error if `value` is not positive.
pub fn check_positive_f64(value: f64, param: &str) -> anyhow::Result<()> {
    if value.is_nan() || value.is_infinite() || value <= 0.0 {
        anyhow::bail!("invalid f64 for '{param}' not positive, was {value}")
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn test_check_predicate_true(#[case] predicate: bool, #[case] expected: bool) {
        assert_eq!(check_predicate_true(predicate, "the predicate was false").is_ok(), expected);
    }

    #[rstest]
    #[case(" a valid string ", true)]
    #[case("", false)]
    #[case("   ", false)]
    fn test_check_valid_string(#[case] s: &str, #[case] expected: bool) {
        assert_eq!(check_valid_string(s, "value").is_ok(), expected);
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0, true)]
    #[case(1.0, 0.0, 1.0, true)]
    #[case(1.1, 0.0, 1.0, false)]
    #[case(-0.1, 0.0, 1.0, false)]
    #[case(f64::NAN, 0.0, 1.0, false)]
    fn test_check_in_range_inclusive_f64(
        #[case] value: f64,
        #[case] l: f64,
        #[case] r: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(check_in_range_inclusive_f64(value, l, r, "value").is_ok(), expected);
    }

    #[rstest]
    fn test_check_equal() {
        assert!(check_equal(1, 1, "lhs", "rhs").is_ok());
        let err = check_equal(1, 2, "lhs", "rhs").unwrap_err();
        assert_eq!(err.to_string(), "'lhs' value of 1 was not equal to 'rhs' value of 2");
    }

    #[rstest]
    fn test_check_slice_not_empty() {
        assert!(check_slice_not_empty(&[1, 2, 3], "values").is_ok());
        assert!(check_slice_not_empty::<i32>(&[], "values").is_err());
    }

    #[rstest]
    #[case(1.0, true)]
    #[case(0.0, false)]
    #[case(-1.0, false)]
    fn test_check_positive_f64(#[case] value: f64, #[case] expected: bool) {
        assert_eq!(check_positive_f64(value, "value").is_ok(), expected);
    }
}
